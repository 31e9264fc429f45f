//! Typed view over a document's front-matter.

use jiff::civil::Date;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

/// Document metadata parsed once from front-matter and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metadata {
    /// Display title. Callers pick their own fallback when absent.
    pub title: Option<String>,
    /// Explicit slug override.
    pub slug: Option<String>,
    /// Short summary for listings.
    pub description: Option<String>,
    /// Cover image URL.
    pub cover: Option<String>,
    /// Tags in source order; empty when the field is absent.
    pub tags: Vec<String>,
    /// Publish date from the `date` field (filename dates are applied by sources).
    pub date: Option<Date>,
    /// Every other key, untouched.
    pub extra: Map<String, JsonValue>,
}

impl Metadata {
    /// Builds metadata from a parsed front-matter mapping.
    ///
    /// Non-object values produce empty metadata.
    pub fn from_value(value: JsonValue) -> Self {
        let JsonValue::Object(mut map) = value else {
            return Self::default();
        };

        let title = take_string(&mut map, "title");
        let slug = take_string(&mut map, "slug");
        let description = take_string(&mut map, "description");
        let cover = take_string(&mut map, "cover");
        let tags = map.remove("tags").map(tags_from_value).unwrap_or_default();
        let date = map.remove("date").and_then(|v| match v {
            JsonValue::String(s) => parse_date(&s),
            _ => None,
        });

        Self {
            title,
            slug,
            description,
            cover,
            tags,
            date,
            extra: map,
        }
    }

    /// Returns true when no field was present.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.slug.is_none()
            && self.description.is_none()
            && self.cover.is_none()
            && self.tags.is_empty()
            && self.date.is_none()
            && self.extra.is_empty()
    }

    /// Returns true if `tag` is one of the document's tags.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

fn take_string(map: &mut Map<String, JsonValue>, key: &str) -> Option<String> {
    match map.remove(key)? {
        JsonValue::String(s) => Some(s),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn tags_from_value(value: JsonValue) -> Vec<String> {
    match value {
        JsonValue::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        JsonValue::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                JsonValue::String(s) => Some(s),
                JsonValue::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Parses `YYYY-MM-DD`, also accepting a longer timestamp with that prefix.
pub fn parse_date(value: &str) -> Option<Date> {
    let value = value.trim();
    if let Ok(date) = value.parse::<Date>() {
        return Some(date);
    }
    value.get(..10)?.parse::<Date>().ok()
}
