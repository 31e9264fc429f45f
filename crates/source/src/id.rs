use crate::error::SourceError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Key locating one document: a slug, optionally scoped to a category.
///
/// The string form is `slug` or `category/slug`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DocumentId {
    /// Category the document belongs to (`easy`, `medium`, ...), if any.
    pub category: Option<String>,
    /// Slug within the category.
    pub slug: String,
}

impl DocumentId {
    /// An identifier without a category.
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            category: None,
            slug: slug.into(),
        }
    }

    /// An identifier scoped to `category`.
    pub fn in_category(category: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            slug: slug.into(),
        }
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.category {
            Some(category) => write!(f, "{category}/{}", self.slug),
            None => f.write_str(&self.slug),
        }
    }
}

impl FromStr for DocumentId {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SourceError::InvalidId(s.to_string());
        match s.split_once('/') {
            Some((category, slug)) => {
                if category.is_empty() || slug.is_empty() || slug.contains('/') {
                    return Err(invalid());
                }
                Ok(Self::in_category(category, slug))
            }
            None if s.is_empty() => Err(invalid()),
            None => Ok(Self::new(s)),
        }
    }
}
