use crate::metadata::Metadata;
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Result returned after extracting frontmatter from a Markdown document.
#[derive(Debug)]
pub struct FrontmatterExtraction {
    /// Parsed frontmatter as a JSON value.
    pub value: JsonValue,
    /// Byte offset inside the original document where Markdown content begins.
    pub body_start: usize,
}

impl FrontmatterExtraction {
    fn empty() -> Self {
        Self {
            value: JsonValue::Object(Default::default()),
            body_start: 0,
        }
    }
}

/// Errors emitted while parsing or extracting frontmatter.
#[derive(Debug, Error)]
pub enum FrontmatterError {
    /// Unclosed YAML fence (e.g., missing terminating `---`).
    #[error("Unterminated YAML frontmatter block: expected closing '---'")]
    Unterminated,
    /// YAML failed to parse.
    #[error("Frontmatter parse error: {message}")]
    Parse {
        /// Parser message.
        message: String,
        /// Offset of the body following the rejected block.
        body_start: usize,
    },
    /// Top-level YAML node was not a mapping.
    #[error("Frontmatter must be a YAML mapping at the top level")]
    InvalidRootType {
        /// Offset of the body following the rejected block.
        body_start: usize,
    },
}

/// Extracts YAML frontmatter from an input document.
pub fn extract_frontmatter(input: &str) -> Result<FrontmatterExtraction, FrontmatterError> {
    match find_yaml_block(input)? {
        Some((block, body_start)) => {
            let value = parse_yaml_block(block, body_start)?;
            Ok(FrontmatterExtraction { value, body_start })
        }
        None => Ok(FrontmatterExtraction::empty()),
    }
}

/// Splits a document into metadata and body without ever failing.
///
/// An absent block yields empty metadata and the full input. A block that
/// is present but unusable also yields empty metadata: an unterminated fence
/// keeps the whole input as body, a block that does not parse is dropped.
pub fn split_front_matter(input: &str) -> (Metadata, &str) {
    match extract_frontmatter(input) {
        Ok(extraction) => (
            Metadata::from_value(extraction.value),
            &input[extraction.body_start..],
        ),
        Err(FrontmatterError::Unterminated) => {
            log::warn!("Ignoring unterminated frontmatter block");
            (Metadata::default(), input)
        }
        Err(err) => {
            log::warn!("Ignoring frontmatter: {err}");
            let body_start = match err {
                FrontmatterError::Parse { body_start, .. }
                | FrontmatterError::InvalidRootType { body_start } => body_start,
                FrontmatterError::Unterminated => 0,
            };
            (Metadata::default(), &input[body_start..])
        }
    }
}

fn parse_yaml_block(block: &str, body_start: usize) -> Result<JsonValue, FrontmatterError> {
    if block.trim().is_empty() {
        return Ok(JsonValue::Object(Default::default()));
    }

    let parse_err = |err: &dyn std::fmt::Display| FrontmatterError::Parse {
        message: err.to_string(),
        body_start,
    };

    let yaml_value: serde_yaml::Value = serde_yaml::from_str(block).map_err(|e| parse_err(&e))?;
    let json_value = serde_json::to_value(yaml_value).map_err(|e| parse_err(&e))?;

    match json_value {
        JsonValue::Null => Ok(JsonValue::Object(Default::default())),
        JsonValue::Object(_) => Ok(json_value),
        _ => Err(FrontmatterError::InvalidRootType { body_start }),
    }
}

fn find_yaml_block(input: &str) -> Result<Option<(&str, usize)>, FrontmatterError> {
    let (without_bom, bom_len) = strip_bom(input);
    let mut cursor = 0usize;

    while let Some((line, next_cursor)) = next_line(without_bom, cursor) {
        if line.trim().is_empty() {
            cursor = next_cursor;
            continue;
        }

        if !is_yaml_fence(line) {
            return Ok(None);
        }

        let block_start = next_cursor;
        let mut scan_cursor = next_cursor;
        while let Some((block_line, next_line_cursor)) = next_line(without_bom, scan_cursor) {
            if is_yaml_fence(block_line) {
                let raw_block = &without_bom[block_start..scan_cursor];
                let trimmed = raw_block.trim_end_matches(['\r', '\n']);
                return Ok(Some((trimmed, bom_len + next_line_cursor)));
            }
            scan_cursor = next_line_cursor;
        }
        return Err(FrontmatterError::Unterminated);
    }

    Ok(None)
}

fn strip_bom(input: &str) -> (&str, usize) {
    if let Some(stripped) = input.strip_prefix('\u{feff}') {
        (stripped, '\u{feff}'.len_utf8())
    } else {
        (input, 0)
    }
}

fn next_line(input: &str, start: usize) -> Option<(&str, usize)> {
    if start >= input.len() {
        return None;
    }

    let rest = &input[start..];
    match rest.find('\n') {
        Some(pos) => Some((&rest[..pos], start + pos + 1)),
        None => Some((rest, input.len())),
    }
}

fn is_yaml_fence(line: &str) -> bool {
    line.trim_end_matches('\r').trim_end() == "---"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(input: &str) -> FrontmatterExtraction {
        extract_frontmatter(input).expect("frontmatter extraction should succeed")
    }

    #[test]
    fn returns_empty_when_no_frontmatter() {
        let result = extract("# Title\nBody");
        assert_eq!(result.body_start, 0);
        assert_eq!(result.value, JsonValue::Object(Default::default()));
    }

    #[test]
    fn parses_basic_yaml() {
        let input = "---\ntitle: Example\ntags:\n  - rust\n  - nextjs\n---\n# Content";
        let result = extract(input);
        assert_eq!(result.body_start, input.find("# Content").unwrap());
        assert_eq!(
            result.value.get("title").and_then(JsonValue::as_str),
            Some("Example")
        );
    }

    #[test]
    fn handles_empty_block() {
        let input = "---\n---\n# Body";
        let result = extract(input);
        assert_eq!(result.value, JsonValue::Object(Default::default()));
        assert_eq!(result.body_start, input.find("# Body").unwrap());
    }

    #[test]
    fn tolerates_bom_and_leading_blank_lines() {
        let input = "\u{feff}\n   \n---\nfoo: bar\n---\nBody";
        let result = extract(input);
        assert_eq!(result.value.get("foo").and_then(JsonValue::as_str), Some("bar"));
        assert_eq!(result.body_start, input.find("Body").unwrap());
    }

    #[test]
    fn crlf_fences() {
        let input = "---\r\ntitle: Windows\r\n---\r\nBody";
        let result = extract(input);
        assert_eq!(
            result.value.get("title").and_then(JsonValue::as_str),
            Some("Windows")
        );
        assert_eq!(&input[result.body_start..], "Body");
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let err = extract_frontmatter("---\ninvalid: [unterminated\n---\n").unwrap_err();
        assert!(matches!(err, FrontmatterError::Parse { .. }), "{err:?}");
    }

    #[test]
    fn errors_on_unterminated_block() {
        let err = extract_frontmatter("---\ntitle: test").unwrap_err();
        assert!(matches!(err, FrontmatterError::Unterminated));
    }

    #[test]
    fn errors_on_scalar_root() {
        let err = extract_frontmatter("---\njust a string\n---\nBody").unwrap_err();
        assert!(matches!(err, FrontmatterError::InvalidRootType { .. }));
    }

    #[test]
    fn split_returns_metadata_and_body() {
        let (meta, body) = split_front_matter("---\ntitle: Hello\ntags: [a, b]\n---\n# Hello\n");
        assert_eq!(meta.title.as_deref(), Some("Hello"));
        assert_eq!(meta.tags, ["a", "b"]);
        assert_eq!(body, "# Hello\n");
    }

    #[test]
    fn split_without_block_keeps_everything() {
        let input = "# Plain\n\ntext";
        let (meta, body) = split_front_matter(input);
        assert!(meta.is_empty());
        assert_eq!(body, input);
    }

    #[test]
    fn split_swallows_bad_yaml() {
        let (meta, body) = split_front_matter("---\ntitle: [oops\n---\nBody");
        assert!(meta.is_empty());
        assert_eq!(body, "Body");
    }

    #[test]
    fn split_keeps_body_for_unterminated_fence() {
        let input = "---\ntitle: open\n# Body";
        let (meta, body) = split_front_matter(input);
        assert!(meta.is_empty());
        assert_eq!(body, input);
    }
}
