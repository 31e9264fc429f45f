//! Dated document filenames: `YYYY-MM-DD-<slug>.<ext>`.

use crate::error::SourceError;
use jiff::civil::Date;

/// The parts of a well-formed document filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedFilename {
    /// Publish date from the prefix.
    pub date: Date,
    /// Everything between the date prefix and the extension.
    pub slug: String,
    /// Extension without the dot.
    pub extension: String,
}

/// Parses a filename, validating the date prefix instead of assuming it.
///
/// ```
/// use quire_source::filename::parse_filename;
///
/// let parsed = parse_filename("2024-03-09-type-narrowing.mdx").unwrap();
/// assert_eq!(parsed.slug, "type-narrowing");
/// assert!(parse_filename("notes.mdx").is_err());
/// ```
pub fn parse_filename(name: &str) -> Result<DatedFilename, SourceError> {
    let malformed = |reason| SourceError::MalformedFilename {
        name: name.to_string(),
        reason,
    };

    let (stem, extension) = name
        .rsplit_once('.')
        .filter(|(stem, ext)| !stem.is_empty() && !ext.is_empty())
        .ok_or_else(|| malformed("missing extension"))?;

    let prefix = stem.get(..10).ok_or_else(|| malformed("missing date prefix"))?;
    if !is_date_shape(prefix) {
        return Err(malformed("missing date prefix"));
    }
    let date: Date = prefix
        .parse()
        .map_err(|_| malformed("date prefix is not a calendar date"))?;

    let slug = stem[10..]
        .strip_prefix('-')
        .ok_or_else(|| malformed("expected `-` after the date"))?;
    if slug.is_empty() {
        return Err(malformed("empty slug"));
    }

    Ok(DatedFilename {
        date,
        slug: slug.to_string(),
        extension: extension.to_string(),
    })
}

fn is_date_shape(prefix: &str) -> bool {
    prefix.bytes().enumerate().all(|(i, b)| match i {
        4 | 7 => b == b'-',
        _ => b.is_ascii_digit(),
    })
}
