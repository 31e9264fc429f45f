//! Documents stored as dated files in one directory.

use crate::document::Document;
use crate::error::SourceError;
use crate::filename::{DatedFilename, parse_filename};
use crate::id::DocumentId;
use crate::source::DocumentSource;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Default extension of local documents.
pub const DEFAULT_EXTENSION: &str = "mdx";

/// Reads `YYYY-MM-DD-<slug>.<ext>` files from a directory.
#[derive(Debug, Clone)]
pub struct LocalSource {
    dir: PathBuf,
    extension: String,
}

/// A well-formed document file found in the directory.
#[derive(Debug, Clone)]
struct Entry {
    name: String,
    parsed: DatedFilename,
}

impl LocalSource {
    /// Creates a source over `dir` recognising files with `extension`
    /// (with or without the leading dot).
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        Self {
            dir: dir.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// The directory being read.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Names of every file carrying the document extension, sorted.
    fn file_names(&self) -> Result<Vec<String>, SourceError> {
        let read_dir = fs::read_dir(&self.dir).map_err(|e| SourceError::io(&self.dir, e))?;
        let mut names = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| SourceError::io(&self.dir, e))?;
            let path = entry.path();
            if !path.is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(self.extension.as_str())
            {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(name) => log::warn!("Skipping non UTF-8 filename {name:?}"),
            }
        }
        names.sort();
        Ok(names)
    }

    /// Reads the directory once, splitting well-formed entries (newest
    /// first) from malformed names (in reverse name order).
    fn scan(&self) -> Result<(Vec<Entry>, Vec<(String, SourceError)>), SourceError> {
        let mut entries = Vec::new();
        let mut malformed = Vec::new();
        for name in self.file_names()?.into_iter().rev() {
            match parse_filename(&name) {
                Ok(parsed) => entries.push(Entry { name, parsed }),
                Err(err) => malformed.push((name, err)),
            }
        }
        entries.sort_by(|a, b| {
            b.parsed
                .date
                .cmp(&a.parsed.date)
                .then_with(|| a.parsed.slug.cmp(&b.parsed.slug))
        });
        Ok((entries, malformed))
    }

    /// Well-formed entries, newest first. Malformed names are skipped.
    fn entries(&self) -> Result<Vec<Entry>, SourceError> {
        let (entries, malformed) = self.scan()?;
        for (name, err) in &malformed {
            log::warn!("Skipping {}: {err}", self.dir.join(name).display());
        }
        Ok(entries)
    }

    /// Picks the file for `slug`: an exact slug match wins, then the newest
    /// well-formed file whose name contains `slug`. A malformed name is only
    /// considered when nothing well-formed matches, and is reported as an
    /// error.
    fn find(&self, slug: &str) -> Result<Option<Entry>, SourceError> {
        let (entries, malformed) = self.scan()?;
        if let Some(exact) = entries.iter().position(|entry| entry.parsed.slug == slug) {
            return Ok(entries.into_iter().nth(exact));
        }
        if let Some(partial) = entries.iter().position(|entry| entry.name.contains(slug)) {
            return Ok(entries.into_iter().nth(partial));
        }
        match malformed.into_iter().find(|(name, _)| name.contains(slug)) {
            Some((_, err)) => Err(err),
            None => Ok(None),
        }
    }

    fn read(&self, entry: &Entry) -> Result<Document, SourceError> {
        let path = self.dir.join(&entry.name);
        let raw = fs::read_to_string(&path).map_err(|e| SourceError::io(&path, e))?;
        let mut doc = Document::from_source(DocumentId::new(entry.parsed.slug.clone()), &raw);
        doc.metadata.date.get_or_insert(entry.parsed.date);
        Ok(doc)
    }
}

impl DocumentSource for LocalSource {
    fn resolve(&self, id: &DocumentId) -> Result<Option<Document>, SourceError> {
        if id.slug.is_empty() {
            return Ok(None);
        }
        match self.find(&id.slug)? {
            Some(entry) => {
                log::debug!("Resolved {id} to {}", entry.name);
                self.read(&entry).map(Some)
            }
            None => Ok(None),
        }
    }

    fn list(&self) -> Result<Option<Vec<DocumentId>>, SourceError> {
        let ids = self
            .entries()?
            .into_iter()
            .map(|entry| DocumentId::new(entry.parsed.slug))
            .collect();
        Ok(Some(ids))
    }

    /// Reads every well-formed file, so two dated files sharing a slug both
    /// load instead of resolving to the same one.
    fn load_all(&self) -> Result<Option<Vec<Document>>, SourceError> {
        let documents = self
            .entries()?
            .par_iter()
            .filter_map(|entry| match self.read(entry) {
                Ok(doc) => Some(doc),
                Err(err) => {
                    log::warn!("Skipping {}: {err}", entry.name);
                    None
                }
            })
            .collect();
        Ok(Some(documents))
    }
}
