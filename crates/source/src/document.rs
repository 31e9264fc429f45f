use crate::id::DocumentId;
use quire_core::{Metadata, split_front_matter};
use serde::Serialize;

/// A resolved document: identifier, parsed metadata and the raw body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    /// Identifier the document was resolved under.
    pub id: DocumentId,
    /// Front-matter, parsed once.
    pub metadata: Metadata,
    /// Body text with the front-matter block removed.
    pub body: String,
}

impl Document {
    /// Builds a document from raw file text, splitting off front-matter.
    pub fn from_source(id: DocumentId, raw: &str) -> Self {
        let (metadata, body) = split_front_matter(raw);
        Self {
            id,
            metadata,
            body: body.to_string(),
        }
    }

    /// The front-matter title, falling back to the slug.
    pub fn title(&self) -> &str {
        self.metadata.title.as_deref().unwrap_or(&self.id.slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_front_matter_from_body() {
        let doc = Document::from_source(
            DocumentId::new("pick"),
            "---\ntitle: Pick\ntags: [easy, union]\n---\n# Pick\n",
        );
        assert_eq!(doc.title(), "Pick");
        assert_eq!(doc.metadata.tags, ["easy", "union"]);
        assert_eq!(doc.body, "# Pick\n");
    }

    #[test]
    fn title_falls_back_to_slug() {
        let doc = Document::from_source(DocumentId::new("untitled-note"), "Just text.");
        assert!(doc.metadata.is_empty());
        assert_eq!(doc.title(), "untitled-note");
        assert_eq!(doc.body, "Just text.");
    }
}
