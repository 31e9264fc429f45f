//! Table of contents collected from the final tree.

use crate::tree::{Node, visit_elements};
use serde::Serialize;

/// A heading recorded in the outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// The heading's `id` attribute.
    pub id: String,
    /// Flattened, trimmed heading text.
    pub title: String,
    /// Heading level (1-6).
    pub depth: u8,
}

/// Ordered headings of one rendered document, in reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Outline(Vec<TocEntry>);

impl Outline {
    /// Creates an empty outline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries in document order.
    pub fn entries(&self) -> &[TocEntry] {
        &self.0
    }

    /// Iterates over the entries.
    pub fn iter(&self) -> std::slice::Iter<'_, TocEntry> {
        self.0.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no heading was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the outline, returning its entries.
    pub fn into_vec(self) -> Vec<TocEntry> {
        self.0
    }

    fn push(&mut self, entry: TocEntry) {
        self.0.push(entry);
    }
}

impl<'a> IntoIterator for &'a Outline {
    type Item = &'a TocEntry;
    type IntoIter = std::slice::Iter<'a, TocEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Walks `root` in pre-order and records every `h1`..`h6` carrying an id.
///
/// Headings without an id are skipped: an entry must always point at an
/// anchor that exists in the tree. The tree is not modified.
pub fn collect_toc(root: &Node) -> Outline {
    let mut outline = Outline::new();
    visit_elements(root, &mut |el| {
        let Some(depth) = el.heading_level() else {
            return;
        };
        let Some(id) = el.id() else {
            log::debug!("Heading without an id left out of the outline");
            return;
        };
        outline.push(TocEntry {
            id: id.to_string(),
            title: el.text_content().trim().to_string(),
            depth,
        });
    });
    outline
}
