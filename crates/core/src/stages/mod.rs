//! Tree-rewriting stages applied after lowering.
//!
//! Stage order matters: ids are assigned before anything that links to
//! them, titles are lifted before highlighting reads the language class,
//! and the outline is collected last from the finished tree.
//!
//! - `images`: root-relative image URLs to absolute ones.
//! - `heading_ids`: deterministic, unique `id` on every heading.
//! - `autolink`: wrap heading content in a self-link.
//! - `code_titles`: lift `lang:title` / `title="..."` annotations.
//! - `highlight`: syntect-based token spans for fenced code.

/// Heading self-links.
pub mod autolink;
/// Code block title extraction.
pub mod code_titles;
/// Heading id assignment.
pub mod heading_ids;
/// Syntax highlighting.
pub mod highlight;
/// Image URL normalization.
pub mod images;

pub use autolink::AutolinkHeadings;
pub use code_titles::CodeTitles;
pub use heading_ids::AssignHeadingIds;
pub use highlight::Highlight;
pub use images::RewriteImageUrls;

use crate::tree::Node;

/// A stage that rewrites the element tree in place.
///
/// Stages never fail: a node a stage cannot handle is left as it is.
pub trait TreeTransform: Send + Sync {
    /// Mutate the tree in place.
    fn transform(&self, root: &mut Node);
}

impl<F> TreeTransform for F
where
    F: Fn(&mut Node) + Send + Sync,
{
    fn transform(&self, root: &mut Node) {
        (self)(root)
    }
}
