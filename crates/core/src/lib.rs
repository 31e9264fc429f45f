#![deny(missing_docs)]
//! Quire core: front-matter, markdown lowering, the stage pipeline and the outline.

/// Core error and location types.
pub mod error;
/// YAML frontmatter extraction helpers.
pub mod frontmatter;
/// HTML serialization of the element tree.
pub mod html;
/// MDAST to element tree lowering.
pub mod lower;
/// Typed document metadata.
pub mod metadata;
/// Markdown parsing options and the markdown-rs adapter.
pub mod parse;
/// Render options, the pipeline, and the render entry point.
pub mod render;
/// Slug generation utilities.
pub mod slug;
/// Tree-rewriting stages.
pub mod stages;
/// Outline collection.
pub mod toc;
/// The element tree.
pub mod tree;

pub use error::{RenderError, SourceLocation};
pub use frontmatter::{
    FrontmatterError, FrontmatterExtraction, extract_frontmatter, split_front_matter,
};
pub use html::to_html;
pub use metadata::Metadata;
pub use parse::{ParseOptions, parse_mdast};
pub use render::{DEFAULT_IMAGE_BASE_URL, Pipeline, RenderOptions, Rendered, render};
pub use slug::{Slugger, extract_custom_id, slugify};
pub use stages::TreeTransform;
pub use toc::{Outline, TocEntry, collect_toc};
pub use tree::{Element, Node, Property};
