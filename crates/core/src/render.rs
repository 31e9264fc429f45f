//! Renderer: parse, lower, run the stage pipeline and collect the outline.

use crate::error::RenderError;
use crate::html::to_html;
use crate::lower::lower;
use crate::parse::{ParseOptions, parse_mdast};
use crate::stages::{
    AssignHeadingIds, AutolinkHeadings, CodeTitles, Highlight, RewriteImageUrls, TreeTransform,
};
use crate::toc::{Outline, collect_toc};
use crate::tree::Node;
use serde::{Deserialize, Serialize};

/// Base used for root-relative image URLs when none is configured.
pub const DEFAULT_IMAGE_BASE_URL: &str =
    "https://raw.githubusercontent.com/dapangmaox/type-challenges-fork/main";

/// Caller-facing render options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Rewrite root-relative image URLs against `image_base_url`.
    #[serde(alias = "rewriteImageUrls")]
    pub rewrite_image_urls: bool,
    /// Absolute base for rewritten image URLs.
    #[serde(alias = "imageBaseUrl")]
    pub image_base_url: String,
    /// Parse the body as MDX instead of plain markdown.
    pub mdx: bool,
    /// Run syntax highlighting on fenced code.
    pub highlight: bool,
    /// Wrap heading content in self-links.
    #[serde(alias = "autolinkHeadings")]
    pub autolink_headings: bool,
    /// Class on heading self-links.
    #[serde(alias = "anchorClass")]
    pub anchor_class: String,
    /// Class on lifted code block titles.
    #[serde(alias = "codeTitleClass")]
    pub code_title_class: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            rewrite_image_urls: false,
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            mdx: true,
            highlight: true,
            autolink_headings: true,
            anchor_class: "anchor".to_string(),
            code_title_class: "code-title".to_string(),
        }
    }
}

impl RenderOptions {
    /// Options with image rewriting switched on or off, everything else default.
    pub fn with_rewrite_image_urls(mut self, rewrite: bool) -> Self {
        self.rewrite_image_urls = rewrite;
        self
    }
}

/// Result of one render call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rendered {
    /// Final element tree.
    pub tree: Node,
    /// Headings of this document only.
    pub outline: Outline,
}

impl Rendered {
    /// Serializes the tree to HTML.
    pub fn to_html(&self) -> String {
        to_html(&self.tree)
    }
}

/// Ordered list of tree stages run after parsing.
///
/// Stages run in insertion order. The outline is collected after the last
/// stage, so it always sees final ids.
pub struct Pipeline {
    parse: ParseOptions,
    stages: Vec<Box<dyn TreeTransform>>,
}

impl Pipeline {
    /// Creates an empty pipeline.
    pub fn new(parse: ParseOptions) -> Self {
        Self {
            parse,
            stages: Vec::new(),
        }
    }

    /// Builds the standard stage order for `options`.
    pub fn from_options(options: &RenderOptions) -> Self {
        let parse = if options.mdx {
            ParseOptions::mdx()
        } else {
            ParseOptions::markdown()
        };
        let mut pipeline = Self::new(parse);

        if options.rewrite_image_urls {
            pipeline.add_stage(RewriteImageUrls::new(options.image_base_url.as_str()));
        }
        pipeline.add_stage(AssignHeadingIds);
        if options.autolink_headings {
            pipeline.add_stage(AutolinkHeadings::new(options.anchor_class.as_str()));
        }
        pipeline.add_stage(CodeTitles::new(options.code_title_class.as_str()));
        if options.highlight {
            pipeline.add_stage(Highlight);
        }
        pipeline
    }

    /// Appends a stage.
    pub fn add_stage<T: TreeTransform + 'static>(&mut self, stage: T) {
        self.stages.push(Box::new(stage));
    }

    /// Number of configured stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns true if no stage is configured.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Parses `body` and runs every stage over a fresh tree.
    pub fn run(&self, body: &str) -> Result<Rendered, RenderError> {
        let mdast = parse_mdast(body, &self.parse)?;
        let mut tree = lower(&mdast);
        for stage in &self.stages {
            stage.transform(&mut tree);
        }
        let outline = collect_toc(&tree);
        log::debug!("Rendered document with {} outline entries", outline.len());
        Ok(Rendered { tree, outline })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::from_options(&RenderOptions::default())
    }
}

/// Renders `body` with the standard pipeline.
///
/// Only a structural parse failure is an error; stage problems are skipped
/// node by node.
pub fn render(body: &str, options: &RenderOptions) -> Result<Rendered, RenderError> {
    Pipeline::from_options(options).run(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_accept_camel_case_keys() {
        let options: RenderOptions =
            serde_json::from_str(r#"{"rewriteImageUrls": true, "highlight": false}"#).unwrap();
        assert!(options.rewrite_image_urls);
        assert!(!options.highlight);
        assert_eq!(options.anchor_class, "anchor");
        assert_eq!(options.image_base_url, DEFAULT_IMAGE_BASE_URL);
    }

    #[test]
    fn stage_list_follows_options() {
        assert_eq!(Pipeline::default().len(), 4);
        let all = RenderOptions::default().with_rewrite_image_urls(true);
        assert_eq!(Pipeline::from_options(&all).len(), 5);
        let bare = RenderOptions {
            highlight: false,
            autolink_headings: false,
            ..RenderOptions::default()
        };
        assert_eq!(Pipeline::from_options(&bare).len(), 2);
    }

    #[test]
    fn custom_stages_run_in_order() {
        let mut pipeline = Pipeline::new(ParseOptions::markdown());
        pipeline.add_stage(AssignHeadingIds);
        pipeline.add_stage(|root: &mut Node| {
            crate::tree::visit_elements_mut(root, &mut |el| {
                if let Some(id) = el.id().map(str::to_string) {
                    el.set_property("id", format!("doc-{id}"));
                }
            });
        });
        let rendered = pipeline.run("# Hello").unwrap();
        assert_eq!(rendered.outline.entries()[0].id, "doc-hello");
    }
}
