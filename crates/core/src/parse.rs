//! Markdown parsing: construct selection and the markdown-rs adapter.

use crate::error::{RenderError, SourceLocation};
use markdown::mdast::Node;
use markdown::message::{Message, Place};

/// Parser options for building markdown-rs parse options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Enable MDX constructs (JSX, ESM, expressions).
    pub mdx: bool,
    /// Enable GitHub Flavored Markdown constructs (tables, strikethrough,
    /// autolink literals, task lists, footnotes).
    pub gfm: bool,
    /// Recognise a leading YAML block so it never renders as content.
    pub frontmatter: bool,
    /// Allow raw HTML nodes in the AST. Ignored when `mdx` is on, where
    /// tags are parsed as JSX instead.
    pub raw_html: bool,
    /// Enable math constructs ($inline$ and $$block$$).
    pub math: bool,
}

impl ParseOptions {
    /// Plain markdown defaults.
    pub const fn markdown() -> Self {
        Self {
            mdx: false,
            gfm: true,
            frontmatter: true,
            raw_html: true,
            math: false,
        }
    }

    /// MDX defaults (JSX/ESM/expression enabled).
    pub const fn mdx() -> Self {
        Self {
            mdx: true,
            gfm: true,
            frontmatter: true,
            raw_html: false,
            math: false,
        }
    }

    /// Convert to markdown-rs `ParseOptions`.
    pub fn to_markdown(self) -> markdown::ParseOptions {
        let mut constructs = markdown::Constructs {
            frontmatter: self.frontmatter,
            html_flow: self.raw_html && !self.mdx,
            html_text: self.raw_html && !self.mdx,
            ..Default::default()
        };

        if self.gfm {
            constructs.gfm_autolink_literal = true;
            constructs.gfm_footnote_definition = true;
            constructs.gfm_label_start_footnote = true;
            constructs.gfm_strikethrough = true;
            constructs.gfm_table = true;
            constructs.gfm_task_list_item = true;
        }

        if self.mdx {
            // MDX has no indented code; indentation inside JSX is content.
            constructs.code_indented = false;
            constructs.mdx_esm = true;
            constructs.mdx_expression_flow = true;
            constructs.mdx_expression_text = true;
            constructs.mdx_jsx_flow = true;
            constructs.mdx_jsx_text = true;
        }

        if self.math {
            constructs.math_flow = true;
            constructs.math_text = true;
        }

        markdown::ParseOptions {
            constructs,
            math_text_single_dollar: self.math,
            ..markdown::ParseOptions::default()
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::mdx()
    }
}

/// Parse markdown into an MDAST tree.
///
/// Plain markdown never fails to parse; MDX rejects structurally invalid
/// input such as unbalanced expression braces or unclosed JSX tags.
pub fn parse_mdast(input: &str, options: &ParseOptions) -> Result<Node, RenderError> {
    markdown::to_mdast(input, &options.to_markdown()).map_err(|err| {
        RenderError::MalformedInput {
            message: err.to_string(),
            location: message_location(&err),
        }
    })
}

fn message_location(message: &Message) -> SourceLocation {
    match &message.place {
        Some(place) => match place.as_ref() {
            Place::Point(point) => SourceLocation::new(point.line, point.column),
            Place::Position(position) => {
                SourceLocation::new(position.start.line, position.start.column)
            }
        },
        None => SourceLocation::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gfm_constructs_follow_flag() {
        let on = ParseOptions::markdown().to_markdown();
        assert!(on.constructs.gfm_table);
        assert!(on.constructs.gfm_strikethrough);
        assert!(on.constructs.gfm_autolink_literal);

        let off = ParseOptions {
            gfm: false,
            ..ParseOptions::markdown()
        }
        .to_markdown();
        assert!(!off.constructs.gfm_table);
    }

    #[test]
    fn markdown_never_fails() {
        let tree = parse_mdast("Hello {world", &ParseOptions::markdown());
        assert!(tree.is_ok());
    }

    #[test]
    fn mdx_rejects_unbalanced_expression() {
        let err = parse_mdast("Hello {world", &ParseOptions::mdx()).unwrap_err();
        assert!(matches!(err, RenderError::MalformedInput { .. }));
    }

    #[test]
    fn empty_body_parses() {
        let tree = parse_mdast("", &ParseOptions::mdx()).expect("empty input parses");
        assert!(tree.children().is_some_and(|c| c.is_empty()));
    }
}
