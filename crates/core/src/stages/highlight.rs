//! Syntect-based highlighting of fenced code.
//!
//! Code text is tokenized with the syntax matching the `language-*` class
//! and split into `span` elements whose classes mirror the innermost scope
//! (`hl-keyword hl-control hl-ts`). Text outside any token scope stays a
//! plain text node. The concatenated output always equals the input.

use super::TreeTransform;
use crate::tree::{Element, Node, visit_elements_mut};
use once_cell::sync::Lazy;
use syntect::easy::ScopeRangeIterator;
use syntect::parsing::{
    ParseState, ParsingError, Scope, ScopeError, ScopeStack, SyntaxReference, SyntaxSet,
};
use syntect::util::LinesWithEndings;
use thiserror::Error;

static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(two_face::syntax::extra_newlines);

/// Class prefix for token spans.
pub const CLASS_PREFIX: &str = "hl-";

/// Marker class added to highlighted `code` elements.
pub const HIGHLIGHTED_CLASS: &str = "hl";

#[derive(Debug, Error)]
enum HighlightError {
    #[error("parse error: {0}")]
    Parse(#[from] ParsingError),
    #[error("scope error: {0:?}")]
    Scope(ScopeError),
}

impl From<ScopeError> for HighlightError {
    fn from(err: ScopeError) -> Self {
        HighlightError::Scope(err)
    }
}

/// Highlights `pre > code.language-*` blocks.
///
/// Unknown languages, plain-text syntaxes, blocks without a language and
/// blocks that already contain elements are left unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Highlight;

impl Highlight {
    /// Returns true if `language` resolves to a real (non plain-text) syntax.
    pub fn supports(language: &str) -> bool {
        find_syntax(language).is_some()
    }
}

fn find_syntax(language: &str) -> Option<&'static SyntaxReference> {
    let syntax = SYNTAX_SET
        .find_syntax_by_token(language)
        .or_else(|| SYNTAX_SET.find_syntax_by_token(&language.to_ascii_lowercase()))?;
    if syntax.name == SYNTAX_SET.find_syntax_plain_text().name {
        return None;
    }
    Some(syntax)
}

fn code_language(code: &Element) -> Option<&str> {
    code.classes()
        .find_map(|c| c.strip_prefix("language-"))
        .filter(|lang| !lang.is_empty())
}

impl TreeTransform for Highlight {
    fn transform(&self, root: &mut Node) {
        visit_elements_mut(root, &mut |pre| {
            if pre.tag_name != "pre" {
                return;
            }
            for child in pre.children.iter_mut() {
                if let Some(code) = child.as_element_mut()
                    && code.tag_name == "code"
                {
                    highlight_code(code);
                }
            }
        });
    }
}

fn highlight_code(code: &mut Element) {
    if code.has_class(HIGHLIGHTED_CLASS)
        || code.children.iter().any(|c| !matches!(c, Node::Text { .. }))
    {
        return;
    }
    let Some(language) = code_language(code).map(str::to_string) else {
        return;
    };
    let Some(syntax) = find_syntax(&language) else {
        log::debug!("No syntax for `{language}`; leaving code block plain");
        return;
    };

    let text = code.text_content();
    match tokenize(&text, syntax) {
        Ok(nodes) => {
            code.children = nodes;
            let class = match code.property("class") {
                Some(existing) => format!("{existing} {HIGHLIGHTED_CLASS}"),
                None => HIGHLIGHTED_CLASS.to_string(),
            };
            code.set_property("class", class);
        }
        Err(err) => log::warn!("Highlighting `{language}` failed, leaving block plain: {err}"),
    }
}

fn tokenize(code: &str, syntax: &SyntaxReference) -> Result<Vec<Node>, HighlightError> {
    let mut state = ParseState::new(syntax);
    let mut stack = ScopeStack::new();
    let mut out = Vec::new();

    for line in LinesWithEndings::from(code) {
        let ops = state.parse_line(line, &SYNTAX_SET)?;
        for (range, op) in ScopeRangeIterator::new(&ops, line) {
            stack.apply(op)?;
            if range.is_empty() {
                continue;
            }
            push_token(&mut out, &stack, &line[range]);
        }
    }
    Ok(out)
}

/// Appends a token, merging with the previous node when the class matches.
fn push_token(out: &mut Vec<Node>, stack: &ScopeStack, text: &str) {
    // The outermost scope is the language itself (`source.ts`).
    let class = match stack.as_slice() {
        [_, .., inner] => Some(scope_class(*inner)),
        _ => None,
    };

    if let Some(last) = out.last_mut() {
        match (&class, last) {
            (None, Node::Text { value }) => {
                value.push_str(text);
                return;
            }
            (Some(class), Node::Element(span))
                if span.property("class") == Some(class.as_str()) =>
            {
                if let Some(Node::Text { value }) = span.children.last_mut() {
                    value.push_str(text);
                    return;
                }
            }
            _ => {}
        }
    }

    let node = match class {
        None => Node::text(text),
        Some(class) => Element::new("span")
            .with_property("class", class)
            .with_children(vec![Node::text(text)])
            .into(),
    };
    out.push(node);
}

fn scope_class(scope: Scope) -> String {
    scope
        .build_string()
        .split('.')
        .map(|atom| format!("{CLASS_PREFIX}{atom}"))
        .collect::<Vec<_>>()
        .join(" ")
}
