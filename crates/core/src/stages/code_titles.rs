use super::TreeTransform;
use crate::tree::{Element, Node, visit_child_lists_mut};

/// Lifts code block titles into a `<div class="{class}">` placed right
/// before the `<pre>`.
///
/// Two annotation forms are recognised:
///
/// - a colon in the info string: ` ```ts:utils.ts `
/// - a `title` in the meta string: ` ```ts title="utils.ts" `
///
/// The language class is rewritten to `language-<lang>` so highlighting
/// still sees the language, and the consumed annotation is removed so the
/// stage is idempotent.
#[derive(Debug, Clone)]
pub struct CodeTitles {
    class: String,
}

impl CodeTitles {
    /// Creates the stage with the class applied to title elements.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
        }
    }
}

impl Default for CodeTitles {
    fn default() -> Self {
        Self::new("code-title")
    }
}

impl TreeTransform for CodeTitles {
    fn transform(&self, root: &mut Node) {
        visit_child_lists_mut(root, &mut |children| {
            let mut i = 0;
            while i < children.len() {
                let title = children[i]
                    .as_element_mut()
                    .filter(|el| el.tag_name == "pre")
                    .and_then(|pre| pre.children.iter_mut().find_map(Node::as_element_mut))
                    .filter(|code| code.tag_name == "code")
                    .and_then(take_title);

                if let Some(title) = title {
                    let div = Element::new("div")
                        .with_property("class", self.class.as_str())
                        .with_children(vec![Node::text(title)]);
                    children.insert(i, div.into());
                    i += 1;
                }
                i += 1;
            }
        });
    }
}

/// Removes the title annotation from a `code` element, returning the title.
fn take_title(code: &mut Element) -> Option<String> {
    if let Some(title) = take_info_title(code) {
        return Some(title);
    }

    let meta = code.property("data-meta")?;
    let (title, rest) = split_meta_title(meta)?;
    if rest.is_empty() {
        code.remove_property("data-meta");
    } else {
        code.set_property("data-meta", rest);
    }
    Some(title)
}

/// Handles `language-<lang>:<title>` classes.
fn take_info_title(code: &mut Element) -> Option<String> {
    let classes: Vec<String> = code.classes().map(str::to_string).collect();
    let index = classes
        .iter()
        .position(|c| c.starts_with("language-") && c.contains(':'))?;
    let info = &classes[index]["language-".len()..];
    let (lang, title) = info.split_once(':')?;
    if title.trim().is_empty() {
        log::debug!("Ignoring empty code title in `{info}`");
        return None;
    }
    let title = title.trim().to_string();

    let mut rewritten: Vec<String> = classes.clone();
    if lang.is_empty() {
        rewritten.remove(index);
    } else {
        rewritten[index] = format!("language-{lang}");
    }
    if rewritten.is_empty() {
        code.remove_property("class");
    } else {
        code.set_property("class", rewritten.join(" "));
    }
    Some(title)
}

/// Finds `title="..."` (or single-quoted) in a meta string, returning the
/// title and the meta with the annotation cut out.
fn split_meta_title(meta: &str) -> Option<(String, String)> {
    let mut search_from = 0;
    while let Some(found) = meta[search_from..].find("title=") {
        let start = search_from + found;
        let at_word_start = start == 0 || meta[..start].ends_with(char::is_whitespace);
        let value_start = start + "title=".len();
        let quote = meta[value_start..].chars().next();

        if at_word_start && let Some(q @ ('"' | '\'')) = quote {
            let body_start = value_start + 1;
            let body_len = meta[body_start..].find(q)?;
            let title = &meta[body_start..body_start + body_len];
            let end = body_start + body_len + 1;
            let rest = format!("{} {}", meta[..start].trim_end(), meta[end..].trim_start());
            return Some((title.to_string(), rest.trim().to_string()));
        }
        search_from = value_start;
    }
    None
}
