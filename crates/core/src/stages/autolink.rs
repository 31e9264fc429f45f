use super::TreeTransform;
use crate::tree::{Element, Node, visit_elements, visit_elements_mut};

/// Wraps heading content in `<a class="{class}" href="#{id}">`.
///
/// Headings without an id are skipped, as are headings whose content
/// already contains a link (nested anchors are invalid HTML). Ids are
/// never modified.
#[derive(Debug, Clone)]
pub struct AutolinkHeadings {
    class: String,
}

impl AutolinkHeadings {
    /// Creates the stage with the anchor class to apply.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
        }
    }
}

impl Default for AutolinkHeadings {
    fn default() -> Self {
        Self::new("anchor")
    }
}

fn contains_link(children: &[Node]) -> bool {
    let mut found = false;
    for child in children {
        visit_elements(child, &mut |el| found |= el.tag_name == "a");
        if let Node::Raw { value } = child {
            let lower = value.to_ascii_lowercase();
            found |= lower.contains("<a ") || lower.contains("<a>");
        }
    }
    found
}

impl TreeTransform for AutolinkHeadings {
    fn transform(&self, root: &mut Node) {
        visit_elements_mut(root, &mut |el| {
            if !el.is_heading() {
                return;
            }
            let Some(id) = el.id().map(str::to_string) else {
                return;
            };
            if contains_link(&el.children) {
                log::debug!("Heading #{id} already contains a link; not wrapping");
                return;
            }
            let children = std::mem::take(&mut el.children);
            let anchor = Element::new("a")
                .with_property("class", self.class.as_str())
                .with_property("href", format!("#{id}"))
                .with_children(children);
            el.children.push(anchor.into());
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(id: Option<&str>, children: Vec<Node>) -> Node {
        let mut h = Element::new("h2").with_children(children);
        if let Some(id) = id {
            h.set_property("id", id);
        }
        Node::root(vec![h.into()])
    }

    fn first(tree: &Node) -> &Element {
        tree.children()[0].as_element().unwrap()
    }

    #[test]
    fn wraps_content_in_self_link() {
        let mut tree = heading(Some("setup"), vec![Node::text("Setup")]);
        AutolinkHeadings::default().transform(&mut tree);

        let h2 = first(&tree);
        assert_eq!(h2.id(), Some("setup"));
        let a = h2.children[0].as_element().unwrap();
        assert_eq!(a.tag_name, "a");
        assert_eq!(a.property("href"), Some("#setup"));
        assert!(a.has_class("anchor"));
        assert_eq!(a.text_content(), "Setup");
    }

    #[test]
    fn runs_once_per_heading() {
        let mut tree = heading(Some("setup"), vec![Node::text("Setup")]);
        let stage = AutolinkHeadings::new("heading-link");
        stage.transform(&mut tree);
        let once = tree.clone();
        stage.transform(&mut tree);
        assert_eq!(tree, once);
    }

    #[test]
    fn heading_without_id_is_skipped() {
        let mut tree = heading(None, vec![Node::text("Loose")]);
        let before = tree.clone();
        AutolinkHeadings::default().transform(&mut tree);
        assert_eq!(tree, before);
    }

    #[test]
    fn heading_with_link_is_skipped() {
        let link = Element::new("a")
            .with_property("href", "https://example.com")
            .with_children(vec![Node::text("site")]);
        let mut tree = heading(Some("see-site"), vec![Node::text("See "), link.into()]);
        let before = tree.clone();
        AutolinkHeadings::default().transform(&mut tree);
        assert_eq!(tree, before);
    }
}
