use super::TreeTransform;
use crate::slug::Slugger;
use crate::tree::{Node, visit_elements, visit_elements_mut};
use std::collections::HashSet;

/// Gives every heading without an `id` one derived from its text.
///
/// Every id already present in the tree (headings with `{#custom}` ids,
/// footnote items, raw elements) is reserved first so a generated id never
/// duplicates it. A heading repeating an explicit id used by an earlier
/// heading gets a numbered suffix. Once ids are unique a second run is a
/// no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignHeadingIds;

impl TreeTransform for AssignHeadingIds {
    fn transform(&self, root: &mut Node) {
        let mut slugger = Slugger::new();
        visit_elements(root, &mut |el| {
            if let Some(id) = el.id() {
                slugger.reserve(id);
            }
        });

        let mut explicit = HashSet::new();
        visit_elements_mut(root, &mut |el| {
            if !el.is_heading() {
                return;
            }
            match el.id().map(str::to_string) {
                Some(id) if explicit.insert(id.clone()) => {}
                Some(id) => {
                    let unique = suffixed(&mut slugger, &id);
                    log::warn!("Duplicate heading id `{id}` renamed to `{unique}`");
                    el.set_property("id", unique);
                }
                None => {
                    let text = el.text_content();
                    let id = slugger.next_slug(text.trim());
                    el.set_property("id", id);
                }
            }
        });
    }
}

/// First free `{id}-{n}`, reserved before it is returned.
fn suffixed(slugger: &mut Slugger, id: &str) -> String {
    let mut n = 1;
    loop {
        let candidate = format!("{id}-{n}");
        if !slugger.is_taken(&candidate) {
            slugger.reserve(&candidate);
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Element;

    fn heading(tag: &str, text: &str) -> Node {
        Element::new(tag)
            .with_children(vec![Node::text(text)])
            .into()
    }

    fn ids(tree: &Node) -> Vec<String> {
        tree.children()
            .iter()
            .filter_map(Node::as_element)
            .filter_map(|el| el.id().map(str::to_string))
            .collect()
    }

    #[test]
    fn duplicate_titles_get_distinct_ids() {
        let mut tree = Node::root(vec![heading("h2", "Intro"), heading("h2", "Intro")]);
        AssignHeadingIds.transform(&mut tree);
        assert_eq!(ids(&tree), ["intro", "intro-1"]);
    }

    #[test]
    fn explicit_ids_are_kept_and_reserved() {
        let mut tree = Node::root(vec![
            heading("h2", "Intro"),
            Element::new("h2")
                .with_property("id", "intro")
                .with_children(vec![Node::text("Custom")])
                .into(),
        ]);
        AssignHeadingIds.transform(&mut tree);
        assert_eq!(ids(&tree), ["intro-1", "intro"]);
    }

    #[test]
    fn repeated_explicit_ids_are_suffixed() {
        let mut tree = Node::root(vec![
            Element::new("h2")
                .with_property("id", "x")
                .with_children(vec![Node::text("A")])
                .into(),
            Element::new("h2")
                .with_property("id", "x")
                .with_children(vec![Node::text("B")])
                .into(),
        ]);
        AssignHeadingIds.transform(&mut tree);
        assert_eq!(ids(&tree), ["x", "x-1"]);

        let once = tree.clone();
        AssignHeadingIds.transform(&mut tree);
        assert_eq!(tree, once);
    }

    #[test]
    fn footnote_ids_are_reserved() {
        let footnotes: Node = Element::new("section")
            .with_children(vec![
                Element::new("li")
                    .with_property("id", "user-content-fn-1")
                    .into(),
            ])
            .into();
        let mut tree = Node::root(vec![heading("h2", "User content fn 1"), footnotes]);
        AssignHeadingIds.transform(&mut tree);
        assert_eq!(ids(&tree), ["user-content-fn-1-1"]);
    }

    #[test]
    fn running_twice_changes_nothing() {
        let mut tree = Node::root(vec![
            heading("h1", "Title"),
            heading("h2", "Title"),
            heading("h3", "Other"),
        ]);
        AssignHeadingIds.transform(&mut tree);
        let once = tree.clone();
        AssignHeadingIds.transform(&mut tree);
        assert_eq!(tree, once);
    }

    #[test]
    fn non_headings_are_ignored() {
        let mut tree = Node::root(vec![heading("p", "Intro"), heading("h7", "Intro")]);
        AssignHeadingIds.transform(&mut tree);
        assert!(ids(&tree).is_empty());
    }
}
