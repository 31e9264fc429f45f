//! Element tree produced by lowering markdown and rewritten by the pipeline.
//!
//! The shape follows hast: a root, elements with a tag name, ordered
//! properties and ordered children, text leaves, and raw HTML leaves that are
//! emitted verbatim.

use serde::Serialize;

/// A node in the rendered document tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    /// Document root.
    Root {
        /// Top-level block nodes.
        children: Vec<Node>,
    },
    /// An HTML element.
    Element(Element),
    /// Text content (escaped on serialization).
    Text {
        /// The text value.
        value: String,
    },
    /// Raw HTML passed through from the source.
    Raw {
        /// The raw markup.
        value: String,
    },
}

impl Node {
    /// Creates an empty root.
    pub fn root(children: Vec<Node>) -> Self {
        Node::Root { children }
    }

    /// Creates a text node.
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text {
            value: value.into(),
        }
    }

    /// Creates a raw HTML node.
    pub fn raw(value: impl Into<String>) -> Self {
        Node::Raw {
            value: value.into(),
        }
    }

    /// Returns the element if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Returns the element mutably if this node is one.
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Child nodes of a root or element.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Root { children } => children,
            Node::Element(el) => &el.children,
            Node::Text { .. } | Node::Raw { .. } => &[],
        }
    }

    /// Mutable child list of a root or element.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Root { children } => Some(children),
            Node::Element(el) => Some(&mut el.children),
            Node::Text { .. } | Node::Raw { .. } => None,
        }
    }

    /// Concatenates every descendant text value in document order.
    pub fn text_content(&self) -> String {
        let mut buffer = String::new();
        collect_text(self, &mut buffer);
        buffer
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

fn collect_text(node: &Node, buffer: &mut String) {
    match node {
        Node::Text { value } => buffer.push_str(value),
        Node::Raw { .. } => {}
        Node::Root { children } => children.iter().for_each(|c| collect_text(c, buffer)),
        Node::Element(el) => el.children.iter().for_each(|c| collect_text(c, buffer)),
    }
}

/// A single `name="value"` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    /// Attribute name.
    pub name: String,
    /// Attribute value.
    pub value: String,
}

/// An element node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Lowercase tag name (`h2`, `pre`, `span`, ...).
    pub tag_name: String,
    /// Attributes in insertion order.
    pub properties: Vec<Property>,
    /// Child nodes.
    pub children: Vec<Node>,
}

impl Element {
    /// Creates an element with no attributes or children.
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_property(name, value);
        self
    }

    /// Builder-style children setter.
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Looks up an attribute value.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Sets an attribute, replacing an existing value in place.
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.properties.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.value = value,
            None => self.properties.push(Property { name, value }),
        }
    }

    /// Removes an attribute, returning its previous value.
    pub fn remove_property(&mut self, name: &str) -> Option<String> {
        let index = self.properties.iter().position(|p| p.name == name)?;
        Some(self.properties.remove(index).value)
    }

    /// The element's `id`, if any.
    pub fn id(&self) -> Option<&str> {
        self.property("id").filter(|id| !id.is_empty())
    }

    /// Whitespace-separated entries of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.property("class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    /// Returns true if `class` contains the given entry.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Heading level 1-6 for `h1`..`h6`, `None` for any other tag.
    pub fn heading_level(&self) -> Option<u8> {
        let digits = self.tag_name.strip_prefix('h')?;
        match digits.parse::<u8>() {
            Ok(level @ 1..=6) => Some(level),
            _ => None,
        }
    }

    /// Returns true for `h1`..`h6`.
    pub fn is_heading(&self) -> bool {
        self.heading_level().is_some()
    }

    /// Concatenated descendant text.
    pub fn text_content(&self) -> String {
        let mut buffer = String::new();
        for child in &self.children {
            collect_text(child, &mut buffer);
        }
        buffer
    }
}

/// Visits every element in pre-order (parent before children, siblings in order).
pub fn visit_elements<'a, F>(node: &'a Node, f: &mut F)
where
    F: FnMut(&'a Element),
{
    if let Node::Element(el) = node {
        f(el);
    }
    for child in node.children() {
        visit_elements(child, f);
    }
}

/// Mutable pre-order visit. Children are walked after `f` runs, so nodes
/// inserted by `f` are visited too.
pub fn visit_elements_mut<F>(node: &mut Node, f: &mut F)
where
    F: FnMut(&mut Element),
{
    if let Node::Element(el) = node {
        f(el);
    }
    if let Some(children) = node.children_mut() {
        for child in children.iter_mut() {
            visit_elements_mut(child, f);
        }
    }
}

/// Visits every child list (root and element children) in pre-order, giving
/// the callback the chance to insert or replace siblings.
pub fn visit_child_lists_mut<F>(node: &mut Node, f: &mut F)
where
    F: FnMut(&mut Vec<Node>),
{
    if let Some(children) = node.children_mut() {
        f(children);
        for child in children.iter_mut() {
            visit_child_lists_mut(child, f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        Node::root(vec![
            Element::new("h1")
                .with_property("id", "top")
                .with_children(vec![Node::text("Top")])
                .into(),
            Element::new("p")
                .with_children(vec![
                    Node::text("a "),
                    Element::new("em")
                        .with_children(vec![Node::text("b")])
                        .into(),
                    Node::raw("<br>"),
                ])
                .into(),
        ])
    }

    #[test]
    fn heading_level_only_for_h1_to_h6() {
        assert_eq!(Element::new("h3").heading_level(), Some(3));
        assert_eq!(Element::new("h7").heading_level(), None);
        assert_eq!(Element::new("hr").heading_level(), None);
        assert_eq!(Element::new("header").heading_level(), None);
    }

    #[test]
    fn set_property_replaces_in_place() {
        let mut el = Element::new("a")
            .with_property("href", "#x")
            .with_property("class", "anchor");
        el.set_property("href", "#y");
        assert_eq!(el.properties[0].name, "href");
        assert_eq!(el.property("href"), Some("#y"));
        assert_eq!(el.remove_property("class").as_deref(), Some("anchor"));
        assert!(el.property("class").is_none());
    }

    #[test]
    fn text_content_skips_raw() {
        assert_eq!(sample().text_content(), "Topa b");
    }

    #[test]
    fn visit_is_pre_order() {
        let tree = sample();
        let mut tags = Vec::new();
        visit_elements(&tree, &mut |el| tags.push(el.tag_name.clone()));
        assert_eq!(tags, ["h1", "p", "em"]);
    }

    #[test]
    fn empty_id_is_treated_as_missing() {
        let el = Element::new("h2").with_property("id", "");
        assert_eq!(el.id(), None);
    }
}
