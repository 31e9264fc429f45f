//! HTML serialization of the final tree.

use crate::tree::{Element, Node};

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Serializes a tree to an HTML string.
///
/// Text is escaped, attribute values are double-quoted and escaped, and raw
/// nodes are written as-is.
pub fn to_html(node: &Node) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Root { children } => children.iter().for_each(|c| write_node(c, out)),
        Node::Element(el) => write_element(el, out),
        Node::Text { value } => {
            html_escape::encode_text_to_string(value, out);
        }
        Node::Raw { value } => out.push_str(value),
    }
}

fn write_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.tag_name);
    for property in &el.properties {
        out.push(' ');
        out.push_str(&property.name);
        out.push_str("=\"");
        html_escape::encode_double_quoted_attribute_to_string(&property.value, out);
        out.push('"');
    }

    if VOID_ELEMENTS.contains(&el.tag_name.as_str()) {
        out.push_str(" />");
        return;
    }
    out.push('>');
    for child in &el.children {
        write_node(child, out);
    }
    out.push_str("</");
    out.push_str(&el.tag_name);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_text_and_attributes() {
        let tree = Node::root(vec![
            Element::new("p")
                .with_property("title", "say \"hi\" & <go>")
                .with_children(vec![Node::text("1 < 2 & 3 > 2")])
                .into(),
        ]);
        insta::assert_snapshot!(
            to_html(&tree),
            @r#"<p title="say &quot;hi&quot; &amp; &lt;go&gt;">1 &lt; 2 &amp; 3 &gt; 2</p>"#
        );
    }

    #[test]
    fn void_elements_self_close_and_raw_passes_through() {
        let tree = Node::root(vec![
            Element::new("img")
                .with_property("src", "/a.png")
                .with_property("alt", "")
                .into(),
            Element::new("hr").into(),
            Node::raw("<kbd>Ctrl</kbd>"),
        ]);
        insta::assert_snapshot!(
            to_html(&tree),
            @r#"<img src="/a.png" alt="" /><hr /><kbd>Ctrl</kbd>"#
        );
    }
}
