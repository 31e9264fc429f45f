//! Lowers a markdown-rs MDAST into the element tree.
//!
//! The output mirrors what mdast-util-to-hast produces for the constructs
//! we enable: block and inline markdown, GFM tables, task lists, footnotes,
//! and MDX JSX elements with literal attributes. Nodes that carry no
//! visible content (front-matter, ESM, expressions, definitions) produce
//! nothing.

use crate::slug::extract_custom_id;
use crate::tree::{Element, Node};
use markdown::mdast::{self, AlignKind, AttributeContent, AttributeValue};
use std::collections::HashMap;

/// Lowers a parsed MDAST root into an element tree root.
pub fn lower(root: &mdast::Node) -> Node {
    let mut lowerer = Lowerer::default();
    lowerer.collect_definitions(root);

    let mut children = Vec::new();
    lowerer.lower_into(root, &mut children);
    if let Some(section) = lowerer.footnote_section() {
        children.push(section);
    }
    Node::root(children)
}

#[derive(Default)]
struct Lowerer {
    /// Link definitions by normalized identifier: (url, title).
    definitions: HashMap<String, (String, Option<String>)>,
    /// Footnote definitions by normalized identifier.
    footnote_definitions: HashMap<String, Vec<mdast::Node>>,
    /// Footnote identifiers in order of first reference.
    footnote_order: Vec<String>,
    /// Whether the nearest enclosing list is tight.
    tight_list: Vec<bool>,
}

fn normalize_identifier(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn element(tag: &str) -> Element {
    Element::new(tag)
}

impl Lowerer {
    fn collect_definitions(&mut self, node: &mdast::Node) {
        match node {
            mdast::Node::Definition(def) => {
                self.definitions
                    .entry(normalize_identifier(&def.identifier))
                    .or_insert_with(|| (def.url.clone(), def.title.clone()));
            }
            mdast::Node::FootnoteDefinition(def) => {
                self.footnote_definitions
                    .entry(normalize_identifier(&def.identifier))
                    .or_insert_with(|| def.children.clone());
            }
            _ => {}
        }
        if let Some(children) = node.children() {
            for child in children {
                self.collect_definitions(child);
            }
        }
    }

    fn lower_children(&mut self, children: &[mdast::Node]) -> Vec<Node> {
        let mut out = Vec::with_capacity(children.len());
        for child in children {
            self.lower_into(child, &mut out);
        }
        out
    }

    fn wrap(&mut self, tag: &str, children: &[mdast::Node]) -> Node {
        element(tag).with_children(self.lower_children(children)).into()
    }

    /// Lowers container content outside any enclosing tight list.
    fn lower_block_children(&mut self, children: &[mdast::Node]) -> Vec<Node> {
        self.tight_list.push(false);
        let out = self.lower_children(children);
        self.tight_list.pop();
        out
    }

    fn lower_into(&mut self, node: &mdast::Node, out: &mut Vec<Node>) {
        match node {
            mdast::Node::Root(root) => {
                for child in &root.children {
                    self.lower_into(child, out);
                }
            }
            mdast::Node::Text(text) => out.push(Node::text(&text.value)),
            mdast::Node::Paragraph(para) => {
                if self.tight_list.last().copied().unwrap_or(false) {
                    out.extend(self.lower_children(&para.children));
                } else {
                    out.push(self.wrap("p", &para.children));
                }
            }
            mdast::Node::Heading(heading) => out.push(self.lower_heading(heading)),
            mdast::Node::Emphasis(n) => out.push(self.wrap("em", &n.children)),
            mdast::Node::Strong(n) => out.push(self.wrap("strong", &n.children)),
            mdast::Node::Delete(n) => out.push(self.wrap("del", &n.children)),
            mdast::Node::Blockquote(n) => out.push(
                element("blockquote")
                    .with_children(self.lower_block_children(&n.children))
                    .into(),
            ),
            mdast::Node::InlineCode(code) => out.push(
                element("code")
                    .with_children(vec![Node::text(&code.value)])
                    .into(),
            ),
            mdast::Node::Code(code) => out.push(lower_code(code)),
            mdast::Node::Break(_) => out.push(element("br").into()),
            mdast::Node::ThematicBreak(_) => out.push(element("hr").into()),
            mdast::Node::Link(link) => {
                let mut a = element("a").with_property("href", &link.url);
                if let Some(title) = &link.title {
                    a.set_property("title", title);
                }
                a.children = self.lower_children(&link.children);
                out.push(a.into());
            }
            mdast::Node::Image(img) => {
                out.push(image_element(&img.url, &img.alt, img.title.as_deref()));
            }
            mdast::Node::LinkReference(link) => {
                let key = normalize_identifier(&link.identifier);
                let children = self.lower_children(&link.children);
                match self.definitions.get(&key) {
                    Some((url, title)) => {
                        let mut a = element("a").with_property("href", url);
                        if let Some(title) = title {
                            a.set_property("title", title);
                        }
                        a.children = children;
                        out.push(a.into());
                    }
                    None => {
                        log::debug!("Unresolved link reference [{}]", link.identifier);
                        out.push(Node::text("["));
                        out.extend(children);
                        out.push(Node::text("]"));
                    }
                }
            }
            mdast::Node::ImageReference(img) => {
                let key = normalize_identifier(&img.identifier);
                match self.definitions.get(&key) {
                    Some((url, title)) => {
                        out.push(image_element(url, &img.alt, title.as_deref()));
                    }
                    None => {
                        log::debug!("Unresolved image reference ![{}]", img.identifier);
                        out.push(Node::text(format!("![{}]", img.alt)));
                    }
                }
            }
            mdast::Node::List(list) => out.push(self.lower_list(list)),
            mdast::Node::ListItem(item) => out.push(self.lower_list_item(item, false)),
            mdast::Node::Table(table) => out.push(self.lower_table(table)),
            mdast::Node::TableRow(_) | mdast::Node::TableCell(_) => {}
            mdast::Node::Html(html) => out.push(Node::raw(&html.value)),
            mdast::Node::FootnoteReference(fnref) => {
                out.push(self.lower_footnote_reference(&fnref.identifier));
            }
            mdast::Node::MdxJsxFlowElement(el) => {
                self.lower_jsx(el.name.as_deref(), &el.attributes, &el.children, out);
            }
            mdast::Node::MdxJsxTextElement(el) => {
                self.lower_jsx(el.name.as_deref(), &el.attributes, &el.children, out);
            }
            mdast::Node::Math(math) => out.push(
                element("pre")
                    .with_children(vec![
                        element("code")
                            .with_property("class", "language-math math-display")
                            .with_children(vec![Node::text(&math.value)])
                            .into(),
                    ])
                    .into(),
            ),
            mdast::Node::InlineMath(math) => out.push(
                element("code")
                    .with_property("class", "language-math math-inline")
                    .with_children(vec![Node::text(&math.value)])
                    .into(),
            ),
            mdast::Node::Yaml(_)
            | mdast::Node::Toml(_)
            | mdast::Node::Definition(_)
            | mdast::Node::FootnoteDefinition(_)
            | mdast::Node::MdxjsEsm(_)
            | mdast::Node::MdxFlowExpression(_)
            | mdast::Node::MdxTextExpression(_) => {}
            #[allow(unreachable_patterns)]
            _ => log::warn!("Unhandled markdown node type: {:?}", node),
        }
    }

    /// Lowers a heading, honouring a trailing `{#custom-id}` in its last text.
    fn lower_heading(&mut self, heading: &mdast::Heading) -> Node {
        let mut h = element(&format!("h{}", heading.depth));
        h.children = self.lower_children(&heading.children);
        // Under MDX, `{#id}` parses as an expression rather than text.
        let expression_id = match heading.children.last() {
            Some(mdast::Node::MdxTextExpression(expr)) => {
                let wrapped = format!("{{{}}}", expr.value.trim());
                extract_custom_id(&wrapped).1.map(str::to_string)
            }
            _ => None,
        };
        if let Some(id) = expression_id {
            if let Some(Node::Text { value }) = h.children.last_mut() {
                value.truncate(value.trim_end().len());
            }
            h.set_property("id", id);
        } else if let Some(id) = strip_custom_id(&mut h.children) {
            h.set_property("id", id);
        }
        h.into()
    }

    fn lower_list(&mut self, list: &mdast::List) -> Node {
        let loose = list.spread
            || list
                .children
                .iter()
                .any(|c| matches!(c, mdast::Node::ListItem(item) if item.spread));

        let mut el = element(if list.ordered { "ol" } else { "ul" });
        if list.ordered
            && let Some(start) = list.start
            && start != 1
        {
            el.set_property("start", start.to_string());
        }
        let has_tasks = list
            .children
            .iter()
            .any(|c| matches!(c, mdast::Node::ListItem(item) if item.checked.is_some()));
        if has_tasks {
            el.set_property("class", "contains-task-list");
        }

        self.tight_list.push(!loose);
        for child in &list.children {
            match child {
                mdast::Node::ListItem(item) => {
                    let li = self.lower_list_item(item, !loose);
                    el.children.push(li);
                }
                other => self.lower_into(other, &mut el.children),
            }
        }
        self.tight_list.pop();
        el.into()
    }

    fn lower_list_item(&mut self, item: &mdast::ListItem, tight: bool) -> Node {
        self.tight_list.push(tight);
        let mut children = self.lower_children(&item.children);
        self.tight_list.pop();

        let mut li = element("li");
        if let Some(checked) = item.checked {
            li.set_property("class", "task-list-item");
            let mut input = element("input")
                .with_property("type", "checkbox")
                .with_property("disabled", "");
            if checked {
                input.set_property("checked", "");
            }
            // The checkbox goes inside the first paragraph when there is one.
            let first_paragraph = children.iter_mut().find_map(|c| match c {
                Node::Element(el) if el.tag_name == "p" => Some(el),
                _ => None,
            });
            match first_paragraph {
                Some(p) => {
                    p.children.insert(0, Node::text(" "));
                    p.children.insert(0, input.into());
                }
                None => {
                    children.insert(0, Node::text(" "));
                    children.insert(0, input.into());
                }
            }
        }
        li.children = children;
        li.into()
    }

    fn lower_table(&mut self, table: &mdast::Table) -> Node {
        let mut rows = table.children.iter().filter_map(|row| match row {
            mdast::Node::TableRow(r) => Some(r),
            _ => None,
        });

        let mut el = element("table");
        if let Some(head) = rows.next() {
            let tr = self.lower_table_row(head, "th", &table.align);
            el.children
                .push(element("thead").with_children(vec![tr]).into());
        }
        let body: Vec<Node> = rows
            .map(|row| self.lower_table_row(row, "td", &table.align))
            .collect();
        if !body.is_empty() {
            el.children.push(element("tbody").with_children(body).into());
        }
        el.into()
    }

    fn lower_table_row(&mut self, row: &mdast::TableRow, tag: &str, aligns: &[AlignKind]) -> Node {
        let mut tr = element("tr");
        for (i, cell) in row.children.iter().enumerate() {
            let mdast::Node::TableCell(cell) = cell else {
                continue;
            };
            let mut cell_el = element(tag);
            let align = match aligns.get(i) {
                Some(AlignKind::Left) => Some("left"),
                Some(AlignKind::Right) => Some("right"),
                Some(AlignKind::Center) => Some("center"),
                Some(AlignKind::None) | None => None,
            };
            if let Some(align) = align {
                cell_el.set_property("align", align);
            }
            cell_el.children = self.lower_children(&cell.children);
            tr.children.push(cell_el.into());
        }
        tr.into()
    }

    fn lower_footnote_reference(&mut self, identifier: &str) -> Node {
        let key = normalize_identifier(identifier);
        let ordinal = match self.footnote_order.iter().position(|k| *k == key) {
            Some(index) => index + 1,
            None => {
                self.footnote_order.push(key.clone());
                self.footnote_order.len()
            }
        };
        let safe = footnote_slug(&key);
        element("sup")
            .with_children(vec![
                element("a")
                    .with_property("href", format!("#user-content-fn-{safe}"))
                    .with_property("id", format!("user-content-fnref-{safe}"))
                    .with_property("data-footnote-ref", "")
                    .with_children(vec![Node::text(ordinal.to_string())])
                    .into(),
            ])
            .into()
    }

    /// Builds the trailing footnotes section from referenced definitions.
    fn footnote_section(&mut self) -> Option<Node> {
        let mut items = Vec::new();
        let order = std::mem::take(&mut self.footnote_order);
        for key in &order {
            let Some(children) = self.footnote_definitions.get(key).cloned() else {
                log::debug!("Footnote [^{key}] has no definition");
                continue;
            };
            let safe = footnote_slug(key);
            let mut content = self.lower_children(&children);
            let backref: Node = element("a")
                .with_property("href", format!("#user-content-fnref-{safe}"))
                .with_property("data-footnote-backref", "")
                .with_property("class", "data-footnote-backref")
                .with_children(vec![Node::text("↩")])
                .into();
            match content.last_mut().and_then(Node::as_element_mut) {
                Some(p) if p.tag_name == "p" => {
                    p.children.push(Node::text(" "));
                    p.children.push(backref);
                }
                _ => content.push(backref),
            }
            items.push(
                element("li")
                    .with_property("id", format!("user-content-fn-{safe}"))
                    .with_children(content)
                    .into(),
            );
        }

        if items.is_empty() {
            return None;
        }
        Some(
            element("section")
                .with_property("class", "footnotes")
                .with_property("data-footnotes", "")
                .with_children(vec![element("ol").with_children(items).into()])
                .into(),
        )
    }

    fn lower_jsx(
        &mut self,
        name: Option<&str>,
        attributes: &[AttributeContent],
        children: &[mdast::Node],
        out: &mut Vec<Node>,
    ) {
        // Fragments have no element of their own.
        let Some(name) = name else {
            out.extend(self.lower_children(children));
            return;
        };

        let mut el = element(name);
        for attr in attributes {
            match attr {
                AttributeContent::Property(prop) => {
                    let attr_name = match prop.name.as_str() {
                        "className" => "class",
                        "htmlFor" => "for",
                        other => other,
                    };
                    match &prop.value {
                        Some(AttributeValue::Literal(value)) => el.set_property(attr_name, value),
                        None => el.set_property(attr_name, ""),
                        Some(AttributeValue::Expression(_)) => {
                            log::debug!("Dropping expression attribute `{}` on <{name}>", prop.name);
                        }
                    }
                }
                AttributeContent::Expression(_) => {
                    log::debug!("Dropping spread attribute on <{name}>");
                }
            }
        }
        el.children = self.lower_block_children(children);
        out.push(el.into());
    }
}

fn lower_code(code: &mdast::Code) -> Node {
    let mut code_el = element("code");
    if let Some(lang) = code.lang.as_deref().filter(|l| !l.is_empty()) {
        code_el.set_property("class", format!("language-{lang}"));
    }
    if let Some(meta) = code.meta.as_deref().filter(|m| !m.trim().is_empty()) {
        code_el.set_property("data-meta", meta);
    }
    code_el.children = vec![Node::text(&code.value)];
    element("pre").with_children(vec![code_el.into()]).into()
}

fn image_element(url: &str, alt: &str, title: Option<&str>) -> Node {
    let mut img = element("img")
        .with_property("src", url)
        .with_property("alt", alt);
    if let Some(title) = title {
        img.set_property("title", title);
    }
    img.into()
}

fn footnote_slug(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect()
}

/// Strips a `{#id}` suffix from the deepest last text of heading content.
///
/// Only descends through emphasis, strong, strikethrough and links; a
/// suffix inside inline code is literal text.
fn strip_custom_id(children: &mut [Node]) -> Option<String> {
    match children.last_mut()? {
        Node::Text { value } => {
            let (text, id) = extract_custom_id(value);
            let id = id?.to_string();
            *value = text.to_string();
            Some(id)
        }
        Node::Element(el) if matches!(el.tag_name.as_str(), "em" | "strong" | "del" | "a") => {
            strip_custom_id(&mut el.children)
        }
        _ => None,
    }
}
