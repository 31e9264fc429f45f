use quire_core::tree::{Element, visit_elements};
use quire_core::{Node, RenderError, RenderOptions, TocEntry, render};

fn headings(tree: &Node) -> Vec<&Element> {
    let mut out = Vec::new();
    visit_elements(tree, &mut |el| {
        if el.is_heading() {
            out.push(el);
        }
    });
    out
}

fn elements_named<'a>(tree: &'a Node, tag: &str) -> Vec<&'a Element> {
    let mut out = Vec::new();
    visit_elements(tree, &mut |el| {
        if el.tag_name == tag {
            out.push(el);
        }
    });
    out
}

#[test]
fn title_and_sub_scenario() {
    let body = "# Title\n\nSome text.\n\n## Sub\n\nMore.";
    let rendered = render(body, &RenderOptions::default()).expect("render should succeed");

    let outline: Vec<(&str, u8)> = rendered
        .outline
        .iter()
        .map(|e| (e.title.as_str(), e.depth))
        .collect();
    assert_eq!(outline, [("Title", 1), ("Sub", 2)]);

    let hs = headings(&rendered.tree);
    assert_eq!(hs.len(), 2);
    assert_ne!(hs[0].id(), hs[1].id());
    for (heading, entry) in hs.iter().zip(rendered.outline.iter()) {
        let id = heading.id().expect("heading id");
        assert_eq!(id, entry.id);
        let anchor = heading.children[0].as_element().expect("anchor");
        assert_eq!(anchor.tag_name, "a");
        assert_eq!(anchor.property("href"), Some(format!("#{id}").as_str()));
        assert!(anchor.has_class("anchor"));
    }

    insta::assert_snapshot!(
        rendered.to_html(),
        @r##"<h1 id="title"><a class="anchor" href="#title">Title</a></h1><p>Some text.</p><h2 id="sub"><a class="anchor" href="#sub">Sub</a></h2><p>More.</p>"##
    );
}

#[test]
fn duplicate_intro_headings() {
    let rendered = render("## Intro\n\ntext\n\n## Intro", &RenderOptions::default()).unwrap();
    let ids: Vec<&str> = rendered.outline.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["intro", "intro-1"]);
}

#[test]
fn outline_follows_reading_order() {
    let rendered = render("### Deep\n\n# Top", &RenderOptions::default()).unwrap();
    assert_eq!(
        rendered.outline.into_vec(),
        [
            TocEntry {
                id: "deep".into(),
                title: "Deep".into(),
                depth: 3,
            },
            TocEntry {
                id: "top".into(),
                title: "Top".into(),
                depth: 1,
            },
        ]
    );
}

#[test]
fn explicit_heading_ids_survive() {
    let rendered = render("## Install {#setup}\n\n## Setup", &RenderOptions::default()).unwrap();
    let ids: Vec<&str> = rendered.outline.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["setup", "setup-1"]);
    assert_eq!(rendered.outline.entries()[0].title, "Install");
}

#[test]
fn unknown_language_is_preserved() {
    let source = "<<< weird & {wonderful} >>>\n  indented";
    let body = format!("```klingon\n{source}\n```");
    let rendered = render(&body, &RenderOptions::default()).unwrap();

    let code = elements_named(&rendered.tree, "code");
    assert_eq!(code.len(), 1);
    assert_eq!(code[0].text_content(), source);
    assert!(elements_named(&rendered.tree, "span").is_empty());
}

#[test]
fn known_language_is_highlighted_verbatim() {
    let source = "const answer: number = 42;";
    let body = format!("```ts\n{source}\n```");
    let rendered = render(&body, &RenderOptions::default()).unwrap();

    let code = elements_named(&rendered.tree, "code");
    assert_eq!(code[0].text_content(), source);
    assert!(!elements_named(&rendered.tree, "span").is_empty());
}

#[test]
fn code_title_and_highlighting_work_together() {
    let rendered = render(
        "```ts:utils.ts\nexport const x = 1;\n```",
        &RenderOptions::default(),
    )
    .unwrap();

    let root = rendered.tree.children();
    let title = root[0].as_element().expect("title element");
    assert_eq!(title.tag_name, "div");
    assert!(title.has_class("code-title"));
    assert_eq!(title.text_content(), "utils.ts");

    let code = elements_named(&rendered.tree, "code");
    assert!(code[0].has_class("language-ts"));
    assert!(!elements_named(&rendered.tree, "span").is_empty());
    assert!(rendered.outline.is_empty());
}

#[test]
fn no_headings_means_empty_outline() {
    let rendered = render("Just a paragraph.", &RenderOptions::default()).unwrap();
    assert!(rendered.outline.is_empty());
    assert_eq!(rendered.tree.children().len(), 1);
}

#[test]
fn empty_body_renders_empty_tree() {
    let rendered = render("", &RenderOptions::default()).unwrap();
    assert!(rendered.tree.children().is_empty());
    assert!(rendered.outline.is_empty());
}

#[test]
fn image_rewriting_respects_the_flag() {
    let body = "![a](/img/a.png)\n\n![b](https://cdn.example.com/b.png)";

    let off = render(body, &RenderOptions::default()).unwrap();
    let srcs: Vec<&str> = elements_named(&off.tree, "img")
        .iter()
        .filter_map(|img| img.property("src"))
        .collect();
    assert_eq!(srcs, ["/img/a.png", "https://cdn.example.com/b.png"]);

    let options = RenderOptions {
        image_base_url: "https://raw.example.com/main/".to_string(),
        ..RenderOptions::default().with_rewrite_image_urls(true)
    };
    let on = render(body, &options).unwrap();
    let srcs: Vec<&str> = elements_named(&on.tree, "img")
        .iter()
        .filter_map(|img| img.property("src"))
        .collect();
    assert_eq!(
        srcs,
        [
            "https://raw.example.com/main/img/a.png",
            "https://cdn.example.com/b.png"
        ]
    );
}

#[test]
fn unbalanced_expression_is_malformed_input() {
    let err = render("Hello {world", &RenderOptions::default()).unwrap_err();
    let RenderError::MalformedInput { message, .. } = &err;
    assert!(!message.is_empty());
}

#[test]
fn plain_markdown_mode_accepts_braces() {
    let options = RenderOptions {
        mdx: false,
        ..RenderOptions::default()
    };
    let rendered = render("Hello {world", &options).unwrap();
    assert_eq!(rendered.tree.text_content(), "Hello {world");
}

#[test]
fn outline_does_not_leak_between_calls() {
    let options = RenderOptions::default();
    let first = render("# One\n\n## Two", &options).unwrap();
    let second = render("# Three", &options).unwrap();
    assert_eq!(first.outline.len(), 2);
    assert_eq!(second.outline.len(), 1);
    assert_eq!(second.outline.entries()[0].id, "three");
}

#[test]
fn renders_in_parallel_without_shared_state() {
    let handles: Vec<_> = (0..4)
        .map(|n| {
            std::thread::spawn(move || {
                let body = format!("# Doc {n}\n\n## Part");
                render(&body, &RenderOptions::default()).unwrap()
            })
        })
        .collect();
    for (n, handle) in handles.into_iter().enumerate() {
        let rendered = handle.join().unwrap();
        assert_eq!(rendered.outline.len(), 2);
        assert_eq!(rendered.outline.entries()[0].id, format!("doc-{n}"));
    }
}
