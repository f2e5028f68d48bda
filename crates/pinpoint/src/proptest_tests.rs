//! Property tests over generated documents.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use crate::dom::{tag_name, Document};
use crate::engine::LocatorEngine;
use crate::escape::{css_attr_selector, css_escape_ident, xpath_literal};
use crate::synthesizer::{indexed_if_needed, Synthesizer};

#[derive(Debug, Clone)]
struct Node {
    tag: &'static str,
    class: Option<&'static str>,
    name: Option<&'static str>,
    text: Option<&'static str>,
    children: Vec<Node>,
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn render(node: &Node, out: &mut String) {
    out.push('<');
    out.push_str(node.tag);
    if let Some(class) = node.class {
        out.push_str(&format!(" class=\"{}\"", escape_html(class)));
    }
    if let Some(name) = node.name {
        out.push_str(&format!(" name=\"{}\"", escape_html(name)));
    }
    out.push('>');
    if let Some(text) = node.text {
        out.push_str(&escape_html(text));
    }
    for child in &node.children {
        render(child, out);
    }
    out.push_str(&format!("</{}>", node.tag));
}

fn page(nodes: &[Node]) -> String {
    let mut out = String::from("<html><body>");
    for node in nodes {
        render(node, &mut out);
    }
    out.push_str("</body></html>");
    out
}

fn node_strategy() -> impl Strategy<Value = Node> {
    let tag = prop::sample::select(vec!["div", "section", "span", "a", "li", "em"]);
    let class = prop::option::of(prop::sample::select(vec![
        "card",
        "nav-link",
        "css-x7y2z",
        "card featured",
        "active",
    ]));
    let name = prop::option::of(prop::sample::select(vec!["q", "it's", "say \"hi\""]));
    let text = prop::option::of(prop::sample::select(vec![
        "Go",
        "Learn more",
        "It's here",
        "a'b\"c",
    ]));

    let leaf = (tag.clone(), class.clone(), name.clone(), text.clone()).prop_map(
        |(tag, class, name, text)| Node {
            tag,
            class,
            name,
            text,
            children: Vec::new(),
        },
    );

    leaf.prop_recursive(4, 32, 4, move |inner| {
        (
            tag.clone(),
            class.clone(),
            name.clone(),
            text.clone(),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(tag, class, name, text, children)| Node {
                tag,
                class,
                name,
                text,
                children,
            })
    })
}

fn document_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(node_strategy(), 1..5).prop_map(|nodes| page(&nodes))
}

// ============================================================================
// Synthesis properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_absolute_xpath_resolves_to_element(html in document_strategy()) {
        let doc = Document::parse(&html);
        let synthesizer = Synthesizer::default();
        for element in doc.elements() {
            let set = synthesizer.synthesize(&doc, Some(element));
            let absolute = set.absolute_xpath.unwrap();
            prop_assert_eq!(doc.evaluate_xpath(&absolute).unwrap(), vec![element]);
        }
    }

    #[test]
    fn prop_indexed_tag_xpath_is_unique(html in document_strategy()) {
        let doc = Document::parse(&html);
        for element in doc.elements() {
            let expr = indexed_if_needed(&doc, &format!("//{}", tag_name(element)), element);
            prop_assert_eq!(doc.evaluate_xpath(&expr).unwrap(), vec![element]);
        }
    }

    #[test]
    fn prop_generated_class_never_in_css(html in document_strategy()) {
        let doc = Document::parse(&html);
        let synthesizer = Synthesizer::default();
        for element in doc.elements() {
            let set = synthesizer.synthesize(&doc, Some(element));
            let css = set.css_selector.unwrap();
            prop_assert!(!css.contains("css-x7y2z"), "{}", css);
            prop_assert!(!css.contains(".active"), "{}", css);
        }
    }

    #[test]
    fn prop_uniqueness_iff_single_match(html in document_strategy()) {
        let doc = Document::parse(&html);
        let engine = LocatorEngine::default();
        for element in doc.elements() {
            let inspection = engine.inspect(&doc, Some(element));
            for candidate in &inspection.ranking.scored {
                prop_assert_eq!(candidate.is_unique, candidate.match_count == 1);
                prop_assert!(candidate.match_count > 0);
            }
            prop_assert!(inspection.best().is_some());
        }
    }

    #[test]
    fn prop_inspection_is_idempotent(html in document_strategy()) {
        let doc = Document::parse(&html);
        let engine = LocatorEngine::default();
        for element in doc.elements() {
            prop_assert_eq!(
                engine.inspect(&doc, Some(element)),
                engine.inspect(&doc, Some(element))
            );
        }
    }
}

// ============================================================================
// Escaping properties
// ============================================================================

proptest! {
    #[test]
    fn prop_xpath_literal_matches_text(text in "[a-z '\"]{1,12}") {
        let doc = Document::parse(&format!("<p>{}</p><p>other-</p>", escape_html(&text)));
        let expr = format!("//p[text()={}]", xpath_literal(&text));
        prop_assert_eq!(doc.xpath_count(&expr).unwrap(), 1);
    }

    #[test]
    fn prop_css_attr_value_matches(value in "[a-zA-Z0-9 '\"\\\\]{0,12}") {
        let doc = Document::parse(&format!(
            "<p title=\"{}\">a</p><p title=\"-\">b</p>",
            escape_html(&value)
        ));
        prop_assume!(value != "-");
        prop_assert_eq!(doc.query_count(&css_attr_selector("title", &value)).unwrap(), 1);
    }

    #[test]
    fn prop_css_escape_ident_matches_id(id in "[a-zA-Z0-9_.:#-]{1,10}") {
        let doc = Document::parse(&format!("<p id=\"{}\">a</p><p>b</p>", escape_html(&id)));
        let selector = format!("#{}", css_escape_ident(&id));
        prop_assert_eq!(doc.query_count(&selector).unwrap(), 1);
    }
}
