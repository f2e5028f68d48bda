#![allow(clippy::unwrap_used)]

use super::*;
use crate::config::ClassPolicy;

fn synth(html: &str, target: &str) -> CandidateSet {
    synth_with(EngineConfig::default(), html, target)
}

fn synth_with(config: EngineConfig, html: &str, target: &str) -> CandidateSet {
    let doc = Document::parse(html);
    let element = doc.resolve(target).unwrap();
    assert!(element.is_some(), "fixture target {target:?} missing");
    Synthesizer::new(config).synthesize(&doc, element)
}

fn resolves_to(html: &str, expr: &str, target: &str) -> bool {
    let doc = Document::parse(html);
    let expected = doc.resolve(target).unwrap().unwrap();
    doc.evaluate_xpath(expr).unwrap() == vec![expected]
}

const LOGIN: &str = r#"<html><body>
  <main>
    <form id="login">
      <label for="email">Email</label>
      <input id="email" name="email" type="email" placeholder="you@example.com">
      <input name="password" type="password">
      <button type="submit" data-test-id="submit">Sign in</button>
    </form>
  </main>
</body></html>"#;

// ============================================================================
// CSS selector strategy
// ============================================================================

mod css_tests {
    use super::*;

    #[test]
    fn test_unique_id_wins() {
        let set = synth(LOGIN, "#email");
        assert_eq!(set.css_selector.as_deref(), Some("#email"));
    }

    #[test]
    fn test_unique_tag() {
        let set = synth("<main><h1>Title</h1><p>a</p><p>b</p></main>", "h1");
        assert_eq!(set.css_selector.as_deref(), Some("h1"));
    }

    #[test]
    fn test_stable_attribute() {
        let set = synth(r#"<input name="q"><input name="r">"#, "input[name=q]");
        assert_eq!(set.css_selector.as_deref(), Some(r#"[name="q"]"#));
    }

    #[test]
    fn test_stable_attribute_priority() {
        let html = r#"<div data-testid="card" title="Card">x</div><div>y</div>"#;
        let set = synth(html, "[title=Card]");
        assert_eq!(set.css_selector.as_deref(), Some(r#"[data-testid="card"]"#));
    }

    #[test]
    fn test_tag_qualified_attribute() {
        let html = r#"<a title="Help">?</a><span title="Help">?</span><span>x</span>"#;
        let set = synth(html, "span[title]");
        assert_eq!(set.css_selector.as_deref(), Some(r#"span[title="Help"]"#));
    }

    #[test]
    fn test_other_data_attribute() {
        let html = r#"<span data-kind="hint">H</span><span>x</span>"#;
        let set = synth(html, "[data-kind]");
        assert_eq!(set.css_selector.as_deref(), Some(r#"[data-kind="hint"]"#));
    }

    #[test]
    fn test_single_class() {
        let html = r#"<p class="lead intro">a</p><p class="intro">b</p>"#;
        let set = synth(html, ".lead");
        assert_eq!(set.css_selector.as_deref(), Some("p.lead"));
    }

    #[test]
    fn test_class_combination() {
        let html = r#"<p class="a b">1</p><p class="a">2</p><p class="b">3</p>"#;
        let set = synth(html, "p.a.b");
        assert_eq!(set.css_selector.as_deref(), Some("p.a.b"));
    }

    #[test]
    fn test_hashed_classes_fall_through_to_dom_path() {
        let html = r#"<div><button class="css-x7y2z">Go</button></div>
            <div><button class="css-a1b2c">Go</button></div>"#;
        let set = synth(html, ".css-x7y2z");
        let css = set.css_selector.unwrap();
        assert_eq!(css, "div:nth-of-type(1) button:nth-of-type(1)");
        assert!(!css.contains("css-"));
    }

    #[test]
    fn test_permissive_policy_uses_hashed_class() {
        let html = r#"<div><button class="css-x7y2z">Go</button></div>
            <div><button class="css-a1b2c">Go</button></div>"#;
        let config = EngineConfig::default().with_class_policy(ClassPolicy::permissive());
        let set = synth_with(config, html, ".css-x7y2z");
        assert_eq!(set.css_selector.as_deref(), Some("button.css-x7y2z"));
    }

    #[test]
    fn test_dom_path_anchors_on_ancestor_id() {
        let html = "<div id=\"box\"><p>1</p><p>2</p></div><p>3</p>";
        let set = synth(html, "#box > p");
        assert_eq!(set.css_selector.as_deref(), Some("#box p:nth-of-type(1)"));
    }

    #[test]
    fn test_dom_path_short_circuits() {
        let html = "<div id=\"box\"><p>1</p><p>2</p></div><p>3</p>";
        let set = synth(html, "#box > p:nth-of-type(2)");
        assert_eq!(set.css_selector.as_deref(), Some("p:nth-of-type(2)"));
    }

    #[test]
    fn test_ancestor_cap_returns_partial_path() {
        let html = r#"<div><button class="css-x7y2z">Go</button></div>
            <div><button class="css-a1b2c">Go</button></div>"#;
        let config = EngineConfig::default().with_max_ancestor_depth(0);
        let set = synth_with(config, html, ".css-x7y2z");
        assert_eq!(set.css_selector.as_deref(), Some("button:nth-of-type(1)"));
    }

    #[test]
    fn test_id_needing_escape() {
        let html = r#"<p id="1st">a</p><p>b</p>"#;
        let set = synth(html, "p");
        assert_eq!(set.css_selector.as_deref(), Some("#\\31 st"));
        let doc = Document::parse(html);
        assert!(doc.is_unique_css(set.css_selector.as_deref().unwrap()));
    }
}

// ============================================================================
// XPath strategies
// ============================================================================

mod xpath_tests {
    use super::*;

    #[test]
    fn test_absolute_xpath_positional() {
        let html = "<p>x</p><p>y</p>";
        let set = synth(html, "p:nth-of-type(2)");
        assert_eq!(set.absolute_xpath.as_deref(), Some("/html[1]/body[1]/p[2]"));
    }

    #[test]
    fn test_absolute_xpath_resolves_to_element() {
        let set = synth(LOGIN, "input[name=password]");
        let abs = set.absolute_xpath.unwrap();
        assert_eq!(abs, "/html[1]/body[1]/main[1]/form[1]/input[2]");
        assert!(resolves_to(LOGIN, &abs, "input[name=password]"));
    }

    #[test]
    fn test_paths_resolve_after_parser_reparenting() {
        let html = "<html><body><a><li>Go<div></div><div></div><a></a></li></a></body></html>";
        let doc = Document::parse(html);
        let synthesizer = Synthesizer::default();
        for element in doc.elements() {
            let set = synthesizer.synthesize(&doc, Some(element));
            let absolute = set.absolute_xpath.unwrap();
            assert_eq!(doc.evaluate_xpath(&absolute).unwrap(), vec![element], "{absolute}");
            let relative = set.relative_xpath.unwrap();
            assert_eq!(doc.evaluate_xpath(&relative).unwrap(), vec![element], "{relative}");
        }
    }

    #[test]
    fn test_relative_xpath_unique_id() {
        let set = synth(LOGIN, "#email");
        assert_eq!(set.relative_xpath.as_deref(), Some("//*[@id='email']"));
    }

    #[test]
    fn test_relative_xpath_stable_attribute() {
        let set = synth(LOGIN, "input[name=password]");
        assert_eq!(
            set.relative_xpath.as_deref(),
            Some("//input[@name='password']")
        );
    }

    #[test]
    fn test_relative_xpath_quotes_use_concat() {
        let html = r#"<input name="it's &quot;x&quot;">"#;
        let set = synth(html, "input");
        let rel = set.relative_xpath.unwrap();
        assert_eq!(rel, r#"//input[@name=concat('it', "'", 's "x"')]"#);
        assert!(resolves_to(html, &rel, "input"));
    }

    #[test]
    fn test_relative_xpath_anchors_on_ancestor_id() {
        let html = "<div id=\"box\"><p>1</p><p>2</p></div>";
        let set = synth(html, "#box > p:nth-of-type(2)");
        assert_eq!(set.relative_xpath.as_deref(), Some("//*[@id='box']/p[2]"));
    }

    #[test]
    fn test_relative_xpath_reaches_html() {
        let html = "<section><ul><li>a</li><li>b</li></ul></section>";
        let set = synth(html, "li:nth-of-type(2)");
        let rel = set.relative_xpath.unwrap();
        assert_eq!(rel, "/html/body/section/ul/li[2]");
        assert!(resolves_to(html, &rel, "li:nth-of-type(2)"));
    }

    #[test]
    fn test_text_xpath_indexed() {
        let html = "<button>Save</button><button>Save</button>";
        let set = synth(html, "button:nth-of-type(2)");
        assert_eq!(
            set.xpath_by_text.as_deref(),
            Some("(//button[text()='Save'])[2]")
        );
    }

    #[test]
    fn test_text_xpath_length_limit() {
        let long = "x".repeat(61);
        let set = synth(&format!("<p>{long}</p>"), "p");
        assert!(set.xpath_by_text.is_none());
        let set = synth("<p>   </p>", "p");
        assert!(set.xpath_by_text.is_none());
    }

    #[test]
    fn test_link_text_three_identical_anchors() {
        let html = "<ul><li><a>Learn more</a></li><li><a>Learn more</a></li>\
                    <li><a>Learn more</a></li></ul>";
        let set = synth(html, "li:nth-of-type(2) > a");
        assert_eq!(
            set.xpath_by_link_text.as_deref(),
            Some("(//a[text()='Learn more'])[2]")
        );
        assert_eq!(
            set.xpath_by_partial_link_text.as_deref(),
            Some("(//a[contains(text(),'Learn more')])[2]")
        );
    }

    #[test]
    fn test_partial_link_text_prefix() {
        let html = r#"<a href="/docs">Read the full documentation here</a>"#;
        let set = synth(html, "a");
        assert_eq!(
            set.xpath_by_partial_link_text.as_deref(),
            Some("//a[contains(text(),'Read the full docume')]")
        );
    }

    #[test]
    fn test_link_text_ignores_anchors_without_own_text() {
        let html = "<a><b>x</b></a><a><i>y</i></a><a>false</a>";
        let set = synth(html, "(//a)[3]");
        assert_eq!(
            set.xpath_by_partial_link_text.as_deref(),
            Some("//a[contains(text(),'false')]")
        );
        assert_eq!(set.xpath_by_link_text.as_deref(), Some("//a[text()='false']"));
        assert!(resolves_to(html, "//a[contains(text(),'false')]", "(//a)[3]"));
    }

    #[test]
    fn test_link_text_only_for_anchors() {
        let set = synth(LOGIN, "button");
        assert!(set.xpath_by_link_text.is_none());
        assert!(set.xpath_by_partial_link_text.is_none());
        assert_eq!(set.xpath_by_text.as_deref(), Some("//button[text()='Sign in']"));
    }

    #[test]
    fn test_class_and_tag_xpaths() {
        let html = r#"<p class="a b">1</p><p>2</p>"#;
        let set = synth(html, "p.a");
        assert_eq!(set.xpath_by_class_name.as_deref(), Some("//p[@class='a b']"));
        assert_eq!(set.xpath_by_tag_name.as_deref(), Some("(//p)[1]"));

        let set = synth(html, "p:nth-of-type(2)");
        assert!(set.xpath_by_class_name.is_none());
        assert_eq!(set.xpath_by_tag_name.as_deref(), Some("(//p)[2]"));
    }
}

// ============================================================================
// Attribute slots, metadata and input handling
// ============================================================================

mod slot_tests {
    use super::*;

    #[test]
    fn test_attribute_slots() {
        let set = synth(LOGIN, "#email");
        assert_eq!(set.id.as_deref(), Some("email"));
        assert_eq!(set.name.as_deref(), Some("email"));
        assert!(set.data_test_id.is_none());
        assert!(set.role.is_none());

        let set = synth(LOGIN, "button");
        assert_eq!(set.data_test_id.as_deref(), Some("submit"));
    }

    #[test]
    fn test_data_testid_preferred_over_data_test_id() {
        let html = r#"<div data-testid="a" data-test-id="b" role="dialog" aria-label="Box"></div>"#;
        let set = synth(html, "div");
        assert_eq!(set.data_test_id.as_deref(), Some("a"));
        assert_eq!(set.role.as_deref(), Some("dialog"));
        assert_eq!(set.aria_label.as_deref(), Some("Box"));
    }

    #[test]
    fn test_metadata() {
        let set = synth(LOGIN, "#email");
        let meta = set.metadata.unwrap();
        assert_eq!(meta.tag, "input");
        assert_eq!(meta.id.as_deref(), Some("email"));
        assert_eq!(meta.input_type.as_deref(), Some("email"));
        assert_eq!(meta.placeholder.as_deref(), Some("you@example.com"));
        assert!(meta.text.is_none());
        assert!(meta.outer_html.unwrap().starts_with("<input"));
    }

    #[test]
    fn test_metadata_text_truncated() {
        let long = "y".repeat(150);
        let set = synth(&format!("<p>{long}</p>"), "p");
        let text = set.metadata.unwrap().text.unwrap();
        assert_eq!(text.chars().count(), 103);
        assert!(text.ends_with("..."));
    }

    #[test]
    fn test_none_input_is_empty() {
        let doc = Document::parse(LOGIN);
        let set = Synthesizer::default().synthesize(&doc, None);
        assert!(set.is_empty());
    }

    #[test]
    fn test_foreign_element_is_empty() {
        let doc = Document::parse(LOGIN);
        let other = Document::parse(LOGIN);
        let element = other.resolve("#email").unwrap();
        let set = Synthesizer::default().synthesize(&doc, element);
        assert_eq!(set, CandidateSet::empty());
    }

    #[test]
    fn test_events_use_crate_target() {
        use std::io;
        use std::sync::{Arc, Mutex};

        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl io::Write for Captured {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let logs = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&logs);
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || Captured(Arc::clone(&sink)))
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let doc = Document::parse(LOGIN);
            let other = Document::parse(LOGIN);
            let element = other.resolve("#email").unwrap();
            Synthesizer::default().synthesize(&doc, element);
        });

        let output = String::from_utf8(logs.lock().unwrap().clone()).unwrap();
        assert!(output.contains("pinpoint: element is not part of the document"), "{output}");
        assert!(!output.contains("target="), "{output}");
    }

    #[test]
    fn test_synthesis_is_idempotent() {
        let doc = Document::parse(LOGIN);
        let element = doc.resolve("input[name=password]").unwrap();
        let synthesizer = Synthesizer::default();
        assert_eq!(
            synthesizer.synthesize(&doc, element),
            synthesizer.synthesize(&doc, element)
        );
    }

    #[test]
    fn test_custom_stable_attributes() {
        let html = r#"<b data-cy="x">1</b><b>2</b>"#;
        let config = EngineConfig::default().with_stable_attributes(["data-cy"]);
        let set = synth_with(config, html, "[data-cy]");
        assert_eq!(set.css_selector.as_deref(), Some(r#"[data-cy="x"]"#));
        assert_eq!(set.relative_xpath.as_deref(), Some("//b[@data-cy='x']"));
    }
}
