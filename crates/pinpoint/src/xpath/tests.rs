//! Evaluation tests for the XPath subset.

#![allow(clippy::unwrap_used)]

use super::*;
use crate::dom::{tag_name, trimmed_text};

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Shop</title></head>
<body>
  <nav>
    <a href="/">Home</a>
    <a href="/docs">Learn more</a>
  </nav>
  <main id="content">
    <section class="card">
      <h2>First</h2>
      <a href="/one">Learn more</a>
    </section>
    <section class="card featured">
      <h2>Second</h2>
      <a href="/two">Learn more</a>
      <p>It's "quoted"</p>
    </section>
    <form>
      <label for="email">Email</label>
      <input id="email" name="email" type="email">
      <input name="password" type="password">
      <button type="submit" data-testid="login">  Sign in  </button>
    </form>
  </main>
</body>
</html>"#;

fn doc() -> Document {
    Document::parse(PAGE)
}

fn eval<'a>(doc: &'a Document, expr: &str) -> Vec<ElementRef<'a>> {
    XPath::parse(expr).unwrap().evaluate(doc).unwrap()
}

fn texts(elements: &[ElementRef<'_>]) -> Vec<String> {
    elements.iter().map(|e| trimmed_text(*e)).collect()
}

// ============================================================================
// Location paths
// ============================================================================

mod path_tests {
    use super::*;

    #[test]
    fn test_absolute_positional_path() {
        let doc = doc();
        let found = eval(&doc, "/html[1]/body[1]/main[1]/form[1]/input[2]");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].value().attr("name"), Some("password"));
    }

    #[test]
    fn test_root_only_selects_nothing() {
        let doc = doc();
        assert!(eval(&doc, "/").is_empty());
    }

    #[test]
    fn test_descendant_anywhere() {
        let doc = doc();
        assert_eq!(eval(&doc, "//a").len(), 4);
        assert_eq!(eval(&doc, "//main//a").len(), 2);
        assert_eq!(eval(&doc, "//section/a").len(), 2);
    }

    #[test]
    fn test_step_position_is_per_parent() {
        let doc = doc();
        // first <a> of every parent: one in nav, one in each section
        let firsts = eval(&doc, "//a[1]");
        assert_eq!(firsts.len(), 3);
        assert_eq!(texts(&firsts), vec!["Home", "Learn more", "Learn more"]);
    }

    #[test]
    fn test_filter_position_is_global() {
        let doc = doc();
        let all = eval(&doc, "//a[text()='Learn more']");
        assert_eq!(all.len(), 3);
        let second = eval(&doc, "(//a[text()='Learn more'])[2]");
        assert_eq!(second.len(), 1);
        assert_eq!(second[0], all[1]);
        assert!(eval(&doc, "(//a[text()='Learn more'])[4]").is_empty());
    }

    #[test]
    fn test_last_and_position() {
        let doc = doc();
        let last = eval(&doc, "(//a)[last()]");
        assert_eq!(last[0].value().attr("href"), Some("/two"));
        let rest = eval(&doc, "//nav/a[position() > 1]");
        assert_eq!(rest[0].value().attr("href"), Some("/docs"));
    }

    #[test]
    fn test_filter_then_child_path() {
        let doc = doc();
        let found = eval(&doc, "(//section)[2]/h2");
        assert_eq!(texts(&found), vec!["Second"]);
    }

    #[test]
    fn test_parent_and_self_steps() {
        let doc = doc();
        let forms = eval(&doc, "//input/..");
        assert_eq!(forms.len(), 1);
        assert_eq!(tag_name(forms[0]), "form");
        assert_eq!(eval(&doc, "//form/.").len(), 1);
    }

    #[test]
    fn test_sibling_and_ancestor_axes() {
        let doc = doc();
        let input = eval(&doc, "//label[@for='email']/following-sibling::input[1]");
        assert_eq!(input[0].value().id(), Some("email"));
        let label = eval(&doc, "//input[@id='email']/preceding-sibling::label");
        assert_eq!(label.len(), 1);
        let main = eval(&doc, "//button/ancestor::main");
        assert_eq!(main[0].value().id(), Some("content"));
        assert_eq!(eval(&doc, "//button/ancestor-or-self::*").len(), 5);
    }

    #[test]
    fn test_union_is_document_ordered() {
        let doc = doc();
        let found = eval(&doc, "//button | //label | //label");
        assert_eq!(found.len(), 2);
        assert_eq!(tag_name(found[0]), "label");
        assert_eq!(tag_name(found[1]), "button");
    }

    #[test]
    fn test_star_and_uppercase_name_test() {
        let doc = doc();
        assert_eq!(eval(&doc, "//*[@id='email']").len(), 1);
        assert_eq!(eval(&doc, "//INPUT").len(), 2);
    }
}

// ============================================================================
// Predicates
// ============================================================================

mod predicate_tests {
    use super::*;

    #[test]
    fn test_attribute_equality_and_existence() {
        let doc = doc();
        assert_eq!(eval(&doc, "//input[@name='email']").len(), 1);
        assert_eq!(eval(&doc, "//input[@type]").len(), 2);
        assert_eq!(eval(&doc, "//a[@href!='/']").len(), 3);
        assert!(eval(&doc, "//input[@placeholder]").is_empty());
    }

    #[test]
    fn test_class_attribute_is_exact_string() {
        let doc = doc();
        assert_eq!(eval(&doc, "//section[@class='card']").len(), 1);
        assert_eq!(eval(&doc, "//section[@class='card featured']").len(), 1);
        assert_eq!(eval(&doc, "//section[contains(@class,'card')]").len(), 2);
    }

    #[test]
    fn test_text_node_comparison_is_exact() {
        let doc = doc();
        // the button text node carries surrounding whitespace
        assert!(eval(&doc, "//button[text()='Sign in']").is_empty());
        assert_eq!(eval(&doc, "//button[normalize-space(text())='Sign in']").len(), 1);
        assert_eq!(eval(&doc, "//button[normalize-space(.)='Sign in']").len(), 1);
    }

    #[test]
    fn test_contains_text_and_starts_with() {
        let doc = doc();
        assert_eq!(eval(&doc, "//a[contains(text(),'Learn')]").len(), 3);
        assert_eq!(eval(&doc, "//input[starts-with(@name,'pass')]").len(), 1);
    }

    #[test]
    fn test_concat_literal_matches_mixed_quotes() {
        let doc = doc();
        let expr = format!(
            "//p[text()={}]",
            crate::escape::xpath_literal("It's \"quoted\"")
        );
        assert_eq!(eval(&doc, &expr).len(), 1);
    }

    #[test]
    fn test_boolean_operators() {
        let doc = doc();
        assert_eq!(eval(&doc, "//input[@name='email' or @name='password']").len(), 2);
        assert_eq!(eval(&doc, "//input[@name='email' and @type='email']").len(), 1);
        assert_eq!(eval(&doc, "//input[not(@id)]").len(), 1);
    }

    #[test]
    fn test_count_and_string_length() {
        let doc = doc();
        assert_eq!(eval(&doc, "//section[count(a)=1]").len(), 2);
        assert_eq!(eval(&doc, "//h2[string-length(text())=5]").len(), 1);
    }

    #[test]
    fn test_name_function() {
        let doc = doc();
        assert_eq!(eval(&doc, "//*[name()='button']").len(), 1);
    }

    #[test]
    fn test_nested_path_predicate() {
        let doc = doc();
        let sections = eval(&doc, "//section[h2='Second']");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].value().attr("class"), Some("card featured"));
    }

    #[test]
    fn test_empty_node_set_is_empty_string() {
        let doc = Document::parse("<a><span>x</span></a><a>true</a><a>false</a>");
        // the first anchor has no text() child of its own
        assert_eq!(texts(&eval(&doc, "//a[contains(text(),'fal')]")), vec!["false"]);
        assert_eq!(texts(&eval(&doc, "//a[string(text())='false']")), vec!["false"]);
        assert_eq!(eval(&doc, "//a[string-length(text())=0]").len(), 1);
        assert_eq!(eval(&doc, "//a[contains(text(),'')]").len(), 3);
    }

    #[test]
    fn test_empty_node_set_is_false_in_boolean_context() {
        let doc = Document::parse("<a><span>x</span></a><a>true</a><div><b></b></div>");
        assert_eq!(eval(&doc, "//a[not(text())]").len(), 1);
        // a non-empty set stays true even when its first node has no text
        assert_eq!(eval(&doc, "//div[b]").len(), 1);
        assert_eq!(eval(&doc, "//div[not(b)]").len(), 0);
    }

    #[test]
    fn test_multiple_predicates_reindex() {
        let doc = doc();
        // filter to Learn-more anchors, then take the first of those per parent
        let found = eval(&doc, "//nav/a[text()='Learn more'][1]");
        assert_eq!(found[0].value().attr("href"), Some("/docs"));
    }
}

// ============================================================================
// Errors
// ============================================================================

mod error_tests {
    use super::*;

    #[test]
    fn test_scalar_expression_is_error() {
        let doc = doc();
        let err = XPath::parse("count(//a)").unwrap().evaluate(&doc).unwrap_err();
        assert!(err.is_evaluation_failure());
    }

    #[test]
    fn test_text_results_are_dropped() {
        let doc = doc();
        assert!(eval(&doc, "//h2/text()").is_empty());
        assert!(eval(&doc, "//input/@name").is_empty());
    }

    #[test]
    fn test_document_helpers_surface_parse_errors() {
        let doc = doc();
        assert!(doc.evaluate_xpath("//a[").is_err());
        assert_eq!(doc.xpath_count("//h2").unwrap(), 2);
    }

    #[test]
    fn test_display_round_trips_source() {
        let xpath = XPath::parse("//a[@href='/']").unwrap();
        assert_eq!(xpath.to_string(), "//a[@href='/']");
        assert_eq!(xpath.as_str(), "//a[@href='/']");
    }
}
