//! Example: Inspect Demo
//!
//! Demonstrates: Candidate synthesis, ranking and refinement payloads
//!
//! Run with: `cargo run --example inspect_demo`

use pinpoint::prelude::*;

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<body>
  <form id="login">
    <input id="email" name="email" type="email" placeholder="you@example.com">
    <button class="css-x7y2z" type="submit">Sign in</button>
  </form>
  <ul>
    <li><a href="/a">Learn more</a></li>
    <li><a href="/b">Learn more</a></li>
    <li><a href="/c">Learn more</a></li>
  </ul>
</body>
</html>"#;

fn print_inspection(label: &str, inspection: &Inspection) {
    println!("--- {label} ---");
    for (strategy, value) in inspection.candidates.iter() {
        println!("   {strategy:<24} {value}");
    }
    println!("   scored:");
    for candidate in &inspection.ranking.scored {
        println!(
            "     {:<28} {:>6.2}  matches={}  {}",
            candidate.kind.label(),
            candidate.score,
            candidate.match_count,
            candidate.value
        );
    }
    match inspection.best() {
        Some(best) => println!(
            "   best: {} = {} ({} stars)\n",
            best.kind,
            best.value,
            "*".repeat(usize::from(best.stars))
        ),
        None => println!("   best: none\n"),
    }
}

fn main() -> LocatorResult<()> {
    println!("=== Inspect Demo ===\n");

    let doc = Document::parse(PAGE);
    let engine = LocatorEngine::default();

    // 1. Element with a unique id
    let email = doc.resolve("#email")?;
    print_inspection("input#email", &engine.inspect(&doc, email));

    // 2. Element with only a generated class name
    let button = doc.resolve("//button")?;
    print_inspection("button.css-x7y2z", &engine.inspect(&doc, button));

    // 3. One of three identical links
    let link = doc.resolve("(//a[text()='Learn more'])[2]")?;
    let inspection = engine.inspect(&doc, link);
    print_inspection("second 'Learn more' link", &inspection);

    // 4. Refinement prompt for the link
    let request = RefinementRequest::new(
        &inspection.candidates,
        link,
        engine.config().context_html_length,
    );
    println!("--- refinement prompt ---\n{}", request.prompt()?);

    Ok(())
}
