//! Tests for the shared helpers exposed at the crate root.

use mermark_babel::transforms::{convert_with_policy, LineEndingPolicy};
use mermark_babel::{
    apply_line_ending, decode_html_entities, detect_line_ending, escape_html, generate_slug,
    FormatError, FormatRegistry, LineEnding,
};
use std::collections::HashMap;

#[test]
fn test_decode_named_and_numeric() {
    assert_eq!(
        decode_html_entities("&lt;a&gt; &amp; &quot;b&quot; &#39;c&#x27;"),
        "<a> & \"b\" 'c'"
    );
}

#[test]
fn test_decode_leaves_unknown_alone() {
    assert_eq!(decode_html_entities("&bogus; &#xZZ; & alone"), "&bogus; &#xZZ; & alone");
}

#[test]
fn test_decode_is_single_pass() {
    let once = decode_html_entities("&amp;lt;");
    assert_eq!(once, "&lt;");
    assert_eq!(decode_html_entities(&decode_html_entities("plain & <text>")), "plain & <text>");
}

#[test]
fn test_escape_html() {
    assert_eq!(escape_html("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
    assert_eq!(escape_html("say \"hi\""), "say \"hi\"");
}

#[test]
fn test_slug() {
    assert_eq!(generate_slug("Hello, World!"), "hello-world");
    assert_eq!(generate_slug("  API  v2 -- Guide "), "api-v2-guide");
    assert_eq!(generate_slug("!!!"), "");
}

#[test]
fn test_detect_line_ending() {
    assert_eq!(detect_line_ending("a\nb\nc"), LineEnding::Lf);
    assert_eq!(detect_line_ending("a\r\nb\r\nc\n"), LineEnding::Crlf);
    assert_eq!(detect_line_ending("a\rb\rc"), LineEnding::Cr);
    assert_eq!(detect_line_ending("single line"), LineEnding::Lf);
}

#[test]
fn test_apply_line_ending_normalizes_mixed_input() {
    assert_eq!(apply_line_ending("a\r\nb\rc\nd", LineEnding::Lf), "a\nb\nc\nd");
    assert_eq!(apply_line_ending("a\r\nb\nc", LineEnding::Crlf), "a\r\nb\r\nc");
    assert_eq!(apply_line_ending("a\nb", LineEnding::Cr), "a\rb");
}

#[test]
fn test_registry_round_trip_with_options() {
    let registry = FormatRegistry::default();
    let mut options = HashMap::new();
    options.insert("heading-ids".to_string(), "false".to_string());

    let html = registry
        .convert_with_options("# Title\n\ntext", "markdown", "html", &options)
        .unwrap();
    assert_eq!(html, "<h1>Title</h1><p>text</p>");

    let md = registry.convert(&html, "html", "markdown").unwrap();
    assert_eq!(md, "# Title\n\ntext");
}

#[test]
fn test_unknown_option_is_rejected() {
    let registry = FormatRegistry::default();
    let mut options = HashMap::new();
    options.insert("colour".to_string(), "red".to_string());

    let err = registry
        .convert_with_options("x", "markdown", "html", &options)
        .unwrap_err();
    assert!(matches!(err, FormatError::NotSupported(_)), "{err}");
}

#[test]
fn test_table_padding_option() {
    let registry = FormatRegistry::default();
    let mut options = HashMap::new();
    options.insert("table-padding".to_string(), "true".to_string());

    let md = registry
        .convert_with_options(
            "<table><tr><th>a</th><th>b</th></tr><tr><td>1</td><td></td></tr></table>",
            "html",
            "markdown",
            &options,
        )
        .unwrap();
    assert_eq!(md, "| a | b |\n| --- | --- |\n| 1 ||");
}

#[test]
fn test_policy_keeps_crlf_through_html() {
    let registry = FormatRegistry::default();
    let html = "<h1>A</h1>\r\n<p>b</p>\r\n";
    let md = convert_with_policy(
        &registry,
        html,
        "html",
        "markdown",
        &HashMap::new(),
        LineEndingPolicy::Preserve,
    )
    .unwrap();
    assert_eq!(md, "# A\r\n\r\nb");
}
