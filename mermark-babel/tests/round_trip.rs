//! Round-trip laws between Markdown and editor HTML.

use mermark_babel::transforms::{check_markdown_round_trip, round_trip_markdown};
use mermark_babel::{
    apply_line_ending, decode_html_entities, detect_line_ending, html_to_markdown,
    markdown_to_html, LineEnding,
};
use proptest::prelude::*;

#[test]
fn test_heading() {
    assert_eq!(html_to_markdown("<h1>Title</h1>"), "# Title");
}

#[test]
fn test_bold() {
    assert_eq!(html_to_markdown("<strong>bold</strong>"), "**bold**");
}

#[test]
fn test_inline_code_keeps_generics() {
    assert_eq!(
        html_to_markdown("<code>Result&lt;T&gt;</code>"),
        "`Result<T>`"
    );
    assert_eq!(round_trip_markdown("`Result<T>`"), "`Result<T>`");
}

#[test]
fn test_nested_list() {
    let md = "- Parent\n  - Child 1\n  - Child 2";
    assert_eq!(html_to_markdown(&markdown_to_html(md)), md);
}

#[test]
fn test_three_level_list() {
    let md = "- Level 1\n  - Level 2\n    - Level 3\n    - Level 3b\n  - Level 2b\n- Level 1b";
    assert_eq!(html_to_markdown(&markdown_to_html(md)), md);
}

#[test]
fn test_diagram_line_break() {
    let md = "```mermaid\nsequenceDiagram\nA->>B: Line1<br/>Line2\n```";
    let out = html_to_markdown(&markdown_to_html(md));
    assert_eq!(out, md);
    assert!(out.contains("<br/>"));
}

#[test]
fn test_diagram_single_quote() {
    let md = "```mermaid\ngraph TD\nA[Error = 'message'] --> B\n```";
    assert_eq!(html_to_markdown(&markdown_to_html(md)), md);
}

#[test]
fn test_table_blank_cells() {
    let md = "|Field|Col1|Col2|\n|---|---|---|\n|Name|||";
    let out = html_to_markdown(&markdown_to_html(md));
    assert_eq!(out, md);
    assert!(out.lines().any(|line| line == "|Name|||"));
}

#[test]
fn test_line_endings() {
    assert_eq!(detect_line_ending("line1\r\nline2\r\nline3"), LineEnding::Crlf);
    assert_eq!(detect_line_ending("line1\r\nline2\r\nline3").as_str(), "\r\n");
    assert_eq!(apply_line_ending("a\nb", LineEnding::Crlf), "a\r\nb");
}

#[test]
fn test_empty_input() {
    assert_eq!(html_to_markdown(""), "");
    assert_eq!(markdown_to_html(""), "");
}

#[test]
fn test_header_only_table_still_has_body() {
    let html = markdown_to_html("|A|B|\n|---|---|");
    assert!(html.contains("<tbody>"));
    assert!(html.contains("<tr><td></td><td></td></tr>"));
}

#[test]
fn test_single_line_is_one_paragraph() {
    assert_eq!(markdown_to_html("hello world"), "<p>hello world</p>");
    assert_eq!(round_trip_markdown("hello world"), "hello world");
}

#[test]
fn test_code_fence_with_markup_inside() {
    let md = "```html\n<p class=\"x\">**not bold** &amp;</p>\n```";
    assert_eq!(round_trip_markdown(md), md);
}

#[test]
fn test_full_document_is_stable() {
    let md = "# Design

Some *intro* text with a [link](https://example.com) and `code`.

## Tasks

- [x] parse
- [ ] render
  - [ ] tables

1. one
2. two

|Key|Value|
|---|---|
|a|**b**|

```rust
fn main() {}
```

> Note: quoted
> across lines

---

```mermaid
graph LR
A --> B
```";
    let report = check_markdown_round_trip(md);
    assert!(report.is_stable(), "{:#?}", report.differences);
}

#[test]
fn test_text_that_looks_like_markdown_survives() {
    for text in [
        "- not a list",
        "&gt; not a quote",
        "1. not ordered",
        "# not a heading",
        "***",
        "---",
        "2*3*4",
        "[ ] not a task",
        r"C:\temp",
    ] {
        let html = format!("<p>{text}</p>");
        let md = html_to_markdown(&html);
        assert_eq!(markdown_to_html(&md), html, "via {md:?}");
    }
}

#[test]
fn test_link_destinations_with_spaces_and_parens() {
    for html in [
        r#"<p><a href="/docs/my file.pdf">spec</a></p>"#,
        r#"<p><a href="https://en.wikipedia.org/wiki/Rust_(language)">wiki</a></p>"#,
        r#"<p><img src="shots/a (1).png" alt="shot"></p>"#,
    ] {
        let md = html_to_markdown(html);
        assert_eq!(markdown_to_html(&md), html, "via {md:?}");
    }
}

#[test]
fn test_empty_code_block() {
    let md = "```rust\n```";
    assert_eq!(html_to_markdown(&markdown_to_html(md)), md);
    assert_eq!(
        html_to_markdown(r#"<pre><code class="language-rust"></code></pre>"#),
        md
    );
}

#[test]
fn test_code_block_in_list_item() {
    let md = "1. Build:\n   ```sh\n   make\n   ```\n   then test\n2. Ship\n  - [ ] tag";
    assert_eq!(html_to_markdown(&markdown_to_html(md)), md);
}

fn word() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

fn words(max: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(word(), 1..=max).prop_map(|w| w.join(" "))
}

fn heading() -> impl Strategy<Value = String> {
    (1usize..=6, words(4)).prop_map(|(level, text)| format!("{} {text}", "#".repeat(level)))
}

fn paragraph() -> impl Strategy<Value = String> {
    prop::collection::vec(words(6), 1..=3).prop_map(|lines| lines.join("\n"))
}

fn list() -> impl Strategy<Value = String> {
    prop::collection::vec((0usize..4, words(3)), 1..=6).prop_map(|items| {
        let mut level = 0;
        let mut lines = Vec::new();
        for (index, (wanted, text)) in items.into_iter().enumerate() {
            level = if index == 0 { 0 } else { wanted.min(level + 1) };
            lines.push(format!("{}- {text}", "  ".repeat(level)));
        }
        lines.join("\n")
    })
}

fn table() -> impl Strategy<Value = String> {
    (1usize..=4)
        .prop_flat_map(|width| {
            (
                prop::collection::vec(word(), width),
                prop::collection::vec(
                    prop::collection::vec(prop_oneof![Just(String::new()), word()], width),
                    1..=3,
                ),
            )
        })
        .prop_map(|(header, rows)| {
            let mut lines = vec![format!("|{}|", header.join("|"))];
            lines.push(format!("|{}|", vec!["---"; header.len()].join("|")));
            lines.extend(rows.iter().map(|row| format!("|{}|", row.join("|"))));
            lines.join("\n")
        })
}

fn fence() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just(""), Just("rust"), Just("mermaid")],
        prop::collection::vec("[a-z<&'=-][a-z<&' =-]{0,12}", 1..=4),
    )
        .prop_map(|(language, body)| format!("```{language}\n{}\n```", body.join("\n")))
}

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![heading(), paragraph(), list(), table(), fence()],
        0..=6,
    )
    .prop_map(|blocks| blocks.join("\n\n"))
}

fn html_fragment() -> impl Strategy<Value = String> {
    let pieces = prop_oneof![
        Just("<p>"),
        Just("</p>"),
        Just("<ul>"),
        Just("</ul>"),
        Just("<ol>"),
        Just("<li>"),
        Just("</li>"),
        Just("<table>"),
        Just("<tr>"),
        Just("<td>"),
        Just("</td>"),
        Just("</tr>"),
        Just("</table>"),
        Just("<h2>"),
        Just("</h2>"),
        Just("<strong>"),
        Just("</strong>"),
        Just("<br>"),
        Just("<blockquote>"),
        Just("</blockquote>"),
        Just("<script>"),
        Just("</script>"),
        Just("<pre><code>a &lt; b</code></pre>"),
        Just(r#"<div data-type="mermaid" data-code="A%20--%3E%20B"></div>"#),
        Just("< "),
        Just(">"),
        Just("\""),
        Just("&amp;"),
        Just("&#"),
        Just("text"),
        Just(" "),
        Just("\n"),
    ];
    prop::collection::vec(pieces, 0..40).prop_map(|p| p.concat())
}

proptest! {
    #[test]
    fn canonical_markdown_round_trips(md in document()) {
        prop_assert_eq!(round_trip_markdown(&md), md);
    }

    #[test]
    fn html_output_round_trips_to_a_fixed_point(md in document()) {
        let html = markdown_to_html(&md);
        prop_assert_eq!(markdown_to_html(&html_to_markdown(&html)), html);
    }

    #[test]
    fn arbitrary_html_keeps_every_code_block(html in html_fragment()) {
        let md = html_to_markdown(&html);
        let code = html.matches("<pre>").count();
        let diagrams = html.matches("data-type=\"mermaid\"").count();
        prop_assert_eq!(md.matches("a < b").count(), code);
        prop_assert_eq!(md.matches("A --> B").count(), diagrams);
    }

    #[test]
    fn entity_decoding_never_grows(text in "[a-z&#;x0-9 ]{0,40}") {
        let once = decode_html_entities(&text);
        prop_assert!(once.len() <= text.len());
    }

    #[test]
    fn decoding_escaped_text_restores_it(text in "\\PC{0,40}") {
        let escaped = mermark_babel::escape_html(&text);
        prop_assert_eq!(decode_html_entities(&escaped), text);
    }
}
