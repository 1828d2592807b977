//! Markdown → HTML block and inline output.

use insta::assert_snapshot;
use mermark_babel::markdown_to_html;

#[test]
fn test_kitchensink() {
    let md = "# Release Notes

Intro with **bold**, *italic*, ~~gone~~ and `code`.
See [docs](https://example.com/a?b=1&c=2).

- [x] shipped
- [ ] pending

1. first
2. second

> quoted

---";

    let html = markdown_to_html(md)
        .replace("</h1>", "</h1>\n")
        .replace("</p>", "</p>\n")
        .replace("</ul>", "</ul>\n")
        .replace("</ol>", "</ol>\n")
        .replace("</blockquote>", "</blockquote>\n");

    assert_snapshot!(html, @r#"
<h1 id="release-notes">Release Notes</h1>
<p>Intro with <strong>bold</strong>, <em>italic</em>, <s>gone</s> and <code>code</code>.<br>See <a href="https://example.com/a?b=1&amp;c=2">docs</a>.</p>
<ul data-type="taskList"><li data-type="taskItem" data-checked="true"><p>shipped</p>
</li><li data-type="taskItem" data-checked="false"><p>pending</p>
</li></ul>
<ol><li><p>first</p>
</li><li><p>second</p>
</li></ol>
<blockquote><p>quoted</p>
</blockquote>
<hr>
"#);
}

#[test]
fn test_empty_input() {
    assert_eq!(markdown_to_html(""), "");
    assert_eq!(markdown_to_html("\n\n  \n"), "");
}

#[test]
fn test_single_line_is_one_paragraph() {
    assert_eq!(markdown_to_html("just some words"), "<p>just some words</p>");
}

#[test]
fn test_user_angle_brackets_are_escaped() {
    assert_eq!(
        markdown_to_html("use <div> & `Vec<T>`"),
        "<p>use &lt;div&gt; &amp; <code>Vec&lt;T&gt;</code></p>"
    );
}

#[test]
fn test_code_fence_keeps_language() {
    assert_eq!(
        markdown_to_html("```python\nprint('<hi>')\n```"),
        r#"<pre><code class="language-python">print('&lt;hi&gt;')</code></pre>"#
    );
}

#[test]
fn test_diagram_fence_is_encoded() {
    assert_eq!(
        markdown_to_html("```mermaid\ngraph TD\n  A --> B\n```"),
        r#"<div data-type="mermaid" data-code="graph%20TD%0A%20%20A%20--%3E%20B"></div>"#
    );
}

#[test]
fn test_fence_markup_is_not_inline_converted() {
    let html = markdown_to_html("```\n**not bold** [x](y)\n```");
    assert!(!html.contains("<strong>"));
    assert!(!html.contains("<a "));
    assert!(html.contains("**not bold** [x](y)"));
}

#[test]
fn test_crlf_input() {
    assert_eq!(
        markdown_to_html("# A\r\n\r\ntext\r\n"),
        r#"<h1 id="a">A</h1><p>text</p>"#
    );
}

#[test]
fn test_unterminated_fence_is_text() {
    let html = markdown_to_html("```rust\nfn main() {}");
    assert!(!html.contains("<pre>"));
    assert!(html.contains("fn main() {}"));
}
