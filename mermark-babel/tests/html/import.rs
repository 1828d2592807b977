//! Editor HTML → Markdown block and inline output.

use insta::assert_snapshot;
use mermark_babel::html_to_markdown;

#[test]
fn test_kitchensink() {
    let html = concat!(
        r#"<h1 id="stale-id">Release <em>Notes</em></h1>"#,
        "<p>Intro with <b>bold</b>, <i>italic</i>, <del>gone</del> and <code>Vec&lt;u8&gt;</code>.<br>",
        r#"See <a href="https://example.com/a?b=1&amp;c=2">docs</a> and <img src="x.png" alt="pic">.</p>"#,
        r#"<pre><code class="language-rust">fn f() -&gt; Option&lt;u8&gt; { None }</code></pre>"#,
        r#"<div data-type="mermaid" data-code="graph%20TD%0AA--%3EB"></div>"#,
        "<blockquote><p>quoted</p><p>twice</p></blockquote>",
        "<hr>"
    );

    assert_snapshot!(html_to_markdown(html), @r"
# Release *Notes*

Intro with **bold**, *italic*, ~~gone~~ and `Vec<u8>`.
See [docs](https://example.com/a?b=1&c=2) and ![pic](x.png).

```rust
fn f() -> Option<u8> { None }
```

```mermaid
graph TD
A-->B
```

> quoted
>
> twice

---
");
}

#[test]
fn test_empty_input() {
    assert_eq!(html_to_markdown(""), "");
    assert_eq!(html_to_markdown("<p></p><h2> </h2>"), "");
}

#[test]
fn test_loose_text_is_a_paragraph() {
    assert_eq!(html_to_markdown("plain words"), "plain words");
}

#[test]
fn test_entities_are_decoded() {
    assert_eq!(
        html_to_markdown("<p>a &amp; b &rarr; c &#169; &unknown;</p>"),
        "a & b \u{2192} c \u{00A9} &unknown;"
    );
}

#[test]
fn test_wrappers_and_scripts() {
    let html = concat!(
        "<html><head><title>t</title></head><body>",
        "<section><h2>Part</h2><div><p>body</p></div></section>",
        "<script>alert('x')</script>",
        "</body></html>"
    );
    assert_eq!(html_to_markdown(html), "## Part\n\nbody");
}

#[test]
fn test_untagged_code_block() {
    assert_eq!(
        html_to_markdown(r#"<pre><code class="language-plaintext">a &lt; b</code></pre>"#),
        "```\na < b\n```"
    );
    assert_eq!(
        html_to_markdown("<pre><code>x</code></pre>"),
        "```\nx\n```"
    );
}

#[test]
fn test_code_block_markup_is_not_converted() {
    assert_eq!(
        html_to_markdown("<pre><code>&lt;strong&gt;keep&lt;/strong&gt; **raw**</code></pre>"),
        "```\n<strong>keep</strong> **raw**\n```"
    );
}

#[test]
fn test_unterminated_element_keeps_text() {
    let md = html_to_markdown("<p>first</p><p>second");
    assert!(md.starts_with("first"));
    assert!(md.contains("second"));
}

#[test]
fn test_link_without_href_keeps_label() {
    assert_eq!(html_to_markdown("<p><a>label</a></p>"), "label");
}

#[test]
fn test_code_block_in_dropped_markup_is_kept() {
    assert_eq!(
        html_to_markdown("<ul><pre><code>x</code></pre><li>a</li></ul>"),
        "- a\n\n```\nx\n```"
    );
}
