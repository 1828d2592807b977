//! Nested editor lists → flat Markdown list lines.

use mermark_babel::html_to_markdown;

#[test]
fn test_nested_bullets() {
    assert_eq!(
        html_to_markdown(
            "<ul><li><p>Parent</p><ul><li><p>Child 1</p></li><li><p>Child 2</p></li></ul></li></ul>"
        ),
        "- Parent\n  - Child 1\n  - Child 2"
    );
}

#[test]
fn test_items_without_paragraphs() {
    assert_eq!(
        html_to_markdown("<ul><li>a<ul><li>b<ul><li>c</li></ul></li></ul></li><li>d</li></ul>"),
        "- a\n  - b\n    - c\n- d"
    );
}

#[test]
fn test_ordered_lists_are_renumbered() {
    assert_eq!(
        html_to_markdown(r#"<ol start="5"><li>five</li><li>six</li></ol>"#),
        "1. five\n2. six"
    );
}

#[test]
fn test_nested_ordered_numbering_restarts() {
    assert_eq!(
        html_to_markdown("<ol><li>a<ol><li>x</li><li>y</li></ol></li><li>b</li></ol>"),
        "1. a\n  1. x\n  2. y\n2. b"
    );
}

#[test]
fn test_task_list() {
    let html = concat!(
        r#"<ul data-type="taskList">"#,
        r#"<li data-type="taskItem" data-checked="true"><label><input type="checkbox" checked></label><div><p>done</p></div></li>"#,
        r#"<li data-type="taskItem" data-checked="false"><p>todo</p></li>"#,
        "</ul>"
    );
    assert_eq!(html_to_markdown(html), "- [x] done\n- [ ] todo");
}

#[test]
fn test_checkbox_without_data_checked() {
    let html = r#"<ul><li data-type="taskItem"><input type="checkbox" checked> ship it</li></ul>"#;
    assert_eq!(html_to_markdown(html), "- [x] ship it");
}

#[test]
fn test_blank_items_are_dropped_and_children_promoted() {
    assert_eq!(
        html_to_markdown("<ul><li><p></p><ul><li>child</li></ul></li><li>next</li></ul>"),
        "- child\n- next"
    );
}

#[test]
fn test_multi_paragraph_item_is_one_line() {
    assert_eq!(
        html_to_markdown("<ul><li><p>one</p><p>two</p></li></ul>"),
        "- one two"
    );
}

#[test]
fn test_inline_markup_in_items() {
    assert_eq!(
        html_to_markdown("<ul><li><p><strong>b</strong> <code>x&lt;y&gt;</code></p></li></ul>"),
        "- **b** `x<y>`"
    );
}

#[test]
fn test_text_after_nested_list_is_kept() {
    assert_eq!(
        html_to_markdown("<ul><li>a<ul><li>b</li></ul>tail</li></ul>"),
        "- a tail\n  - b"
    );
}

#[test]
fn test_code_block_inside_item() {
    let html = concat!(
        "<ul><li><p>Install:</p>",
        r#"<pre><code class="language-sh">cargo install mermark</code></pre>"#,
        "<ul><li>then run it</li></ul></li><li>done</li></ul>"
    );
    assert_eq!(
        html_to_markdown(html),
        "- Install:\n  ```sh\n  cargo install mermark\n  ```\n  - then run it\n- done"
    );
}

#[test]
fn test_item_text_that_looks_like_a_task_marker() {
    assert_eq!(html_to_markdown("<ul><li>[ ] literal</li></ul>"), r"- \[ \] literal");
}
