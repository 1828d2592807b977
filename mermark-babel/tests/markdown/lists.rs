//! Flat Markdown list lines → nested editor lists.

use mermark_babel::markdown_to_html;

#[test]
fn test_nested_bullets() {
    assert_eq!(
        markdown_to_html("- Parent\n  - Child 1\n  - Child 2"),
        "<ul><li><p>Parent</p><ul><li><p>Child 1</p></li><li><p>Child 2</p></li></ul></li></ul>"
    );
}

#[test]
fn test_three_levels() {
    assert_eq!(
        markdown_to_html("- a\n  - b\n    - c\n- d"),
        "<ul><li><p>a</p><ul><li><p>b</p><ul><li><p>c</p></li></ul></li></ul></li><li><p>d</p></li></ul>"
    );
}

#[test]
fn test_tabs_count_as_one_level() {
    assert_eq!(
        markdown_to_html("- a\n\t- b"),
        markdown_to_html("- a\n  - b")
    );
}

#[test]
fn test_over_indented_child_is_clamped() {
    assert_eq!(
        markdown_to_html("- a\n      - b"),
        markdown_to_html("- a\n  - b")
    );
}

#[test]
fn test_ordered_inside_bullet() {
    assert_eq!(
        markdown_to_html("- steps\n  1. one\n  2. two"),
        "<ul><li><p>steps</p><ol><li><p>one</p></li><li><p>two</p></li></ol></li></ul>"
    );
}

#[test]
fn test_marker_change_starts_new_list() {
    assert_eq!(
        markdown_to_html("- a\n1. b"),
        "<ul><li><p>a</p></li></ul><ol><li><p>b</p></li></ol>"
    );
}

#[test]
fn test_task_items() {
    assert_eq!(
        markdown_to_html("- [X] done\n- [ ] todo"),
        concat!(
            r#"<ul data-type="taskList">"#,
            r#"<li data-type="taskItem" data-checked="true"><p>done</p></li>"#,
            r#"<li data-type="taskItem" data-checked="false"><p>todo</p></li>"#,
            "</ul>"
        )
    );
}

#[test]
fn test_inline_markup_in_items() {
    assert_eq!(
        markdown_to_html("- **bold** and `a<b>`"),
        "<ul><li><p><strong>bold</strong> and <code>a&lt;b&gt;</code></p></li></ul>"
    );
}

#[test]
fn test_fence_inside_item() {
    assert_eq!(
        markdown_to_html("- run:\n  ```\n  make\n  ```\n- done"),
        concat!(
            "<ul><li><p>run:</p>",
            r#"<pre><code class="language-plaintext">make</code></pre></li>"#,
            "<li><p>done</p></li></ul>"
        )
    );
}
