//! Markdown pipe tables → editor tables.

use mermark_babel::markdown_to_html;

#[test]
fn test_table_with_blank_cells() {
    assert_eq!(
        markdown_to_html("|Field|Col1|Col2|\n|---|---|---|\n|Name|||"),
        concat!(
            "<table><tbody>",
            "<tr><th><p>Field</p></th><th><p>Col1</p></th><th><p>Col2</p></th></tr>",
            "<tr><td><p>Name</p></td><td></td><td></td></tr>",
            "</tbody></table>"
        )
    );
}

#[test]
fn test_header_only_table_gets_body_row() {
    let html = markdown_to_html("| A | B |\n| --- | --- |");
    assert_eq!(
        html,
        concat!(
            "<table><tbody>",
            "<tr><th><p>A</p></th><th><p>B</p></th></tr>",
            "<tr><td></td><td></td></tr>",
            "</tbody></table>"
        )
    );
}

#[test]
fn test_short_rows_are_padded() {
    let html = markdown_to_html("|a|b|c|\n|-|-|-|\n|1|");
    assert!(html.contains("<tr><td><p>1</p></td><td></td><td></td></tr>"));
}

#[test]
fn test_alignment_row_is_not_a_body_row() {
    let html = markdown_to_html("|L|R|\n|:---|---:|\n|x|y|");
    assert_eq!(html.matches("<tr>").count(), 2);
}

#[test]
fn test_escaped_pipe_in_cell() {
    let html = markdown_to_html("|expr|\n|---|\n|a \\| b|");
    assert!(html.contains("<td><p>a | b</p></td>"));
}

#[test]
fn test_inline_markup_in_cells() {
    let html = markdown_to_html("|Name|\n|---|\n|**x**|");
    assert!(html.contains("<td><p><strong>x</strong></p></td>"));
}
