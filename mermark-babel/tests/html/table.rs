//! Editor tables → Markdown pipe tables.

use mermark_babel::html_to_markdown;

#[test]
fn test_blank_cells_are_adjacent_pipes() {
    let html = concat!(
        "<table><tbody>",
        "<tr><th><p>Field</p></th><th><p>Col1</p></th><th><p>Col2</p></th></tr>",
        "<tr><td><p>Name</p></td><td><p></p></td><td></td></tr>",
        "</tbody></table>"
    );
    assert_eq!(
        html_to_markdown(html),
        "|Field|Col1|Col2|\n|---|---|---|\n|Name|||"
    );
}

#[test]
fn test_thead_and_tbody() {
    let html = concat!(
        "<table><thead><tr><th>A</th><th>B</th></tr></thead>",
        "<tbody><tr><td>1</td><td>2</td></tr></tbody></table>"
    );
    assert_eq!(html_to_markdown(html), "|A|B|\n|---|---|\n|1|2|");
}

#[test]
fn test_ragged_rows_are_padded() {
    let html = "<table><tr><td>a</td><td>b</td><td>c</td></tr><tr><td>1</td></tr></table>";
    assert_eq!(html_to_markdown(html), "|a|b|c|\n|---|---|---|\n|1|||");
}

#[test]
fn test_pipes_in_cells_are_escaped() {
    let html = "<table><tr><th>expr</th></tr><tr><td>a | b</td></tr></table>";
    assert_eq!(html_to_markdown(html), "|expr|\n|---|\n|a \\| b|");
}

#[test]
fn test_cell_breaks_become_spaces() {
    let html = "<table><tr><th>h</th></tr><tr><td><p>one</p><p>two</p><br>three</td></tr></table>";
    assert_eq!(html_to_markdown(html), "|h|\n|---|\n|one two three|");
}

#[test]
fn test_table_without_rows_keeps_text() {
    assert_eq!(html_to_markdown("<table>orphan</table>"), "orphan");
}

#[test]
fn test_code_block_in_cell_moves_below_table() {
    let html = concat!(
        "<table><tr><th>Step</th><th>Command</th></tr>",
        r#"<tr><td>build</td><td><pre><code class="language-sh">make</code></pre></td></tr>"#,
        "</table>"
    );
    assert_eq!(
        html_to_markdown(html),
        "|Step|Command|\n|---|---|\n|build||\n\n```sh\nmake\n```"
    );
}
