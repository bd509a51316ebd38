use super::*;

fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
    data.iter()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect()
}

#[test]
fn widths_cover_headers_and_cells() {
    let widths = column_widths(
        &["Type", "Content"],
        &rows(&[&["command", "hi"], &["text", "a longer message"]]),
        200,
    );
    assert_eq!(widths, vec![7, 16]);
}

#[test]
fn widths_shrink_widest_column_to_fit() {
    let widths = column_widths(&["A", "B"], &rows(&[&["x", &"y".repeat(50)]]), 20);
    assert_eq!(widths[0], 1);
    assert_eq!(widths.iter().sum::<usize>() + SEPARATOR.len(), 20);
}

#[test]
fn table_lines_are_aligned() {
    let lines = format_table(
        &["Type", "Sender"],
        &rows(&[&["text", "Bot (agent)"], &["command", "human"]]),
        200,
    );
    assert_eq!(
        lines,
        vec![
            "Type    | Sender".to_string(),
            "--------+------------".to_string(),
            "text    | Bot (agent)".to_string(),
            "command | human".to_string(),
        ]
    );
}

#[test]
fn long_cells_are_truncated() {
    let line = format_row(&["abcdefghij"], &[6]);
    assert_eq!(line, "abc...");
}

#[test]
fn empty_table_has_no_lines() {
    assert!(format_table(&[], &[], 80).is_empty());
}

#[test]
fn properties_pad_keys() {
    let pairs = format_properties(&[("Email", "a@b.c"), ("Organization", "Acme")]);
    assert_eq!(pairs[0], ("Email       ".to_string(), "a@b.c".to_string()));
    assert_eq!(pairs[1].0, "Organization");
}
