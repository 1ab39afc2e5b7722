//! Terminal rendering: ANSI color helpers for status lines plus a
//! `prettytable-rs` grid for `SELECT` results.

use prettytable::{Cell, Row, Table as PrettyTable, format};

use crate::record::Record;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const BRIGHT_RED: &str = "\x1b[91m";
const BRIGHT_GREEN: &str = "\x1b[92m";
const BRIGHT_YELLOW: &str = "\x1b[93m";
const BRIGHT_CYAN: &str = "\x1b[96m";
const BRIGHT_MAGENTA: &str = "\x1b[95m";

fn success(text: &str) -> String {
    format!("{BRIGHT_GREEN}{text}{RESET}")
}

fn error(text: &str) -> String {
    format!("{BRIGHT_RED}{text}{RESET}")
}

fn dim(text: &str) -> String {
    format!("\x1b[2m{text}{RESET}")
}

fn header(text: &str) -> String {
    format!("{BOLD}{BRIGHT_YELLOW}{text}{RESET}")
}

/// Bold yellow, used for command names in the welcome banner.
pub fn highlight(text: &str) -> String {
    format!("{BOLD}{BRIGHT_YELLOW}{text}{RESET}")
}

/// Cyan, used for the `sql>` prompt prefix.
pub fn prompt(text: &str) -> String {
    format!("{BRIGHT_CYAN}{text}{RESET}")
}

/// Magenta, used for banner titles.
pub fn title(text: &str) -> String {
    format!("{BOLD}{BRIGHT_MAGENTA}{text}{RESET}")
}

/// A one-line warning status, e.g. for a cancelled statement.
pub fn warning_line(message: &str) -> String {
    format!("{BRIGHT_YELLOW}{message}{RESET}")
}

/// Dimmed text, used for secondary/continuation prompts.
pub fn dim_text(text: &str) -> String {
    dim(text)
}

/// A one-line `✓ ...` status for a successful mutation.
pub fn success_line(message: &str) -> String {
    success(&format!("\u{2713} {message}"))
}

/// A one-line `✗ ...` status for a failed statement.
pub fn error_line(message: &str) -> String {
    error(&format!("\u{2717} {message}"))
}

/// A bordered grid for a `SELECT` result, with a colored header row and
/// a dimmed single-row placeholder when there are no matching rows.
pub fn render_rows(columns: &[String], rows: &[Record]) -> String {
    if rows.is_empty() {
        return dim("(no rows)");
    }

    let mut table = PrettyTable::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(Row::new(
        columns.iter().map(|c| Cell::new(&header(c))).collect(),
    ));
    for row in rows {
        table.add_row(Row::new(
            row.values().iter().map(|v| Cell::new(v)).collect(),
        ));
    }
    table.to_string()
}

/// Rendering for `GROUP BY`: one `(value, count)` row per distinct value.
pub fn render_group_by(column: &str, groups: &[(String, usize)]) -> String {
    if groups.is_empty() {
        return dim("(no rows)");
    }

    let mut table = PrettyTable::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(Row::new(vec![
        Cell::new(&header(column)),
        Cell::new(&header("count")),
    ]));
    for (value, count) in groups {
        table.add_row(Row::new(vec![Cell::new(value), Cell::new(&count.to_string())]));
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_renders_dimmed_placeholder() {
        let out = render_rows(&["id".to_string()], &[]);
        assert!(out.contains("(no rows)"));
    }

    #[test]
    fn status_lines_carry_the_expected_glyphs() {
        assert!(success_line("ok").contains('\u{2713}'));
        assert!(error_line("bad").contains('\u{2717}'));
    }

    #[test]
    fn non_empty_rows_render_every_value() {
        let rows = vec![Record::new(vec!["1".into(), "alice".into()])];
        let out = render_rows(&["id".to_string(), "name".to_string()], &rows);
        assert!(out.contains("alice"));
    }
}
