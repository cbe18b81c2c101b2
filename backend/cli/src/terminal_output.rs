//! Terminal output helpers: status notes and table rendering.

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM")
                .map(|t| t != "dumb")
                .unwrap_or(false))
}

/// Strip ANSI escape codes from a string.
pub fn strip_ansi(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}

pub fn note_success(msg: &str) {
    if supports_color() {
        println!("  {GREEN}{BOLD}✓{RESET} {msg}");
    } else {
        println!("  OK: {msg}");
    }
}

pub fn note_warn(msg: &str) {
    if supports_color() {
        println!("  {YELLOW}{BOLD}⚠{RESET} {msg}");
    } else {
        println!("  WARN: {msg}");
    }
}

pub fn note_error(msg: &str) {
    if supports_color() {
        println!("  {RED}{BOLD}✗{RESET} {msg}");
    } else {
        println!("  ERROR: {msg}");
    }
}

/// Render rows under left-aligned headers. Cells wider than `max_width`
/// characters are cut with an ellipsis.
pub fn render_table(headers: &[&str], rows: &[Vec<String>], max_width: usize) -> String {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| truncate(cell, max_width)).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(strip_ansi(cell).chars().count());
        }
    }

    let line = |cells: Vec<String>| format!("  {}\n", cells.join("  ").trim_end());
    let mut out = String::new();

    out.push_str(&line(
        headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| pad(h, *w))
            .collect(),
    ));
    out.push_str(&line(widths.iter().map(|w| "-".repeat(*w)).collect()));
    for row in &rows {
        out.push_str(&line(
            widths
                .iter()
                .enumerate()
                .map(|(i, w)| pad(row.get(i).map(String::as_str).unwrap_or(""), *w))
                .collect(),
        ));
    }
    out
}

fn truncate(cell: &str, max_width: usize) -> String {
    let cell = cell.replace('\n', " ");
    if cell.chars().count() <= max_width {
        return cell;
    }
    let mut cut: String = cell.chars().take(max_width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn pad(s: &str, width: usize) -> String {
    let visible = strip_ansi(s).chars().count();
    format!("{s}{}", " ".repeat(width.saturating_sub(visible)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_ansi() {
        let colored = format!("{GREEN}hello{RESET}");
        assert_eq!(strip_ansi(&colored), "hello");
    }

    #[test]
    fn renders_table_with_aligned_columns() {
        let rows = vec![
            vec!["text_reading".to_string(), "EXIT".to_string()],
            vec!["color_detection".to_string(), "Mostly blue".to_string()],
        ];
        let table = render_table(&["Type", "Result"], &rows, 40);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("  Type             Result"));
        assert!(lines[2].contains("text_reading     EXIT"));
    }

    #[test]
    fn long_cells_are_truncated() {
        let rows = vec![vec!["a".repeat(30)]];
        let table = render_table(&["Result"], &rows, 10);
        assert!(table.contains(&format!("{}…", "a".repeat(9))));
        assert!(!table.contains(&"a".repeat(10)));
    }
}
