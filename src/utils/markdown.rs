use regex::Regex;
use std::sync::OnceLock;

/// A pipe-delimited markdown table pulled out of a model reply.
///
/// Parsing is deliberately lenient: every line containing a pipe is treated
/// as a row, the first one as headers, the line right after the headers is
/// assumed to be the `---` separator and skipped, and rows are accepted
/// with whatever column count they carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl MarkdownTable {
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }
}

pub fn parse_table(text: &str) -> Option<MarkdownTable> {
    if !text.contains('|') || !text.lines().any(|line| line.contains("---")) {
        return None;
    }

    let mut pipe_lines = text.lines().filter(|line| line.contains('|'));
    let headers = split_row(pipe_lines.next()?);
    if headers.is_empty() {
        return None;
    }

    // The line after the headers is the separator; drop it unseen.
    let _separator = pipe_lines.next();
    let rows: Vec<Vec<String>> = pipe_lines.map(split_row).collect();

    Some(MarkdownTable { headers, rows })
}

fn split_row(line: &str) -> Vec<String> {
    let mut cells: Vec<String> = line.split('|').map(|cell| cell.trim().to_string()).collect();
    if cells.first().is_some_and(|cell| cell.is_empty()) {
        cells.remove(0);
    }
    if cells.last().is_some_and(|cell| cell.is_empty()) {
        cells.pop();
    }
    cells
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
}

impl ChartKind {
    fn from_token(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "line" => ChartKind::Line,
            "pie" => ChartKind::Pie,
            // Unknown types degrade to the bar shape.
            _ => ChartKind::Bar,
        }
    }
}

/// A `Chart: <type> of <X> vs <Y>` announcement line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartDirective {
    pub kind: ChartKind,
    pub title: String,
}

fn chart_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?im)^\s*chart:\s*(\w+)\s+of\s+(.+)$").expect("chart regex"))
}

pub fn find_chart_directive(text: &str) -> Option<ChartDirective> {
    let captures = chart_regex().captures(text)?;
    Some(ChartDirective {
        kind: ChartKind::from_token(&captures[1]),
        title: captures[2].trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_table() {
        let table = parse_table("| A | B |\n|---|---|\n| 1 | 2 |").expect("table");
        assert_eq!(table.headers, vec!["A", "B"]);
        assert_eq!(table.rows, vec![vec!["1", "2"]]);
    }

    #[test]
    fn table_inside_prose_is_found() {
        let text = "Here are the sales:\n\n| Region | Sales |\n|---|---|\n| North | 120 |\n| South | 90 |\n\nNote the gap.";
        let table = parse_table(text).expect("table");
        assert_eq!(table.headers, vec!["Region", "Sales"]);
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn ragged_rows_are_accepted() {
        let table = parse_table("| A | B |\n|---|---|\n| 1 | 2 | 3 |\n| only |").expect("table");
        assert_eq!(table.rows[0], vec!["1", "2", "3"]);
        assert_eq!(table.rows[1], vec!["only"]);
        assert_eq!(table.column_count(), 3);
    }

    #[test]
    fn pipe_without_separator_is_not_a_table() {
        assert!(parse_table("a | b | c").is_none());
        assert!(parse_table("no pipes here\n---").is_none());
    }

    #[test]
    fn chart_directive_is_case_insensitive() {
        let directive = find_chart_directive("Sure!\nchart: BAR of Region vs Sales\n").expect("directive");
        assert_eq!(directive.kind, ChartKind::Bar);
        assert_eq!(directive.title, "Region vs Sales");
    }

    #[test]
    fn chart_directive_maps_known_types() {
        let line = find_chart_directive("Chart: line of Month vs Revenue").expect("directive");
        assert_eq!(line.kind, ChartKind::Line);
        let pie = find_chart_directive("Chart: pie of Share vs Vendor").expect("directive");
        assert_eq!(pie.kind, ChartKind::Pie);
        let unknown = find_chart_directive("Chart: scatter of X vs Y").expect("directive");
        assert_eq!(unknown.kind, ChartKind::Bar);
    }

    #[test]
    fn plain_text_has_no_directive() {
        assert!(find_chart_directive("Let's chart a course of action").is_none());
    }
}
