//! Minimal SVG rendering for interview artifacts. Tables become a grid,
//! charts one of three fixed shapes. No external renderer is involved;
//! the output is plain markup served as a static file.

use std::fmt::Write;

use crate::utils::markdown::{ChartKind, MarkdownTable};

/// Fixed demonstration series used for every chart. Extracting real series
/// data from the model's narrative is unsupported; only the title reflects
/// the reply.
pub const PLACEHOLDER_SERIES: [(&str, f64); 3] =
    [("Sample 1", 40.0), ("Sample 2", 25.0), ("Sample 3", 35.0)];

const PALETTE: [&str; 3] = ["#4e79a7", "#f28e2b", "#59a14f"];

const ROW_HEIGHT: u32 = 30;
const CHAR_WIDTH: u32 = 9;
const CELL_PADDING: u32 = 9;

pub fn table_svg(table: &MarkdownTable) -> String {
    let cols = table.column_count().max(1);
    let mut widths = vec![3usize; cols];
    for (i, header) in table.headers.iter().enumerate() {
        widths[i] = widths[i].max(header.chars().count());
    }
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }
    let col_px: Vec<u32> = widths
        .iter()
        .map(|w| (*w as u32) * CHAR_WIDTH + 2 * CELL_PADDING)
        .collect();

    let width: u32 = col_px.iter().sum();
    let row_count = table.rows.len() as u32 + 1;
    let height = row_count * ROW_HEIGHT;

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="monospace" font-size="14">"#,
        w = width,
        h = height
    );
    let _ = write!(
        svg,
        r##"<rect x="0" y="0" width="{width}" height="{height}" fill="#ffffff" stroke="#333333"/>"##
    );
    let _ = write!(
        svg,
        r##"<rect x="0" y="0" width="{width}" height="{ROW_HEIGHT}" fill="#e8e8e8"/>"##
    );

    for r in 1..row_count {
        let y = r * ROW_HEIGHT;
        let _ = write!(
            svg,
            r##"<line x1="0" y1="{y}" x2="{width}" y2="{y}" stroke="#cccccc"/>"##
        );
    }
    let mut x = 0;
    for col in col_px.iter().take(cols - 1) {
        x += col;
        let _ = write!(
            svg,
            r##"<line x1="{x}" y1="0" x2="{x}" y2="{height}" stroke="#cccccc"/>"##
        );
    }

    write_row(&mut svg, &table.headers, &col_px, 0, true);
    for (r, row) in table.rows.iter().enumerate() {
        write_row(&mut svg, row, &col_px, (r as u32 + 1) * ROW_HEIGHT, false);
    }

    svg.push_str("</svg>");
    svg
}

fn write_row(svg: &mut String, cells: &[String], col_px: &[u32], y: u32, bold: bool) {
    let weight = if bold { " font-weight=\"bold\"" } else { "" };
    let mut x = 0;
    for (cell, col) in cells.iter().zip(col_px) {
        let _ = write!(
            svg,
            r#"<text x="{tx}" y="{ty}"{weight}>{text}</text>"#,
            tx = x + CELL_PADDING,
            ty = y + 20,
            text = escape(cell)
        );
        x += col;
    }
}

pub fn chart_svg(kind: ChartKind, title: &str) -> String {
    match kind {
        ChartKind::Bar => bar_chart(title),
        ChartKind::Line => line_chart(title),
        ChartKind::Pie => pie_chart(title),
    }
}

const CHART_W: f64 = 480.0;
const CHART_H: f64 = 320.0;
const PLOT_LEFT: f64 = 50.0;
const PLOT_TOP: f64 = 60.0;
const PLOT_W: f64 = 400.0;
const PLOT_H: f64 = 210.0;

fn chart_frame(title: &str) -> String {
    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="13">"#,
        w = CHART_W,
        h = CHART_H
    );
    let _ = write!(
        svg,
        r##"<rect x="0" y="0" width="{CHART_W}" height="{CHART_H}" fill="#ffffff"/>"##
    );
    let _ = write!(
        svg,
        r#"<text x="{x}" y="30" text-anchor="middle" font-size="16">{title}</text>"#,
        x = CHART_W / 2.0,
        title = escape(title)
    );
    svg
}

fn axes(svg: &mut String) {
    let bottom = PLOT_TOP + PLOT_H;
    let right = PLOT_LEFT + PLOT_W;
    let _ = write!(
        svg,
        r##"<line x1="{PLOT_LEFT}" y1="{PLOT_TOP}" x2="{PLOT_LEFT}" y2="{bottom}" stroke="#333333"/>"##
    );
    let _ = write!(
        svg,
        r##"<line x1="{PLOT_LEFT}" y1="{bottom}" x2="{right}" y2="{bottom}" stroke="#333333"/>"##
    );
}

fn max_value() -> f64 {
    PLACEHOLDER_SERIES
        .iter()
        .map(|(_, v)| *v)
        .fold(f64::MIN, f64::max)
}

fn bar_chart(title: &str) -> String {
    let mut svg = chart_frame(title);
    axes(&mut svg);
    let max = max_value();
    let slot = PLOT_W / PLACEHOLDER_SERIES.len() as f64;
    let bar_w = slot * 0.6;
    let bottom = PLOT_TOP + PLOT_H;

    for (i, (label, value)) in PLACEHOLDER_SERIES.iter().enumerate() {
        let bar_h = value / max * (PLOT_H - 20.0);
        let x = PLOT_LEFT + i as f64 * slot + (slot - bar_w) / 2.0;
        let y = bottom - bar_h;
        let _ = write!(
            svg,
            r#"<rect x="{x:.1}" y="{y:.1}" width="{bar_w:.1}" height="{bar_h:.1}" fill="{fill}"/>"#,
            fill = PALETTE[i % PALETTE.len()]
        );
        let _ = write!(
            svg,
            r#"<text x="{tx:.1}" y="{ty:.1}" text-anchor="middle">{label}</text>"#,
            tx = x + bar_w / 2.0,
            ty = bottom + 18.0,
            label = escape(label)
        );
        let _ = write!(
            svg,
            r#"<text x="{tx:.1}" y="{ty:.1}" text-anchor="middle">{value}</text>"#,
            tx = x + bar_w / 2.0,
            ty = y - 6.0,
        );
    }
    svg.push_str("</svg>");
    svg
}

fn line_chart(title: &str) -> String {
    let mut svg = chart_frame(title);
    axes(&mut svg);
    let max = max_value();
    let slot = PLOT_W / PLACEHOLDER_SERIES.len() as f64;
    let bottom = PLOT_TOP + PLOT_H;

    let points: Vec<(f64, f64)> = PLACEHOLDER_SERIES
        .iter()
        .enumerate()
        .map(|(i, (_, value))| {
            let x = PLOT_LEFT + i as f64 * slot + slot / 2.0;
            let y = bottom - value / max * (PLOT_H - 20.0);
            (x, y)
        })
        .collect();

    let path: Vec<String> = points.iter().map(|(x, y)| format!("{x:.1},{y:.1}")).collect();
    let _ = write!(
        svg,
        r#"<polyline points="{points}" fill="none" stroke="{stroke}" stroke-width="2"/>"#,
        points = path.join(" "),
        stroke = PALETTE[0]
    );
    for ((x, y), (label, _)) in points.iter().zip(PLACEHOLDER_SERIES.iter()) {
        let _ = write!(
            svg,
            r#"<circle cx="{x:.1}" cy="{y:.1}" r="4" fill="{fill}"/>"#,
            fill = PALETTE[0]
        );
        let _ = write!(
            svg,
            r#"<text x="{x:.1}" y="{ty:.1}" text-anchor="middle">{label}</text>"#,
            ty = bottom + 18.0,
            label = escape(label)
        );
    }
    svg.push_str("</svg>");
    svg
}

fn pie_chart(title: &str) -> String {
    let mut svg = chart_frame(title);
    let total: f64 = PLACEHOLDER_SERIES.iter().map(|(_, v)| v).sum();
    let (cx, cy, r) = (200.0_f64, 180.0_f64, 100.0_f64);
    let mut angle = -std::f64::consts::FRAC_PI_2;

    for (i, (label, value)) in PLACEHOLDER_SERIES.iter().enumerate() {
        let sweep = value / total * std::f64::consts::TAU;
        let (x1, y1) = (cx + r * angle.cos(), cy + r * angle.sin());
        let end = angle + sweep;
        let (x2, y2) = (cx + r * end.cos(), cy + r * end.sin());
        let large_arc = i32::from(sweep > std::f64::consts::PI);
        let _ = write!(
            svg,
            r##"<path d="M {cx:.1} {cy:.1} L {x1:.1} {y1:.1} A {r:.1} {r:.1} 0 {large_arc} 1 {x2:.1} {y2:.1} Z" fill="{fill}" stroke="#ffffff"/>"##,
            fill = PALETTE[i % PALETTE.len()]
        );
        let ly = 120.0 + i as f64 * 24.0;
        let _ = write!(
            svg,
            r#"<rect x="340" y="{ry:.1}" width="14" height="14" fill="{fill}"/>"#,
            ry = ly - 12.0,
            fill = PALETTE[i % PALETTE.len()]
        );
        let _ = write!(
            svg,
            r#"<text x="360" y="{ly:.1}">{label} ({value})</text>"#,
            label = escape(label)
        );
        angle = end;
    }
    svg.push_str("</svg>");
    svg
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
