//! Terminal rendering helpers

use chrono::{DateTime, Local, Utc};
use quickstart_domain::constants::MISSING_TIMESTAMP;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const COLUMN_GAP: &str = "  ";

/// `3723` -> `1h 02m 03s`.
pub fn format_duration(total_seconds: i64) -> String {
    let total = total_seconds.max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours}h {minutes:02}m {seconds:02}s")
}

/// UTC instant rendered in the local time zone.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string()
}

pub fn format_optional_timestamp(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(|| MISSING_TIMESTAMP.to_string(), format_timestamp)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Fixed-width text table sized to its widest cell per column.
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<(String, Align)>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: &[(&str, Align)]) -> Self {
        Self {
            columns: columns.iter().map(|(title, align)| ((*title).to_string(), *align)).collect(),
            rows: Vec::new(),
        }
    }

    /// Missing trailing cells render empty; extra cells are dropped.
    pub fn push_row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header, dashed separator, then one line per row. No trailing
    /// whitespace on any line.
    pub fn render(&self) -> String {
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(index, (title, _))| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(index))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(title.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header: Vec<&str> = self.columns.iter().map(|(title, _)| title.as_str()).collect();
        let separator: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(self.line(&widths, header.iter().copied()));
        lines.push(self.line(&widths, separator.iter().map(String::as_str)));
        for row in &self.rows {
            let cells =
                (0..self.columns.len()).map(|index| row.get(index).map_or("", String::as_str));
            lines.push(self.line(&widths, cells));
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    fn line<'a>(&self, widths: &[usize], cells: impl Iterator<Item = &'a str>) -> String {
        let padded: Vec<String> = cells
            .zip(widths)
            .zip(&self.columns)
            .map(|((cell, &width), (_, align))| match align {
                Align::Left => format!("{cell:<width$}"),
                Align::Right => format!("{cell:>width$}"),
            })
            .collect();
        padded.join(COLUMN_GAP).trim_end().to_string()
    }
}
