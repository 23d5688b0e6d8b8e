//! Plain-text formatting helpers

use std::fmt::Write;

/// Break `@` so posted text cannot ping anyone
pub fn neutralise_mentions(text: &str) -> String {
    text.replace('@', "@\u{200B}")
}

/// Fixed-width table for code blocks.
///
/// Titles are centred, cells made only of digits are right-aligned and all
/// other cells left-aligned. Widths are counted in chars.
#[derive(Debug, Clone)]
pub struct Table {
    titles: Vec<String>,
    rows: Vec<Vec<String>>,
    widths: Vec<usize>,
}

impl Table {
    pub fn new<S: AsRef<str>>(titles: &[S]) -> Self {
        let titles: Vec<String> = titles.iter().map(|t| t.as_ref().to_string()).collect();
        let widths = titles.iter().map(|t| t.chars().count()).collect();
        Self {
            titles,
            rows: Vec::new(),
            widths,
        }
    }

    /// Add a row; cells beyond the title count are dropped
    pub fn add_row(&mut self, row: Vec<String>) {
        let mut row = row;
        row.truncate(self.titles.len());
        row.resize(self.titles.len(), String::new());

        for (width, cell) in self.widths.iter_mut().zip(&row) {
            *width = (*width).max(cell.chars().count());
        }
        self.rows.push(row);
    }

    pub fn render(&self) -> String {
        let mut out = self.draw(&self.titles, |cell, width| format!(" {cell:^width$} "));
        out.push('\n');
        let separator: Vec<String> = self.widths.iter().map(|w| "-".repeat(w + 2)).collect();
        out.push_str(&separator.join("+"));

        for row in &self.rows {
            let line = self.draw(row, |cell, width| {
                if !cell.is_empty() && cell.chars().all(|c| c.is_ascii_digit()) {
                    format!(" {cell:>width$} ")
                } else {
                    format!(" {cell:<width$} ")
                }
            });
            let _ = write!(out, "\n{line}");
        }

        out
    }

    fn draw(&self, cells: &[String], pad: impl Fn(&str, usize) -> String) -> String {
        cells
            .iter()
            .zip(&self.widths)
            .map(|(cell, width)| pad(cell, *width))
            .collect::<Vec<_>>()
            .join("|")
    }
}
