//! Table output for list-style commands.

use comfy_table::{Cell, ContentArrangement, Table};

use crate::iostreams::IOStreams;

/// Aligned columns on a terminal, tab-separated rows otherwise.
#[derive(Debug)]
pub struct TablePrinter {
    is_tty: bool,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TablePrinter {
    /// Create a printer matching the stdout mode of `ios`.
    pub fn new(ios: &IOStreams) -> Self {
        Self {
            is_tty: ios.is_stdout_tty(),
            headers: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Column headers, shown upper-cased in terminal mode only.
    #[must_use]
    pub fn with_headers(mut self, headers: &[&str]) -> Self {
        self.headers = headers.iter().map(|h| h.to_uppercase()).collect();
        self
    }

    /// Append a row.
    pub fn add_row(&mut self, fields: Vec<String>) {
        self.rows.push(fields);
    }

    /// Render all rows.
    pub fn render(&self) -> String {
        if !self.is_tty {
            return self
                .rows
                .iter()
                .map(|row| row.join("\t"))
                .collect::<Vec<_>>()
                .join("\n");
        }

        let mut table = Table::new();
        table
            .load_preset(comfy_table::presets::NOTHING)
            .set_content_arrangement(ContentArrangement::Dynamic);
        if !self.headers.is_empty() {
            table.set_header(self.headers.iter().map(Cell::new).collect::<Vec<_>>());
        }
        for row in &self.rows {
            table.add_row(row.iter().map(Cell::new).collect::<Vec<_>>());
        }
        table.to_string()
    }
}
