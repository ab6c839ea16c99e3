//! Column-aligned ASCII table rendering.

use std::io::Write;

use crate::core::error::Result;
use crate::output::Renderer;

/// Buffers the whole table so column widths can be computed before the
/// first byte is written.
pub struct TableRenderer<W: Write> {
    writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl<W: Write> TableRenderer<W> {
    /// Creates a table renderer writing to `writer`
    pub fn new(writer: W) -> Self {
        TableRenderer {
            writer,
            headers: Vec::new(),
            rows: Vec::new(),
        }
    }

    fn widths(&self) -> Vec<usize> {
        let columns = self
            .rows
            .first()
            .map(|r| r.len())
            .unwrap_or(self.headers.len());
        let mut widths = vec![0; columns.max(self.headers.len())];

        for (i, header) in self.headers.iter().enumerate() {
            widths[i] = widths[i].max(header.len());
        }
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.len());
            }
        }

        widths
    }

    fn write_border(&mut self, widths: &[usize]) -> Result<()> {
        for &width in widths {
            write!(self.writer, "+{}", "-".repeat(width + 2))?;
        }
        writeln!(self.writer, "+")?;
        Ok(())
    }

    fn write_cells(&mut self, cells: &[String], widths: &[usize]) -> Result<()> {
        for (cell, &width) in cells.iter().zip(widths) {
            // numbers read better right-aligned
            if cell.parse::<f64>().is_ok() {
                write!(self.writer, "| {:>width$} ", cell)?;
            } else {
                write!(self.writer, "| {:<width$} ", cell)?;
            }
        }
        writeln!(self.writer, "|")?;
        Ok(())
    }
}

impl<W: Write> Renderer for TableRenderer<W> {
    fn render_header(&mut self, headers: &[String]) -> Result<()> {
        self.headers = headers.to_vec();
        Ok(())
    }

    fn render_row(&mut self, row: &[String]) -> Result<()> {
        self.rows.push(row.to_vec());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let widths = self.widths();
        if widths.is_empty() {
            return Ok(());
        }

        self.write_border(&widths)?;
        if !self.headers.is_empty() {
            let headers = std::mem::take(&mut self.headers);
            self.write_cells(&headers, &widths)?;
            self.write_border(&widths)?;
            self.headers = headers;
        }
        let rows = std::mem::take(&mut self.rows);
        for row in &rows {
            self.write_cells(row, &widths)?;
        }
        self.rows = rows;
        self.write_border(&widths)?;
        self.writer.flush()?;

        Ok(())
    }
}
