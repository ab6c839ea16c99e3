//! Streaming tab-separated output.

use std::io::Write;

use crate::core::error::Result;
use crate::output::Renderer;

/// Writes each row as soon as it arrives, tab-joined.
pub struct TsvRenderer<W: Write> {
    writer: W,
}

impl<W: Write> TsvRenderer<W> {
    /// Creates a TSV renderer writing to `writer`
    pub fn new(writer: W) -> Self {
        TsvRenderer { writer }
    }

    fn write_line(&mut self, cells: &[String]) -> Result<()> {
        writeln!(self.writer, "{}", cells.join("\t"))?;
        Ok(())
    }
}

impl<W: Write> Renderer for TsvRenderer<W> {
    fn render_header(&mut self, headers: &[String]) -> Result<()> {
        self.write_line(headers)
    }

    fn render_row(&mut self, row: &[String]) -> Result<()> {
        self.write_line(row)
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_tab_joined() {
        let mut buf = Vec::new();
        let mut tsv = TsvRenderer::new(&mut buf);
        tsv.render_header(&["a".to_string(), "b".to_string()]).unwrap();
        tsv.render_row(&["1".to_string(), "2".to_string()]).unwrap();
        tsv.finish().unwrap();

        assert_eq!(String::from_utf8(buf).unwrap(), "a\tb\n1\t2\n");
    }
}
