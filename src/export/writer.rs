use std::borrow::Borrow;

use crate::core::Result;
use crate::export::row::ExportRow;

/// Trait for sinks that receive export rows one at a time
pub trait LotWriter {
    /// What `finish` hands back once the export is complete
    type Output;

    /// Write the header row; implementations write it at most once
    fn write_header(&mut self) -> Result<()>;

    /// Write a single row, emitting the header first if needed
    fn write_row(&mut self, row: &ExportRow) -> Result<()>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<()>;

    /// Number of data rows written so far
    fn rows_written(&self) -> usize;

    /// Write the header if no row was written, flush, and release the sink
    fn finish(self) -> Result<Self::Output>
    where
        Self: Sized;

    /// Write every row from an iterator, returning how many were written
    fn write_rows<I>(&mut self, rows: I) -> Result<usize>
    where
        I: IntoIterator,
        I::Item: Borrow<ExportRow>,
        Self: Sized,
    {
        let mut count = 0;
        for row in rows {
            self.write_row(row.borrow())?;
            count += 1;
        }
        Ok(count)
    }
}
