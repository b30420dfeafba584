pub mod row;
pub mod writer;
pub mod csv_writer;
pub mod artifact;

use std::io::Write;

use log::info;
use uuid::Uuid;

use crate::config::ExportConfig;
use crate::core::Result;

pub use row::{ExportRow, HEADER, TIMESTAMP_FORMAT};
pub use writer::LotWriter;
pub use csv_writer::CsvLotWriter;
pub use artifact::ExportArtifact;

/// Stream rows into an open sink as they are produced.
///
/// Rows are written in the order given. Returns the sink once flushed.
pub fn export_to_writer<W, I>(rows: I, sink: W, config: &ExportConfig) -> Result<(W, usize)>
where
    W: Write,
    I: IntoIterator<Item = ExportRow>,
{
    let mut writer = CsvLotWriter::new(sink, config)?;
    let count = writer.write_rows(rows)?;
    let sink = writer.finish()?;
    Ok((sink, count))
}

/// Write rows to a new, uniquely named temporary file.
///
/// The file goes to `config.directory` or the system temp dir. It is deleted
/// when the returned artifact is dropped unless the caller keeps it.
pub fn export_to_artifact<I>(rows: I, config: &ExportConfig) -> Result<ExportArtifact>
where
    I: IntoIterator<Item = ExportRow>,
{
    let id = Uuid::new_v4();
    let prefix = format!("{}-{}-", config.file_prefix, id);

    let mut builder = tempfile::Builder::new();
    builder.prefix(&prefix).suffix(".csv");
    let file = match &config.directory {
        Some(directory) => builder.tempfile_in(directory)?,
        None => builder.tempfile()?,
    };

    let mut writer = CsvLotWriter::new(file.as_file(), config)?;
    let count = writer.write_rows(rows)?;
    writer.finish()?;

    info!("Export artifact {} written: {} rows at {}", id, count, file.path().display());
    Ok(ExportArtifact::new(id, file, count))
}
