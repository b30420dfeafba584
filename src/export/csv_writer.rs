use std::io::Write;

use csv::{QuoteStyle, WriterBuilder};
use log::debug;

use super::row::{ExportRow, HEADER};
use super::writer::LotWriter;
use crate::config::ExportConfig;
use crate::core::{LedgerError, Result};

/// Delimited-text writer over any `io::Write` sink.
///
/// Fields containing the delimiter, a quote or a line break are quoted and
/// embedded quotes doubled, so the output reads back in spreadsheet tools.
pub struct CsvLotWriter<W: Write> {
    writer: csv::Writer<W>,
    header_written: bool,
    rows_written: usize,
}

impl<W: Write> CsvLotWriter<W> {
    pub fn new(sink: W, config: &ExportConfig) -> Result<Self> {
        let writer = WriterBuilder::new()
            .delimiter(config.delimiter_byte()?)
            .quote_style(QuoteStyle::Necessary)
            .has_headers(false)
            .from_writer(sink);

        Ok(Self {
            writer,
            header_written: false,
            rows_written: 0,
        })
    }
}

impl<W: Write> LotWriter for CsvLotWriter<W> {
    type Output = W;

    fn write_header(&mut self) -> Result<()> {
        if !self.header_written {
            self.writer.write_record(HEADER)?;
            self.header_written = true;
        }
        Ok(())
    }

    fn write_row(&mut self, row: &ExportRow) -> Result<()> {
        self.write_header()?;
        self.writer.write_record(row.to_record())?;
        self.rows_written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn rows_written(&self) -> usize {
        self.rows_written
    }

    fn finish(mut self) -> Result<W> {
        self.write_header()?;
        self.writer.flush()?;
        debug!("CSV export finished with {} rows", self.rows_written);
        self.writer
            .into_inner()
            .map_err(|e| LedgerError::Io(e.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LotKind;
    use chrono::{TimeZone, Utc};

    fn dec(s: &str) -> bigdecimal::BigDecimal {
        s.parse().unwrap()
    }

    fn row(reference_id: &str) -> ExportRow {
        ExportRow {
            account: "acct".to_string(),
            asset_symbol: "ETH".to_string(),
            asset_identifier: "0xeth".to_string(),
            reference_id: reference_id.to_string(),
            kind: LotKind::Buy,
            quantity: dec("2"),
            unit_price: dec("1500.5"),
            remaining_quantity: dec("2"),
            realized_pnl: dec("0"),
            timestamp: Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap(),
            block_ordinal: 42,
        }
    }

    fn write_rows(rows: &[ExportRow], config: &ExportConfig) -> String {
        let mut writer = CsvLotWriter::new(Vec::new(), config).unwrap();
        writer.write_rows(rows).unwrap();
        String::from_utf8(writer.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_header_then_rows() {
        let output = write_rows(&[row("0x1"), row("0x2")], &ExportConfig::default());
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADER.join(","));
        assert_eq!(lines[1], "acct,ETH,0xeth,0x1,BUY,2,1500.5,2,0,2023-01-02T03:04:05.000000000Z,42");
    }

    #[test]
    fn test_empty_export_has_header_only() {
        let output = write_rows(&[], &ExportConfig::default());
        assert_eq!(output, format!("{}\n", HEADER.join(",")));
    }

    #[test]
    fn test_quotes_delimiter_and_quote_chars() {
        let output = write_rows(&[row("a,b \"c\"")], &ExportConfig::default());
        assert!(output.contains("\"a,b \"\"c\"\"\""));
    }

    #[test]
    fn test_custom_delimiter() {
        let config = ExportConfig {
            delimiter: ';',
            ..ExportConfig::default()
        };
        let output = write_rows(&[row("x;y")], &config);

        assert!(output.starts_with("account;asset_symbol;"));
        assert!(output.contains(";\"x;y\";"));
    }

    #[test]
    fn test_rows_written_counter() {
        let mut writer = CsvLotWriter::new(Vec::new(), &ExportConfig::default()).unwrap();
        writer.write_row(&row("1")).unwrap();
        writer.write_header().unwrap();
        writer.write_row(&row("2")).unwrap();

        assert_eq!(writer.rows_written(), 2);
        let output = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert_eq!(output.lines().filter(|line| line.starts_with("account")).count(), 1);
    }

    fn drain<T: LotWriter>(mut writer: T, rows: &[ExportRow]) -> T::Output {
        writer.write_rows(rows).unwrap();
        writer.finish().unwrap()
    }

    #[test]
    fn test_finish_through_trait_returns_sink() {
        let writer = CsvLotWriter::new(Vec::new(), &ExportConfig::default()).unwrap();
        let bytes: Vec<u8> = drain(writer, &[row("0x9")]);

        let output = String::from_utf8(bytes).unwrap();
        assert_eq!(output.lines().count(), 2);
        assert!(output.contains(",0x9,"));
    }
}
