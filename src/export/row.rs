use chrono::{DateTime, NaiveDateTime, Utc};
use csv::StringRecord;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::core::{AssetRef, LedgerError, Lot, LotKind, Result};
use crate::utils::decimal::{format_decimal, parse_decimal};

/// Fixed column order of every export
pub const HEADER: [&str; 11] = [
    "account",
    "asset_symbol",
    "asset_identifier",
    "reference_id",
    "kind",
    "quantity",
    "unit_price",
    "remaining_quantity",
    "realized_pnl",
    "timestamp",
    "block_ordinal",
];

/// UTC, nanosecond precision, e.g. `2024-03-01T12:00:00.250000000Z`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.9fZ";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub account: String,
    pub asset_symbol: String,
    pub asset_identifier: String,
    pub reference_id: String,
    pub kind: LotKind,
    pub quantity: BigDecimal,
    pub unit_price: BigDecimal,
    pub remaining_quantity: BigDecimal,
    pub realized_pnl: BigDecimal,
    pub timestamp: DateTime<Utc>,
    pub block_ordinal: u64,
}

impl ExportRow {
    pub fn from_lot(asset: &AssetRef, lot: &Lot, realized_pnl: BigDecimal) -> Self {
        Self {
            account: asset.account.clone(),
            asset_symbol: asset.symbol.clone(),
            asset_identifier: asset.identifier.clone(),
            reference_id: lot.reference_id.clone(),
            kind: lot.kind,
            quantity: lot.quantity.clone(),
            unit_price: lot.unit_price.clone(),
            remaining_quantity: lot.remaining_quantity().clone(),
            realized_pnl,
            timestamp: lot.timestamp,
            block_ordinal: lot.block_ordinal,
        }
    }

    /// Render the row as text fields in `HEADER` order
    pub fn to_record(&self) -> [String; 11] {
        [
            self.account.clone(),
            self.asset_symbol.clone(),
            self.asset_identifier.clone(),
            self.reference_id.clone(),
            self.kind.to_string(),
            format_decimal(&self.quantity),
            format_decimal(&self.unit_price),
            format_decimal(&self.remaining_quantity),
            format_decimal(&self.realized_pnl),
            self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            self.block_ordinal.to_string(),
        ]
    }

    /// Parse a record produced by `to_record`
    pub fn from_record(record: &StringRecord) -> Result<Self> {
        if record.len() != HEADER.len() {
            return Err(LedgerError::InvalidRow(format!(
                "expected {} fields, got {}",
                HEADER.len(),
                record.len()
            )));
        }
        let field = |i: usize| record.get(i).unwrap_or_default();

        let timestamp = NaiveDateTime::parse_from_str(field(9), TIMESTAMP_FORMAT)
            .map_err(|e| LedgerError::InvalidRow(format!("timestamp {:?}: {}", field(9), e)))?
            .and_utc();
        let block_ordinal = field(10)
            .parse()
            .map_err(|e| LedgerError::InvalidRow(format!("block_ordinal {:?}: {}", field(10), e)))?;

        Ok(Self {
            account: field(0).to_string(),
            asset_symbol: field(1).to_string(),
            asset_identifier: field(2).to_string(),
            reference_id: field(3).to_string(),
            kind: field(4).parse()?,
            quantity: parse_decimal("quantity", field(5))?,
            unit_price: parse_decimal("unit_price", field(6))?,
            remaining_quantity: parse_decimal("remaining_quantity", field(7))?,
            realized_pnl: parse_decimal("realized_pnl", field(8))?,
            timestamp,
            block_ordinal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn dec(s: &str) -> BigDecimal {
        s.parse().unwrap()
    }

    fn sample_row() -> ExportRow {
        ExportRow {
            account: "0xwallet".to_string(),
            asset_symbol: "USDC".to_string(),
            asset_identifier: "0xa0b8".to_string(),
            reference_id: "0xhash".to_string(),
            kind: LotKind::Sell,
            quantity: dec("1.500000000000000000"),
            unit_price: dec("0.000000000000000001"),
            remaining_quantity: dec("0"),
            realized_pnl: dec("-12.75"),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap(),
            block_ordinal: 19_000_001,
        }
    }

    #[test]
    fn test_to_record_renders_plain_text() {
        let record = sample_row().to_record();

        assert_eq!(record[4], "SELL");
        assert_eq!(record[5], "1.5");
        assert_eq!(record[6], "0.000000000000000001");
        assert_eq!(record[7], "0");
        assert_eq!(record[8], "-12.75");
        assert_eq!(record[9], "2024-03-01T12:30:05.000000000Z");
        assert_eq!(record[10], "19000001");
    }

    #[test]
    fn test_from_record_reverses_to_record() {
        let row = sample_row();
        let record = StringRecord::from(row.to_record().to_vec());

        assert_eq!(ExportRow::from_record(&record).unwrap(), row);
    }

    #[test]
    fn test_from_record_rejects_short_record() {
        let record = StringRecord::from(vec!["a", "b"]);
        assert!(matches!(ExportRow::from_record(&record), Err(LedgerError::InvalidRow(_))));
    }

    #[test]
    fn test_sub_millisecond_timestamp_round_trips() {
        let mut row = sample_row();
        row.timestamp = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let record = row.to_record();

        assert_eq!(record[9], "2023-11-14T22:13:20.123456789Z");
        let back = ExportRow::from_record(&StringRecord::from(record.to_vec())).unwrap();
        assert_eq!(back.timestamp, row.timestamp);
        assert_eq!(back, row);
    }

    #[test]
    fn test_wide_decimals_round_trip() {
        let mut row = sample_row();
        row.quantity = dec("123456789012345.123456789012345678");
        row.realized_pnl = dec("0.000000000000000002246913578024691356");
        let record = row.to_record();

        assert_eq!(record[5], "123456789012345.123456789012345678");
        assert_eq!(record[8], "0.000000000000000002246913578024691356");
        assert_eq!(ExportRow::from_record(&StringRecord::from(record.to_vec())).unwrap(), row);
    }
}
