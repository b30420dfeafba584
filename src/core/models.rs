use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

use crate::core::errors::{LedgerError, Result};
use crate::utils::decimal::{format_decimal, parse_decimal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LotKind {
    Buy,
    Sell,
}

impl fmt::Display for LotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LotKind::Buy => write!(f, "BUY"),
            LotKind::Sell => write!(f, "SELL"),
        }
    }
}

impl FromStr for LotKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "buy" => Ok(LotKind::Buy),
            "sell" => Ok(LotKind::Sell),
            other => Err(LedgerError::InvalidRow(format!("unknown lot kind {:?}", other))),
        }
    }
}

/// A lot as handed over by the lot-retrieval collaborator.
///
/// Quantities and prices stay strings here; `Lot::parse` is the only place
/// they become numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotInput {
    pub kind: LotKind,
    pub quantity: String,
    pub unit_price: String,
    pub timestamp: DateTime<Utc>,
    pub reference_id: String,
    #[serde(default)]
    pub block_ordinal: u64,
}

impl LotInput {
    pub fn new(
        kind: LotKind,
        quantity: impl Into<String>,
        unit_price: impl Into<String>,
        timestamp: DateTime<Utc>,
        reference_id: impl Into<String>,
        block_ordinal: u64,
    ) -> Self {
        Self {
            kind,
            quantity: quantity.into(),
            unit_price: unit_price.into(),
            timestamp,
            reference_id: reference_id.into(),
            block_ordinal,
        }
    }
}

/// A single buy or sell event.
///
/// `remaining_quantity` starts equal to `quantity` and is only ever lowered
/// by the matcher, which works on its own copies. Deserialized lots go
/// through the same checks as `Lot::new`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LotRecord")]
pub struct Lot {
    pub kind: LotKind,
    pub quantity: BigDecimal,
    pub unit_price: BigDecimal,
    remaining_quantity: BigDecimal,
    pub timestamp: DateTime<Utc>,
    pub reference_id: String,
    pub block_ordinal: u64,
}

impl Lot {
    pub fn new(
        kind: LotKind,
        quantity: BigDecimal,
        unit_price: BigDecimal,
        timestamp: DateTime<Utc>,
        reference_id: impl Into<String>,
        block_ordinal: u64,
    ) -> Result<Self> {
        let reference_id = reference_id.into();
        if quantity < BigDecimal::zero() {
            return Err(LedgerError::NegativeQuantity {
                reference_id,
                value: format_decimal(&quantity),
            });
        }

        Ok(Self {
            kind,
            remaining_quantity: quantity.clone(),
            quantity,
            unit_price,
            timestamp,
            reference_id,
            block_ordinal,
        })
    }

    pub fn buy(
        quantity: BigDecimal,
        unit_price: BigDecimal,
        timestamp: DateTime<Utc>,
        reference_id: impl Into<String>,
        block_ordinal: u64,
    ) -> Result<Self> {
        Self::new(LotKind::Buy, quantity, unit_price, timestamp, reference_id, block_ordinal)
    }

    pub fn sell(
        quantity: BigDecimal,
        unit_price: BigDecimal,
        timestamp: DateTime<Utc>,
        reference_id: impl Into<String>,
        block_ordinal: u64,
    ) -> Result<Self> {
        Self::new(LotKind::Sell, quantity, unit_price, timestamp, reference_id, block_ordinal)
    }

    /// Parse a collaborator record, failing on the first unparseable number.
    pub fn parse(input: &LotInput) -> Result<Self> {
        let quantity = parse_decimal("quantity", &input.quantity)?;
        let unit_price = parse_decimal("unit_price", &input.unit_price)?;
        Self::new(
            input.kind,
            quantity,
            unit_price,
            input.timestamp,
            input.reference_id.clone(),
            input.block_ordinal,
        )
    }

    pub fn remaining_quantity(&self) -> &BigDecimal {
        &self.remaining_quantity
    }

    pub fn is_open(&self) -> bool {
        self.remaining_quantity > BigDecimal::zero()
    }

    /// Copy of this lot with nothing consumed yet.
    pub(crate) fn reopened(&self) -> Self {
        Self {
            remaining_quantity: self.quantity.clone(),
            ..self.clone()
        }
    }

    /// Caller guarantees `0 <= remaining <= quantity`.
    pub(crate) fn set_remaining(&mut self, remaining: BigDecimal) {
        debug_assert!(remaining >= BigDecimal::zero() && remaining <= self.quantity);
        self.remaining_quantity = remaining;
    }
}

/// Wire shape of a `Lot`; `remaining_quantity` defaults to the full quantity.
#[derive(Deserialize)]
struct LotRecord {
    kind: LotKind,
    quantity: BigDecimal,
    unit_price: BigDecimal,
    #[serde(default)]
    remaining_quantity: Option<BigDecimal>,
    timestamp: DateTime<Utc>,
    reference_id: String,
    #[serde(default)]
    block_ordinal: u64,
}

impl TryFrom<LotRecord> for Lot {
    type Error = LedgerError;

    fn try_from(record: LotRecord) -> Result<Self> {
        let mut lot = Lot::new(
            record.kind,
            record.quantity,
            record.unit_price,
            record.timestamp,
            record.reference_id,
            record.block_ordinal,
        )?;

        if let Some(remaining) = record.remaining_quantity {
            if remaining < BigDecimal::zero() || remaining > lot.quantity {
                return Err(LedgerError::RemainingOutOfRange {
                    reference_id: lot.reference_id,
                    value: format_decimal(&remaining),
                });
            }
            lot.remaining_quantity = remaining;
        }
        Ok(lot)
    }
}

/// The account/asset pair a set of lots belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRef {
    pub account: String,
    pub symbol: String,
    pub identifier: String,
}

impl AssetRef {
    pub fn new(
        account: impl Into<String>,
        symbol: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            symbol: symbol.into(),
            identifier: identifier.into(),
        }
    }
}

/// Inclusive time range lots are requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }
}
