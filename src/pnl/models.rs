use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

use crate::core::{AssetRef, LedgerError, Lot, LotInput};

/// Lot accounting method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Fifo,
    Lifo,
}

impl Default for Method {
    fn default() -> Self {
        Method::Fifo
    }
}

impl Method {
    /// Matching order of two lots on the same side of the ledger.
    ///
    /// Timestamp first, block ordinal on ties, ascending for FIFO and
    /// descending for LIFO.
    pub fn order(&self, a: &Lot, b: &Lot) -> Ordering {
        let ascending = a
            .timestamp
            .cmp(&b.timestamp)
            .then(a.block_ordinal.cmp(&b.block_ordinal));
        match self {
            Method::Fifo => ascending,
            Method::Lifo => ascending.reverse(),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Fifo => write!(f, "FIFO"),
            Method::Lifo => write!(f, "LIFO"),
        }
    }
}

impl FromStr for Method {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fifo" => Ok(Method::Fifo),
            "lifo" => Ok(Method::Lifo),
            other => Err(LedgerError::InvalidConfig(format!("unknown method {:?}", other))),
        }
    }
}

/// One pairing of a sell against a buy.
///
/// `buy_index` and `sell_index` point into `MatchResult::buys` / `sells`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotFill {
    pub buy_index: usize,
    pub sell_index: usize,
    pub buy_reference: String,
    pub sell_reference: String,
    pub quantity: BigDecimal,
    pub buy_price: BigDecimal,
    pub sell_price: BigDecimal,
    pub pnl: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub realized_pnl: BigDecimal,
    /// Buy lots in matching order with their final remaining quantity
    pub buys: Vec<Lot>,
    /// Sell lots in matching order; remaining quantity is the oversold excess
    pub sells: Vec<Lot>,
    pub fills: Vec<LotFill>,
    pub unmatched_sell_quantity: BigDecimal,
}

impl MatchResult {
    /// Realized PnL attributed to each sell lot, parallel to `sells`.
    pub fn realized_by_sell(&self) -> Result<Vec<BigDecimal>, LedgerError> {
        realized_by_sell(self.sells.len(), &self.fills)
    }
}

/// Fails when a fill points at a sell that is not there, e.g. after the
/// caller filtered `sells`.
pub(crate) fn realized_by_sell(sells: usize, fills: &[LotFill]) -> Result<Vec<BigDecimal>, LedgerError> {
    let mut realized = vec![BigDecimal::zero(); sells];
    for fill in fills {
        let slot = realized.get_mut(fill.sell_index).ok_or_else(|| {
            LedgerError::InvalidRow(format!(
                "fill {} -> {} references sell #{} of {}",
                fill.buy_reference, fill.sell_reference, fill.sell_index, sells
            ))
        })?;
        *slot += &fill.pnl;
    }
    Ok(realized)
}

/// Aggregates over the open part of the buy lots
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Valuation {
    pub total_cost_basis: BigDecimal,
    pub current_value: BigDecimal,
    pub unrealized_pnl: BigDecimal,
    pub open_quantity: BigDecimal,
}

/// Single-asset PnL result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnLReport {
    pub method: Method,
    pub current_price: BigDecimal,
    pub realized_pnl: BigDecimal,
    pub unrealized_pnl: BigDecimal,
    pub total_pnl: BigDecimal,
    pub total_cost_basis: BigDecimal,
    pub current_value: BigDecimal,
    pub open_quantity: BigDecimal,
    pub unmatched_sell_quantity: BigDecimal,
    pub buys: Vec<Lot>,
    pub sells: Vec<Lot>,
    pub fills: Vec<LotFill>,
}

/// Lots of one asset as supplied for a portfolio run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetLots {
    pub asset: AssetRef,
    pub lots: Vec<LotInput>,
    pub current_price: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetPnl {
    pub asset: AssetRef,
    pub report: PnLReport,
}

/// Portfolio summary across assets.
///
/// Open quantity is only meaningful per asset, so it is not summed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioReport {
    pub method: Method,
    pub assets: Vec<AssetPnl>,
    pub realized_pnl: BigDecimal,
    pub unrealized_pnl: BigDecimal,
    pub total_pnl: BigDecimal,
    pub total_cost_basis: BigDecimal,
    pub current_value: BigDecimal,
}
