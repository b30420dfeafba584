use log::debug;
use bigdecimal::{BigDecimal, Zero};

use crate::core::{LedgerError, Lot, LotKind, Result};
use crate::pnl::models::{LotFill, MatchResult, Method};

/// Greedy sell-against-buy lot matcher.
///
/// FIFO and LIFO differ only in how both sides are sorted before the walk.
/// The matcher clones the lots it is given and never touches the caller's
/// copies.
#[derive(Debug, Clone, Copy, Default)]
pub struct LotMatcher;

impl LotMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Match sells against buys and compute realized PnL.
    ///
    /// # Arguments
    /// * `lots` - Buy and sell lots in any order
    /// * `method` - Accounting method deciding which buy a sell consumes first
    ///
    /// # Returns
    /// * `MatchResult` - Realized PnL, post-match buys and sells, and one fill per pairing
    pub fn match_lots(&self, lots: &[Lot], method: Method) -> Result<MatchResult> {
        let (mut buys, mut sells): (Vec<Lot>, Vec<Lot>) = lots
            .iter()
            .map(Lot::reopened)
            .partition(|lot| lot.kind == LotKind::Buy);

        if buys.is_empty() && sells.is_empty() {
            return Err(LedgerError::EmptyLotSet);
        }

        buys.sort_by(|a, b| method.order(a, b));
        sells.sort_by(|a, b| method.order(a, b));

        let mut realized_pnl = BigDecimal::zero();
        let mut unmatched_sell_quantity = BigDecimal::zero();
        let mut fills = Vec::new();

        for (sell_index, sell) in sells.iter_mut().enumerate() {
            let mut remaining_sell = sell.quantity.clone();

            for (buy_index, buy) in buys.iter_mut().enumerate() {
                if remaining_sell.is_zero() {
                    break;
                }
                if !buy.is_open() {
                    continue;
                }

                let matched = remaining_sell.clone().min(buy.remaining_quantity().clone());
                let pnl = &matched * &sell.unit_price - &matched * &buy.unit_price;
                realized_pnl += &pnl;

                let buy_left = buy.remaining_quantity() - &matched;
                buy.set_remaining(buy_left);
                remaining_sell -= &matched;

                fills.push(LotFill {
                    buy_index,
                    sell_index,
                    buy_reference: buy.reference_id.clone(),
                    sell_reference: sell.reference_id.clone(),
                    quantity: matched,
                    buy_price: buy.unit_price.clone(),
                    sell_price: sell.unit_price.clone(),
                    pnl,
                });
            }

            // Oversold excess is dropped: no PnL, no negative inventory
            if remaining_sell > BigDecimal::zero() {
                debug!(
                    "Sell {} exceeds open inventory by {}, excess ignored",
                    sell.reference_id, remaining_sell
                );
                unmatched_sell_quantity += &remaining_sell;
            }
            sell.set_remaining(remaining_sell);
        }

        debug!(
            "{} matching: {} buys, {} sells, {} fills, realized {}",
            method,
            buys.len(),
            sells.len(),
            fills.len(),
            realized_pnl
        );

        Ok(MatchResult {
            realized_pnl,
            buys,
            sells,
            fills,
            unmatched_sell_quantity,
        })
    }
}
