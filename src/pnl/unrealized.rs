use bigdecimal::BigDecimal;

use crate::core::{Lot, LotKind, Result};
use crate::pnl::models::Valuation;
use crate::utils::decimal::parse_decimal;

/// Value the open part of post-match buy lots at `current_price`.
///
/// Lots with nothing remaining, and sell lots, contribute nothing.
///
/// # Returns
/// * `Valuation` - Cost basis, current value, unrealized PnL and open quantity
pub fn value_open_lots(buys: &[Lot], current_price: &BigDecimal) -> Valuation {
    let mut valuation = Valuation::default();

    for lot in buys.iter().filter(|lot| lot.kind == LotKind::Buy && lot.is_open()) {
        let remaining = lot.remaining_quantity();
        valuation.total_cost_basis += remaining * &lot.unit_price;
        valuation.current_value += remaining * current_price;
        valuation.open_quantity += remaining;
    }

    valuation.unrealized_pnl = &valuation.current_value - &valuation.total_cost_basis;
    valuation
}

/// Same as `value_open_lots` with the price as supplied by a price feed.
pub fn value_open_lots_at(buys: &[Lot], current_price: &str) -> Result<Valuation> {
    let price = parse_decimal("current_price", current_price)?;
    Ok(value_open_lots(buys, &price))
}
