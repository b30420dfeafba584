use crate::core::errors::Result;
use crate::core::models::{AssetRef, LotInput, TimeWindow};

/// Source of historical buy/sell events for an account and asset
pub trait LotSource {
    /// Lots recorded for `asset` within `window`, in any order
    fn fetch_lots(&self, asset: &AssetRef, window: &TimeWindow) -> Result<Vec<LotInput>>;
}

/// Source of the current market price used for valuation
pub trait PriceSource {
    /// Decimal-formatted price in the reporting currency
    fn current_price(&self, asset: &AssetRef) -> Result<String>;
}
