use comfy_table::Table;
use log::{debug, info};
use bigdecimal::{BigDecimal, Zero};

use crate::core::{AssetRef, Lot, LotInput, LotSource, PriceSource, Result, TimeWindow};
use crate::export::ExportRow;
use crate::pnl::{
    matcher::LotMatcher,
    models::{self, AssetLots, AssetPnl, Method, PnLReport, PortfolioReport},
    unrealized::value_open_lots,
};
use crate::utils::decimal::{format_decimal, parse_decimal};

/// Trait for single-asset PnL calculation
pub trait Processor {
    /// Match the lots and value what is left open
    fn process(&self, lots: &[Lot], method: Method, current_price: BigDecimal) -> Result<PnLReport>;
}

/// Entry point combining lot matching and valuation.
///
/// Holds no state between calls; one instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct PnlCalculator {
    matcher: LotMatcher,
}

impl PnlCalculator {
    pub fn new() -> Self {
        Self {
            matcher: LotMatcher::new(),
        }
    }

    /// Calculate PnL for one asset from collaborator records.
    ///
    /// # Arguments
    /// * `lots` - Buy and sell records for a single asset
    /// * `method` - FIFO or LIFO
    /// * `current_price` - Decimal-formatted market price for valuation
    ///
    /// # Returns
    /// * `PnLReport` - Realized, unrealized and total PnL plus the post-match lots
    pub fn calculate(&self, lots: &[LotInput], method: Method, current_price: &str) -> Result<PnLReport> {
        let parsed = lots.iter().map(Lot::parse).collect::<Result<Vec<_>>>()?;
        let price = parse_decimal("current_price", current_price)?;
        self.calculate_lots(&parsed, method, price)
    }

    /// Calculate PnL for one asset from already typed lots.
    pub fn calculate_lots(&self, lots: &[Lot], method: Method, current_price: BigDecimal) -> Result<PnLReport> {
        let matched = self.matcher.match_lots(lots, method)?;
        let valuation = value_open_lots(&matched.buys, &current_price);

        Ok(PnLReport {
            method,
            current_price,
            total_pnl: &matched.realized_pnl + &valuation.unrealized_pnl,
            realized_pnl: matched.realized_pnl,
            unrealized_pnl: valuation.unrealized_pnl,
            total_cost_basis: valuation.total_cost_basis,
            current_value: valuation.current_value,
            open_quantity: valuation.open_quantity,
            unmatched_sell_quantity: matched.unmatched_sell_quantity,
            buys: matched.buys,
            sells: matched.sells,
            fills: matched.fills,
        })
    }

    /// Run the same lots through FIFO and LIFO.
    ///
    /// # Returns
    /// * `(fifo, lifo)` reports
    pub fn compare_methods(&self, lots: &[LotInput], current_price: &str) -> Result<(PnLReport, PnLReport)> {
        Ok((
            self.calculate(lots, Method::Fifo, current_price)?,
            self.calculate(lots, Method::Lifo, current_price)?,
        ))
    }

    /// Fetch lots and price from collaborators and calculate one asset.
    ///
    /// Lots outside `window` are discarded before matching.
    pub fn calculate_for(
        &self,
        lots: &dyn LotSource,
        prices: &dyn PriceSource,
        asset: &AssetRef,
        window: &TimeWindow,
        method: Method,
    ) -> Result<PnLReport> {
        let fetched = lots.fetch_lots(asset, window)?;
        let total = fetched.len();
        let in_window: Vec<LotInput> = fetched
            .into_iter()
            .filter(|lot| window.contains(lot.timestamp))
            .collect();
        if in_window.len() != total {
            debug!(
                "Dropped {} lots outside {}..{} for {}",
                total - in_window.len(),
                window.start,
                window.end,
                asset.symbol
            );
        }

        let price = prices.current_price(asset)?;
        self.calculate(&in_window, method, &price)
    }

    /// Calculate every asset and sum the currency-denominated totals.
    ///
    /// The first failing asset aborts the whole run.
    pub fn calculate_portfolio(&self, assets: &[AssetLots], method: Method) -> Result<PortfolioReport> {
        let mut portfolio = PortfolioReport {
            method,
            assets: Vec::with_capacity(assets.len()),
            realized_pnl: BigDecimal::zero(),
            unrealized_pnl: BigDecimal::zero(),
            total_pnl: BigDecimal::zero(),
            total_cost_basis: BigDecimal::zero(),
            current_value: BigDecimal::zero(),
        };

        for entry in assets {
            let report = self.calculate(&entry.lots, method, &entry.current_price)?;

            portfolio.realized_pnl += &report.realized_pnl;
            portfolio.unrealized_pnl += &report.unrealized_pnl;
            portfolio.total_pnl += &report.total_pnl;
            portfolio.total_cost_basis += &report.total_cost_basis;
            portfolio.current_value += &report.current_value;

            portfolio.assets.push(AssetPnl {
                asset: entry.asset.clone(),
                report,
            });
        }

        info!(
            "Calculated {} PnL for {} assets: realized {}, unrealized {}",
            method,
            portfolio.assets.len(),
            portfolio.realized_pnl,
            portfolio.unrealized_pnl
        );

        Ok(portfolio)
    }
}

impl Processor for PnlCalculator {
    fn process(&self, lots: &[Lot], method: Method, current_price: BigDecimal) -> Result<PnLReport> {
        self.calculate_lots(lots, method, current_price)
    }
}

impl PnLReport {
    /// Export rows for this report: buys then sells, each in matching order.
    ///
    /// Realized PnL is attributed to the sell that realized it; buy rows carry zero.
    pub fn export_rows(&self, asset: &AssetRef) -> Result<Vec<ExportRow>> {
        let realized = models::realized_by_sell(self.sells.len(), &self.fills)?;

        let buys = self.buys.iter().map(|lot| ExportRow::from_lot(asset, lot, BigDecimal::zero()));
        let sells = self
            .sells
            .iter()
            .zip(realized)
            .map(|(lot, pnl)| ExportRow::from_lot(asset, lot, pnl));

        Ok(buys.chain(sells).collect())
    }
}

impl PortfolioReport {
    pub fn export_rows(&self) -> Result<Vec<ExportRow>> {
        let mut rows = Vec::new();
        for entry in &self.assets {
            rows.extend(entry.report.export_rows(&entry.asset)?);
        }
        Ok(rows)
    }

    pub fn asset(&self, identifier: &str) -> Option<&PnLReport> {
        self.assets
            .iter()
            .find(|entry| entry.asset.identifier == identifier)
            .map(|entry| &entry.report)
    }

    /// Generate a tabular summary of PnL by asset
    pub fn summary_table(&self) -> String {
        let mut table = Table::new();
        table.set_header(vec![
            "Account",
            "Symbol",
            "Lots",
            "Open Qty",
            "Cost Basis",
            "Current Value",
            "Realized P&L",
            "Unrealized P&L",
            "Total P&L",
        ]);

        let mut total_lots = 0;
        for entry in &self.assets {
            let report = &entry.report;
            let lots = report.buys.len() + report.sells.len();
            total_lots += lots;

            table.add_row(vec![
                entry.asset.account.clone(),
                entry.asset.symbol.clone(),
                lots.to_string(),
                format_decimal(&report.open_quantity),
                format_decimal(&report.total_cost_basis),
                format_decimal(&report.current_value),
                format_decimal(&report.realized_pnl),
                format_decimal(&report.unrealized_pnl),
                format_decimal(&report.total_pnl),
            ]);
        }

        table.add_row(vec![
            "TOTAL".to_string(),
            "-".to_string(),
            total_lots.to_string(),
            "-".to_string(),
            format_decimal(&self.total_cost_basis),
            format_decimal(&self.current_value),
            format_decimal(&self.realized_pnl),
            format_decimal(&self.unrealized_pnl),
            format_decimal(&self.total_pnl),
        ]);

        format!("\n=== P&L Summary by Asset ({}) ===\n{}", self.method, table)
    }
}
