pub mod models;
pub mod matcher;
pub mod unrealized;
pub mod calculator;


pub use models::{
    AssetLots, AssetPnl, LotFill, MatchResult, Method, PnLReport, PortfolioReport, Valuation,
};
pub use matcher::LotMatcher;
pub use calculator::{PnlCalculator, Processor};
pub use unrealized::{value_open_lots, value_open_lots_at};
