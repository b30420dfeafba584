pub mod core;
pub mod utils;
pub mod pnl;
pub mod export;
pub mod config;

// Re-export commonly used types
pub use crate::core::{
    AssetRef, LedgerError, Lot, LotInput, LotKind, LotSource, PriceSource, Result, TimeWindow,
};
pub use crate::pnl::{
    AssetLots, AssetPnl, LotFill, LotMatcher, MatchResult, Method, PnLReport, PnlCalculator,
    PortfolioReport, Processor, Valuation,
};
pub use crate::export::{
    export_to_artifact, export_to_writer, CsvLotWriter, ExportArtifact, ExportRow, LotWriter,
};
pub use crate::config::{validate_config, AppConfig, ExportConfig};
