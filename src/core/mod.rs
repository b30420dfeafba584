pub mod models;
pub mod errors;
pub mod traits;

pub use models::*;
pub use errors::{LedgerError, Result};
pub use traits::{LotSource, PriceSource};
