//! Statement data structures, normalization and extraction loading

mod data;
pub mod classify;
pub mod coerce;
pub mod loader;
pub mod normalize;

pub use data::{CardBreakdownEntry, CardNetwork, ProcessingMethod, StatementData, StatementFormat};
pub use classify::classify_key;
pub use coerce::coerce;
pub use loader::{load_extraction, load_extraction_from_reader, load_statement, parse_extraction};
pub use normalize::{normalize, RawCardEntry, RawCounts, RawExtraction};
