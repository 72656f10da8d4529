pub mod conversions;
pub mod records;
pub mod signer;
pub mod types;

pub mod builder;
pub mod connector;
pub mod rest;

// Re-export main components
pub use builder::{build_connector, build_connector_with_journal, DEFAULT_BASE_URL};
pub use connector::{AccountData, HuobiConnector, MarketData, Trading};
pub use records::{MergeOutcome, RecordBook, RecordWindow};
pub use signer::HuobiSigner;
