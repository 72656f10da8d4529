pub mod core;
pub mod exchanges;

pub use crate::core::{
    errors::ExchangeError,
    journal::{Journal, JournalEntry, MemoryJournal, TracingJournal},
    traits::{AccountInfo, ExchangeConnector, MarketDataSource, OrderPlacer},
    types::*,
};
pub use crate::exchanges::huobi::HuobiConnector;
