use crate::core::errors::ExchangeError;
use crate::core::journal::{Journal, JournalEntry};
use crate::core::traits::{AccountInfo, ExchangeConnector, MarketDataSource, OrderPlacer};
use crate::core::types::{Account, KlineInterval, Order, Price, Quantity, Record, Stock, Ticker};
use crate::core::{config::ExchangeConfig, kernel::RestClient};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

pub mod account;
pub mod market_data;
pub mod trading;

pub use account::AccountData;
pub use market_data::MarketData;
pub use trading::Trading;

/// Send a failed operation to the journal once, then hand the result back
pub(crate) fn report<T>(
    journal: &dyn Journal,
    operation: &str,
    result: Result<T, ExchangeError>,
) -> Result<T, ExchangeError> {
    if let Err(e) = &result {
        journal.record(JournalEntry::error(format!("{} failed: {}", operation, e)));
    }
    result
}

/// Huobi connector that composes all sub-trait implementations
pub struct HuobiConnector<R: RestClient> {
    pub market: MarketData<R>,
    pub trading: Trading<R>,
    pub account: AccountData<R>,
    journal: Arc<dyn Journal>,
}

impl<R: RestClient + Clone + Send + Sync> HuobiConnector<R> {
    /// Create a new Huobi connector
    ///
    /// An unsupported `main_stock` in the configuration falls back to BTC.
    pub fn new(rest: R, config: &ExchangeConfig, journal: Arc<dyn Journal>) -> Self {
        let main_stock = config.main_stock.parse::<Stock>().unwrap_or_else(|_| {
            warn!(main_stock = %config.main_stock, "unsupported main stock, using BTC");
            Stock::Btc
        });

        Self {
            market: MarketData::new(&rest, journal.clone(), config.records_window),
            trading: Trading::new(&rest, journal.clone()),
            account: AccountData::new(&rest, journal.clone(), main_stock),
            journal,
        }
    }

    pub fn journal(&self) -> &dyn Journal {
        self.journal.as_ref()
    }

    /// Write a free-form info entry to the journal
    pub fn log(&self, message: impl Into<String>) {
        self.journal.record(JournalEntry::info(message));
    }

    pub async fn buy_with_note(
        &self,
        symbol: &str,
        price: Price,
        amount: Quantity,
        note: &str,
    ) -> Result<String, ExchangeError> {
        self.trading.buy_with_note(symbol, price, amount, note).await
    }

    pub async fn sell_with_note(
        &self,
        symbol: &str,
        price: Price,
        amount: Quantity,
        note: &str,
    ) -> Result<String, ExchangeError> {
        self.trading.sell_with_note(symbol, price, amount, note).await
    }
}

// Implement traits for the connector by delegating to sub-components

#[async_trait]
impl<R: RestClient + Clone + Send + Sync> MarketDataSource for HuobiConnector<R> {
    async fn get_ticker(
        &self,
        symbol: &str,
        depth: Option<usize>,
    ) -> Result<Ticker, ExchangeError> {
        self.market.get_ticker(symbol, depth).await
    }

    async fn get_records(
        &self,
        symbol: &str,
        interval: KlineInterval,
        size: Option<usize>,
    ) -> Result<Vec<Record>, ExchangeError> {
        self.market.get_records(symbol, interval, size).await
    }
}

#[async_trait]
impl<R: RestClient + Clone + Send + Sync> OrderPlacer for HuobiConnector<R> {
    async fn buy(
        &self,
        symbol: &str,
        price: Price,
        amount: Quantity,
    ) -> Result<String, ExchangeError> {
        self.trading.buy(symbol, price, amount).await
    }

    async fn sell(
        &self,
        symbol: &str,
        price: Price,
        amount: Quantity,
    ) -> Result<String, ExchangeError> {
        self.trading.sell(symbol, price, amount).await
    }

    async fn get_order(&self, symbol: &str, order_id: &str) -> Result<Order, ExchangeError> {
        self.trading.get_order(symbol, order_id).await
    }

    async fn cancel_order(&self, order: &Order) -> Result<(), ExchangeError> {
        self.trading.cancel_order(order).await
    }

    async fn get_orders(&self, symbol: &str) -> Result<Vec<Order>, ExchangeError> {
        self.trading.get_orders(symbol).await
    }

    async fn get_trades(&self, symbol: &str) -> Result<Vec<Order>, ExchangeError> {
        self.trading.get_trades(symbol).await
    }
}

#[async_trait]
impl<R: RestClient + Clone + Send + Sync> AccountInfo for HuobiConnector<R> {
    async fn get_account(&self) -> Result<Account, ExchangeError> {
        self.account.get_account().await
    }
}

#[async_trait]
impl<R: RestClient + Clone + Send + Sync> ExchangeConnector for HuobiConnector<R> {
    fn main_stock(&self) -> Stock {
        self.account.main_stock()
    }

    fn set_main_stock(&mut self, symbol: &str) -> Stock {
        match symbol.parse::<Stock>() {
            Ok(stock) => self.account.set_main_stock(stock),
            Err(_) => {
                self.journal.record(JournalEntry::error(format!(
                    "set_main_stock({}) failed: unsupported symbol",
                    symbol
                )));
            }
        }
        self.account.main_stock()
    }
}
