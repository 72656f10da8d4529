use crate::core::{
    errors::ExchangeError,
    types::{Account, KlineInterval, Order, Price, Quantity, Record, Stock, Ticker},
};
use async_trait::async_trait;

#[async_trait]
pub trait MarketDataSource {
    /// Top of book plus depth; `depth` below the exchange minimum is raised to it
    async fn get_ticker(&self, symbol: &str, depth: Option<usize>)
        -> Result<Ticker, ExchangeError>;

    /// Fetch klines and fold them into the rolling window for `(symbol, interval)`
    ///
    /// Returns the whole window, oldest first, capped at `size` bars (or the
    /// configured default).
    async fn get_records(
        &self,
        symbol: &str,
        interval: KlineInterval,
        size: Option<usize>,
    ) -> Result<Vec<Record>, ExchangeError>;
}

#[async_trait]
pub trait OrderPlacer {
    /// Buy `amount`; a zero price places a market order. Returns the order id.
    async fn buy(
        &self,
        symbol: &str,
        price: Price,
        amount: Quantity,
    ) -> Result<String, ExchangeError>;

    /// Sell `amount`; a zero price places a market order. Returns the order id.
    async fn sell(
        &self,
        symbol: &str,
        price: Price,
        amount: Quantity,
    ) -> Result<String, ExchangeError>;

    async fn get_order(&self, symbol: &str, order_id: &str) -> Result<Order, ExchangeError>;

    async fn cancel_order(&self, order: &Order) -> Result<(), ExchangeError>;

    /// Open orders
    async fn get_orders(&self, symbol: &str) -> Result<Vec<Order>, ExchangeError>;

    /// Recently filled orders
    async fn get_trades(&self, symbol: &str) -> Result<Vec<Order>, ExchangeError>;
}

#[async_trait]
pub trait AccountInfo {
    async fn get_account(&self) -> Result<Account, ExchangeError>;
}

#[async_trait]
pub trait ExchangeConnector: MarketDataSource + OrderPlacer + AccountInfo {
    /// Base asset used for the derived `stock` / `frozen_stock` balances
    fn main_stock(&self) -> Stock;

    /// Switch the main stock; an unsupported symbol leaves it unchanged
    fn set_main_stock(&mut self, symbol: &str) -> Stock;
}
