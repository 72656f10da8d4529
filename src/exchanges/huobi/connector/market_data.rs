use crate::core::{
    errors::ExchangeError,
    journal::Journal,
    kernel::RestClient,
    traits::MarketDataSource,
    types::{KlineInterval, Record, Stock, Ticker},
};
use crate::exchanges::huobi::connector::report;
use crate::exchanges::huobi::conversions::{
    convert_huobi_depth, convert_huobi_klines, kline_interval_to_huobi, parse_stock,
};
use crate::exchanges::huobi::records::RecordBook;
use crate::exchanges::huobi::rest::HuobiRest;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Market data implementation for Huobi
///
/// Owns the record windows; each `get_records` call folds the fetched bars into
/// the window for that stock and interval.
pub struct MarketData<R: RestClient> {
    rest: HuobiRest<R>,
    journal: Arc<dyn Journal>,
    records: RecordBook,
    records_window: usize,
}

impl<R: RestClient> MarketData<R> {
    pub fn new(rest: &R, journal: Arc<dyn Journal>, records_window: usize) -> Self
    where
        R: Clone,
    {
        Self {
            rest: HuobiRest::new(rest.clone()),
            journal,
            records: RecordBook::new(),
            records_window,
        }
    }

    pub const fn records_window(&self) -> usize {
        self.records_window
    }

    /// Window currently held for `(stock, interval)`, without fetching
    pub fn cached_records(&self, stock: Stock, interval: KlineInterval) -> Vec<Record> {
        self.records.snapshot(stock, interval)
    }

    async fn ticker(&self, symbol: &str, depth: Option<usize>) -> Result<Ticker, ExchangeError> {
        let stock = parse_stock(symbol)?;
        let raw = self.rest.get_depth(stock, depth).await?;
        convert_huobi_depth(&raw)
    }

    async fn records(
        &self,
        symbol: &str,
        interval: KlineInterval,
        size: Option<usize>,
    ) -> Result<Vec<Record>, ExchangeError> {
        let stock = parse_stock(symbol)?;
        let period =
            kline_interval_to_huobi(interval).ok_or(ExchangeError::UnsupportedInterval(interval))?;
        let cap = match size {
            Some(0) => {
                return Err(ExchangeError::InvalidParameters(
                    "records window size must be positive".to_string(),
                ))
            }
            Some(n) => n,
            None => self.records_window,
        };

        let rows = self.rest.get_klines(stock, period).await?;
        let incoming = convert_huobi_klines(&rows)?;

        let (window, outcome) = self.records.merge(stock, interval, &incoming, cap);
        debug!(
            appended = outcome.appended,
            replaced = outcome.replaced,
            evicted = outcome.evicted,
            held = window.len(),
            "merged kline batch"
        );
        Ok(window)
    }
}

#[async_trait]
impl<R: RestClient> MarketDataSource for MarketData<R> {
    #[instrument(skip(self), fields(exchange = "huobi"))]
    async fn get_ticker(
        &self,
        symbol: &str,
        depth: Option<usize>,
    ) -> Result<Ticker, ExchangeError> {
        report(
            self.journal.as_ref(),
            &format!("get_ticker({})", symbol),
            self.ticker(symbol, depth).await,
        )
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    async fn get_records(
        &self,
        symbol: &str,
        interval: KlineInterval,
        size: Option<usize>,
    ) -> Result<Vec<Record>, ExchangeError> {
        report(
            self.journal.as_ref(),
            &format!("get_records({}, {})", symbol, interval),
            self.records(symbol, interval, size).await,
        )
    }
}
