use crate::core::{
    errors::ExchangeError,
    journal::Journal,
    kernel::RestClient,
    traits::AccountInfo,
    types::{Account, Stock},
};
use crate::exchanges::huobi::connector::report;
use crate::exchanges::huobi::conversions::convert_huobi_account;
use crate::exchanges::huobi::rest::HuobiRest;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;

/// Account implementation for Huobi
pub struct AccountData<R: RestClient> {
    rest: HuobiRest<R>,
    journal: Arc<dyn Journal>,
    main_stock: Stock,
}

impl<R: RestClient> AccountData<R> {
    pub fn new(rest: &R, journal: Arc<dyn Journal>, main_stock: Stock) -> Self
    where
        R: Clone,
    {
        Self {
            rest: HuobiRest::new(rest.clone()),
            journal,
            main_stock,
        }
    }

    pub const fn main_stock(&self) -> Stock {
        self.main_stock
    }

    pub fn set_main_stock(&mut self, stock: Stock) {
        self.main_stock = stock;
    }
}

#[async_trait]
impl<R: RestClient> AccountInfo for AccountData<R> {
    #[instrument(skip(self), fields(exchange = "huobi", main_stock = %self.main_stock))]
    async fn get_account(&self) -> Result<Account, ExchangeError> {
        let result = self
            .rest
            .get_account_info()
            .await
            .map(|info| convert_huobi_account(&info, self.main_stock));

        report(self.journal.as_ref(), "get_account", result)
    }
}
