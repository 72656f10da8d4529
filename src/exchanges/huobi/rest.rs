use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::types::Stock;
use crate::exchanges::huobi::conversions::{
    parse_response, stock_to_coin_type, stock_to_market_name,
};
use crate::exchanges::huobi::types::{
    HuobiAccountInfo, HuobiCancelResponse, HuobiDepth, HuobiKlineRow, HuobiOrder,
    HuobiPlaceOrderResponse,
};

/// Signed trading endpoint; the operation is selected by the `method` parameter
pub const TRADE_ENDPOINT: &str = "/apiv3";

/// Depth levels requested when the caller asks for fewer
pub const MIN_DEPTH: usize = 20;

/// Unsigned parameters appended after `sign` on every trading call
const MARKET_PARAMS: [(&str, &str); 1] = [("market", "cny")];

/// Thin typed wrapper around `RestClient` for the Huobi v3 API
#[derive(Clone)]
pub struct HuobiRest<R: RestClient> {
    client: R,
}

impl<R: RestClient> HuobiRest<R> {
    pub fn new(client: R) -> Self {
        Self { client }
    }

    async fn trade<T: serde::de::DeserializeOwned>(
        &self,
        params: &[(&str, &str)],
    ) -> Result<T, ExchangeError> {
        let value = self
            .client
            .post_form(TRADE_ENDPOINT, params, &MARKET_PARAMS, true)
            .await?;
        parse_response(value)
    }

    /// Balances for the whole account
    pub async fn get_account_info(&self) -> Result<HuobiAccountInfo, ExchangeError> {
        self.trade(&[("method", "get_account_info")]).await
    }

    /// Place an order; a positive price makes it a limit order
    pub async fn place_order(
        &self,
        method: &str,
        stock: Stock,
        price: Option<&str>,
        amount: &str,
    ) -> Result<HuobiPlaceOrderResponse, ExchangeError> {
        let mut params = vec![
            ("method", method),
            ("coin_type", stock_to_coin_type(stock)),
        ];
        if let Some(price) = price {
            params.push(("price", price));
        }
        params.push(("amount", amount));

        self.trade(&params).await
    }

    pub async fn order_info(&self, stock: Stock, id: &str) -> Result<HuobiOrder, ExchangeError> {
        self.trade(&[
            ("method", "order_info"),
            ("coin_type", stock_to_coin_type(stock)),
            ("id", id),
        ])
        .await
    }

    pub async fn cancel_order(
        &self,
        stock: Stock,
        id: &str,
    ) -> Result<HuobiCancelResponse, ExchangeError> {
        self.trade(&[
            ("method", "cancel_order"),
            ("coin_type", stock_to_coin_type(stock)),
            ("id", id),
        ])
        .await
    }

    /// Open orders
    pub async fn get_orders(&self, stock: Stock) -> Result<Vec<HuobiOrder>, ExchangeError> {
        self.trade(&[
            ("method", "get_orders"),
            ("coin_type", stock_to_coin_type(stock)),
        ])
        .await
    }

    /// Recently filled orders
    pub async fn get_new_deal_orders(
        &self,
        stock: Stock,
    ) -> Result<Vec<HuobiOrder>, ExchangeError> {
        self.trade(&[
            ("method", "get_new_deal_orders"),
            ("coin_type", stock_to_coin_type(stock)),
        ])
        .await
    }

    /// Order book snapshot with at least `MIN_DEPTH` levels per side
    pub async fn get_depth(
        &self,
        stock: Stock,
        depth: Option<usize>,
    ) -> Result<HuobiDepth, ExchangeError> {
        let levels = depth.filter(|&d| d > MIN_DEPTH).unwrap_or(MIN_DEPTH);
        let endpoint = format!(
            "/staticmarket/depth_{}_{}.js",
            stock_to_market_name(stock),
            levels
        );
        let value = self.client.get(&endpoint, &[], false).await?;
        parse_response(value)
    }

    /// Kline rows for a vendor period code, newest first
    pub async fn get_klines(
        &self,
        stock: Stock,
        period: &str,
    ) -> Result<Vec<HuobiKlineRow>, ExchangeError> {
        let endpoint = format!(
            "/staticmarket/{}_kline_{}_json.js",
            stock_to_market_name(stock),
            period
        );
        let value = self.client.get(&endpoint, &[], false).await?;
        parse_response(value)
    }
}
