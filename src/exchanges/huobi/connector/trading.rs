use crate::core::{
    errors::ExchangeError,
    journal::{EntryKind, Journal, JournalEntry},
    kernel::RestClient,
    traits::OrderPlacer,
    types::{Order, Price, Quantity, TradeType},
};
use crate::exchanges::huobi::connector::report;
use crate::exchanges::huobi::conversions::{convert_huobi_order, format_decimal, parse_stock};
use crate::exchanges::huobi::rest::HuobiRest;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

/// Trading implementation for Huobi
pub struct Trading<R: RestClient> {
    rest: HuobiRest<R>,
    journal: Arc<dyn Journal>,
}

impl<R: RestClient> Trading<R> {
    pub fn new(rest: &R, journal: Arc<dyn Journal>) -> Self
    where
        R: Clone,
    {
        Self {
            rest: HuobiRest::new(rest.clone()),
            journal,
        }
    }

    fn validate_order(price: Price, amount: Quantity) -> Result<(), ExchangeError> {
        if amount.value() <= rust_decimal::Decimal::ZERO {
            return Err(ExchangeError::InvalidParameters(format!(
                "order amount must be positive, got {}",
                amount
            )));
        }
        if price.value() < rust_decimal::Decimal::ZERO {
            return Err(ExchangeError::InvalidParameters(format!(
                "order price must not be negative, got {}",
                price
            )));
        }
        Ok(())
    }

    fn validate_id(order_id: &str) -> Result<(), ExchangeError> {
        if order_id.trim().is_empty() {
            return Err(ExchangeError::InvalidParameters(
                "order id must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    async fn place(
        &self,
        side: EntryKind,
        symbol: &str,
        price: Price,
        amount: Quantity,
        note: Option<&str>,
    ) -> Result<String, ExchangeError> {
        let stock = parse_stock(symbol)?;
        Self::validate_order(price, amount)?;

        let trade_type = match (side, price.is_positive()) {
            (EntryKind::Buy, true) => TradeType::BuyLimit,
            (EntryKind::Buy, false) => TradeType::BuyMarket,
            (_, true) => TradeType::SellLimit,
            (_, false) => TradeType::SellMarket,
        };
        let method = match trade_type {
            TradeType::BuyLimit => "buy",
            TradeType::BuyMarket => "buy_market",
            TradeType::SellLimit => "sell",
            TradeType::SellMarket => "sell_market",
        };
        let price_param = price.is_positive().then(|| format_decimal(price.value()));
        let amount_param = format_decimal(amount.value());

        let response = self
            .rest
            .place_order(method, stock, price_param.as_deref(), &amount_param)
            .await?;

        let mut message = format!("{} {} order {}", method, stock, response.id);
        if let Some(note) = note.filter(|n| !n.is_empty()) {
            message.push_str(": ");
            message.push_str(note);
        }
        self.journal.record(JournalEntry::new(side, price, amount, message));
        Ok(response.id)
    }

    async fn submit(
        &self,
        side: EntryKind,
        symbol: &str,
        price: Price,
        amount: Quantity,
        note: Option<&str>,
    ) -> Result<String, ExchangeError> {
        let operation = match side {
            EntryKind::Buy => "buy",
            _ => "sell",
        };
        report(
            self.journal.as_ref(),
            &format!("{}({}, {}, {})", operation, symbol, price, amount),
            self.place(side, symbol, price, amount, note).await,
        )
    }

    /// Buy and attach `note` to the journal entry for the order
    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn buy_with_note(
        &self,
        symbol: &str,
        price: Price,
        amount: Quantity,
        note: &str,
    ) -> Result<String, ExchangeError> {
        self.submit(EntryKind::Buy, symbol, price, amount, Some(note)).await
    }

    /// Sell and attach `note` to the journal entry for the order
    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn sell_with_note(
        &self,
        symbol: &str,
        price: Price,
        amount: Quantity,
        note: &str,
    ) -> Result<String, ExchangeError> {
        self.submit(EntryKind::Sell, symbol, price, amount, Some(note)).await
    }

    async fn fetch_order(&self, symbol: &str, order_id: &str) -> Result<Order, ExchangeError> {
        let stock = parse_stock(symbol)?;
        Self::validate_id(order_id)?;
        let raw = self.rest.order_info(stock, order_id).await?;
        Ok(convert_huobi_order(&raw, stock))
    }

    async fn cancel(&self, order: &Order) -> Result<(), ExchangeError> {
        Self::validate_id(&order.id)?;
        let response = self.rest.cancel_order(order.stock, &order.id).await?;
        if !response.is_success() {
            return Err(ExchangeError::Rejected(format!(
                "cancel of order {} refused: {}",
                order.id,
                message_text(response.msg.as_ref())
            )));
        }

        self.journal.record(JournalEntry::new(
            EntryKind::Cancel,
            order.price,
            order.amount,
            format!("cancel {} order {}", order.stock, order.id),
        ));
        Ok(())
    }

    async fn list(&self, symbol: &str, filled: bool) -> Result<Vec<Order>, ExchangeError> {
        let stock = parse_stock(symbol)?;
        let raw = if filled {
            self.rest.get_new_deal_orders(stock).await?
        } else {
            self.rest.get_orders(stock).await?
        };
        Ok(raw.iter().map(|o| convert_huobi_order(o, stock)).collect())
    }
}

fn message_text(msg: Option<&Value>) -> String {
    match msg {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "no reason given".to_string(),
        Some(other) => other.to_string(),
    }
}

#[async_trait]
impl<R: RestClient> OrderPlacer for Trading<R> {
    #[instrument(skip(self), fields(exchange = "huobi"))]
    async fn buy(
        &self,
        symbol: &str,
        price: Price,
        amount: Quantity,
    ) -> Result<String, ExchangeError> {
        self.submit(EntryKind::Buy, symbol, price, amount, None).await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    async fn sell(
        &self,
        symbol: &str,
        price: Price,
        amount: Quantity,
    ) -> Result<String, ExchangeError> {
        self.submit(EntryKind::Sell, symbol, price, amount, None).await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    async fn get_order(&self, symbol: &str, order_id: &str) -> Result<Order, ExchangeError> {
        report(
            self.journal.as_ref(),
            &format!("get_order({}, {})", symbol, order_id),
            self.fetch_order(symbol, order_id).await,
        )
    }

    #[instrument(skip(self, order), fields(exchange = "huobi", order_id = %order.id, stock = %order.stock))]
    async fn cancel_order(&self, order: &Order) -> Result<(), ExchangeError> {
        report(
            self.journal.as_ref(),
            &format!("cancel_order({}, {})", order.stock, order.id),
            self.cancel(order).await,
        )
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    async fn get_orders(&self, symbol: &str) -> Result<Vec<Order>, ExchangeError> {
        report(
            self.journal.as_ref(),
            &format!("get_orders({})", symbol),
            self.list(symbol, false).await,
        )
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    async fn get_trades(&self, symbol: &str) -> Result<Vec<Order>, ExchangeError> {
        report(
            self.journal.as_ref(),
            &format!("get_trades({})", symbol),
            self.list(symbol, true).await,
        )
    }
}
