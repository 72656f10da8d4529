use crate::core::errors::ExchangeError;
use crate::core::types::{
    conversion::{value_to_price, value_to_quantity, value_to_volume},
    Account, KlineInterval, MarketOrder, Order, Price, Quantity, Record, Stock, Ticker, TradeType,
};
use crate::exchanges::huobi::types::{HuobiAccountInfo, HuobiDepth, HuobiKlineRow, HuobiOrder};
use chrono::{FixedOffset, NaiveDateTime, TimeZone};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Huobi market timestamps are China Standard Time
const VENDOR_UTC_OFFSET_SECS: i32 = 8 * 3600;

/// Convert a stock to the Huobi `coin_type` code
pub const fn stock_to_coin_type(stock: Stock) -> &'static str {
    match stock {
        Stock::Btc => "1",
        Stock::Ltc => "2",
    }
}

/// Map a normalized symbol to its `coin_type`, `None` when unsupported
pub fn symbol_to_coin_type(symbol: &str) -> Option<&'static str> {
    symbol.parse::<Stock>().ok().map(stock_to_coin_type)
}

/// Resolve a normalized symbol or fail with `UnsupportedSymbol`
pub fn parse_stock(symbol: &str) -> Result<Stock, ExchangeError> {
    symbol
        .parse::<Stock>()
        .map_err(|_| ExchangeError::UnsupportedSymbol(symbol.to_string()))
}

/// Lowercase coin name used in market-data paths
pub fn stock_to_market_name(stock: Stock) -> String {
    stock.as_str().to_ascii_lowercase()
}

/// Convert a Huobi order `type` code to the normalized trade type
pub fn huobi_order_type(code: &str) -> Option<TradeType> {
    match code {
        "1" => Some(TradeType::BuyLimit),
        "2" => Some(TradeType::SellLimit),
        "3" => Some(TradeType::BuyMarket),
        "4" => Some(TradeType::SellMarket),
        _ => None,
    }
}

/// Convert interval to the Huobi kline period code, `None` when unsupported
pub const fn kline_interval_to_huobi(interval: KlineInterval) -> Option<&'static str> {
    match interval {
        KlineInterval::Minutes1 => Some("001"),
        KlineInterval::Minutes5 => Some("005"),
        KlineInterval::Minutes15 => Some("015"),
        KlineInterval::Minutes30 => Some("030"),
        KlineInterval::Hours1 => Some("060"),
        KlineInterval::Days1 => Some("100"),
        KlineInterval::Weeks1 => Some("200"),
        KlineInterval::Minutes3 | KlineInterval::Hours4 | KlineInterval::Months1 => None,
    }
}

/// Render a decimal the way Huobi expects in form parameters (no trailing zeros)
pub fn format_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

fn status_code(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Fail on a non-zero `code` in a response object
///
/// Arrays and objects without `code` pass; the market endpoints and the order
/// lists carry no status on success.
pub fn check_status(value: &Value) -> Result<(), ExchangeError> {
    let Some(code) = value.get("code") else {
        return Ok(());
    };

    match status_code(code) {
        Some(0) => Ok(()),
        Some(code) => {
            let message = value
                .get("msg")
                .or_else(|| value.get("message"))
                .map(|m| m.as_str().map_or_else(|| m.to_string(), str::to_string))
                .unwrap_or_default();
            Err(ExchangeError::ApiError { code, message })
        }
        None => Err(ExchangeError::DeserializationError(format!(
            "unreadable status code: {}",
            code
        ))),
    }
}

/// Check the status code, then decode the typed payload
pub fn parse_response<T: DeserializeOwned>(value: Value) -> Result<T, ExchangeError> {
    check_status(&value)?;
    serde_json::from_value(value)
        .map_err(|e| ExchangeError::DeserializationError(format!("unexpected payload: {}", e)))
}

/// Convert Huobi account info to the unified Account snapshot
pub fn convert_huobi_account(info: &HuobiAccountInfo, main_stock: Stock) -> Account {
    Account {
        total: Quantity::new(info.total),
        net: Quantity::new(info.net_asset),
        balance: Quantity::new(info.available_cny_display),
        frozen_balance: Quantity::new(info.frozen_cny_display),
        btc: Quantity::new(info.available_btc_display),
        frozen_btc: Quantity::new(info.frozen_btc_display),
        ltc: Quantity::new(info.available_ltc_display),
        frozen_ltc: Quantity::new(info.frozen_ltc_display),
        stock: Quantity::ZERO,
        frozen_stock: Quantity::ZERO,
    }
    .with_main_stock(main_stock)
}

/// Convert a Huobi order to the unified Order type
pub fn convert_huobi_order(order: &HuobiOrder, stock: Stock) -> Order {
    Order {
        id: order.id.clone(),
        price: Price::new(order.order_price),
        amount: Quantity::new(order.order_amount),
        deal_amount: Quantity::new(order.processed_amount),
        trade_type: huobi_order_type(&order.order_type),
        stock,
    }
}

fn convert_level(level: &[Value]) -> MarketOrder {
    MarketOrder {
        price: level.first().map(value_to_price).unwrap_or_default(),
        amount: level.get(1).map(value_to_quantity).unwrap_or_default(),
    }
}

/// Convert a depth snapshot to a Ticker, best price first on both sides
pub fn convert_huobi_depth(depth: &HuobiDepth) -> Result<Ticker, ExchangeError> {
    let mut bids: Vec<MarketOrder> = depth.bids.iter().map(|l| convert_level(l)).collect();
    let mut asks: Vec<MarketOrder> = depth.asks.iter().map(|l| convert_level(l)).collect();
    bids.sort_by(|a, b| b.price.cmp(&a.price));
    asks.sort_by(|a, b| a.price.cmp(&b.price));

    let (Some(best_bid), Some(best_ask)) = (bids.first(), asks.first()) else {
        return Err(ExchangeError::DeserializationError(
            "order book has no bids or no asks".to_string(),
        ));
    };

    let buy = best_bid.price;
    let sell = best_ask.price;
    Ok(Ticker {
        buy,
        sell,
        mid: Price::new((buy.value() + sell.value()) / Decimal::TWO),
        bids,
        asks,
    })
}

/// Parse the compact vendor datetime (`YYYYMMDDHHMM` followed by optional
/// seconds and milliseconds) into epoch seconds at minute precision
pub fn parse_huobi_datetime(raw: &str) -> Result<i64, ExchangeError> {
    let minute = raw
        .get(..12)
        .filter(|prefix| prefix.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| {
            ExchangeError::DeserializationError(format!("invalid kline datetime: {:?}", raw))
        })?;

    let naive = NaiveDateTime::parse_from_str(&format!("{}00", minute), "%Y%m%d%H%M%S")
        .map_err(|e| {
            ExchangeError::DeserializationError(format!("invalid kline datetime {:?}: {}", raw, e))
        })?;

    let offset = FixedOffset::east_opt(VENDOR_UTC_OFFSET_SECS)
        .ok_or_else(|| ExchangeError::Other("invalid vendor UTC offset".to_string()))?;

    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.timestamp())
        .ok_or_else(|| {
            ExchangeError::DeserializationError(format!("ambiguous kline datetime: {:?}", raw))
        })
}

/// Convert one kline row to a Record
pub fn convert_huobi_kline(row: &[Value]) -> Result<Record, ExchangeError> {
    if row.len() < 6 {
        return Err(ExchangeError::DeserializationError(format!(
            "kline row has {} fields, expected at least 6",
            row.len()
        )));
    }

    let time = match &row[0] {
        Value::String(s) => parse_huobi_datetime(s)?,
        Value::Number(n) => parse_huobi_datetime(&n.to_string())?,
        other => {
            return Err(ExchangeError::DeserializationError(format!(
                "invalid kline datetime: {}",
                other
            )))
        }
    };

    Ok(Record {
        time,
        open: value_to_price(&row[1]),
        high: value_to_price(&row[2]),
        low: value_to_price(&row[3]),
        close: value_to_price(&row[4]),
        volume: value_to_volume(&row[5]),
    })
}

/// Convert kline rows, keeping the vendor's newest-first order
pub fn convert_huobi_klines(rows: &[HuobiKlineRow]) -> Result<Vec<Record>, ExchangeError> {
    rows.iter().map(|row| convert_huobi_kline(row)).collect()
}
