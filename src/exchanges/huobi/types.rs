use crate::core::types::conversion::value_to_decimal;
use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept a JSON number, a numeric string, or anything else as zero
///
/// Only fields the vendor is known to send loosely use this; pair it with
/// `#[serde(default)]` so a missing field is zero as well.
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_decimal(&value))
}

/// Keep an identifier verbatim whether the vendor sent it as a number or a string
pub fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected string or numeric id, got {}",
            other
        ))),
    }
}

/// Short vendor code that may arrive as `"1"` or `1`; anything else becomes empty
pub fn lenient_code<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// `get_account_info` payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HuobiAccountInfo {
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub total: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub net_asset: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub available_cny_display: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub frozen_cny_display: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub available_btc_display: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub frozen_btc_display: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub available_ltc_display: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub frozen_ltc_display: Decimal,
}

/// `buy` / `sell` / `buy_market` / `sell_market` payload
#[derive(Debug, Clone, Deserialize)]
pub struct HuobiPlaceOrderResponse {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
}

/// Order as returned by `order_info`, `get_orders` and `get_new_deal_orders`
#[derive(Debug, Clone, Deserialize)]
pub struct HuobiOrder {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_code")]
    pub order_type: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub order_price: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub order_amount: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub processed_amount: Decimal,
}

/// `cancel_order` payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HuobiCancelResponse {
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub msg: Option<Value>,
}

impl HuobiCancelResponse {
    pub fn is_success(&self) -> bool {
        self.result == "success"
    }
}

/// `staticmarket/depth_<coin>_<n>.js` payload; each level is `[price, amount]`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HuobiDepth {
    #[serde(default)]
    pub bids: Vec<Vec<Value>>,
    #[serde(default)]
    pub asks: Vec<Vec<Value>>,
}

/// One `staticmarket/<coin>_kline_<period>_json.js` row:
/// `[datetime, open, high, low, close, volume, ...]`
pub type HuobiKlineRow = Vec<Value>;
