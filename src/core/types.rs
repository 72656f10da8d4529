use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Typed errors for the types subsystem
#[derive(Error, Debug, PartialEq)]
pub enum TypesError {
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),
    #[error("Invalid price: {0}")]
    InvalidPrice(#[from] rust_decimal::Error),
    #[error("Invalid interval code: {0}")]
    InvalidInterval(String),
}

/// Base assets the adapter trades against the quote currency (CNY)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Stock {
    Btc,
    Ltc,
}

impl Stock {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Btc => "BTC",
            Self::Ltc => "LTC",
        }
    }
}

impl FromStr for Stock {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BTC" => Ok(Self::Btc),
            "LTC" => Ok(Self::Ltc),
            _ => Err(TypesError::InvalidSymbol(s.to_string())),
        }
    }
}

impl fmt::Display for Stock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-safe price representation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::str")] pub Decimal);

impl Price {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl FromStr for Price {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<Decimal> for Price {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type-safe quantity representation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(#[serde(with = "rust_decimal::serde::str")] pub Decimal);

impl Quantity {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Quantity {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<Decimal> for Quantity {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type-safe volume representation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Volume(#[serde(with = "rust_decimal::serde::str")] pub Decimal);

impl Volume {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> Decimal {
        self.0
    }
}

impl From<Decimal> for Volume {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lenient conversion helpers for vendor payloads
///
/// Vendors send numbers either as JSON numbers or as numeric strings. These helpers
/// accept both and fall back to zero for anything else.
pub mod conversion {
    use super::*;
    use serde_json::Value;

    /// Convert string to Decimal with fallback
    #[inline]
    pub fn string_to_decimal(s: &str) -> Decimal {
        let s = s.trim();
        Decimal::from_str(s)
            .or_else(|_| Decimal::from_scientific(s))
            .unwrap_or(Decimal::ZERO)
    }

    /// Convert any JSON value to Decimal with fallback
    #[inline]
    pub fn value_to_decimal(value: &Value) -> Decimal {
        match value {
            // serde_json renders the shortest round-trip form, so 0.1 stays 0.1
            Value::Number(n) => string_to_decimal(&n.to_string()),
            Value::String(s) => string_to_decimal(s),
            _ => Decimal::ZERO,
        }
    }

    #[inline]
    pub fn value_to_price(value: &Value) -> Price {
        Price(value_to_decimal(value))
    }

    #[inline]
    pub fn value_to_quantity(value: &Value) -> Quantity {
        Quantity(value_to_decimal(value))
    }

    #[inline]
    pub fn value_to_volume(value: &Value) -> Volume {
        Volume(value_to_decimal(value))
    }
}

/// Normalized order-type code shared by every adapter
///
/// Buys are positive, sells negative; limit orders are 1, market orders 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeType {
    BuyLimit,
    SellLimit,
    BuyMarket,
    SellMarket,
}

impl TradeType {
    pub const fn code(self) -> i8 {
        match self {
            Self::BuyLimit => 1,
            Self::SellLimit => -1,
            Self::BuyMarket => 2,
            Self::SellMarket => -2,
        }
    }

    pub const fn from_code(code: i8) -> Option<Self> {
        match code {
            1 => Some(Self::BuyLimit),
            -1 => Some(Self::SellLimit),
            2 => Some(Self::BuyMarket),
            -2 => Some(Self::SellMarket),
            _ => None,
        }
    }

    pub const fn is_buy(self) -> bool {
        self.code() > 0
    }
}

/// Snapshot of balances, recreated on every query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub total: Quantity,
    pub net: Quantity,
    pub balance: Quantity,
    pub frozen_balance: Quantity,
    pub btc: Quantity,
    pub frozen_btc: Quantity,
    pub ltc: Quantity,
    pub frozen_ltc: Quantity,
    /// Available amount of the configured main stock
    pub stock: Quantity,
    /// Frozen amount of the configured main stock
    pub frozen_stock: Quantity,
}

impl Account {
    /// (available, frozen) for a base asset
    pub const fn holdings(&self, stock: Stock) -> (Quantity, Quantity) {
        match stock {
            Stock::Btc => (self.btc, self.frozen_btc),
            Stock::Ltc => (self.ltc, self.frozen_ltc),
        }
    }

    /// Fill the derived `stock` / `frozen_stock` pair from the per-asset fields
    #[must_use]
    pub const fn with_main_stock(mut self, stock: Stock) -> Self {
        let (available, frozen) = self.holdings(stock);
        self.stock = available;
        self.frozen_stock = frozen;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Vendor-assigned id, kept verbatim
    pub id: String,
    pub price: Price,
    pub amount: Quantity,
    pub deal_amount: Quantity,
    /// `None` when the vendor reports an order type outside the known table
    pub trade_type: Option<TradeType>,
    pub stock: Stock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketOrder {
    pub price: Price,
    pub amount: Quantity,
}

/// Point-in-time top of book plus depth, best price first on both sides
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticker {
    /// Best bid
    pub buy: Price,
    /// Best ask
    pub sell: Price,
    pub mid: Price,
    pub bids: Vec<MarketOrder>,
    pub asks: Vec<MarketOrder>,
}

/// One OHLCV candlestick; `time` is epoch seconds at minute precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub time: i64,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Volume,
}

/// Unified kline interval enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KlineInterval {
    // Minutes
    Minutes1,
    Minutes3,
    Minutes5,
    Minutes15,
    Minutes30,

    // Hours
    Hours1,
    Hours4,

    // Days
    Days1,

    // Weeks
    Weeks1,

    // Months
    Months1,
}

impl KlineInterval {
    /// Parse the trading-bot period codes (`M`, `M5`, `M15`, `M30`, `H`, `H4`, `D`, `W`, `MN`)
    pub fn from_code(code: &str) -> Result<Self, TypesError> {
        match code {
            "M" | "M1" => Ok(Self::Minutes1),
            "M3" => Ok(Self::Minutes3),
            "M5" => Ok(Self::Minutes5),
            "M15" => Ok(Self::Minutes15),
            "M30" => Ok(Self::Minutes30),
            "H" | "H1" => Ok(Self::Hours1),
            "H4" => Ok(Self::Hours4),
            "D" => Ok(Self::Days1),
            "W" => Ok(Self::Weeks1),
            "MN" => Ok(Self::Months1),
            _ => Err(TypesError::InvalidInterval(code.to_string())),
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::Minutes1 => "M",
            Self::Minutes3 => "M3",
            Self::Minutes5 => "M5",
            Self::Minutes15 => "M15",
            Self::Minutes30 => "M30",
            Self::Hours1 => "H",
            Self::Hours4 => "H4",
            Self::Days1 => "D",
            Self::Weeks1 => "W",
            Self::Months1 => "MN",
        }
    }

    /// Get all intervals in ascending granularity
    pub fn all() -> Vec<Self> {
        vec![
            Self::Minutes1,
            Self::Minutes3,
            Self::Minutes5,
            Self::Minutes15,
            Self::Minutes30,
            Self::Hours1,
            Self::Hours4,
            Self::Days1,
            Self::Weeks1,
            Self::Months1,
        ]
    }
}

impl FromStr for KlineInterval {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
    }
}

impl fmt::Display for KlineInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            Self::Minutes1 => "1 minute",
            Self::Minutes3 => "3 minutes",
            Self::Minutes5 => "5 minutes",
            Self::Minutes15 => "15 minutes",
            Self::Minutes30 => "30 minutes",
            Self::Hours1 => "1 hour",
            Self::Hours4 => "4 hours",
            Self::Days1 => "1 day",
            Self::Weeks1 => "1 week",
            Self::Months1 => "1 month",
        };
        write!(f, "{}", description)
    }
}
