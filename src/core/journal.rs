//! Activity journal for connector operations.
//!
//! Every connector reports trade actions and failures through a [`Journal`]. The
//! default [`TracingJournal`] turns entries into `tracing` events; tests plug in a
//! [`MemoryJournal`] to assert on what was reported.

use crate::core::types::{Price, Quantity};
use serde::Serialize;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Info,
    Error,
    Buy,
    Sell,
    Cancel,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Info => "info",
            Self::Error => "error",
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::Cancel => "cancel",
        };
        f.write_str(tag)
    }
}

/// One journal line: a kind tag, price/amount context (zero when not applicable) and a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalEntry {
    pub kind: EntryKind,
    pub price: Price,
    pub amount: Quantity,
    pub message: String,
}

impl JournalEntry {
    pub fn new(
        kind: EntryKind,
        price: Price,
        amount: Quantity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            price,
            amount,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(EntryKind::Info, Price::ZERO, Quantity::ZERO, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(EntryKind::Error, Price::ZERO, Quantity::ZERO, message)
    }
}

/// Sink for connector activity
pub trait Journal: Send + Sync {
    fn record(&self, entry: JournalEntry);
}

/// Journal that emits `tracing` events tagged with the exchange category
#[derive(Debug, Clone)]
pub struct TracingJournal {
    category: String,
}

impl TracingJournal {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
        }
    }
}

impl Journal for TracingJournal {
    fn record(&self, entry: JournalEntry) {
        match entry.kind {
            EntryKind::Error => error!(
                category = %self.category,
                kind = %entry.kind,
                price = %entry.price,
                amount = %entry.amount,
                "{}",
                entry.message
            ),
            _ => info!(
                category = %self.category,
                kind = %entry.kind,
                price = %entry.price,
                amount = %entry.amount,
                "{}",
                entry.message
            ),
        }
    }
}

/// In-memory journal, mostly for tests and for callers that poll for failure detail
#[derive(Debug, Default)]
pub struct MemoryJournal {
    entries: Mutex<Vec<JournalEntry>>,
}

impl MemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<JournalEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn entries_of(&self, kind: EntryKind) -> Vec<JournalEntry> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.kind == kind)
            .collect()
    }
}

impl Journal for MemoryJournal {
    fn record(&self, entry: JournalEntry) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }
}
