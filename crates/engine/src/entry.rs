//! Ledger entries as supplied by the store, and their normalized form.
//!
//! The store hands over entries with free-form type labels and amounts as
//! decimal strings. [`normalize`] turns each one into a [`NormalizedEntry`]
//! carrying a canonical [`EntryKind`] and an exact reference [`Money`] amount.
use core::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, Money, ResultEngine,
    util::{cost_center_code, fold_label},
};

/// Labels (after normalization) that classify an entry as income.
const INCOME_LABELS: [&str; 2] = ["income", "ingreso"];

/// Canonical entry type. Every label outside the income synonyms is an
/// expense.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Classify a raw ledger label.
    pub fn from_label(label: &str) -> Self {
        let key = fold_label(label);
        if INCOME_LABELS.contains(&key.as_str()) {
            Self::Income
        } else {
            Self::Expense
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category reference on a ledger entry: either a bare identifier to look up
/// in the catalog or the category document embedded by the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Id(String),
    Embedded {
        id: String,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        color: Option<String>,
    },
}

impl CategoryRef {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) | Self::Embedded { id, .. } => id,
        }
    }
}

/// Represent a movement as stored in the ledger. Read-only to the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: String,
    pub date: DateTime<Utc>,
    /// Free-form type label, e.g. `"income"`, `"Ingreso"`, `"gasto"`.
    #[serde(rename = "type")]
    pub raw_type: String,
    /// Amount in the entry currency.
    pub amount: String,
    /// Amount converted to the base currency, when the entry was in another
    /// currency.
    #[serde(default)]
    pub amount_converted: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub cost_center: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl LedgerEntry {
    /// Canonical type of the entry.
    pub fn kind(&self) -> EntryKind {
        EntryKind::from_label(&self.raw_type)
    }

    /// Base-currency amount: the converted value when present, the raw one
    /// otherwise. A present but unparseable converted value is an error, it
    /// never falls back.
    pub fn reference_amount(&self) -> ResultEngine<Money> {
        let raw = match self.amount_converted.as_deref() {
            Some(converted) if !converted.trim().is_empty() => converted,
            _ => self.amount.as_str(),
        };
        raw.parse::<Money>().map_err(|err| EngineError::MalformedEntry {
            id: self.id.clone(),
            reason: err.to_string(),
        })
    }
}

/// An entry after type and amount resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NormalizedEntry {
    pub id: String,
    pub date: DateTime<Utc>,
    pub kind: EntryKind,
    pub amount: Money,
    pub category: Option<CategoryRef>,
    /// Cost-center code, `None` when missing or `"undefined"`.
    pub cost_center: Option<String>,
    pub description: Option<String>,
}

impl NormalizedEntry {
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }
}

/// Normalize a single ledger entry. Pure; fails fast on malformed amounts.
pub fn normalize(entry: &LedgerEntry) -> ResultEngine<NormalizedEntry> {
    let amount = entry.reference_amount()?;
    Ok(NormalizedEntry {
        id: entry.id.clone(),
        date: entry.date,
        kind: entry.kind(),
        amount,
        category: entry.category.clone(),
        cost_center: cost_center_code(entry.cost_center.as_deref()),
        description: entry.description.clone(),
    })
}

/// Normalize a batch, stopping at the first malformed entry.
pub fn normalize_all(entries: &[LedgerEntry]) -> ResultEngine<Vec<NormalizedEntry>> {
    entries
        .iter()
        .map(|entry| {
            normalize(entry).inspect_err(|err| {
                tracing::warn!("rejecting ledger batch: {err}");
            })
        })
        .collect()
}
