//! Seams to the collaborators that own the data.
//!
//! The engine never stores or fetches records itself. It asks a
//! [`LedgerSource`] for entries, a [`Catalog`] for display names and colors,
//! and a [`CreatorDirectory`] for the cost centers a creator is tied to.
//! In-memory implementations are provided for the CLI and tests.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{DateRange, LedgerEntry, ResultEngine, util::cost_center_code};

/// Which cost centers a report covers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    #[default]
    All,
    /// Only entries booked on one of these cost-center codes. Entries with
    /// no cost center are excluded.
    CostCenters(Vec<String>),
}

impl Scope {
    pub fn contains(&self, cost_center: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::CostCenters(codes) => {
                cost_center.is_some_and(|code| codes.iter().any(|c| c == code))
            }
        }
    }
}

/// Filter handed to the ledger store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LedgerQuery {
    pub scope: Scope,
    pub range: Option<DateRange>,
}

impl LedgerQuery {
    /// Returns `true` when an entry with this date and (resolved) cost center
    /// belongs to the query.
    pub fn matches(&self, day: NaiveDate, cost_center: Option<&str>) -> bool {
        self.range.is_none_or(|range| range.contains(day)) && self.scope.contains(cost_center)
    }

    pub fn matches_entry(&self, entry: &LedgerEntry) -> bool {
        let code = cost_center_code(entry.cost_center.as_deref());
        self.matches(entry.date.date_naive(), code.as_deref())
    }
}

/// Display metadata for a category or cost center.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Ledger query interface.
pub trait LedgerSource: Send + Sync {
    /// Entries matching `query`, in any order.
    fn entries(&self, query: &LedgerQuery) -> ResultEngine<Vec<LedgerEntry>>;
}

/// Category and cost-center lookup.
pub trait Catalog: Send + Sync {
    fn category(&self, id: &str) -> Option<&CatalogItem>;
    fn cost_center(&self, code: &str) -> Option<&CatalogItem>;
}

/// Creator to cost-center resolution.
pub trait CreatorDirectory: Send + Sync {
    fn cost_centers(&self, creator_id: &str) -> ResultEngine<Vec<String>>;
}

/// Ledger kept in memory, e.g. loaded from a file.
#[derive(Clone, Debug, Default)]
pub struct MemoryLedger {
    entries: Vec<LedgerEntry>,
}

impl MemoryLedger {
    pub fn new(entries: Vec<LedgerEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl LedgerSource for MemoryLedger {
    fn entries(&self, query: &LedgerQuery) -> ResultEngine<Vec<LedgerEntry>> {
        let mut matching: Vec<LedgerEntry> = self
            .entries
            .iter()
            .filter(|entry| query.matches_entry(entry))
            .cloned()
            .collect();
        matching.sort_by_key(|entry| entry.date);
        Ok(matching)
    }
}

/// Catalog and creator directory kept in memory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryCatalog {
    pub categories: HashMap<String, CatalogItem>,
    pub cost_centers: HashMap<String, CatalogItem>,
    /// Creator id to the cost-center codes it owns, in display order.
    pub creators: HashMap<String, Vec<String>>,
}

impl Catalog for MemoryCatalog {
    fn category(&self, id: &str) -> Option<&CatalogItem> {
        self.categories.get(id)
    }

    fn cost_center(&self, code: &str) -> Option<&CatalogItem> {
        self.cost_centers.get(code)
    }
}

impl CreatorDirectory for MemoryCatalog {
    fn cost_centers(&self, creator_id: &str) -> ResultEngine<Vec<String>> {
        Ok(self.creators.get(creator_id).cloned().unwrap_or_default())
    }
}
