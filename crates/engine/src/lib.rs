//! Financial health and analytics engine.
//!
//! Turns a ledger of dated income/expense entries into totals, monthly and
//! daily breakdowns, category and cost-center rankings, a 0–100 health score,
//! a burn-rate estimate and an 18-month runway projection.
//!
//! The engine owns no data: entries come from a [`LedgerSource`], display
//! metadata from a [`Catalog`] and creator ownership from a
//! [`CreatorDirectory`].
//!
//! ```rust
//! use engine::{Engine, MemoryLedger, Scope, PageRequest};
//!
//! let engine = Engine::builder()
//!     .ledger(MemoryLedger::default())
//!     .build()
//!     .unwrap();
//! let report = engine
//!     .generate_report(&Scope::All, None, PageRequest::default())
//!     .unwrap();
//! assert!(report.health.runway.is_infinite());
//! ```

pub use aggregate::{
    CATEGORY_LIMIT, COST_CENTER_LIMIT, DailyBucket, MonthlyBucket, PeriodBucket, RankedEntry,
    Totals, UNDEFINED_LABEL,
};
pub use config::{DEFAULT_PAGE_SIZE, EngineConfig};
pub use entry::{CategoryRef, EntryKind, LedgerEntry, NormalizedEntry};
pub use error::EngineError;
pub use health::HealthMetrics;
pub use money::{MAX_AMOUNT, MAX_SCALE, Money};
pub use period::{DateRange, YearMonth};
pub use projection::{BurnRate, ProjectionPoint, Runway};
pub use report::{Page, PageRequest, Report};
pub use source::{
    Catalog, CatalogItem, CreatorDirectory, LedgerQuery, LedgerSource, MemoryCatalog,
    MemoryLedger, Scope,
};

pub mod aggregate;
mod config;
pub mod entry;
mod error;
pub mod health;
mod money;
mod period;
pub mod projection;
pub mod report;
mod source;
mod util;

type ResultEngine<T> = Result<T, EngineError>;

pub struct Engine {
    ledger: Box<dyn LedgerSource>,
    catalog: Box<dyn Catalog>,
    creators: Box<dyn CreatorDirectory>,
    config: EngineConfig,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generate the full report for a scope and optional inclusive date
    /// range.
    ///
    /// Fails with [`EngineError::MalformedEntry`] when any entry in scope has
    /// an unparseable amount; never returns a partial report.
    pub fn generate_report(
        &self,
        scope: &Scope,
        range: Option<DateRange>,
        request: PageRequest,
    ) -> ResultEngine<Report> {
        let query = LedgerQuery {
            scope: scope.clone(),
            range,
        };
        let entries = self.scoped_entries(&query)?;
        report::build_report(&entries, range, request, self.catalog.as_ref(), &self.config)
    }

    /// Rank a creator's cost centers by profit (income - expenses), highest
    /// first. Unknown creators get an empty ranking.
    pub fn generate_creator_profitability(&self, creator_id: &str) -> ResultEngine<Vec<RankedEntry>> {
        let mut codes = self.creators.cost_centers(creator_id)?;
        let mut seen = std::collections::HashSet::new();
        codes.retain(|code| seen.insert(code.clone()));
        tracing::debug!(creator_id, cost_centers = codes.len(), "creator profitability");

        let mut rows = Vec::with_capacity(codes.len());
        for code in codes {
            let query = LedgerQuery {
                scope: Scope::CostCenters(vec![code.clone()]),
                range: None,
            };
            let entries = self.scoped_entries(&query)?;
            let profit = aggregate::totals(&entries)?.profit();

            let item = self.catalog.cost_center(&code);
            let kind = if profit.is_negative() {
                EntryKind::Expense
            } else {
                EntryKind::Income
            };
            rows.push(RankedEntry {
                name: item.map_or_else(|| code.clone(), |item| item.name.clone()),
                color: item
                    .and_then(|item| item.color.clone())
                    .unwrap_or_else(|| aggregate::palette_color(kind, &code)),
                key: code,
                value: profit,
            });
        }

        Ok(aggregate::rank(rows, aggregate::Order::Descending, usize::MAX))
    }

    /// Fetch, normalize and re-check entries against the query. The store
    /// is trusted for nothing but the data itself.
    fn scoped_entries(&self, query: &LedgerQuery) -> ResultEngine<Vec<NormalizedEntry>> {
        let raw = self.ledger.entries(query)?;
        let mut entries: Vec<NormalizedEntry> = entry::normalize_all(&raw)?
            .into_iter()
            .filter(|entry| query.matches(entry.day(), entry.cost_center.as_deref()))
            .collect();
        entries.sort_by_key(|entry| entry.date);
        tracing::debug!(
            fetched = raw.len(),
            in_scope = entries.len(),
            "ledger entries normalized"
        );
        Ok(entries)
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    ledger: Option<Box<dyn LedgerSource>>,
    catalog: Option<Box<dyn Catalog>>,
    creators: Option<Box<dyn CreatorDirectory>>,
    config: EngineConfig,
}

impl EngineBuilder {
    /// Pass the required ledger source
    pub fn ledger(mut self, ledger: impl LedgerSource + 'static) -> EngineBuilder {
        self.ledger = Some(Box::new(ledger));
        self
    }

    /// Pass the category/cost-center lookup (defaults to an empty catalog)
    pub fn catalog(mut self, catalog: impl Catalog + 'static) -> EngineBuilder {
        self.catalog = Some(Box::new(catalog));
        self
    }

    /// Pass the creator directory (defaults to an empty directory)
    pub fn creators(mut self, creators: impl CreatorDirectory + 'static) -> EngineBuilder {
        self.creators = Some(Box::new(creators));
        self
    }

    pub fn config(mut self, config: EngineConfig) -> EngineBuilder {
        self.config = config;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> ResultEngine<Engine> {
        let ledger = self
            .ledger
            .ok_or_else(|| EngineError::Source("missing ledger source".to_string()))?;
        Ok(Engine {
            ledger,
            catalog: self
                .catalog
                .unwrap_or_else(|| Box::new(MemoryCatalog::default())),
            creators: self
                .creators
                .unwrap_or_else(|| Box::new(MemoryCatalog::default())),
            config: self.config,
        })
    }
}
