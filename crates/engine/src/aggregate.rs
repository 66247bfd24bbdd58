//! Aggregation of normalized entries into totals, period buckets and
//! rankings.
//!
//! Every function here is a pure fold over a slice of entries, so the report
//! can run them side by side.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::{
    CategoryRef, EngineError, EntryKind, MAX_AMOUNT, Money, NormalizedEntry, ResultEngine,
    YearMonth,
    source::Catalog,
    util::id_suffix,
};

/// Maximum rows in a category ranking.
pub const CATEGORY_LIMIT: usize = 15;
/// Maximum rows in a cost-center ranking.
pub const COST_CENTER_LIMIT: usize = 10;
/// Label for entries without a cost center (or without any category).
pub const UNDEFINED_LABEL: &str = "Sin definir";

const INCOME_PALETTE: [&str; 8] = [
    "#2E7D32", "#43A047", "#66BB6A", "#00897B", "#26A69A", "#1E88E5", "#42A5F5", "#7CB342",
];
const EXPENSE_PALETTE: [&str; 8] = [
    "#C62828", "#E53935", "#EF5350", "#D84315", "#F4511E", "#FB8C00", "#AD1457", "#8E24AA",
];

/// Income, expenses and their difference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub total_income: Money,
    pub total_expenses: Money,
    pub net_balance: Money,
}

impl Totals {
    fn record(&mut self, entry: &NormalizedEntry) -> ResultEngine<()> {
        let (total, net) = match entry.kind {
            EntryKind::Income => (
                self.total_income.checked_add(entry.amount),
                self.net_balance.checked_add(entry.amount),
            ),
            EntryKind::Expense => (
                self.total_expenses.checked_add(entry.amount),
                self.net_balance.checked_sub(entry.amount),
            ),
        };
        let (Some(total), Some(net)) = (total, net) else {
            return Err(out_of_range(entry));
        };
        match entry.kind {
            EntryKind::Income => self.total_income = total,
            EntryKind::Expense => self.total_expenses = total,
        }
        self.net_balance = net;
        Ok(())
    }

    /// Profit of the period (same as `net_balance`).
    pub fn profit(&self) -> Money {
        self.net_balance
    }
}

/// Income, expenses and net (income - expenses) of one period.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PeriodBucket<K> {
    pub period: K,
    pub income: Money,
    pub expenses: Money,
    pub net: Money,
}

impl<K> PeriodBucket<K> {
    fn empty(period: K) -> Self {
        Self {
            period,
            income: Money::ZERO,
            expenses: Money::ZERO,
            net: Money::ZERO,
        }
    }

    fn record(&mut self, entry: &NormalizedEntry) -> ResultEngine<()> {
        let mut totals = Totals {
            total_income: self.income,
            total_expenses: self.expenses,
            net_balance: self.net,
        };
        totals.record(entry)?;
        self.income = totals.total_income;
        self.expenses = totals.total_expenses;
        self.net = totals.net_balance;
        Ok(())
    }
}

pub type MonthlyBucket = PeriodBucket<YearMonth>;
pub type DailyBucket = PeriodBucket<NaiveDate>;

/// One row of a category or cost-center ranking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    /// Identity of the group (category id or cost-center code, empty when
    /// undefined).
    pub key: String,
    pub name: String,
    pub value: Money,
    pub color: String,
}

/// A running sum left the range of [`Money::checked_add`]. Reported against
/// the entry whose amount pushed it out.
fn out_of_range(entry: &NormalizedEntry) -> EngineError {
    EngineError::MalformedEntry {
        id: entry.id.clone(),
        reason: format!("running total reaches the supported limit of {MAX_AMOUNT}"),
    }
}

/// Totals of a set of entries.
///
/// Fails with [`EngineError::MalformedEntry`] when a running sum would leave
/// the exact range of [`Money`].
pub fn totals<'a, I>(entries: I) -> ResultEngine<Totals>
where
    I: IntoIterator<Item = &'a NormalizedEntry>,
{
    entries
        .into_iter()
        .try_fold(Totals::default(), |mut totals, entry| {
            totals.record(entry)?;
            Ok(totals)
        })
}

/// Totals restricted to one calendar month.
pub fn month_totals(entries: &[NormalizedEntry], month: YearMonth) -> ResultEngine<Totals> {
    totals(entries.iter().filter(|entry| month.contains(entry.day())))
}

/// One bucket per month present in `entries`, oldest first. Months without
/// entries are not synthesized.
pub fn monthly_breakdown(entries: &[NormalizedEntry]) -> ResultEngine<Vec<MonthlyBucket>> {
    let mut months = BTreeMap::new();
    for entry in entries {
        let month = YearMonth::of(entry.day());
        months
            .entry(month)
            .or_insert_with(|| MonthlyBucket::empty(month))
            .record(entry)?;
    }
    Ok(months.into_values().collect())
}

/// One bucket per calendar day of `month`, zero-filled. Entries outside the
/// month are ignored.
pub fn daily_breakdown(
    entries: &[NormalizedEntry],
    month: YearMonth,
) -> ResultEngine<Vec<DailyBucket>> {
    let first = month.first_day();
    let mut days: Vec<DailyBucket> = first
        .iter_days()
        .take(month.days() as usize)
        .map(DailyBucket::empty)
        .collect();

    for entry in entries {
        let day = entry.day();
        if !month.contains(day) {
            continue;
        }
        if let Some(bucket) = days.get_mut(day.day0() as usize) {
            bucket.record(entry)?;
        }
    }
    Ok(days)
}

/// Ranking of categories for one entry kind, largest first, top
/// [`CATEGORY_LIMIT`].
pub fn category_breakdown(
    entries: &[NormalizedEntry],
    kind: EntryKind,
    catalog: &dyn Catalog,
) -> ResultEngine<Vec<RankedEntry>> {
    let groups = group_by(entries, kind, |entry| {
        entry
            .category
            .as_ref()
            .map(|category| category.id().to_string())
    })?;

    let rows = groups
        .into_iter()
        .map(|group| {
            let (name, explicit_color) = category_label(group.sample.category.as_ref(), catalog);
            RankedEntry {
                color: explicit_color.unwrap_or_else(|| palette_color(kind, &group.key)),
                key: group.key,
                name,
                value: group.value,
            }
        })
        .collect();

    Ok(rank(rows, Order::Descending, CATEGORY_LIMIT))
}

/// Ranking of cost centers for one entry kind, top [`COST_CENTER_LIMIT`].
///
/// Income is sorted largest first while expenses are sorted smallest first.
/// Reports downstream rely on that ordering.
pub fn cost_center_breakdown(
    entries: &[NormalizedEntry],
    kind: EntryKind,
    catalog: &dyn Catalog,
) -> ResultEngine<Vec<RankedEntry>> {
    let groups = group_by(entries, kind, |entry| entry.cost_center.clone())?;

    let rows = groups
        .into_iter()
        .map(|group| {
            let item = group
                .sample
                .cost_center
                .as_deref()
                .and_then(|code| catalog.cost_center(code));
            let name = match (&group.sample.cost_center, item) {
                (None, _) => UNDEFINED_LABEL.to_string(),
                (Some(_), Some(item)) => item.name.clone(),
                (Some(code), None) => code.clone(),
            };
            RankedEntry {
                color: item
                    .and_then(|item| item.color.clone())
                    .unwrap_or_else(|| palette_color(kind, &group.key)),
                key: group.key,
                name,
                value: group.value,
            }
        })
        .collect();

    let order = match kind {
        EntryKind::Income => Order::Descending,
        EntryKind::Expense => Order::Ascending,
    };
    Ok(rank(rows, order, COST_CENTER_LIMIT))
}

/// Display color for a group without an explicit one: a palette entry chosen
/// by kind and a stable hash of the identity.
pub fn palette_color(kind: EntryKind, identity: &str) -> String {
    let palette: &[&str] = match kind {
        EntryKind::Income => &INCOME_PALETTE,
        EntryKind::Expense => &EXPENSE_PALETTE,
    };
    let index = (fnv1a(identity.as_bytes()) as usize) % palette.len();
    palette[index].to_string()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Order {
    Ascending,
    Descending,
}

/// Stable sort then truncate. Ties keep first-seen order.
pub(crate) fn rank(mut rows: Vec<RankedEntry>, order: Order, limit: usize) -> Vec<RankedEntry> {
    match order {
        Order::Descending => rows.sort_by(|a, b| b.value.cmp(&a.value)),
        Order::Ascending => rows.sort_by(|a, b| a.value.cmp(&b.value)),
    }
    rows.truncate(limit);
    rows
}

struct Group<'a> {
    /// Category id or cost-center code, empty for the undefined group.
    key: String,
    value: Money,
    sample: &'a NormalizedEntry,
}

/// Sum entries of `kind` per key, keeping groups in first-seen order. A
/// `None` key is its own group, distinct from any present key.
fn group_by<'a, F>(
    entries: &'a [NormalizedEntry],
    kind: EntryKind,
    key_of: F,
) -> ResultEngine<Vec<Group<'a>>>
where
    F: Fn(&NormalizedEntry) -> Option<String>,
{
    let mut index: HashMap<Option<String>, usize> = HashMap::new();
    let mut groups: Vec<Group<'a>> = Vec::new();

    for entry in entries.iter().filter(|entry| entry.kind == kind) {
        let key = key_of(entry);
        match index.get(&key) {
            Some(&position) => {
                let group = &mut groups[position];
                group.value = group
                    .value
                    .checked_add(entry.amount)
                    .ok_or_else(|| out_of_range(entry))?;
            }
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group {
                    key: key.unwrap_or_default(),
                    value: entry.amount,
                    sample: entry,
                });
            }
        }
    }
    Ok(groups)
}

/// Label and explicit color of a category reference. The embedded document
/// wins over the catalog.
fn category_label(
    category: Option<&CategoryRef>,
    catalog: &dyn Catalog,
) -> (String, Option<String>) {
    let Some(category) = category else {
        return (UNDEFINED_LABEL.to_string(), None);
    };

    let (embedded_name, embedded_color) = match category {
        CategoryRef::Id(_) => (None, None),
        CategoryRef::Embedded { name, color, .. } => (name.clone(), color.clone()),
    };
    let item = catalog.category(category.id());

    let name = embedded_name
        .filter(|name| !name.trim().is_empty())
        .or_else(|| item.map(|item| item.name.clone()))
        .unwrap_or_else(|| format!("Ref: {}", id_suffix(category.id(), 6)));
    let color = embedded_color.or_else(|| item.and_then(|item| item.color.clone()));
    (name, color)
}

fn fnv1a(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0x811c_9dc5_u32, |hash, byte| {
        (hash ^ u32::from(*byte)).wrapping_mul(0x0100_0193)
    })
}
