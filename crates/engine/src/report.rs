//! Report assembly: one pass over the scoped entries produces every section.

use serde::Serialize;

use crate::{
    DailyBucket, DateRange, EngineConfig, EntryKind, MonthlyBucket, NormalizedEntry, RankedEntry,
    ResultEngine, Totals, YearMonth,
    aggregate::{
        category_breakdown, cost_center_breakdown, daily_breakdown, month_totals,
        monthly_breakdown, totals,
    },
    health::{HealthMetrics, health_metrics},
    source::Catalog,
};

/// One page of a list. Pages are 1-based.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// Slice `items` into the requested page. Page 0 is read as page 1; a page
/// past the end is empty.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size);
    let start = (page - 1).saturating_mul(page_size).min(total_items);
    let end = start.saturating_add(page_size).min(total_items);

    Page {
        items: items[start..end].to_vec(),
        page,
        page_size,
        total_items,
        total_pages,
    }
}

/// The complete financial report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Report {
    pub range: Option<DateRange>,
    /// Month used for the daily breakdown and month totals. `None` when the
    /// scope has no entries and no range.
    pub reference_month: Option<YearMonth>,
    pub totals: Totals,
    pub current_month: Totals,
    pub previous_month: Totals,
    pub monthly: Vec<MonthlyBucket>,
    pub daily: Vec<DailyBucket>,
    pub income_by_category: Vec<RankedEntry>,
    pub expenses_by_category: Vec<RankedEntry>,
    pub income_by_cost_center: Vec<RankedEntry>,
    pub expenses_by_cost_center: Vec<RankedEntry>,
    pub health: HealthMetrics,
    /// Detail list, newest first.
    pub entries: Page<NormalizedEntry>,
}

/// Pagination request for the detail list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: Option<usize>,
}

struct Breakdowns {
    monthly: Vec<MonthlyBucket>,
    daily: Vec<DailyBucket>,
    income_by_category: Vec<RankedEntry>,
    expenses_by_category: Vec<RankedEntry>,
    income_by_cost_center: Vec<RankedEntry>,
    expenses_by_cost_center: Vec<RankedEntry>,
    current_month: Totals,
    previous_month: Totals,
}

/// Build a report from entries that already belong to the scope and range.
pub fn build_report(
    entries: &[NormalizedEntry],
    range: Option<DateRange>,
    request: PageRequest,
    catalog: &dyn Catalog,
    config: &EngineConfig,
) -> ResultEngine<Report> {
    let reference_month = reference_month(entries, range);
    let parallel = config.should_parallelize(entries.len());
    tracing::debug!(
        entries = entries.len(),
        parallel,
        month = ?reference_month,
        "building report"
    );

    let totals = totals(entries)?;
    let breakdowns = breakdowns(entries, reference_month, catalog, parallel)?;
    let health = health_metrics(&totals, &breakdowns.monthly)?;

    let mut detail = entries.to_vec();
    detail.sort_by(|a, b| b.date.cmp(&a.date));
    let page_size = config.page_size_for(request.page_size);

    Ok(Report {
        range,
        reference_month,
        totals,
        current_month: breakdowns.current_month,
        previous_month: breakdowns.previous_month,
        monthly: breakdowns.monthly,
        daily: breakdowns.daily,
        income_by_category: breakdowns.income_by_category,
        expenses_by_category: breakdowns.expenses_by_category,
        income_by_cost_center: breakdowns.income_by_cost_center,
        expenses_by_cost_center: breakdowns.expenses_by_cost_center,
        health,
        entries: paginate(&detail, request.page, page_size),
    })
}

/// Month of the range end when a range is given, otherwise the month of the
/// newest entry.
fn reference_month(entries: &[NormalizedEntry], range: Option<DateRange>) -> Option<YearMonth> {
    match range {
        Some(range) => Some(YearMonth::of(range.end)),
        None => entries.iter().map(NormalizedEntry::day).max().map(YearMonth::of),
    }
}

fn breakdowns(
    entries: &[NormalizedEntry],
    month: Option<YearMonth>,
    catalog: &dyn Catalog,
    parallel: bool,
) -> ResultEngine<Breakdowns> {
    let daily_for = |month: Option<YearMonth>| match month {
        Some(month) if !entries.is_empty() => daily_breakdown(entries, month),
        _ => Ok(Vec::new()),
    };
    let month_totals_for = |month: Option<YearMonth>| match month {
        Some(month) => join(
            parallel,
            || month_totals(entries, month),
            || month_totals(entries, month.previous()),
        ),
        None => (Ok(Totals::default()), Ok(Totals::default())),
    };

    let ((monthly, daily), ((categories, cost_centers), (current_month, previous_month))) = join(
        parallel,
        || join(parallel, || monthly_breakdown(entries), || daily_for(month)),
        || {
            join(
                parallel,
                || {
                    join(
                        parallel,
                        || {
                            join(
                                parallel,
                                || category_breakdown(entries, EntryKind::Income, catalog),
                                || category_breakdown(entries, EntryKind::Expense, catalog),
                            )
                        },
                        || {
                            join(
                                parallel,
                                || cost_center_breakdown(entries, EntryKind::Income, catalog),
                                || cost_center_breakdown(entries, EntryKind::Expense, catalog),
                            )
                        },
                    )
                },
                || month_totals_for(month),
            )
        },
    );

    Ok(Breakdowns {
        monthly: monthly?,
        daily: daily?,
        income_by_category: categories.0?,
        expenses_by_category: categories.1?,
        income_by_cost_center: cost_centers.0?,
        expenses_by_cost_center: cost_centers.1?,
        current_month: current_month?,
        previous_month: previous_month?,
    })
}

/// Run both closures, on the rayon pool when `parallel` is set.
fn join<A, B, RA, RB>(parallel: bool, a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA + Send,
    B: FnOnce() -> RB + Send,
    RA: Send,
    RB: Send,
{
    if parallel {
        rayon::join(a, b)
    } else {
        (a(), b())
    }
}
