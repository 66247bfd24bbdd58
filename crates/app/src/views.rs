//! Conversion of engine results into wire types.
use api_types::{
    EntryKind,
    creator::CreatorProfitability,
    report::{
        EntryPage, EntryView, Health, PeriodBucket, ProjectionPoint, RankedEntry, ReportView,
        Totals,
    },
};
use engine::{HealthMetrics, NormalizedEntry, Page, Report};

fn totals(totals: &engine::Totals) -> Totals {
    Totals {
        total_income: totals.total_income.to_string(),
        total_expenses: totals.total_expenses.to_string(),
        net_balance: totals.net_balance.to_string(),
    }
}

fn bucket<K: ToString>(bucket: &engine::PeriodBucket<K>) -> PeriodBucket {
    PeriodBucket {
        period: bucket.period.to_string(),
        income: bucket.income.to_string(),
        expenses: bucket.expenses.to_string(),
        net: bucket.net.to_string(),
    }
}

fn ranked(rows: &[engine::RankedEntry]) -> Vec<RankedEntry> {
    rows.iter()
        .map(|row| RankedEntry {
            key: row.key.clone(),
            name: row.name.clone(),
            value: row.value.to_string(),
            color: row.color.clone(),
        })
        .collect()
}

fn health(health: &HealthMetrics) -> Health {
    Health {
        runway_months: health.runway.months().map(|months| months.round_dp(2).to_string()),
        gross_burn: health.burn_rate.gross.to_string(),
        net_burn: health.burn_rate.net.to_string(),
        profit_margin: health.profit_margin.round_dp(2).to_string(),
        avg_monthly_income: health.avg_monthly_income.to_string(),
        avg_monthly_expense: health.avg_monthly_expense.to_string(),
        health_score: health.health_score,
        runway_projection: health
            .runway_projection
            .iter()
            .map(|point| ProjectionPoint {
                month: point.month,
                label: point.label.clone(),
                balance: point.balance.to_string(),
            })
            .collect(),
    }
}

fn entry(entry: &NormalizedEntry) -> EntryView {
    EntryView {
        id: entry.id.clone(),
        date: entry.date,
        kind: match entry.kind {
            engine::EntryKind::Income => EntryKind::Income,
            engine::EntryKind::Expense => EntryKind::Expense,
        },
        amount: entry.amount.to_string(),
        category: entry.category.as_ref().map(|category| category.id().to_string()),
        cost_center: entry.cost_center.clone(),
        description: entry.description.clone(),
    }
}

fn entries(page: &Page<NormalizedEntry>) -> EntryPage {
    EntryPage {
        items: page.items.iter().map(entry).collect(),
        page: page.page,
        page_size: page.page_size,
        total_items: page.total_items,
        total_pages: page.total_pages,
    }
}

pub fn report(report: &Report) -> ReportView {
    ReportView {
        from: report.range.map(|range| range.start),
        to: report.range.map(|range| range.end),
        reference_month: report.reference_month.map(|month| month.to_string()),
        totals: totals(&report.totals),
        current_month: totals(&report.current_month),
        previous_month: totals(&report.previous_month),
        monthly: report.monthly.iter().map(bucket).collect(),
        daily: report.daily.iter().map(bucket).collect(),
        income_by_category: ranked(&report.income_by_category),
        expenses_by_category: ranked(&report.expenses_by_category),
        income_by_cost_center: ranked(&report.income_by_cost_center),
        expenses_by_cost_center: ranked(&report.expenses_by_cost_center),
        health: health(&report.health),
        entries: entries(&report.entries),
    }
}

pub fn creator(creator_id: &str, rows: &[engine::RankedEntry]) -> CreatorProfitability {
    CreatorProfitability {
        creator_id: creator_id.to_string(),
        cost_centers: ranked(rows),
    }
}
