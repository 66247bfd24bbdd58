//! Wire types for reports printed or served by `folio`.
//!
//! Money travels as decimal strings so no precision is lost on the way to a
//! JSON consumer.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Income,
    Expense,
}

pub mod report {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Totals {
        pub total_income: String,
        pub total_expenses: String,
        pub net_balance: String,
    }

    /// Income and expenses of one month (`YYYY-MM`) or one day
    /// (`YYYY-MM-DD`).
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PeriodBucket {
        pub period: String,
        pub income: String,
        pub expenses: String,
        pub net: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RankedEntry {
        pub key: String,
        pub name: String,
        pub value: String,
        pub color: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProjectionPoint {
        pub month: u32,
        pub label: String,
        pub balance: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Health {
        /// Months until the balance reaches zero; `null` when not burning.
        pub runway_months: Option<String>,
        pub gross_burn: String,
        /// Positive when burning cash.
        pub net_burn: String,
        /// Gross profit margin in percent.
        pub profit_margin: String,
        pub avg_monthly_income: String,
        pub avg_monthly_expense: String,
        pub health_score: u8,
        pub runway_projection: Vec<ProjectionPoint>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct EntryView {
        pub id: String,
        pub date: DateTime<Utc>,
        pub kind: EntryKind,
        pub amount: String,
        pub category: Option<String>,
        pub cost_center: Option<String>,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct EntryPage {
        pub items: Vec<EntryView>,
        /// 1-based.
        pub page: usize,
        pub page_size: usize,
        pub total_items: usize,
        pub total_pages: usize,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ReportView {
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
        /// `YYYY-MM`, absent for an empty unbounded report.
        pub reference_month: Option<String>,
        pub totals: Totals,
        pub current_month: Totals,
        pub previous_month: Totals,
        pub monthly: Vec<PeriodBucket>,
        pub daily: Vec<PeriodBucket>,
        pub income_by_category: Vec<RankedEntry>,
        pub expenses_by_category: Vec<RankedEntry>,
        pub income_by_cost_center: Vec<RankedEntry>,
        pub expenses_by_cost_center: Vec<RankedEntry>,
        pub health: Health,
        pub entries: EntryPage,
    }
}

pub mod creator {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CreatorProfitability {
        pub creator_id: String,
        /// Cost centers ranked by profit, highest first.
        pub cost_centers: Vec<report::RankedEntry>,
    }
}
