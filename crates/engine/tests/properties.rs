use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use engine::{
    CATEGORY_LIMIT, COST_CENTER_LIMIT, Engine, EngineConfig, EngineError, LedgerEntry,
    MemoryLedger, Money, PageRequest, Runway, Scope,
};

#[derive(Clone, Debug)]
struct Row {
    income: bool,
    cents: i64,
    month: u32,
    day: u32,
    category: u8,
    cost_center: u8,
}

fn row() -> impl Strategy<Value = Row> {
    (any::<bool>(), 0i64..10_000_000, 1u32..=12, 1u32..=28, 0u8..30, 0u8..20).prop_map(
        |(income, cents, month, day, category, cost_center)| Row {
            income,
            cents,
            month,
            day,
            category,
            cost_center,
        },
    )
}

fn to_entries(rows: &[Row]) -> Vec<LedgerEntry> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| LedgerEntry {
            id: format!("e{i}"),
            date: Utc
                .with_ymd_and_hms(2024, row.month, row.day, 12, 0, 0)
                .unwrap(),
            raw_type: if row.income { "Ingreso" } else { "Gasto" }.to_string(),
            amount: Decimal::new(row.cents, 2).to_string(),
            amount_converted: None,
            category: Some(engine::CategoryRef::Id(format!("cat-{}", row.category))),
            cost_center: Some(format!("CC-{}", row.cost_center)),
            description: None,
        })
        .collect()
}

fn report_for(rows: &[Row]) -> engine::Report {
    Engine::builder()
        .ledger(MemoryLedger::new(to_entries(rows)))
        .config(EngineConfig::sequential())
        .build()
        .unwrap()
        .generate_report(&Scope::All, None, PageRequest::default())
        .unwrap()
}

proptest! {
    #[test]
    fn summing_cents_is_exact(cents in prop::collection::vec(0i64..1_000_000, 0..200)) {
        let total = Money::checked_sum(cents.iter().map(|c| Money::new(Decimal::new(*c, 2))));
        let expected: i64 = cents.iter().sum();
        prop_assert_eq!(total.map(Money::amount), Some(Decimal::new(expected, 2)));
    }

    #[test]
    fn net_balance_is_income_minus_expenses(rows in prop::collection::vec(row(), 0..60)) {
        let report = report_for(&rows);
        let totals = report.totals;
        prop_assert_eq!(
            Some(totals.net_balance),
            totals.total_income.checked_sub(totals.total_expenses)
        );

        let monthly_income = Money::checked_sum(report.monthly.iter().map(|b| b.income));
        let monthly_expenses = Money::checked_sum(report.monthly.iter().map(|b| b.expenses));
        prop_assert_eq!(monthly_income, Some(totals.total_income));
        prop_assert_eq!(monthly_expenses, Some(totals.total_expenses));
    }

    #[test]
    fn health_score_stays_in_bounds(rows in prop::collection::vec(row(), 0..60)) {
        let report = report_for(&rows);
        prop_assert!(report.health.health_score <= 100);
        prop_assert_eq!(report.health.runway_projection.len(), 19);
        prop_assert!(report
            .health
            .runway_projection
            .iter()
            .all(|point| !point.balance.is_negative()));
    }

    #[test]
    fn rankings_are_truncated(rows in prop::collection::vec(row(), 0..120)) {
        let report = report_for(&rows);
        prop_assert!(report.income_by_category.len() <= CATEGORY_LIMIT);
        prop_assert!(report.expenses_by_category.len() <= CATEGORY_LIMIT);
        prop_assert!(report.income_by_cost_center.len() <= COST_CENTER_LIMIT);
        prop_assert!(report.expenses_by_cost_center.len() <= COST_CENTER_LIMIT);
    }

    #[test]
    fn runway_is_infinite_whenever_not_burning(rows in prop::collection::vec(row(), 0..60)) {
        let report = report_for(&rows);
        let burning = report.health.burn_rate.net.is_positive();
        prop_assert_eq!(!burning, report.health.runway == Runway::Infinite);
    }

    #[test]
    fn oversized_amounts_never_panic(
        rows in prop::collection::vec(row(), 1..20),
        units in prop::collection::vec(0u128..100_000_000_000_000_000_000u128, 1..6),
    ) {
        let mut entries = to_entries(&rows);
        for (i, units) in units.iter().enumerate() {
            let mut entry = entries[i % entries.len()].clone();
            entry.id = format!("big{i}");
            entry.amount = format!("{units}.999999");
            entries.push(entry);
        }
        let result = Engine::builder()
            .ledger(MemoryLedger::new(entries))
            .config(EngineConfig::sequential())
            .build()
            .unwrap()
            .generate_report(&Scope::All, None, PageRequest::default());
        match result {
            Ok(report) => prop_assert!(report.health.health_score <= 100),
            Err(err) => prop_assert!(
                matches!(err, EngineError::MalformedEntry { .. }),
                "unexpected error {err:?}"
            ),
        }
    }
}
