//! Health metrics and the 0–100 composite score.
//!
//! The score is the sum of three sub-scores, each capped at its maximum and
//! rounded once at the end:
//!
//! | component | range    | rule                                                    |
//! |-----------|----------|---------------------------------------------------------|
//! | runway    | 0–40     | 40 if infinite or ≥ 18 periods, else `runway / 12 * 40` |
//! | margin    | 0–30     | 30 if ≥ 50%, `15 + margin / 50 * 15` if ≥ 0, else 0     |
//! | trend     | 15 or 30 | 30 if the last 3 months' average net ≥ the 3 before     |

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::{
    Money, MonthlyBucket, ResultEngine, Totals,
    projection::{
        self, BurnRate, ProjectionPoint, ROLLING_WINDOW, Runway, burn_rate, cash_runway,
        gross_profit_margin, mean, rolling_averages, runway_projection,
    },
};

const RUNWAY_MAX: Decimal = dec!(40);
const MARGIN_MAX: Decimal = dec!(30);
const TREND_UP: Decimal = dec!(30);
const TREND_DOWN: Decimal = dec!(15);

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthMetrics {
    pub runway: Runway,
    pub burn_rate: BurnRate,
    /// Gross profit margin in percent.
    pub profit_margin: Decimal,
    pub avg_monthly_income: Money,
    pub avg_monthly_expense: Money,
    pub health_score: u8,
    pub runway_projection: Vec<ProjectionPoint>,
}

/// Compute every health metric from the period totals and monthly buckets.
pub fn health_metrics(totals: &Totals, monthly: &[MonthlyBucket]) -> ResultEngine<HealthMetrics> {
    let averages = rolling_averages(monthly, totals)?;
    let burn = burn_rate(&averages)?;
    let runway = cash_runway(totals.net_balance, burn.net)?;
    let margin = gross_profit_margin(totals)?;
    let projection = runway_projection(totals.net_balance, burn.net)?;

    Ok(HealthMetrics {
        runway,
        burn_rate: burn,
        profit_margin: margin,
        avg_monthly_income: averages.income,
        avg_monthly_expense: averages.expense,
        health_score: health_score(runway, margin, monthly)?,
        runway_projection: projection,
    })
}

pub fn health_score(runway: Runway, margin: Decimal, monthly: &[MonthlyBucket]) -> ResultEngine<u8> {
    let total = runway_score(runway) + margin_score(margin) + trend_score(monthly)?;
    Ok(total
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u8()
        .unwrap_or_default())
}

pub fn runway_score(runway: Runway) -> Decimal {
    match runway {
        Runway::Infinite => RUNWAY_MAX,
        Runway::Finite(months) if months >= Decimal::from(projection::PROJECTION_MONTHS) => {
            RUNWAY_MAX
        }
        Runway::Finite(months) => (months / dec!(12) * RUNWAY_MAX)
            .min(RUNWAY_MAX)
            .max(Decimal::ZERO),
    }
}

pub fn margin_score(margin: Decimal) -> Decimal {
    if margin >= dec!(50) {
        MARGIN_MAX
    } else if margin >= Decimal::ZERO {
        dec!(15) + margin / dec!(50) * dec!(15)
    } else {
        Decimal::ZERO
    }
}

/// Binary: 30 when the recent window is at least as good as the one before
/// it, 15 otherwise. An empty window averages to zero.
pub fn trend_score(monthly: &[MonthlyBucket]) -> ResultEngine<Decimal> {
    let split = monthly.len().saturating_sub(ROLLING_WINDOW);
    let last = &monthly[split..];
    let previous = &monthly[split.saturating_sub(ROLLING_WINDOW)..split];

    Ok(if average_net(last)? >= average_net(previous)? {
        TREND_UP
    } else {
        TREND_DOWN
    })
}

fn average_net(window: &[MonthlyBucket]) -> ResultEngine<Money> {
    if window.is_empty() {
        return Ok(Money::ZERO);
    }
    mean(window.iter().map(|bucket| bucket.net))
}
