//! Burn rate, cash runway and the forward balance projection.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::{EngineError, Money, MonthlyBucket, ResultEngine, Totals};

/// Number of most recent monthly buckets the averages look at.
pub const ROLLING_WINDOW: usize = 3;
/// Last month of the projection (months `0..=PROJECTION_MONTHS`).
pub const PROJECTION_MONTHS: u32 = 18;

/// Periods until the balance reaches zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "months", rename_all = "snake_case")]
pub enum Runway {
    Finite(Decimal),
    /// Not burning cash net of income.
    Infinite,
}

impl Runway {
    pub fn is_infinite(&self) -> bool {
        matches!(self, Self::Infinite)
    }

    pub fn months(&self) -> Option<Decimal> {
        match self {
            Self::Finite(months) => Some(*months),
            Self::Infinite => None,
        }
    }
}

/// Average monthly flows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MonthlyAverages {
    pub income: Money,
    pub expense: Money,
}

/// Gross burn is the average monthly expense; net burn subtracts the average
/// monthly income (positive = burning cash).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BurnRate {
    pub gross: Money,
    pub net: Money,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProjectionPoint {
    pub month: u32,
    pub label: String,
    pub balance: Money,
}

fn overflow(what: &str) -> EngineError {
    EngineError::InvalidAmount(format!("{what} overflow"))
}

/// Arithmetic mean of a window of amounts, rounded like
/// [`Money::checked_div`]. The intermediate sum is not bounded by
/// [`crate::MAX_AMOUNT`], only by the `Decimal` range.
pub(crate) fn mean<I>(values: I) -> ResultEngine<Money>
where
    I: IntoIterator<Item = Money>,
{
    let (sum, count) = values
        .into_iter()
        .try_fold((Decimal::ZERO, 0_usize), |(sum, count), value| {
            Some((sum.checked_add(value.amount())?, count + 1))
        })
        .ok_or_else(|| overflow("average"))?;
    Money::new(sum).checked_div(Decimal::from(count))
}

/// Averages over the last [`ROLLING_WINDOW`] monthly buckets. With no bucket
/// at all the period totals are divided by one.
pub fn rolling_averages(monthly: &[MonthlyBucket], totals: &Totals) -> ResultEngine<MonthlyAverages> {
    if monthly.is_empty() {
        return Ok(MonthlyAverages {
            income: totals.total_income,
            expense: totals.total_expenses,
        });
    }

    let window = &monthly[monthly.len().saturating_sub(ROLLING_WINDOW)..];
    Ok(MonthlyAverages {
        income: mean(window.iter().map(|bucket| bucket.income))?,
        expense: mean(window.iter().map(|bucket| bucket.expenses))?,
    })
}

pub fn burn_rate(averages: &MonthlyAverages) -> ResultEngine<BurnRate> {
    let net = averages
        .expense
        .amount()
        .checked_sub(averages.income.amount())
        .ok_or_else(|| overflow("burn rate"))?;
    Ok(BurnRate {
        gross: averages.expense,
        net: Money::new(net),
    })
}

/// `net_balance / net_burn` when burning cash, infinite otherwise.
pub fn cash_runway(net_balance: Money, net_burn: Money) -> ResultEngine<Runway> {
    if !net_burn.is_positive() {
        return Ok(Runway::Infinite);
    }
    Ok(Runway::Finite(net_balance.ratio(net_burn)?))
}

/// `(income - expenses) / income * 100`, or 0 without income.
pub fn gross_profit_margin(totals: &Totals) -> ResultEngine<Decimal> {
    if !totals.total_income.is_positive() {
        return Ok(Decimal::ZERO);
    }
    let share = totals.net_balance.ratio(totals.total_income)?;
    share
        .checked_mul(dec!(100))
        .ok_or_else(|| overflow("margin"))
}

/// Balance for months `0..=18`, never below zero. Always 19 points, even
/// with an infinite runway.
pub fn runway_projection(net_balance: Money, net_burn: Money) -> ResultEngine<Vec<ProjectionPoint>> {
    (0..=PROJECTION_MONTHS)
        .map(|month| {
            let balance = net_burn
                .checked_mul(Decimal::from(month))
                .and_then(|burned| net_balance.amount().checked_sub(burned.amount()))
                .ok_or_else(|| overflow("projection"))?;
            let label = if month == 0 {
                "today".to_string()
            } else {
                format!("Month {month}")
            };
            Ok(ProjectionPoint {
                month,
                label,
                balance: Money::new(balance).max(Money::ZERO),
            })
        })
        .collect()
}
