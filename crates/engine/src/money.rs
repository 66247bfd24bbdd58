use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Most fractional digits an amount may carry.
pub const MAX_SCALE: u32 = 6;

/// Exclusive bound on the magnitude of any amount or running total.
///
/// Together with [`MAX_SCALE`] it keeps every sum, difference and ratio the
/// engine derives inside the 28 significant digits of a `Decimal`.
pub const MAX_AMOUNT: Decimal = dec!(100000000000000000000);

/// Signed base-currency amount backed by an exact decimal.
///
/// Use this type for **all** monetary values in the engine (entry amounts,
/// totals, averages, projections) to avoid floating-point drift. There are
/// no `+`/`-` operators: sums go through [`Money::checked_add`] and
/// [`Money::checked_sub`], which refuse to overflow or drop digits.
/// `to_f64` exists only for presentation.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let a: Money = "10.10".parse().unwrap();
/// let b: Money = "0.05".parse().unwrap();
/// let sum = a.checked_add(b).and_then(|sum| sum.checked_sub(b)).unwrap();
/// assert_eq!(sum.to_string(), "10.10");
/// ```
///
/// Parsing accepts `.` or `,` as decimal separator and an optional sign:
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!("10,5".parse::<Money>().unwrap().to_string(), "10.5");
/// assert!("12a".parse::<Money>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Wraps an exact decimal value.
    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying decimal.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` if the amount is strictly greater than zero.
    ///
    /// Every division in the engine is guarded by this check.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Exact addition (returns `None` when the result would reach
    /// [`MAX_AMOUNT`] or lose fractional digits).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        Self::exact(self, rhs, self.0.checked_add(rhs.0)?)
    }

    /// Exact subtraction, same rules as [`Money::checked_add`].
    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        Self::exact(self, rhs, self.0.checked_sub(rhs.0)?)
    }

    /// Exact sum of many amounts (`None` under the same rules as
    /// [`Money::checked_add`]).
    pub fn checked_sum<I>(values: I) -> Option<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        values
            .into_iter()
            .try_fold(Money::ZERO, |acc, value| acc.checked_add(value))
    }

    fn exact(lhs: Money, rhs: Money, result: Decimal) -> Option<Money> {
        let scale = lhs.0.scale().max(rhs.0.scale());
        (result.abs() < MAX_AMOUNT && result.scale() >= scale).then_some(Money(result))
    }

    /// Multiplies by an exact factor (returns `None` on overflow).
    #[must_use]
    pub fn checked_mul(self, factor: Decimal) -> Option<Money> {
        self.0.checked_mul(factor).map(Money)
    }

    /// Divides the amount by a plain count, rounding half away from zero to
    /// [`MAX_SCALE`] digits so the quotient can be summed again.
    ///
    /// Fails with [`EngineError::DivisionByZero`] when `divisor` is zero.
    pub fn checked_div(self, divisor: Decimal) -> ResultEngine<Money> {
        if divisor.is_zero() {
            return Err(EngineError::DivisionByZero);
        }
        self.0
            .checked_div(divisor)
            .map(|quotient| {
                Money(quotient.round_dp_with_strategy(
                    MAX_SCALE,
                    RoundingStrategy::MidpointAwayFromZero,
                ))
            })
            .ok_or_else(|| EngineError::InvalidAmount("division overflow".to_string()))
    }

    /// Ratio between two amounts (`self / rhs`), e.g. periods of runway.
    ///
    /// Fails with [`EngineError::DivisionByZero`] when `rhs` is zero.
    pub fn ratio(self, rhs: Money) -> ResultEngine<Decimal> {
        if rhs.is_zero() {
            return Err(EngineError::DivisionByZero);
        }
        self.0
            .checked_div(rhs.0)
            .ok_or_else(|| EngineError::InvalidAmount("division overflow".to_string()))
    }

    /// Lossy conversion for charts and other presentation layers.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a decimal string.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    ///
    /// Validation rules:
    /// - digits only around a single separator (rejects `1e3`, `1.2.3`)
    /// - rejects empty/invalid strings
    /// - at most [`MAX_SCALE`] significant fractional digits
    /// - magnitude below [`MAX_AMOUNT`]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::InvalidAmount("empty amount".to_string());
        let invalid = || EngineError::InvalidAmount(format!("invalid amount: {s}"));

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let rest = rest.trim().replace(',', ".");
        if rest.is_empty() {
            return Err(empty());
        }

        let mut parts = rest.split('.');
        let units = parts.next().ok_or_else(invalid)?;
        let fraction = parts.next().unwrap_or("");
        if parts.next().is_some() {
            return Err(invalid());
        }
        if units.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !units.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let fraction = if fraction.len() > MAX_SCALE as usize {
            fraction.trim_end_matches('0')
        } else {
            fraction
        };
        if fraction.len() > MAX_SCALE as usize {
            return Err(EngineError::InvalidAmount(format!(
                "more than {MAX_SCALE} decimal places: {s}"
            )));
        }

        let canonical = match (units.is_empty(), fraction.is_empty()) {
            (_, true) => units.to_string(),
            (true, false) => format!("0.{fraction}"),
            (false, false) => format!("{units}.{fraction}"),
        };
        let out_of_range = || EngineError::InvalidAmount(format!("amount out of range: {s}"));
        let value = Decimal::from_str_exact(&canonical).map_err(|_| out_of_range())?;
        if value >= MAX_AMOUNT {
            return Err(out_of_range());
        }

        Ok(Money(if negative { -value } else { value }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(value: &str) -> Money {
        value.parse().unwrap()
    }

    #[test]
    fn add_then_subtract_is_exact() {
        let result = money("10.10")
            .checked_add(money("0.05"))
            .and_then(|sum| sum.checked_sub(money("0.05")))
            .unwrap();
        assert_eq!(result.to_string(), "10.10");
        assert_eq!(result, money("10.10"));
    }

    #[test]
    fn repeated_accumulation_does_not_drift() {
        let total = Money::checked_sum(std::iter::repeat_n(money("0.1"), 1000)).unwrap();
        assert_eq!(total, money("100"));
    }

    #[test]
    fn addition_refuses_to_leave_the_range() {
        let big = money("60000000000000000000");
        assert_eq!(big.checked_add(big), None);
        assert_eq!(Money::ZERO.checked_sub(big).and_then(|n| n.checked_sub(big)), None);
        assert_eq!(
            big.checked_add(money("0.000001")),
            Some(money("60000000000000000000.000001"))
        );
    }

    #[test]
    fn addition_refuses_to_drop_digits() {
        let wide = Money::new(dec!(12345678901234567890.12345678));
        let tiny = Money::new(dec!(0.000000001));
        assert_eq!(wide.checked_add(tiny), None);
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!(money("10").amount(), dec!(10));
        assert_eq!(money("10.5").amount(), dec!(10.5));
        assert_eq!(money("10,50").amount(), dec!(10.50));
        assert_eq!(money("-0.01").amount(), dec!(-0.01));
        assert_eq!(money("+1.00").amount(), dec!(1.00));
        assert_eq!(money("  2.30 ").amount(), dec!(2.30));
        assert_eq!(money(".5").amount(), dec!(0.5));
        assert_eq!(money("1234.56789").amount(), dec!(1234.56789));
        assert_eq!(money("1.250000000").amount(), dec!(1.25));
    }

    #[test]
    fn parse_rejects_garbage() {
        for raw in ["", "  ", "-", "abc", "1.2.3", "1e3", "12a", ".", "1 000"] {
            assert!(raw.parse::<Money>().is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn parse_bounds_scale_and_magnitude() {
        assert!("0.0000001".parse::<Money>().is_err());
        assert!("100000000000000000000".parse::<Money>().is_err());
        assert!("-100000000000000000000".parse::<Money>().is_err());
        assert!("50000000000000000000000000000".parse::<Money>().is_err());
        assert!("7922816251426433759354395.0335".parse::<Money>().is_err());
        assert_eq!(
            money("99999999999999999999.999999").amount(),
            dec!(99999999999999999999.999999)
        );
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert_eq!(
            money("10").checked_div(Decimal::ZERO),
            Err(EngineError::DivisionByZero)
        );
        assert_eq!(
            money("10").ratio(Money::ZERO),
            Err(EngineError::DivisionByZero)
        );
    }

    #[test]
    fn divide_and_multiply() {
        assert_eq!(money("10").checked_div(dec!(4)).unwrap(), money("2.5"));
        assert_eq!(money("10").checked_div(dec!(3)).unwrap(), money("3.333333"));
        assert_eq!(money("600").ratio(money("200")).unwrap(), dec!(3));
        assert_eq!(money("2.5").checked_mul(dec!(3)).unwrap(), money("7.5"));
    }

    #[test]
    fn sign_helpers() {
        assert!(money("0.01").is_positive());
        assert!(!Money::ZERO.is_positive());
        assert!(money("-3").is_negative());
        assert_eq!(Money::ZERO.max(money("-3")), Money::ZERO);
        assert_eq!(money("12.5").to_f64(), 12.5);
    }
}
