use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Signed money amount represented as **integer minor units** (cents).
///
/// Use this type for **all** monetary values in the engine (expense amounts,
/// shares, balances, settlement transfers) to avoid floating-point drift.
/// Groups are mono-currency, so no currency travels with the value.
/// Arithmetic saturates at the `i64` bounds instead of overflowing; expense
/// amounts are capped by [`Expense::MAX_AMOUNT`](crate::Expense::MAX_AMOUNT).
///
/// The value is signed:
/// - positive = the group owes this member / a credit
/// - negative = this member owes the group / a debit
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 2 decimals):
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!("10".parse::<Money>().unwrap().cents(), 1000);
/// assert_eq!("10,5".parse::<Money>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<Money>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Splits the amount into `parts` shares that sum exactly to `self`.
    ///
    /// Every share gets `self / parts`; the leftover cents go one each to the
    /// first shares. Returns `None` when `parts` is 0 or the amount is
    /// negative.
    ///
    /// ```rust
    /// use engine::Money;
    ///
    /// let shares = Money::new(100).split_evenly(3).unwrap();
    /// assert_eq!(shares, vec![Money::new(34), Money::new(33), Money::new(33)]);
    /// ```
    #[must_use]
    pub fn split_evenly(self, parts: usize) -> Option<Vec<Money>> {
        if parts == 0 || self.0 < 0 {
            return None;
        }
        let parts_i64 = i64::try_from(parts).ok()?;
        let base = self.0 / parts_i64;
        let leftover = usize::try_from(self.0 % parts_i64).ok()?;

        Some(
            (0..parts)
                .map(|idx| {
                    if idx < leftover {
                        Money(base + 1)
                    } else {
                        Money(base)
                    }
                })
                .collect(),
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(self.0.saturating_neg())
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a decimal amount such as `12`, `-3.5` or `12,50` into cents.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| EngineError::InvalidAmount(format!("{reason}: {s:?}"));

        let raw = s.trim();
        let (negative, digits) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw.strip_prefix('+').unwrap_or(raw)),
        };
        let (units, fraction) = digits.split_once(['.', ',']).unwrap_or((digits, ""));

        let decimal = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if units.is_empty() || !decimal(units) || !decimal(fraction) {
            return Err(invalid("not a decimal amount"));
        }
        if fraction.len() > 2 {
            return Err(invalid("more than two decimals"));
        }

        let cents: i64 = format!("{fraction:0<2}")
            .parse()
            .map_err(|_| invalid("not a decimal amount"))?;
        let total = units
            .parse::<i64>()
            .ok()
            .and_then(|units| units.checked_mul(100))
            .and_then(|units| units.checked_add(cents))
            .ok_or_else(|| invalid("amount too large"))?;

        Ok(Money(if negative { -total } else { total }))
    }
}
