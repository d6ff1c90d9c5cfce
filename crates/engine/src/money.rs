use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};

use crate::Currency;

/// Signed money amount represented as integer **minor units**.
///
/// Use this type for **all** monetary values in the engine (expense amounts,
/// shares, paid/owed totals, balances, transfers) so that every split is exact
/// and the sum of balances is exactly zero.
///
/// # Examples
///
/// ```rust
/// use engine::{Currency, Money};
///
/// let amount = Money::new(10_050);
/// assert_eq!(amount.minor(), 10050);
/// assert_eq!(amount.display(Currency::Eur).to_string(), "100.50 EUR");
/// assert_eq!(amount.display(Currency::Krw).to_string(), "10050 KRW");
/// ```
///
/// Splitting keeps every unit:
///
/// ```rust
/// use engine::Money;
///
/// let (each, remainder) = Money::new(100).split(3).unwrap();
/// assert_eq!((each.minor(), remainder.minor()), (33, 1));
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from integer minor units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
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

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Addition clamped to the `i64` range.
    #[must_use]
    pub const fn saturating_add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }

    /// Subtraction clamped to the `i64` range.
    #[must_use]
    pub const fn saturating_sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }

    /// Magnitude of the amount, `None` for `i64::MIN`.
    #[must_use]
    pub fn checked_abs(self) -> Option<Money> {
        self.0.checked_abs().map(Money)
    }

    /// Divides the amount into `parts` equal shares.
    ///
    /// Returns `(share, remainder)` with `share * parts + remainder == self`
    /// and `0 <= remainder < parts`, or `None` when `parts` is 0. Uses
    /// euclidean division so negative amounts (refunds) are conserved as well.
    #[must_use]
    pub fn split(self, parts: usize) -> Option<(Money, Money)> {
        let parts = i64::try_from(parts).ok().filter(|parts| *parts > 0)?;
        Some((
            Money(self.0.div_euclid(parts)),
            Money(self.0.rem_euclid(parts)),
        ))
    }

    /// Formats the amount in major units of `currency`.
    #[must_use]
    pub fn display(self, currency: Currency) -> MoneyDisplay {
        MoneyDisplay {
            amount: self,
            currency,
        }
    }
}

/// Helper returned by [`Money::display`].
#[derive(Clone, Copy, Debug)]
pub struct MoneyDisplay {
    amount: Money,
    currency: Currency,
}

impl fmt::Display for MoneyDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.amount.is_negative() { "-" } else { "" };
        let abs = self.amount.0.unsigned_abs();
        let digits = u32::from(self.currency.minor_units());
        if digits == 0 {
            return write!(f, "{sign}{abs} {}", self.currency.code());
        }
        let scale = 10u64.pow(digits);
        let major = abs / scale;
        let minor = abs % scale;
        let width = digits as usize;
        write!(f, "{sign}{major}.{minor:0width$} {}", self.currency.code())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

/// Saturates instead of overflowing; [`audit`](crate::audit) reports ledgers
/// whose sums leave the `i64` range.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Money::saturating_add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_currency_minor_units() {
        assert_eq!(Money::new(0).display(Currency::Eur).to_string(), "0.00 EUR");
        assert_eq!(Money::new(5).display(Currency::Usd).to_string(), "0.05 USD");
        assert_eq!(
            Money::new(-1050).display(Currency::Eur).to_string(),
            "-10.50 EUR"
        );
        assert_eq!(
            Money::new(15_000).display(Currency::Krw).to_string(),
            "15000 KRW"
        );
    }

    #[test]
    fn split_keeps_every_unit() {
        assert_eq!(
            Money::new(100).split(3),
            Some((Money::new(33), Money::new(1)))
        );
        assert_eq!(Money::new(90).split(3), Some((Money::new(30), Money::ZERO)));
        assert_eq!(Money::new(2).split(5), Some((Money::ZERO, Money::new(2))));
    }

    #[test]
    fn split_negative_amount_is_conserved() {
        let (each, remainder) = Money::new(-100).split(3).unwrap();
        assert_eq!(each, Money::new(-34));
        assert_eq!(remainder, Money::new(2));
        assert_eq!(Money::new(each.minor() * 3) + remainder, Money::new(-100));
    }

    #[test]
    fn split_into_zero_parts_is_none() {
        assert_eq!(Money::new(100).split(0), None);
    }

    #[test]
    fn sums_iterators() {
        let total: Money = [Money::new(1), Money::new(-3), Money::new(7)].iter().sum();
        assert_eq!(total, Money::new(5));
    }

    #[test]
    fn overflow_is_checked_or_clamped() {
        let big = Money::new(i64::MAX / 2 + 1);
        assert_eq!(big.checked_add(big), None);
        assert_eq!(big.saturating_add(big), Money::new(i64::MAX));
        assert_eq!(Money::new(i64::MIN).checked_abs(), None);
        assert_eq!(Money::new(-5).checked_abs(), Some(Money::new(5)));
        let total: Money = [big, big, Money::new(-1)].into_iter().sum();
        assert_eq!(total, Money::new(i64::MAX - 1));
    }
}
