//! Rwandan franc amounts and their display forms.
//!
//! RWF has no minor unit in everyday use, so amounts are whole francs held in
//! an `i64` and never rendered with decimals.

use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

const CURRENCY_CODE: &str = "RWF";

/// An amount of Rwandan francs.
///
/// # Examples
/// ```
/// use icumbi::domain::Rwf;
///
/// let total: Rwf = [Rwf::new(100_000), Rwf::new(50_000)].into_iter().sum();
/// assert_eq!(total.formatted(), "RWF 150,000");
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Rwf(i64);

impl Rwf {
    /// Zero francs.
    pub const ZERO: Self = Self(0);

    /// Wrap a whole-franc amount.
    #[must_use]
    pub const fn new(amount: i64) -> Self {
        Self(amount)
    }

    /// The raw amount in francs.
    #[must_use]
    pub const fn amount(self) -> i64 {
        self.0
    }

    /// True when the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Subtract, flooring at zero. Used for balances that cannot go negative.
    #[must_use]
    pub const fn saturating_balance(self, paid: Self) -> Self {
        if paid.0 >= self.0 {
            Self::ZERO
        } else {
            Self(self.0 - paid.0)
        }
    }

    /// Display form, e.g. `RWF 150,000`.
    #[must_use]
    pub fn formatted(self) -> String {
        format_currency(self.0)
    }
}

impl Add for Rwf {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Rwf {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Rwf {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Rwf {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Rwf> for Rwf {
    fn sum<I: Iterator<Item = &'a Rwf>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl std::fmt::Display for Rwf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_currency(self.0))
    }
}

/// Render an amount as `RWF 1,234,567`.
///
/// Negative amounts keep the sign in front of the currency code.
///
/// # Examples
/// ```
/// use icumbi::domain::format_currency;
///
/// assert_eq!(format_currency(150_000), "RWF 150,000");
/// assert_eq!(format_currency(0), "RWF 0");
/// assert_eq!(format_currency(-1_500), "-RWF 1,500");
/// ```
#[must_use]
pub fn format_currency(amount: i64) -> String {
    let grouped = group_thousands(amount.unsigned_abs());
    if amount < 0 {
        format!("-{CURRENCY_CODE} {grouped}")
    } else {
        format!("{CURRENCY_CODE} {grouped}")
    }
}

/// Short dashboard form: `1.5M`, `150K`, `950`.
///
/// One decimal place is kept only when it is non-zero.
#[must_use]
pub fn format_compact(amount: i64) -> String {
    const THOUSAND: u64 = 1_000;
    const MILLION: u64 = 1_000_000;

    let sign = if amount < 0 { "-" } else { "" };
    let magnitude = amount.unsigned_abs();

    if magnitude < THOUSAND {
        return format!("{sign}{magnitude}");
    }

    let thousands_tenths = rounded_tenths(magnitude, THOUSAND);
    let (tenths, suffix) = if magnitude >= MILLION || thousands_tenths >= 10_000 {
        (rounded_tenths(magnitude, MILLION), 'M')
    } else {
        (thousands_tenths, 'K')
    };

    let whole = tenths / 10;
    let fraction = tenths % 10;
    if fraction == 0 {
        format!("{sign}{whole}{suffix}")
    } else {
        format!("{sign}{whole}.{fraction}{suffix}")
    }
}

/// Render a percentage with one decimal place, e.g. `87.5%`.
#[must_use]
pub fn format_percentage(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.1}%")
    } else {
        "0.0%".to_owned()
    }
}

fn rounded_tenths(magnitude: u64, unit: u64) -> u64 {
    let tenths = (u128::from(magnitude) * 10 + u128::from(unit / 2)) / u128::from(unit);
    u64::try_from(tenths).unwrap_or(u64::MAX)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
