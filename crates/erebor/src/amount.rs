//! Exact monetary amounts in minor units
//!
//! Amounts are stored as a signed count of hundredths. Floating point never
//! touches a balance: `"0.10" + "0.20"` is exactly `"0.30"`.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AmountError;

/// Minor units per major unit.
pub const MINOR_PER_MAJOR: i64 = 100;

/// A monetary amount, exact to two decimal places.
///
/// # Example
///
/// ```
/// use erebor::Amount;
///
/// let a: Amount = "12.5".parse().unwrap();
/// assert_eq!(a.minor(), 1250);
/// assert_eq!(a.to_string(), "12.50");
/// assert_eq!(a + Amount::from_major(1), "13.50".parse().unwrap());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    /// The zero amount.
    pub const ZERO: Amount = Amount(0);

    /// Create an amount from minor units (hundredths).
    pub const fn from_minor(minor: i64) -> Self {
        Amount(minor)
    }

    /// Create an amount from whole major units.
    ///
    /// Saturates at the representable range.
    pub const fn from_major(major: i64) -> Self {
        Amount(major.saturating_mul(MINOR_PER_MAJOR))
    }

    /// The raw count of minor units.
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Strictly greater than zero.
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Strictly less than zero.
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Exactly zero.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Addition that returns `None` on overflow.
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Subtraction that returns `None` on overflow.
    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Parsing and Formatting
// ═══════════════════════════════════════════════════════════════════════

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(AmountError::Empty);
        }

        let (negative, unsigned) = match text.as_bytes()[0] {
            b'-' => (true, &text[1..]),
            b'+' => (false, &text[1..]),
            _ => (false, text),
        };

        let (whole, fraction) = match unsigned.split_once('.') {
            Some((w, f)) => (w, Some(f)),
            None => (unsigned, None),
        };

        let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(whole) {
            return Err(AmountError::Malformed(s.to_string()));
        }

        let cents = match fraction {
            None => 0,
            Some(f) if !all_digits(f) => return Err(AmountError::Malformed(s.to_string())),
            Some(f) if f.len() > 2 => return Err(AmountError::TooPrecise(s.to_string())),
            Some(f) => {
                // "5" means 50 hundredths, "05" means 5
                let value: i64 = f.parse().map_err(|_| AmountError::Malformed(s.to_string()))?;
                if f.len() == 1 {
                    value * 10
                } else {
                    value
                }
            }
        };

        // Wider than i64 so that i64::MIN has a magnitude
        let overflow = || AmountError::Overflow(s.to_string());
        let major: i128 = whole.parse().map_err(|_| overflow())?;
        let magnitude = major
            .checked_mul(i128::from(MINOR_PER_MAJOR))
            .and_then(|m| m.checked_add(i128::from(cents)))
            .ok_or_else(overflow)?;
        let minor = if negative { -magnitude } else { magnitude };

        i64::try_from(minor).map(Amount).map_err(|_| overflow())
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per = MINOR_PER_MAJOR as u64;
        f.pad(&format!("{}{}.{:02}", sign, abs / per, abs % per))
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Arithmetic
// ═══════════════════════════════════════════════════════════════════════

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0 + rhs.0)
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        Amount(self.0 - rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Amount) {
        self.0 -= rhs.0;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Amount {
        iter.copied().sum()
    }
}
