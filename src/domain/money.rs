use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Money is stored as integer cents so totals and round trips stay exact.
/// 1 unit = 100 cents, so 50.00 = 5000 cents.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);
    pub const MAX: Amount = Amount(i64::MAX);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// `None` when the result does not fit.
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }
}

/// Formats as `units.cc`, e.g. 1250 -> "12.50", -1 -> "-0.01".
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        // pad() so width/alignment flags apply to the whole number
        f.pad(&format!("{}{}.{:02}", sign, abs / 100, abs % 100))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseAmountError {
    #[error("amount is empty")]
    Empty,

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("'{0}' has more than two decimal places")]
    TooPrecise(String),

    #[error("'{0}' is too large")]
    Overflow(String),
}

/// Accepts `12`, `12.5`, `12.50`, `.75` and a leading sign.
impl FromStr for Amount {
    type Err = ParseAmountError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ParseAmountError::Empty);
        }

        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let (units_str, frac_str) = digits.split_once('.').unwrap_or((digits, ""));
        let not_a_number = || ParseAmountError::NotANumber(trimmed.to_string());

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if units_str.is_empty() && frac_str.is_empty() {
            return Err(not_a_number());
        }
        if !all_digits(units_str) || !all_digits(frac_str) {
            return Err(not_a_number());
        }
        if frac_str.len() > 2 {
            return Err(ParseAmountError::TooPrecise(trimmed.to_string()));
        }

        let overflow = || ParseAmountError::Overflow(trimmed.to_string());
        let units: i64 = if units_str.is_empty() {
            0
        } else {
            units_str.parse().map_err(|_| overflow())?
        };
        let frac: i64 = match frac_str.len() {
            0 => 0,
            1 => frac_str.parse::<i64>().map_err(|_| not_a_number())? * 10,
            _ => frac_str.parse().map_err(|_| not_a_number())?,
        };

        let cents = units
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac))
            .ok_or_else(overflow)?;
        Ok(Amount(if negative { -cents } else { cents }))
    }
}
