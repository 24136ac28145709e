use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Number of decimal places carried by an `Integer`
pub const PRECISION: usize = 8;

const UNIT: u128 = 100_000_000;

/// An exact, non-negative fixed-point amount with `PRECISION` decimal places
///
/// Stored as a count of the smallest unit (10^-8). All arithmetic is checked: an amount
/// never wraps or loses precision.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Integer(u128);

/// Error returned when parsing a decimal amount
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ParseIntegerError {
    /// The string is empty
    #[error("Empty amount")]
    Empty,

    /// A part holds something other than decimal digits, signs included
    #[error("Invalid digit in amount")]
    InvalidDigit,

    /// More than `PRECISION` fractional digits
    #[error("Amount has more than {} decimal places", PRECISION)]
    Precision,

    /// The amount does not fit
    #[error("Amount is too large")]
    Overflow,
}

impl Integer {
    /// An amount of `whole` coins
    pub fn new(whole: u64) -> Self {
        Integer(u128::from(whole) * UNIT)
    }
    /// The zero amount
    pub fn zero() -> Self {
        Integer(0)
    }
    /// An amount of `units` times 10^-8
    pub fn from_units(units: u128) -> Self {
        Integer(units)
    }
    /// The amount as a count of 10^-8 units
    pub fn units(&self) -> u128 {
        self.0
    }

    /// Returns `None` on overflow
    pub fn checked_add(self, other: Integer) -> Option<Integer> {
        self.0.checked_add(other.0).map(Integer)
    }
    /// Returns `None` if `other` is larger
    pub fn checked_sub(self, other: Integer) -> Option<Integer> {
        self.0.checked_sub(other.0).map(Integer)
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:08}", self.0 / UNIT, self.0 % UNIT)
    }
}

fn parse_digits(digits: &str) -> Result<u128, ParseIntegerError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseIntegerError::InvalidDigit);
    }
    digits.parse().map_err(|_| ParseIntegerError::Overflow)
}

impl FromStr for Integer {
    type Err = ParseIntegerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseIntegerError::Empty);
        }

        let mut parts = s.splitn(2, '.');
        let whole = parse_digits(parts.next().unwrap_or_default())?;
        let fraction = match parts.next() {
            None => 0,
            Some(fraction) if fraction.len() > PRECISION => {
                return Err(ParseIntegerError::Precision)
            }
            Some(fraction) => {
                // Right-pad to the full precision: "5" is 50000000 units
                parse_digits(fraction)? * 10u128.pow((PRECISION - fraction.len()) as u32)
            }
        };

        whole
            .checked_mul(UNIT)
            .and_then(|units| units.checked_add(fraction))
            .map(Integer)
            .ok_or(ParseIntegerError::Overflow)
    }
}

impl Serialize for Integer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Integer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let data = String::deserialize(deserializer)?;
        data.parse().map_err(de::Error::custom)
    }
}
