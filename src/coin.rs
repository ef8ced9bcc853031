//! Exact base-unit amounts and denominated coins.
//!
//! Amounts are carried as `u128` in the smallest unit of a denomination.  The
//! textual form accepted from migration data is deliberately narrow: decimal
//! digits only, so signs, whitespace and exponents are all rejected.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised while decoding an amount or denomination.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    /// No digits were supplied.
    Empty,
    #[error("amount '{0}' is not a non-negative integer")]
    /// Input contained a sign, whitespace, or another non-digit character.
    NotInteger(String),
    #[error("amount '{0}' exceeds the supported range")]
    /// Value does not fit in 128 bits.
    Overflow(String),
    #[error("invalid denomination '{0}'")]
    /// Denomination failed validation.
    InvalidDenom(String),
}

/// Parses a decimal string into an exact base-unit amount.
///
/// Stricter than Cosmos SDK `Int` parsing on purpose: a leading `+` and values
/// above `u128::MAX` are both rejected.
///
/// ```
/// use stake_restitution::parse_amount;
///
/// assert_eq!(parse_amount("100").unwrap(), 100);
/// assert!(parse_amount("-5").is_err());
/// assert!(parse_amount("abc").is_err());
/// ```
pub fn parse_amount(raw: &str) -> Result<u128, AmountError> {
    if raw.is_empty() {
        return Err(AmountError::Empty);
    }
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AmountError::NotInteger(raw.to_string()));
    }
    raw.parse::<u128>()
        .map_err(|_| AmountError::Overflow(raw.to_string()))
}

/// Validated denomination identifier (e.g. `uscrt`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Denom(String);

impl Denom {
    /// Validates `raw` as a denomination: an ASCII letter followed by 2-127
    /// characters drawn from letters, digits and `/:._-`.
    pub fn new(raw: &str) -> Result<Self, AmountError> {
        let mut chars = raw.chars();
        let leading_ok = chars.next().map(|c| c.is_ascii_alphabetic()).unwrap_or(false);
        let rest_ok =
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '_' | '-'));
        if !leading_ok || !rest_ok || !(3..=128).contains(&raw.len()) {
            return Err(AmountError::InvalidDenom(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// Borrow the denomination text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Denom {
    type Error = AmountError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Denom> for String {
    fn from(value: Denom) -> Self {
        value.0
    }
}

impl fmt::Display for Denom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An amount of a single denomination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    /// Denomination of the coin.
    pub denom: Denom,
    /// Quantity in the smallest unit.
    pub amount: u128,
}

impl Coin {
    /// Builds a coin from an already validated denomination.
    pub fn new(denom: Denom, amount: u128) -> Self {
        Self { denom, amount }
    }

    /// True when the coin carries no value.
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}
