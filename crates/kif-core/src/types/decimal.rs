//! Exact decimal numbers for quantity amounts and bounds.

use super::KifError;
use crate::primitives::MAX_DECIMAL_DIGITS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An exact decimal number: `mantissa * 10^-scale`.
///
/// Always stored normalized (no trailing fractional zeros, zero has scale 0),
/// so derived equality is numeric equality: `1.50 == 1.5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Decimal {
    mantissa: i128,
    scale: u32,
}

impl Decimal {
    /// Zero.
    pub const ZERO: Self = Self {
        mantissa: 0,
        scale: 0,
    };

    /// Create a decimal from a mantissa and a scale.
    ///
    /// Fails when the normalized scale exceeds the supported precision.
    pub fn new(mantissa: i128, scale: u32) -> Result<Self, KifError> {
        let decimal = Self::normalized(mantissa, scale);
        if decimal.scale as usize > MAX_DECIMAL_DIGITS {
            return Err(KifError::invalid(
                "Decimal::new",
                format!("scale {scale} exceeds {MAX_DECIMAL_DIGITS} digits"),
            ));
        }
        Ok(decimal)
    }

    fn normalized(mantissa: i128, scale: u32) -> Self {
        if mantissa == 0 {
            return Self::ZERO;
        }
        let mut mantissa = mantissa;
        let mut scale = scale;
        while scale > 0 && mantissa % 10 == 0 {
            mantissa /= 10;
            scale -= 1;
        }
        Self { mantissa, scale }
    }

    /// The integer mantissa.
    #[must_use]
    pub const fn mantissa(self) -> i128 {
        self.mantissa
    }

    /// Number of fractional digits.
    #[must_use]
    pub const fn scale(self) -> u32 {
        self.scale
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Self::normalized(i128::from(value), 0)
    }
}

impl FromStr for Decimal {
    type Err = KifError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| KifError::invalid("Decimal::from_str", format!("{reason}: {s:?}"));

        let literal = s.trim();
        let (negative, digits) = match literal.as_bytes().first() {
            Some(b'-') => (true, &literal[1..]),
            Some(b'+') => (false, &literal[1..]),
            _ => (false, literal),
        };
        let (integral, fractional) = digits.split_once('.').unwrap_or((digits, ""));
        if integral.is_empty() && fractional.is_empty() {
            return Err(invalid("empty literal"));
        }
        if integral.len() + fractional.len() > MAX_DECIMAL_DIGITS {
            return Err(invalid("too many digits"));
        }

        let mut mantissa: i128 = 0;
        for ch in integral.chars().chain(fractional.chars()) {
            let digit = ch.to_digit(10).ok_or_else(|| invalid("not a decimal literal"))?;
            mantissa = mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add(i128::from(digit)))
                .ok_or_else(|| invalid("literal out of range"))?;
        }
        if negative {
            mantissa = -mantissa;
        }
        Ok(Self::normalized(mantissa, fractional.len() as u32))
    }
}

impl TryFrom<String> for Decimal {
    type Error = KifError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Decimal> for String {
    fn from(value: Decimal) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.mantissa < 0 { "-" } else { "" };
        let digits = self.mantissa.unsigned_abs().to_string();
        let scale = self.scale as usize;
        if scale == 0 {
            return write!(f, "{sign}{digits}");
        }
        let padded = format!("{digits:0>width$}", width = scale + 1);
        let (integral, fractional) = padded.split_at(padded.len() - scale);
        write!(f, "{sign}{integral}.{fractional}")
    }
}
