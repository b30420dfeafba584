//! Exact decimal parsing and rendering.
//!
//! Quantities can carry 18 fractional digits on top of any number of
//! integer digits (token base units), so nothing here goes through `f64` or
//! a fixed-width mantissa. `BigDecimal` sums and products are exact.

use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::core::errors::{LedgerError, Result};

/// Parse a plain decimal literal such as `"-12.500"` or `"0.000000000000000001"`.
///
/// Accepts an optional sign, digits and an optional fractional part.
/// Exponents, separators and blanks are rejected.
pub fn parse_decimal(field: &'static str, value: &str) -> Result<BigDecimal> {
    let invalid = || LedgerError::InvalidNumberFormat {
        field,
        value: value.to_string(),
    };

    let trimmed = value.trim();
    if !is_decimal_literal(trimmed) {
        return Err(invalid());
    }

    let unsigned_plus = trimmed.strip_prefix('+').unwrap_or(trimmed);
    BigDecimal::from_str(unsigned_plus).map_err(|_| invalid())
}

fn is_decimal_literal(s: &str) -> bool {
    let unsigned = s.strip_prefix(['-', '+']).unwrap_or(s);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    all_digits(int_part) && frac_part.map_or(true, all_digits)
}

/// Plain-text rendering without trailing zeros or exponent.
pub fn format_decimal(value: &BigDecimal) -> String {
    value.normalized().to_plain_string()
}
