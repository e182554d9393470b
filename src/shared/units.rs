//! Pure conversion between display decimals and on-chain integer base units.
//!
//! Display amounts are `rust_decimal::Decimal`; base units are `U256`. The
//! conversion goes through the decimal's integer mantissa so no value ever
//! passes through a float. No async, no network calls.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::U256;
use rust_decimal::Decimal;

/// Largest decimals value for which `10^decimals` fits in a `U256`.
const MAX_DECIMALS: u8 = 77;

/// Errors that can occur while parsing or scaling amounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitsError {
    InvalidDecimal { input: String, reason: String },
    Negative(String),
    FractionalAmount { value: String, decimals: u8 },
    Overflow { context: String },
}

impl fmt::Display for UnitsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitsError::InvalidDecimal { input, reason } => {
                write!(f, "Invalid decimal '{}': {}", input, reason)
            }
            UnitsError::Negative(v) => write!(f, "Amount must not be negative, got {}", v),
            UnitsError::FractionalAmount { value, decimals } => {
                write!(f, "{} has more than {} decimal places", value, decimals)
            }
            UnitsError::Overflow { context } => write!(f, "Overflow: {}", context),
        }
    }
}

impl std::error::Error for UnitsError {}

/// Parse a user-entered decimal string (`"12.5"`, `" 3 "`, `"1e-3"`).
pub fn parse_decimal(input: &str) -> Result<Decimal, UnitsError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UnitsError::InvalidDecimal {
            input: input.to_string(),
            reason: "empty".to_string(),
        });
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|e| UnitsError::InvalidDecimal {
            input: input.to_string(),
            reason: e.to_string(),
        })
}

fn pow10(decimals: u8) -> Result<U256, UnitsError> {
    if decimals > MAX_DECIMALS {
        return Err(UnitsError::Overflow {
            context: format!("10^{} does not fit in U256", decimals),
        });
    }
    Ok(U256::from(10u8).pow(U256::from(decimals)))
}

/// Split `amount * 10^decimals` into its integer quotient and remainder.
fn scale(amount: Decimal, decimals: u8) -> Result<(U256, U256), UnitsError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(UnitsError::Negative(amount.to_string()));
    }
    let mantissa = U256::from(amount.mantissa().unsigned_abs());
    let numerator = mantissa
        .checked_mul(pow10(decimals)?)
        .ok_or_else(|| UnitsError::Overflow {
            context: format!("{} * 10^{}", amount, decimals),
        })?;
    let denominator = pow10(amount.scale() as u8)?;
    Ok((numerator / denominator, numerator % denominator))
}

/// Convert a display amount to base units, rejecting any precision the token
/// cannot represent.
///
/// ```text
/// base_units = amount * 10^decimals
/// ```
pub fn to_base_units(amount: Decimal, decimals: u8) -> Result<U256, UnitsError> {
    let (quotient, remainder) = scale(amount, decimals)?;
    if !remainder.is_zero() {
        return Err(UnitsError::FractionalAmount {
            value: amount.to_string(),
            decimals,
        });
    }
    Ok(quotient)
}

/// Convert a display amount to base units, rounding any sub-unit remainder up.
///
/// Used for spending requirements: an allowance must cover the full amount, so
/// truncating would under-approve.
pub fn to_base_units_ceil(amount: Decimal, decimals: u8) -> Result<U256, UnitsError> {
    let (quotient, remainder) = scale(amount, decimals)?;
    if remainder.is_zero() {
        Ok(quotient)
    } else {
        Ok(quotient + U256::from(1u8))
    }
}

/// Render base units as an exact decimal string with trailing zeros trimmed.
///
/// Works for any `U256`, including max-uint allowances that no `Decimal` can hold.
pub fn format_units(value: U256, decimals: u8) -> String {
    if decimals == 0 {
        return value.to_string();
    }
    let divisor = match pow10(decimals) {
        Ok(d) => d,
        Err(_) => return value.to_string(),
    };
    let whole = value / divisor;
    let fraction = value % divisor;
    if fraction.is_zero() {
        return whole.to_string();
    }
    let padded = format!("{:0>width$}", fraction.to_string(), width = decimals as usize);
    format!("{}.{}", whole, padded.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_decimal_accepts_plain_and_scientific() {
        assert_eq!(parse_decimal(" 12.5 ").unwrap(), dec("12.5"));
        assert_eq!(parse_decimal("1e-3").unwrap(), dec("0.001"));
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        assert!(parse_decimal("").is_err());
        assert!(parse_decimal("abc").is_err());
        assert!(parse_decimal("1.2.3").is_err());
    }

    #[test]
    fn test_to_base_units_exact_18_decimals() {
        // 0.1 is not representable in binary floating point; base units must be exact.
        let units = to_base_units(dec("0.1"), 18).unwrap();
        assert_eq!(units, U256::from(100_000_000_000_000_000u128));
    }

    #[test]
    fn test_to_base_units_large_amount_does_not_overflow() {
        let units = to_base_units(dec("1000000000000"), 18).unwrap();
        assert_eq!(units.to_string(), "1000000000000000000000000000000");
    }

    #[test]
    fn test_to_base_units_rejects_excess_precision() {
        let err = to_base_units(dec("1.0000001"), 6).unwrap_err();
        assert!(matches!(err, UnitsError::FractionalAmount { decimals: 6, .. }));
    }

    #[test]
    fn test_to_base_units_ceil_rounds_up() {
        assert_eq!(to_base_units_ceil(dec("1.0000001"), 6).unwrap(), U256::from(1_000_001u64));
        assert_eq!(to_base_units_ceil(dec("1.5"), 6).unwrap(), U256::from(1_500_000u64));
    }

    #[test]
    fn test_negative_amount_rejected() {
        assert!(matches!(
            to_base_units(dec("-1"), 18),
            Err(UnitsError::Negative(_))
        ));
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(U256::from(20_000_000u64), 6), "20");
        assert_eq!(format_units(U256::from(1_500_000u64), 6), "1.5");
        assert_eq!(format_units(U256::from(1u64), 6), "0.000001");
        assert_eq!(format_units(U256::from(42u64), 0), "42");
    }

    #[test]
    fn test_format_units_max_allowance() {
        let formatted = format_units(U256::MAX, 18);
        assert!(formatted.starts_with("115792089237316195423570985008687907853269984665640564039457"));
    }
}
