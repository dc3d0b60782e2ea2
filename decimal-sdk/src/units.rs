//! Conversion between human decimal amounts and base units.

use alloy::primitives::U256;
use alloy::primitives::utils::{ParseUnits, format_units, parse_units};
use serde::Serialize;

use crate::error::{Error, Result};

/// A balance in base units together with its human-readable form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Balance {
    /// Amount in base units.
    pub raw: U256,
    /// Amount scaled by `decimals`, trailing zeros trimmed.
    pub formatted: String,
    /// Decimals used for formatting.
    pub decimals: u8,
}

impl Balance {
    /// Wrap a raw amount.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAmount`] if `decimals` is out of range.
    pub fn new(raw: U256, decimals: u8) -> Result<Self> {
        Ok(Self {
            raw,
            formatted: format_base_units(raw, decimals)?,
            decimals,
        })
    }
}

/// Scale a human decimal string such as `"1.5"` to base units.
///
/// # Errors
///
/// Returns [`Error::InvalidAmount`] if the string does not parse, is
/// negative or zero, or has more fractional digits than `decimals`.
pub fn to_base_units(amount: &str, decimals: u8) -> Result<U256> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(Error::InvalidAmount("amount is empty".into()));
    }
    if let Some((_, fraction)) = amount.split_once('.')
        && fraction.len() > usize::from(decimals)
    {
        return Err(Error::InvalidAmount(format!(
            "{amount} has more than {decimals} fractional digits"
        )));
    }

    let value = match parse_units(amount, decimals) {
        Ok(ParseUnits::U256(value)) => value,
        Ok(ParseUnits::I256(_)) => {
            return Err(Error::InvalidAmount(format!("{amount} is negative")));
        }
        Err(e) => return Err(Error::InvalidAmount(format!("{amount}: {e}"))),
    };

    if value.is_zero() {
        return Err(Error::InvalidAmount("amount must be greater than zero".into()));
    }
    Ok(value)
}

/// Check that `amount` is a positive decimal number, whatever the asset's
/// decimals turn out to be.
///
/// # Errors
///
/// Returns [`Error::InvalidAmount`] if the string does not parse or is
/// negative or zero.
pub fn validate_amount(amount: &str) -> Result<()> {
    let fraction = amount.trim().split_once('.').map_or(0, |(_, f)| f.len());
    let decimals = u8::try_from(fraction)
        .map_err(|_| Error::InvalidAmount(format!("{amount} has too many fractional digits")))?;
    to_base_units(amount, decimals).map(|_| ())
}

/// Render base units as a decimal string, trimming trailing zeros.
///
/// # Errors
///
/// Returns [`Error::InvalidAmount`] if `decimals` is out of range.
pub fn format_base_units(value: U256, decimals: u8) -> Result<String> {
    let formatted =
        format_units(value, decimals).map_err(|e| Error::InvalidAmount(e.to_string()))?;
    if !formatted.contains('.') {
        return Ok(formatted);
    }
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e18(n: u64) -> U256 {
        U256::from(n) * U256::from(10u64).pow(U256::from(18u64))
    }

    #[test]
    fn test_to_base_units() {
        assert_eq!(to_base_units("5", 18).unwrap(), e18(5));
        assert_eq!(to_base_units("1.5", 18).unwrap(), e18(15) / U256::from(10u64));
        assert_eq!(to_base_units(" 11 ", 18).unwrap(), e18(11));
        assert_eq!(to_base_units("0.000001", 6).unwrap(), U256::from(1u64));
        assert_eq!(to_base_units("42", 0).unwrap(), U256::from(42u64));
    }

    #[test]
    fn test_to_base_units_rejects() {
        for bad in ["", "  ", "0", "0.0", "-1", "abc", "1.2.3"] {
            let err = to_base_units(bad, 18).unwrap_err();
            assert!(matches!(err, Error::InvalidAmount(_)), "{bad}: {err}");
        }
        assert!(matches!(
            to_base_units("0.0000001", 6),
            Err(Error::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_validate_amount() {
        for good in ["1", "0.5", "0.000000000000000000001", " 7.25 "] {
            assert!(validate_amount(good).is_ok(), "{good}");
        }
        for bad in ["", "0", "0.000", "-1", "-0.5", "abc", "1.2.3"] {
            let err = validate_amount(bad).unwrap_err();
            assert!(matches!(err, Error::InvalidAmount(_)), "{bad}: {err}");
        }
    }

    #[test]
    fn test_format_base_units() {
        assert_eq!(format_base_units(e18(5), 18).unwrap(), "5");
        assert_eq!(
            format_base_units(e18(15) / U256::from(10u64), 18).unwrap(),
            "1.5"
        );
        assert_eq!(format_base_units(U256::ZERO, 18).unwrap(), "0");
        assert_eq!(format_base_units(U256::from(1u64), 6).unwrap(), "0.000001");
    }

    #[test]
    fn test_balance_new() {
        let balance = Balance::new(e18(2), 18).unwrap();
        assert_eq!(balance.formatted, "2");
        assert_eq!(balance.raw, e18(2));
    }
}
