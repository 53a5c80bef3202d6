//! Value formatting and pagination.

use chrono::{DateTime, SecondsFormat};
use namview_parser::{
    types::{DenominatedAmount, MAX_DENOM},
    ParserError,
};
use primitive_types::U256;

/// Renders `value / 10^denom` in decimal.
///
/// Trailing fractional zeros are dropped but one fractional digit is kept, so
/// `1_000_000` with denomination 6 renders as `1.0`.
pub fn format_amount(value: U256, denom: u8) -> Result<String, ParserError> {
    if denom > MAX_DENOM {
        return Err(ParserError::DecimalTooBig);
    }
    let digits = value.to_string();
    let denom = usize::from(denom);
    if denom == 0 {
        return Ok(digits);
    }
    let padded = if digits.len() <= denom {
        format!("{}{}", "0".repeat(denom + 1 - digits.len()), digits)
    } else {
        digits
    };
    let (int, frac) = padded.split_at(padded.len() - denom);
    let frac = frac.trim_end_matches('0');
    let frac = if frac.is_empty() { "0" } else { frac };
    Ok(format!("{int}.{frac}"))
}

/// Prefixes a formatted amount with its ticker when known.
pub fn with_symbol(symbol: Option<&str>, amount: String) -> String {
    match symbol {
        Some(symbol) => format!("{symbol} {amount}"),
        None => amount,
    }
}

/// Renders a denominated amount, with its ticker when known.
pub fn format_token_amount(amount: &DenominatedAmount, symbol: Option<&str>) -> Result<String, ParserError> {
    Ok(with_symbol(symbol, format_amount(amount.amount.0, amount.denom)?))
}

/// Value of a MASP note: the raw value lifted to its 64 bit limb, then denominated.
pub fn format_masp_amount(value: u64, position: u8, denom: u8) -> Result<String, ParserError> {
    if position > 3 {
        return Err(ParserError::ValueOutOfRange("AssetData::position"));
    }
    let lifted = U256::from(value) << (64 * usize::from(position));
    format_amount(lifted, denom)
}

/// Total fee: the per gas amount times the gas limit.
pub fn total_fee(per_gas: &DenominatedAmount, gas_limit: u64) -> Result<DenominatedAmount, ParserError> {
    let total = per_gas
        .amount
        .0
        .checked_mul(U256::from(gas_limit))
        .ok_or(ParserError::DecimalTooBig)?;
    Ok(DenominatedAmount {
        amount: namview_parser::types::Amount(total),
        denom: per_gas.denom,
    })
}

/// RFC 3339 rendering of unix seconds.
pub fn format_timestamp(secs: u64) -> Result<String, ParserError> {
    let secs = i64::try_from(secs).map_err(|_| ParserError::ValueOutOfRange("Timestamp"))?;
    DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .ok_or(ParserError::ValueOutOfRange("Timestamp"))
}

/// RFC 3339 rendering of unix nanoseconds.
pub fn format_timestamp_nanos(nanos: u64) -> Result<String, ParserError> {
    const NANOS_PER_SEC: u64 = 1_000_000_000;
    format_timestamp(nanos / NANOS_PER_SEC)
}

/// Number of pages `value` spans at `width` characters per page.
///
/// An empty value still has one page.
pub fn page_count(value: &str, width: usize) -> Result<usize, ParserError> {
    if width == 0 {
        return Err(ParserError::InvalidOutputBuffer);
    }
    Ok(value.chars().count().div_ceil(width).max(1))
}

/// Page `page` of `value` and the total page count.
pub fn paginate(value: &str, width: usize, page: usize) -> Result<(String, usize), ParserError> {
    let count = page_count(value, width)?;
    if page >= count {
        return Err(ParserError::DisplayPageOutOfRange { page, count });
    }
    let chunk = value.chars().skip(page * width).take(width).collect();
    Ok((chunk, count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_are_denominated() {
        assert_eq!(format_amount(U256::from(1_000_000u64), 6).unwrap(), "1.0");
        assert_eq!(format_amount(U256::from(1_234_500u64), 6).unwrap(), "1.2345");
        assert_eq!(format_amount(U256::from(5u64), 6).unwrap(), "0.000005");
        assert_eq!(format_amount(U256::zero(), 6).unwrap(), "0.0");
        assert_eq!(format_amount(U256::from(42u64), 0).unwrap(), "42");
        assert_eq!(format_amount(U256::one(), 78).unwrap_err(), ParserError::DecimalTooBig);
    }

    #[test]
    fn masp_amount_is_lifted_by_position() {
        assert_eq!(format_masp_amount(1, 0, 0).unwrap(), "1");
        assert_eq!(format_masp_amount(1, 1, 0).unwrap(), "18446744073709551616");
        assert_eq!(format_masp_amount(2_500_000, 0, 6).unwrap(), "2.5");
        assert!(format_masp_amount(1, 4, 0).is_err());
    }

    #[test]
    fn fee_overflow_is_reported() {
        let per_gas = DenominatedAmount {
            amount: namview_parser::types::Amount(U256::MAX),
            denom: 6,
        };
        assert_eq!(total_fee(&per_gas, 2).unwrap_err(), ParserError::DecimalTooBig);
        let total = total_fee(&per_gas, 1).unwrap();
        assert_eq!(total.amount.0, U256::MAX);
    }

    #[test]
    fn timestamps_are_rfc3339() {
        assert_eq!(format_timestamp(0).unwrap(), "1970-01-01T00:00:00Z");
        assert_eq!(format_timestamp(1_700_000_000).unwrap(), "2023-11-14T22:13:20Z");
        assert_eq!(
            format_timestamp_nanos(1_700_000_000_123_456_789).unwrap(),
            "2023-11-14T22:13:20Z"
        );
        assert!(format_timestamp(u64::MAX).is_err());
    }

    #[test]
    fn pagination_splits_on_characters() {
        assert_eq!(page_count("", 10).unwrap(), 1);
        assert_eq!(page_count("abcdefghij", 10).unwrap(), 1);
        assert_eq!(page_count("abcdefghijk", 10).unwrap(), 2);
        assert_eq!(paginate("abcdefghijk", 10, 1).unwrap(), ("k".to_string(), 2));
        assert_eq!(paginate("ééé", 2, 1).unwrap(), ("é".to_string(), 2));
        assert_eq!(
            paginate("abc", 10, 1).unwrap_err(),
            ParserError::DisplayPageOutOfRange { page: 1, count: 1 }
        );
        assert_eq!(page_count("abc", 0).unwrap_err(), ParserError::InvalidOutputBuffer);
    }
}
