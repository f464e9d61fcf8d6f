//! Amount formatting and validation.
//!
//! Stored amounts are always hundredths of the currency's major unit; the
//! display precision follows the ISO 4217 exponent (JPY = 0, USD = 2).
use iso_currency::Currency;
use num_format::{Locale, ToFormattedString as _};
use regex::Regex;

pub const BACKEND_AMOUNT_SCALE: f64 = 100.0;
const FALLBACK_DECIMALS: usize = 2;

/// Number of decimal places the currency allows. Unknown codes fall back to 2.
pub fn currency_decimals(code: &str) -> usize {
    Currency::from_code(code)
        .and_then(|c| c.exponent())
        .map(|e| e as usize)
        .unwrap_or(FALLBACK_DECIMALS)
}

fn currency_symbol(code: &str) -> String {
    match Currency::from_code(code) {
        Some(currency) => currency.symbol().to_string(),
        None => format!("{code} "),
    }
}

/// Render an amount for display, e.g. `123456` USD → `$1,234.56`.
pub fn convert_to_display_string(amount: i64, code: &str) -> String {
    let decimals = currency_decimals(code);
    let major = (amount as f64 / BACKEND_AMOUNT_SCALE).abs();
    let sign = if amount < 0 { "-" } else { "" };

    let fixed = format!("{:.*}", decimals, major);
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let grouped = integer
        .parse::<u64>()
        .map(|n| n.to_formatted_string(&Locale::en))
        .unwrap_or_else(|_| integer.to_string());

    if fraction.is_empty() {
        format!("{sign}{}{grouped}", currency_symbol(code))
    } else {
        format!("{sign}{}{grouped}.{fraction}", currency_symbol(code))
    }
}

/// Checks an amount string against the allowed precision: at most
/// `max_length` integer digits and `decimals` fraction digits. An empty
/// string is accepted.
pub fn validate_amount(amount: &str, decimals: usize, max_length: usize) -> bool {
    if amount.is_empty() {
        return true;
    }
    let pattern = if decimals == 0 {
        format!(r"^\d{{1,{max_length}}}$")
    } else {
        format!(r"^\d{{1,{max_length}}}(\.\d{{0,{decimals}}})?$")
    };

    Regex::new(&pattern)
        .map(|re| re.is_match(amount))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimals_follow_iso_exponent() {
        assert_eq!(currency_decimals("USD"), 2);
        assert_eq!(currency_decimals("JPY"), 0);
        assert_eq!(currency_decimals("???"), 2);
    }

    #[test]
    fn display_groups_thousands() {
        assert_eq!(convert_to_display_string(123456, "USD"), "$1,234.56");
        assert_eq!(convert_to_display_string(-500, "USD"), "-$5.00");
        assert_eq!(convert_to_display_string(0, "USD"), "$0.00");
    }

    #[test]
    fn unknown_currency_uses_code() {
        assert_eq!(convert_to_display_string(100, "XYZ"), "XYZ 1.00");
    }

    #[test]
    fn amount_patterns() {
        assert!(validate_amount("", 2, 10));
        assert!(validate_amount("1234", 2, 10));
        assert!(validate_amount("12.3", 2, 10));
        assert!(!validate_amount("12.345", 2, 10));
        assert!(!validate_amount("12.3", 0, 10));
        assert!(!validate_amount("12345678901", 2, 10));
        assert!(!validate_amount("-5", 2, 10));
    }
}
