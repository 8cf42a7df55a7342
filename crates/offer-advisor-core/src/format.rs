//! Display formatting shared by advisory messages and the exported report,
//! so both render the same figures.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::{round_currency, Money, Rate};

const CURRENCY_SYMBOL: &str = "¥";

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Whole currency units with thousands separators: `¥232,096`, `-¥1,500`.
pub fn format_currency(value: Money) -> String {
    let rounded = round_currency(value);
    let digits = rounded.abs().trunc().to_string();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{CURRENCY_SYMBOL}{}", group_thousands(&digits))
}

/// A rate as a percentage with a fixed number of decimals: `0.6113` at one
/// decimal is `61.1%`. Zero is always `0%`.
pub fn format_percent(value: Rate, decimals: u32) -> String {
    if value.is_zero() {
        return "0%".to_string();
    }
    let pct = (value * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}%", decimals as usize, pct)
}

/// Signed currency change; `-` for no change.
pub fn format_delta(value: Money) -> String {
    if round_currency(value).is_zero() {
        return "-".to_string();
    }
    let sign = if value > Decimal::ZERO { "+" } else { "" };
    format!("{sign}{}", format_currency(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency() {
        assert_eq!(format_currency(dec!(232096)), "¥232,096");
        assert_eq!(format_currency(dec!(999.5)), "¥1,000");
        assert_eq!(format_currency(dec!(12)), "¥12");
        assert_eq!(format_currency(Decimal::ZERO), "¥0");
        assert_eq!(format_currency(dec!(-1500)), "-¥1,500");
        assert_eq!(format_currency(dec!(1234567.4)), "¥1,234,567");
    }

    #[test]
    fn test_percent() {
        assert_eq!(format_percent(dec!(0.6113), 1), "61.1%");
        assert_eq!(format_percent(dec!(0.6113), 0), "61%");
        assert_eq!(format_percent(dec!(0.1), 1), "10.0%");
        assert_eq!(format_percent(dec!(-0.05), 0), "-5%");
        assert_eq!(format_percent(Decimal::ZERO, 2), "0%");
    }

    #[test]
    fn test_delta() {
        assert_eq!(format_delta(dec!(5328)), "+¥5,328");
        assert_eq!(format_delta(dec!(-200)), "-¥200");
        assert_eq!(format_delta(Decimal::ZERO), "-");
        assert_eq!(format_delta(dec!(0.2)), "-");
    }
}
