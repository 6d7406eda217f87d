// Output-boundary rendering of decimals. Nothing upstream of the HTTP layer
// sees these strings.

use rust_decimal::{Decimal, RoundingStrategy};

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

/// `"$1,234,567"`: floored to whole dollars, grouped by thousands.
pub fn usd_floor(value: Decimal) -> String {
    let floored = value.floor();
    let digits = floored.abs().trunc().to_string();
    let sign = if floored.is_sign_negative() && !floored.is_zero() { "-" } else { "" };
    format!("{}${}", sign, group_thousands(&digits))
}

/// Fixed 4-decimal price.
pub fn price(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.4}", rounded)
}

/// `"1.23%"`.
pub fn percentage(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}%", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_usd_floor() {
        assert_eq!(usd_floor(dec!(0)), "$0");
        assert_eq!(usd_floor(dec!(999.99)), "$999");
        assert_eq!(usd_floor(dec!(1000)), "$1,000");
        assert_eq!(usd_floor(dec!(1234567.89)), "$1,234,567");
        assert_eq!(usd_floor(dec!(74074.0734)), "$74,074");
    }

    #[test]
    fn test_price() {
        assert_eq!(price(dec!(84.1)), "84.1000");
        assert_eq!(price(dec!(84.123456)), "84.1235");
        assert_eq!(price(dec!(100)), "100.0000");
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(dec!(1)), "1.00%");
        assert_eq!(percentage(dec!(0.0119)), "0.01%");
        assert_eq!(percentage(dec!(12.345)), "12.35%");
    }
}
