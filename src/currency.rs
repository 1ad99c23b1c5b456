/// Converts a localized price such as `"KSh 1,999"` into the target
/// currency, rounded to cents.
///
/// Every non-digit character is dropped before parsing, decimal points
/// included, so `"1,999.50"` is read as `199950`.
pub fn to_target_currency(price: &str, rate: f64) -> Option<f64> {
    let digits: String = price.chars().filter(char::is_ascii_digit).collect();
    let magnitude = digits.parse::<f64>().ok()?;
    Some(round_cents(magnitude * rate))
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_EXCHANGE_RATE;

    #[test]
    fn converts_shilling_prices() {
        assert_eq!(to_target_currency("KSh 1,999", DEFAULT_EXCHANGE_RATE), Some(15.41));
        assert_eq!(to_target_currency("KSh 2,000", DEFAULT_EXCHANGE_RATE), Some(15.42));
        assert_eq!(to_target_currency("100", 1.0), Some(100.0));
    }

    #[test]
    fn returns_none_without_digits() {
        assert_eq!(to_target_currency("", DEFAULT_EXCHANGE_RATE), None);
        assert_eq!(to_target_currency("KSh -", DEFAULT_EXCHANGE_RATE), None);
    }

    #[test]
    fn decimal_point_is_not_special() {
        assert_eq!(to_target_currency("1,999.50", 0.01), Some(1999.5));
    }

    #[test]
    fn ignores_non_ascii_digits() {
        assert_eq!(to_target_currency("١٢٣ 45", 1.0), Some(45.0));
    }
}
