//! Compact number formatting for coin and count displays.

const SUFFIXES: [&str; 8] = ["", "K", "M", "B", "T", "Qa", "Qi", "Sx"];

/// Format `value` for display: plain digits below 1000, otherwise three
/// significant digits with a magnitude suffix (`1500` → `"1.5K"`).
///
/// The suffix tier is `digit_count / 3`, so six-digit values read as a
/// fraction of the next tier (`100_000` → `"0.1M"`). A fractional part is
/// kept to one decimal.
pub fn format_number(value: u64) -> String {
    if value < 1_000 {
        return value.to_string();
    }
    let digits = value.to_string().len();
    let tier = (digits / 3).min(SUFFIXES.len() - 1);

    let scaled = value as f64 / 1_000f64.powi(tier as i32);
    let mut short = round_significant(scaled, 3);
    if short.fract() != 0.0 {
        short = round_decimals(short, 1);
    }
    format!("{short}{}", SUFFIXES[tier])
}

fn round_significant(v: f64, digits: usize) -> f64 {
    format!("{:.*e}", digits.saturating_sub(1), v)
        .parse()
        .unwrap_or(v)
}

fn round_decimals(v: f64, decimals: usize) -> f64 {
    format!("{v:.decimals$}").parse().unwrap_or(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values_are_plain() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(7), "7");
        assert_eq!(format_number(999), "999");
    }

    #[test]
    fn thousands_and_millions() {
        assert_eq!(format_number(1_000), "1K");
        assert_eq!(format_number(1_500), "1.5K");
        assert_eq!(format_number(12_000), "12K");
        assert_eq!(format_number(12_000_000), "12M");
        assert_eq!(format_number(3_000_000_000), "3B");
    }

    #[test]
    fn six_digit_values_use_next_tier() {
        assert_eq!(format_number(100_000), "0.1M");
        assert_eq!(format_number(260_000), "0.3M");
    }

    #[test]
    fn three_significant_digits_then_one_decimal() {
        assert_eq!(format_number(12_345), "12.3K");
        assert_eq!(format_number(98_760), "98.8K");
    }

    #[test]
    fn largest_value_fits_a_suffix() {
        assert!(format_number(u64::MAX).ends_with("Qi"));
    }
}
