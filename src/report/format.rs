//! Number formatting for displayed values

/// Group the integer digits of `digits` with commas
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Two decimals with thousands separators: `-1,234,567.89`
#[must_use]
pub fn format_number(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{}.{frac_part}", group_thousands(int_part))
}

/// `R$ 1,234,567.89`
#[must_use]
pub fn format_currency(value: f64) -> String {
    format!("R$ {}", format_number(value))
}

/// One decimal followed by a percent sign
#[must_use]
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

#[must_use]
pub fn format_count(count: usize) -> String {
    group_thousands(&count.to_string())
}

/// A count with its share: `3 (42.9%)`
#[must_use]
pub fn count_with_share(count: usize, share: Option<f64>) -> String {
    match share {
        Some(share) => format!("{count} ({})", format_percent(share)),
        None => format!("{count} (N/A)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_uses_grouping() {
        assert_eq!(format_currency(1_234_567.891), "R$ 1,234,567.89");
        assert_eq!(format_currency(-927_000.0), "R$ -927,000.00");
        assert_eq!(format_currency(12.5), "R$ 12.50");
        assert_eq!(format_currency(-0.001), "R$ 0.00");
    }

    #[test]
    fn percent_and_counts() {
        assert_eq!(format_percent(42.857), "42.9%");
        assert_eq!(format_count(12_345), "12,345");
        assert_eq!(count_with_share(3, Some(75.0)), "3 (75.0%)");
        assert_eq!(count_with_share(0, None), "0 (N/A)");
    }
}
