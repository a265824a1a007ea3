//! Display formatting for money, percentages, and rates.

const GROUP_SEPARATOR: char = '\u{a0}';

/// Formats an amount with ru-RU digit grouping, e.g. `300 000 ₽`.
pub fn format_currency(amount: f64, decimals: usize, show_symbol: bool) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let rendered = format!("{:.*}", decimals, amount.abs());
    let (whole, fraction) = match rendered.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (rendered.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        grouped.push(digit);
    }

    let mut out = String::new();
    if amount < 0.0 && rendered.chars().any(|c| c != '0' && c != '.') {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(fraction) = fraction {
        out.push(',');
        out.push_str(fraction);
    }
    if show_symbol {
        out.push(GROUP_SEPARATOR);
        out.push('₽');
    }
    out
}

/// Whole-rouble amount with the currency sign.
pub fn rubles(amount: f64) -> String {
    format_currency(amount, 0, true)
}

pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value)
}

/// Rates under one percent are daily microloan rates.
pub fn format_apr(apr: f64) -> String {
    if apr == 0.0 {
        "Без %".to_string()
    } else if apr < 1.0 {
        format!("{apr:.1}% в день")
    } else {
        format!("{apr:.1}% годовых")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands_with_non_breaking_space() {
        assert_eq!(rubles(300_000.0), "300\u{a0}000\u{a0}₽");
        assert_eq!(rubles(1_250.0), "1\u{a0}250\u{a0}₽");
        assert_eq!(rubles(999.0), "999\u{a0}₽");
        assert_eq!(format_currency(5_000_000.0, 0, false), "5\u{a0}000\u{a0}000");
    }

    #[test]
    fn keeps_decimals_and_sign() {
        assert_eq!(format_currency(-1234.5, 2, false), "-1\u{a0}234,50");
        assert_eq!(format_currency(f64::NAN, 0, false), "0");
    }

    #[test]
    fn apr_labels_follow_rate_scale() {
        assert_eq!(format_apr(0.0), "Без %");
        assert_eq!(format_apr(0.8), "0.8% в день");
        assert_eq!(format_apr(14.5), "14.5% годовых");
    }

    #[test]
    fn percent_uses_fixed_decimals() {
        assert_eq!(format_percent(18.76, 1), "18.8%");
        assert_eq!(format_percent(0.0, 0), "0%");
    }
}
