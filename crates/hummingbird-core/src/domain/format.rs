//! Display formatting for monetary magnitudes, prices and dates

use chrono::NaiveDate;

/// Placeholder shown for missing values
pub const NOT_AVAILABLE: &str = "N/A";

/// Inserts `,` thousands separators into the integer part of a decimal string
fn group_thousands(formatted: &str) -> String {
    let (sign, rest) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Formats with up to `max_fraction` digits, dropping trailing zeros
fn trimmed_decimal(value: f64, max_fraction: usize) -> String {
    let s = format!("{value:.max_fraction$}");
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    };
    group_thousands(&s)
}

/// Currency with a magnitude suffix and no fraction digits
///
/// `2_114_721_910.0` → `$2B`, `919_761_993.0` → `$920M`, `1_500.0` → `$2K`.
pub fn compact_currency(value: Option<f64>) -> String {
    let Some(value) = value else {
        return NOT_AVAILABLE.to_string();
    };

    let (scaled, suffix) = if value >= 1_000_000_000.0 {
        (value / 1_000_000_000.0, "B")
    } else if value >= 1_000_000.0 {
        (value / 1_000_000.0, "M")
    } else if value >= 1_000.0 {
        (value / 1_000.0, "K")
    } else {
        (value, "")
    };

    format!("${}{}", group_thousands(&format!("{scaled:.0}")), suffix)
}

/// Market capitalization with a T/B/M suffix and up to two fraction digits
pub fn compact_market_cap(value: Option<f64>) -> String {
    let Some(value) = value else {
        return NOT_AVAILABLE.to_string();
    };

    if value >= 1_000_000_000_000.0 {
        format!("{}T", trimmed_decimal(value / 1_000_000_000_000.0, 2))
    } else if value >= 1_000_000_000.0 {
        format!("{}B", trimmed_decimal(value / 1_000_000_000.0, 2))
    } else if value >= 1_000_000.0 {
        format!("{}M", trimmed_decimal(value / 1_000_000.0, 2))
    } else {
        trimmed_decimal(value, 2)
    }
}

/// Price with exactly two fraction digits
pub fn price(value: Option<f64>) -> String {
    match value {
        Some(v) => group_thousands(&format!("{v:.2}")),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Ratio rendered as a percentage with two fraction digits (`0.1234` → `12.34%`)
pub fn percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}%", group_thousands(&format!("{:.2}", v * 100.0))),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// `2025-02-07` → `Feb 7, 2025`; unparseable input is returned unchanged
pub fn report_date(value: Option<&str>) -> String {
    let Some(raw) = value else {
        return NOT_AVAILABLE.to_string();
    };
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%b %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}
