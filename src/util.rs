// Utility helpers for parsing and basic statistics.
//
// This module centralizes all the "dirty" spreadsheet/number/date handling so
// the rest of the code can assume clean, typed values.
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use num_format::{Locale, ToFormattedString};
use std::cmp::Ordering;

const DATE_FORMATS: [&str; 2] = ["%d/%m/%Y", "%Y-%m-%d"];
const DATETIME_FORMATS: [&str; 4] = [
    "%d/%m/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%d %H:%M",
];
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

/// Parse a money/measure cell into `f64`.
///
/// - Trims whitespace and a leading `R$` currency marker.
/// - Rejects values that contain other alphabetic characters.
/// - When both `,` and `.` appear, the last one is the decimal point
///   (`1,234.56` and `1.234,56` both parse).
/// - When only one kind appears, `decimal_comma` decides: the configured
///   decimal separator is always the decimal point, the other one is a
///   thousands separator when it groups digits in threes (`1.500` with
///   `decimal_comma`, `1,500` without) and a decimal point otherwise.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>, decimal_comma: bool) -> Option<f64> {
    let s = s?.trim();
    let s = s.strip_prefix("R$").unwrap_or(s).trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(' ', "");
    let (decimal, group) = if decimal_comma { (',', '.') } else { ('.', ',') };
    let normalized = match (s.rfind(','), s.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => s.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => s.replace(',', ""),
        _ if s.contains(decimal) => s.replace(decimal, "."),
        _ if is_digit_grouping(&s, group) => s.replace(group, ""),
        _ => s.replace(group, "."),
    };
    normalized.parse::<f64>().ok()
}

/// `1.234` / `12.345.678` style: a 1-3 digit head, then groups of exactly
/// three digits.
fn is_digit_grouping(s: &str, group: char) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    let mut parts = s.split(group);
    let head_ok = parts
        .next()
        .is_some_and(|h| (1..=3).contains(&h.len()) && h.chars().all(|c| c.is_ascii_digit()));
    let mut tail = parts.peekable();
    head_ok
        && tail.peek().is_some()
        && tail.all(|p| p.len() == 3 && p.chars().all(|c| c.is_ascii_digit()))
}

/// Parse a day-first (`dd/mm/yyyy`) or ISO date, with or without a
/// trailing time component.
pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parse a time of day. Spreadsheet exports sometimes carry a dummy date
/// in front of the time, which is dropped.
pub fn parse_time_safe(s: Option<&str>) -> Option<NaiveTime> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.time())
        })
}

/// Arithmetic mean, `None` for an empty slice.
pub fn average(v: &[f64]) -> Option<f64> {
    if v.is_empty() {
        return None;
    }
    let sum: f64 = v.iter().copied().sum();
    Some(sum / v.len() as f64)
}

/// Median of a list of numbers. Takes the `Vec` by value so it can sort in
/// place without cloning at the call site.
pub fn median(mut v: Vec<f64>) -> Option<f64> {
    if v.is_empty() {
        return None;
    }
    sort_f64(&mut v);
    let mid = v.len() / 2;
    if v.len() % 2 == 1 {
        Some(v[mid])
    } else {
        Some((v[mid - 1] + v[mid]) / 2.0)
    }
}

/// Sample standard deviation (n - 1 denominator). Needs two values.
pub fn std_dev(v: &[f64]) -> Option<f64> {
    if v.len() < 2 {
        return None;
    }
    let mean = average(v)?;
    let ss: f64 = v.iter().map(|x| (x - mean).powi(2)).sum();
    Some((ss / (v.len() - 1) as f64).sqrt())
}

/// Quantile of an already sorted slice using linear interpolation between
/// the closest ranks.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// `numerator / denominator`, or `None` when the denominator is zero or the
/// result is not finite.
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    let r = numerator / denominator;
    r.is_finite().then_some(r)
}

pub fn sort_f64(v: &mut [f64]) {
    // NaN compares as equal so a stray value cannot panic the sort.
    v.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus `en` thousands separators, e.g. `1,234,567.89`.
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

/// Currency text such as `R$ 1.234,56` (decimal comma) or `$ 1,234.56`.
pub fn format_currency(n: f64, symbol: &str, decimal_comma: bool) -> String {
    let plain = format_number(n, 2);
    let body = if decimal_comma {
        plain
            .chars()
            .map(|c| match c {
                ',' => '.',
                '.' => ',',
                other => other,
            })
            .collect()
    } else {
        plain
    };
    format!("{} {}", symbol, body)
}

pub fn format_percent(n: f64) -> String {
    format!("{:.1}%", n)
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Used for counts in console messages (e.g., `1,204 rows loaded`).
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_decimal_conventions() {
        for decimal_comma in [true, false] {
            assert_eq!(parse_f64_safe(Some("12.50"), decimal_comma), Some(12.5));
            assert_eq!(parse_f64_safe(Some("12,50"), decimal_comma), Some(12.5));
            assert_eq!(parse_f64_safe(Some("1.234,56"), decimal_comma), Some(1234.56));
            assert_eq!(parse_f64_safe(Some("1,234.56"), decimal_comma), Some(1234.56));
            assert_eq!(parse_f64_safe(Some("R$ 7,89"), decimal_comma), Some(7.89));
            assert_eq!(parse_f64_safe(Some(" 42 "), decimal_comma), Some(42.0));
        }
    }

    #[test]
    fn three_digit_groups_follow_the_configured_convention() {
        assert_eq!(parse_f64_safe(Some("3,125"), true), Some(3.125));
        assert_eq!(parse_f64_safe(Some("3,125"), false), Some(3125.0));
        assert_eq!(parse_f64_safe(Some("1.500"), true), Some(1500.0));
        assert_eq!(parse_f64_safe(Some("1.500"), false), Some(1.5));
        assert_eq!(parse_f64_safe(Some("1,500"), true), Some(1.5));
        assert_eq!(parse_f64_safe(Some("1,500"), false), Some(1500.0));
        assert_eq!(parse_f64_safe(Some("1.234.567"), true), Some(1234567.0));
        assert_eq!(parse_f64_safe(Some("-2.000"), true), Some(-2000.0));
    }

    #[test]
    fn rejects_garbage_numbers() {
        assert_eq!(parse_f64_safe(None, true), None);
        assert_eq!(parse_f64_safe(Some(""), true), None);
        assert_eq!(parse_f64_safe(Some("n/a"), true), None);
        assert_eq!(parse_f64_safe(Some("1,2,3"), true), None);
    }

    #[test]
    fn parses_dates_day_first_and_iso() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 8).unwrap();
        assert_eq!(parse_date_safe(Some("08/03/2025")), Some(d));
        assert_eq!(parse_date_safe(Some("2025-03-08")), Some(d));
        assert_eq!(parse_date_safe(Some("08/03/2025 00:00:00")), Some(d));
        assert_eq!(parse_date_safe(Some("2025-13-40")), None);
    }

    #[test]
    fn parses_times() {
        let t = NaiveTime::from_hms_opt(14, 5, 0).unwrap();
        assert_eq!(parse_time_safe(Some("14:05:00")), Some(t));
        assert_eq!(parse_time_safe(Some("14:05")), Some(t));
        assert_eq!(parse_time_safe(Some("1900-01-01 14:05:00")), Some(t));
        assert_eq!(parse_time_safe(Some("25:99")), None);
    }

    #[test]
    fn basic_statistics() {
        assert_eq!(average(&[]), None);
        assert_eq!(average(&[1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(median(vec![3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(vec![4.0, 1.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(std_dev(&[5.0]), None);
        let sd = std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((sd - 2.138089935).abs() < 1e-6);
    }

    #[test]
    fn quantiles_interpolate() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&v, 0.0), Some(1.0));
        assert_eq!(quantile_sorted(&v, 0.5), Some(2.5));
        assert_eq!(quantile_sorted(&v, 0.25), Some(1.75));
        assert_eq!(quantile_sorted(&v, 1.0), Some(4.0));
    }

    #[test]
    fn ratio_is_undefined_on_zero() {
        assert_eq!(ratio(10.0, 0.0), None);
        assert_eq!(ratio(10.0, 4.0), Some(2.5));
    }

    #[test]
    fn currency_formatting() {
        assert_eq!(format_currency(1234.5, "R$", true), "R$ 1.234,50");
        assert_eq!(format_currency(1234.5, "$", false), "$ 1,234.50");
        assert_eq!(format_currency(-3.0, "R$", true), "R$ -3,00");
        assert_eq!(format_percent(12.345), "12.3%");
    }
}
