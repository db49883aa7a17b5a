// Parsing and formatting helpers.
//
// All the forgiving text-to-number coercion lives here so the loader and the
// filter controls agree on what counts as a number.
use num_format::{Locale, ToFormattedString};

/// Placeholder shown wherever a value is undefined.
pub const PLACEHOLDER: &str = "—";

/// Parse a CSV cell into a finite `f64`.
///
/// - Trims whitespace; empty cells are `None`.
/// - Strips thousands separators like `","` before parsing.
/// - Accepts exponents (`1.5e2`); text such as `N/A` and non-finite values
///   (`NaN`, `inf`) are `None`.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a metric cell. A blank or absent cell reads as zero; only text
/// that is not a number is `None`.
pub fn parse_metric_safe(s: Option<&str>) -> Option<f64> {
    match s.map(str::trim) {
        None | Some("") => Some(0.0),
        other => parse_f64_safe(other),
    }
}

/// Parse a year. Accepts `2020` as well as `2020.0`, but not `2020.5`.
pub fn parse_year_safe(s: Option<&str>) -> Option<i32> {
    let v = parse_f64_safe(s)?;
    if v.fract() != 0.0 || v < i32::MIN as f64 || v > i32::MAX as f64 {
        return None;
    }
    Some(v as i32)
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus `en` thousands separators, e.g. `1,234,567.89`.
    if !n.is_finite() {
        return PLACEHOLDER.to_string();
    }
    let s = format!("{:.*}", decimals, n.abs());
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s.as_str(), None),
    };
    let mut res = group_digits(int_part, Locale::en.separator());
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    // `-0.0` after rounding should not print a sign.
    let is_zero = s.bytes().all(|b| b == b'0' || b == b'.');
    if n.is_sign_negative() && !is_zero {
        format!("-{}", res)
    } else {
        res
    }
}

/// Insert `sep` every three digits from the right. Works on the digit
/// string so values beyond any integer type keep their digits.
fn group_digits(digits: &str, sep: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * sep.len());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(sep);
        }
        out.push(c);
    }
    out
}

/// Format an optional value, falling back to the placeholder.
pub fn format_opt(n: Option<f64>, decimals: usize) -> String {
    n.map(|v| format_number(v, decimals))
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Self-sufficiency ratio: two decimals, no separators, placeholder when
/// demand was zero.
pub fn format_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) if r.is_finite() => format!("{:.2}", r),
        _ => PLACEHOLDER.to_string(),
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_f64_rejects_text_and_blanks() {
        assert_eq!(parse_f64_safe(Some("N/A")), None);
        assert_eq!(parse_f64_safe(Some("   ")), None);
        assert_eq!(parse_f64_safe(None), None);
        assert_eq!(parse_f64_safe(Some("NaN")), None);
        assert_eq!(parse_f64_safe(Some("inf")), None);
    }

    #[test]
    fn parse_f64_accepts_exponents() {
        assert_eq!(parse_f64_safe(Some("1e3")), Some(1000.0));
        assert_eq!(parse_f64_safe(Some(" 1.5E2 ")), Some(150.0));
        assert_eq!(parse_f64_safe(Some("-2.5e-1")), Some(-0.25));
    }

    #[test]
    fn blank_metric_cell_is_zero() {
        assert_eq!(parse_metric_safe(Some("")), Some(0.0));
        assert_eq!(parse_metric_safe(Some("  ")), Some(0.0));
        assert_eq!(parse_metric_safe(None), Some(0.0));
        assert_eq!(parse_metric_safe(Some("N/A")), None);
        assert_eq!(parse_metric_safe(Some("7.5")), Some(7.5));
    }

    #[test]
    fn parse_f64_strips_separators() {
        assert_eq!(parse_f64_safe(Some(" 1,234.5 ")), Some(1234.5));
        assert_eq!(parse_f64_safe(Some("-3")), Some(-3.0));
    }

    #[test]
    fn parse_year_requires_integral_value() {
        assert_eq!(parse_year_safe(Some("2020")), Some(2020));
        assert_eq!(parse_year_safe(Some("2020.0")), Some(2020));
        assert_eq!(parse_year_safe(Some("2020.5")), None);
        assert_eq!(parse_year_safe(Some("All")), None);
    }

    #[test]
    fn format_number_groups_thousands() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-1500.0, 1), "-1,500.0");
        assert_eq!(format_number(0.0, 1), "0.0");
        assert_eq!(format_number(-0.01, 1), "0.0");
        assert_eq!(format_number(12.0, 0), "12");
        assert_eq!(format_number(999.0, 0), "999");
        assert_eq!(format_number(-123456.0, 0), "-123,456");
    }

    #[test]
    fn format_number_beyond_u64() {
        assert_eq!(format_number(3.0e19, 1), "30,000,000,000,000,000,000.0");
        assert_eq!(format_number(1.0e25, 0), "10,000,000,000,000,000,905,969,664");
    }

    #[test]
    fn ratio_placeholder_when_absent() {
        assert_eq!(format_ratio(None), PLACEHOLDER);
        assert_eq!(format_ratio(Some(22.0 / 19.0)), "1.16");
        assert_eq!(format_ratio(Some(0.0)), "0.00");
    }
}
