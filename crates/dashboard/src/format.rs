use chrono::{DateTime, Utc};

pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// `1234567` -> `1,234,567`
pub fn with_commas(value: u128) -> String {
    group_digits(&value.to_string())
}

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// base units of a token with `decimals`, rounded half up to `fraction_digits`
pub fn format_amount(base_units: u128, decimals: u8, fraction_digits: u8) -> String {
    let fraction_digits = fraction_digits.min(decimals);
    let (Some(drop), Some(keep)) = (
        10u128.checked_pow((decimals - fraction_digits) as u32),
        10u128.checked_pow(fraction_digits as u32),
    ) else {
        return format_number(
            base_units as f64 / 10f64.powi(decimals as i32),
            fraction_digits,
        );
    };
    let rounded = base_units / drop + u128::from(base_units % drop >= drop.div_ceil(2) && drop > 1);
    let whole = with_commas(rounded / keep);
    if fraction_digits == 0 {
        return whole;
    }
    format!(
        "{whole}.{:0width$}",
        rounded % keep,
        width = fraction_digits as usize
    )
}

pub fn format_number(value: f64, fraction_digits: u8) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.*}", fraction_digits as usize, value.abs());
    let (whole, frac) = match fixed.split_once('.') {
        Some((whole, frac)) => (whole, Some(frac)),
        None => (fixed.as_str(), None),
    };
    let sign = if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match frac {
        Some(frac) => format!("{sign}{}.{frac}", group_digits(whole)),
        None => format!("{sign}{}", group_digits(whole)),
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{}%", format_number(value, 2))
}

pub fn format_usd(value: f64) -> String {
    format!("${}", format_number(value, 2))
}

/// countdown as `Nd HHh MMm SSs`; past deadlines show zero
pub fn format_duration(secs: i64) -> String {
    let secs = secs.max(0);
    format!(
        "{}d {:02}h {:02}m {:02}s",
        secs / 86_400,
        secs % 86_400 / 3_600,
        secs % 3_600 / 60,
        secs % 60
    )
}

pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commas() {
        assert_eq!(with_commas(0), "0");
        assert_eq!(with_commas(999), "999");
        assert_eq!(with_commas(1_000), "1,000");
        assert_eq!(with_commas(82_191_781), "82,191,781");
        assert_eq!(with_commas(1_234_567_890), "1,234,567,890");
    }

    #[test]
    fn amounts_round_to_whole_tokens() {
        // 1,234.5 HNT with 8 decimals
        assert_eq!(format_amount(123_450_000_000, 8, 0), "1,235");
        assert_eq!(format_amount(123_449_999_999, 8, 0), "1,234");
        assert_eq!(format_amount(123_450_000_000, 8, 2), "1,234.50");
        assert_eq!(format_amount(5, 0, 0), "5");
        assert_eq!(format_amount(5, 0, 3), "5");
        assert_eq!(format_amount(7, 2, 2), "0.07");
    }

    #[test]
    fn numbers() {
        assert_eq!(format_number(1234.567, 2), "1,234.57");
        assert_eq!(format_number(1234.4, 0), "1,234");
        assert_eq!(format_number(-1234.5, 1), "-1,234.5");
        assert_eq!(format_number(-0.001, 2), "0.00");
        assert_eq!(format_percent(33.33), "33.33%");
        assert_eq!(format_usd(1.5), "$1.50");
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(0), "0d 00h 00m 00s");
        assert_eq!(format_duration(86_399), "0d 23h 59m 59s");
        assert_eq!(format_duration(2 * 86_400 + 3_661), "2d 01h 01m 01s");
        assert_eq!(format_duration(-5), "0d 00h 00m 00s");
    }

    #[test]
    fn timestamps() {
        let at = DateTime::from_timestamp(1_681_776_000, 0).unwrap();
        assert_eq!(format_timestamp(&at), "2023/04/18 00:00:00");
    }
}
