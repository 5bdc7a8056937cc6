use std::sync::OnceLock;

use chrono::NaiveTime;
use regex::Regex;

fn re_ymd() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"(\d{4})[-/](\d{1,2})[-/](\d{1,2})").expect("invalid regex"))
}

fn re_mdy() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"(\d{1,2})[-/](\d{1,2})[-/](\d{4})").expect("invalid regex"))
}

/// Best-effort canonicalization of a recognized date substring to
/// `YYYY-MM-DD`.
///
/// Kanji unit characters (年/月/日) become `-` separators, whitespace is
/// stripped, and the two accepted digit layouts are disambiguated by which
/// group carries four digits. Anything unrecognized comes back unchanged
/// rather than failing.
pub fn normalize_date(raw: &str) -> String {
    let cleaned: String = raw
        .replace(['年', '月', '日'], "-")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if let Some(c) = re_ymd().captures(&cleaned) {
        return format!("{}-{:0>2}-{:0>2}", &c[1], &c[2], &c[3]);
    }
    if let Some(c) = re_mdy().captures(&cleaned) {
        return format!("{}-{:0>2}-{:0>2}", &c[3], &c[1], &c[2]);
    }
    raw.to_string()
}

/// Validated wall-clock time. `None` outside 00:00–23:59; invalid times are
/// dropped, never propagated.
pub fn normalize_time(hour: u32, minute: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Parse the two digit groups of a matched `H:MM` token.
pub fn time_from_digits(hour: &str, minute: &str) -> Option<NaiveTime> {
    normalize_time(hour.parse().ok()?, minute.parse().ok()?)
}

/// Canonical zero-padded rendering used throughout the record.
pub fn hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_iso_style_date() {
        assert_eq!(normalize_date("2024-6-3"), "2024-06-03");
    }

    #[test]
    fn reorders_month_day_year() {
        assert_eq!(normalize_date("6-3-2024"), "2024-06-03");
    }

    #[test]
    fn slash_separators_accepted() {
        assert_eq!(normalize_date("2024/6/24"), "2024-06-24");
    }

    #[test]
    fn kanji_units_become_separators() {
        assert_eq!(normalize_date("2024年6月24日"), "2024-06-24");
    }

    #[test]
    fn internal_whitespace_is_ignored() {
        assert_eq!(normalize_date("2024 / 6 / 24"), "2024-06-24");
    }

    #[test]
    fn unrecognized_input_returned_unchanged() {
        assert_eq!(normalize_date("来月のどこか"), "来月のどこか");
        assert_eq!(normalize_date(""), "");
    }

    #[test]
    fn normalize_time_pads_both_fields() {
        assert_eq!(hhmm(normalize_time(9, 5).unwrap()), "09:05");
        assert_eq!(hhmm(normalize_time(18, 40).unwrap()), "18:40");
    }

    #[test]
    fn normalize_time_boundaries() {
        assert_eq!(hhmm(normalize_time(0, 0).unwrap()), "00:00");
        assert_eq!(hhmm(normalize_time(23, 59).unwrap()), "23:59");
    }

    #[test]
    fn normalize_time_rejects_out_of_range() {
        assert!(normalize_time(24, 0).is_none());
        assert!(normalize_time(12, 60).is_none());
    }

    #[test]
    fn time_from_digits_parses_token_groups() {
        assert_eq!(hhmm(time_from_digits("9", "05").unwrap()), "09:05");
        assert!(time_from_digits("25", "00").is_none());
    }
}
