use std::sync::OnceLock;

use chrono::NaiveTime;
use regex::Regex;

use kintai_core::{AttendanceRecord, ReiwaMonth};

use crate::lines::candidate_lines;
use crate::normalize;
use crate::reformat;

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

re!(re_id_label,
    r"(?i)(?:社員番号|職員番号|社員ID|職員ID|ID|番号)[\s:：]*([0-9A-Za-z]+)");
re!(re_id_bare_digits,
    r"([0-9]{4,8})");
re!(re_id_no_prefix,
    r"(?i)No[\s.]*([0-9A-Za-z]+)");

re!(re_name_label_alone, r"^(?:氏名|名前|社員名|職員名)$");
re!(re_name_value, r"^[ぁ-ゟ一-龯ァ-ヾ\s]{2,20}$");
re!(re_name_labeled_jp,
    r"(?:氏名|名前|社員名|職員名)[\s:：]*([ぁ-ゟ一-龯ァ-ヾA-Za-z\s]+)");
re!(re_name_labeled_en,
    r"(?i)Name[\s:：]*([A-Za-zぁ-ゟ一-龯ァ-ヾ\s]+)");
re!(re_honorific, r"様|さん|氏$");
re!(re_name_two_part, r"^[ぁ-ゟ一-龯ァ-ヾ]{2,4}[ぁ-ゟ一-龯ァ-ヾ]{2,4}$");

re!(re_dept_labeled,
    r"(?:部署|所属|課|部|室|チーム|グループ)[\s:：]*([ぁ-ゟ一-龯ァ-ヾA-Za-z0-9\s]+)");
re!(re_dept_suffix,
    r"([ぁ-ゟ一-龯ァ-ヾ]+(?:部|課|室|チーム|グループ))");
re!(re_dept_labeled_en,
    r"(?i)Department[\s:：]*([A-Za-zぁ-ゟ一-龯ァ-ヾ\s]+)");

re!(re_date_era, r"(?:R|令和)(\d+)年(\d+)月分?");
re!(re_date_labeled,
    r"(?:勤務日|出勤日|日付|年月日)[\s:：]*(\d{4}[-/年]\d{1,2}[-/月]\d{1,2}日?)");
re!(re_date_ymd, r"(\d{4}[-/]\d{1,2}[-/]\d{1,2})");
re!(re_date_mdy, r"(\d{1,2}[-/]\d{1,2}[-/]\d{4})");
re!(re_date_kanji, r"(\d{4}年\d{1,2}月\d{1,2}日)");
re!(re_date_labeled_en, r"(?i)Date[\s:：]*(\d{4}[-/]\d{1,2}[-/]\d{1,2})");

re!(re_start_jp, r"(?:出勤|開始|始業|出社)[\s:：時]*(\d{1,2}):?(\d{2})");
re!(re_start_en, r"(?i)Start[\s:：]*(\d{1,2}):?(\d{2})");
re!(re_end_jp, r"(?:退勤|終了|終業|退社)[\s:：時]*(\d{1,2}):?(\d{2})");
re!(re_end_en, r"(?i)End[\s:：]*(\d{1,2}):?(\d{2})");
re!(re_time_token, r"(\d{1,2}):(\d{2})");

re!(re_break_jp, r"(?i)(?:休憩|昼休み|ブレイク)[\s:：]*(\d{1,3})\s*(?:分|min)");
re!(re_break_en, r"(?i)Break[\s:：]*(\d{1,3})\s*(?:分|min|minutes?)");
re!(re_break_reversed, r"(?i)(\d{1,3})\s*(?:分|min)\s*(?:休憩|昼休み|ブレイク)");

re!(re_remarks_jp, r"(?:備考|メモ|注意|特記)[\s:：]*(.*)");
re!(re_remarks_en, r"(?i)Remarks?[\s:：]*(.*)");
re!(re_notes_en, r"(?i)Notes?[\s:：]*(.*)");

/// Sheet boilerplate that OCR frequently isolates on its own line and that
/// must never be taken for a person's name.
const EXCLUDED_NAME_WORDS: [&str; 8] =
    ["カード", "タイム", "TIME", "CARD", "前半", "後半", "年月", "分"];

/// Minutes of break accepted from a labeled pattern (0 to 8 hours).
const MAX_BREAK_MINUTES: u16 = 480;

/// Applied only when both clock times were recovered and no break was.
const DEFAULT_BREAK_MINUTES: u16 = 60;

// ── Public extraction API ─────────────────────────────────────────────────────

pub struct Extractor;

impl Extractor {
    /// Extract a structured attendance record from raw OCR text.
    ///
    /// Never fails: unusable input yields the all-default record, and a panic
    /// in any pattern pass is caught here rather than reaching the caller.
    pub fn extract(ocr_text: &str) -> AttendanceRecord {
        match std::panic::catch_unwind(|| Self::extract_inner(ocr_text)) {
            Ok(record) => record,
            Err(_) => {
                tracing::error!("attendance extraction panicked, returning empty record");
                AttendanceRecord::default()
            }
        }
    }

    fn extract_inner(ocr_text: &str) -> AttendanceRecord {
        let lines = candidate_lines(ocr_text);
        if lines.is_empty() {
            tracing::warn!("no usable lines in OCR text");
            return AttendanceRecord::default();
        }

        let mut record = AttendanceRecord::default();

        if let Some(id) = extract_employee_id(&lines) {
            tracing::debug!("employee id detected: {id}");
            record.employee_id = id;
        }
        if let Some(name) = extract_employee_name(&lines) {
            tracing::debug!("employee name detected: {name}");
            record.employee_name = name;
        }
        if let Some(dept) = extract_department(&lines) {
            tracing::debug!("department detected: {dept}");
            record.department = dept;
        }
        if let Some(date) = extract_work_date(&lines) {
            tracing::debug!("work date detected: {date}");
            record.work_date = date;
        }

        let (mut start, mut end) = extract_labeled_times(&lines);
        // Labeled matches are authoritative; the chronological fallback only
        // fills slots that are still empty.
        if start.is_none() || end.is_none() {
            recover_generic_times(&lines, &mut start, &mut end);
        }
        if let Some(t) = start {
            record.start_time = normalize::hhmm(t);
            tracing::debug!("start time detected: {}", record.start_time);
        }
        if let Some(t) = end {
            record.end_time = normalize::hhmm(t);
            tracing::debug!("end time detected: {}", record.end_time);
        }

        if let Some(minutes) = extract_break_minutes(&lines) {
            tracing::debug!("break detected: {minutes} min");
            record.break_time = minutes.to_string();
        } else if !record.start_time.is_empty() && !record.end_time.is_empty() {
            record.break_time = DEFAULT_BREAK_MINUTES.to_string();
        }

        if let Some(remarks) = extract_remarks(&lines) {
            tracing::debug!("remarks detected: {remarks}");
            record.remarks = remarks;
        }

        let formatted = reformat::format_transcript(ocr_text, &record);
        record.formatted_text = formatted;
        record
    }
}

// ── Field extractors ──────────────────────────────────────────────────────────
//
// Each extractor walks the lines in document order and returns the first
// satisfying match, trying its patterns in ranked order within each line.

fn extract_employee_id(lines: &[String]) -> Option<String> {
    let patterns = [re_id_label(), re_id_bare_digits(), re_id_no_prefix()];
    for line in lines {
        for re in patterns {
            if let Some(c) = re.captures(line) {
                return Some(c[1].to_string());
            }
        }
    }
    None
}

fn extract_employee_name(lines: &[String]) -> Option<String> {
    // A line that is nothing but the label promotes the line right under it.
    for (i, line) in lines.iter().enumerate() {
        if re_name_label_alone().is_match(line) {
            if let Some(next) = lines.get(i + 1) {
                if re_name_value().is_match(next)
                    && !EXCLUDED_NAME_WORDS.contains(&next.as_str())
                {
                    return Some(next.clone());
                }
            }
        }
    }

    // Label and value on one line, honorific suffixes stripped.
    for line in lines {
        for re in [re_name_labeled_jp(), re_name_labeled_en()] {
            if let Some(c) = re.captures(line) {
                let stripped = re_honorific().replace_all(c[1].trim(), "");
                let name = stripped.trim();
                let len = name.chars().count();
                if (2..=20).contains(&len)
                    && !EXCLUDED_NAME_WORDS.iter().any(|w| name.contains(w))
                {
                    return Some(name.to_string());
                }
            }
        }
    }

    // Last resort: a bare surname + given-name shape with no label at all.
    lines
        .iter()
        .find(|line| {
            re_name_two_part().is_match(line)
                && !EXCLUDED_NAME_WORDS.contains(&line.as_str())
        })
        .cloned()
}

fn extract_department(lines: &[String]) -> Option<String> {
    for line in lines {
        for re in [re_dept_labeled(), re_dept_suffix(), re_dept_labeled_en()] {
            if let Some(c) = re.captures(line) {
                let dept = c[1].trim();
                if !dept.is_empty() {
                    return Some(dept.to_string());
                }
            }
        }
    }
    None
}

fn extract_work_date(lines: &[String]) -> Option<String> {
    let patterns = [
        re_date_labeled(),
        re_date_ymd(),
        re_date_mdy(),
        re_date_kanji(),
        re_date_labeled_en(),
    ];
    for line in lines {
        // Era-calendar headers (R6年4月分 / 令和6年4月分) name a whole month,
        // not a day; they convert to YYYY-MM and outrank every other form.
        if let Some(c) = re_date_era().captures(line) {
            if let Some(month) = parse_era_month(&c[1], &c[2]) {
                return Some(month.to_string());
            }
        }
        for re in patterns {
            if let Some(c) = re.captures(line) {
                return Some(normalize::normalize_date(&c[1]));
            }
        }
    }
    None
}

fn parse_era_month(era_year: &str, month: &str) -> Option<ReiwaMonth> {
    ReiwaMonth::new(era_year.parse().ok()?, month.parse().ok()?)
}

/// Labeled clock-in/clock-out extraction. Each side is set at most once;
/// both sides are checked on every line.
fn extract_labeled_times(lines: &[String]) -> (Option<NaiveTime>, Option<NaiveTime>) {
    let mut start: Option<NaiveTime> = None;
    let mut end: Option<NaiveTime> = None;

    for line in lines {
        if start.is_none() {
            for re in [re_start_jp(), re_start_en()] {
                if let Some(c) = re.captures(line) {
                    if let Some(t) = normalize::time_from_digits(&c[1], &c[2]) {
                        start = Some(t);
                        break;
                    }
                }
            }
        }
        if end.is_none() {
            for re in [re_end_jp(), re_end_en()] {
                if let Some(c) = re.captures(line) {
                    if let Some(t) = normalize::time_from_digits(&c[1], &c[2]) {
                        end = Some(t);
                        break;
                    }
                }
            }
        }
    }

    (start, end)
}

/// Fallback when labeled extraction left a side empty: collect every valid
/// time token on the sheet and take the chronological extremes. A single
/// token is not enough to infer anything.
fn recover_generic_times(
    lines: &[String],
    start: &mut Option<NaiveTime>,
    end: &mut Option<NaiveTime>,
) {
    let mut found: Vec<NaiveTime> = Vec::new();
    for line in lines {
        for c in re_time_token().captures_iter(line) {
            if let Some(t) = normalize::time_from_digits(&c[1], &c[2]) {
                found.push(t);
            }
        }
    }

    if found.len() < 2 {
        return;
    }
    found.sort();
    if start.is_none() {
        *start = found.first().copied();
    }
    if end.is_none() {
        *end = found.last().copied();
    }
}

fn extract_break_minutes(lines: &[String]) -> Option<u16> {
    for line in lines {
        for re in [re_break_jp(), re_break_en(), re_break_reversed()] {
            if let Some(c) = re.captures(line) {
                if let Ok(minutes) = c[1].parse::<u16>() {
                    if minutes <= MAX_BREAK_MINUTES {
                        return Some(minutes);
                    }
                }
            }
        }
    }
    None
}

fn extract_remarks(lines: &[String]) -> Option<String> {
    for line in lines {
        for re in [re_remarks_jp(), re_remarks_en(), re_notes_en()] {
            if let Some(c) = re.captures(line) {
                let remarks = c[1].trim();
                if !remarks.is_empty() {
                    return Some(remarks.to_string());
                }
            }
        }
    }
    None
}

// ── Tests ─────────────────────────────────────────────────────────────────────
