use std::sync::OnceLock;

use regex::Regex;

use kintai_core::AttendanceRecord;

use crate::lines::candidate_lines;

fn re_time_token() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"(\d{1,2}):(\d{2})").expect("invalid regex"))
}

/// Line context that marks a time as a clock-in.
const CHECK_IN_KEYWORDS: [&str; 2] = ["イン", "出社"];
/// Line context that marks a time as a clock-out.
const CHECK_OUT_KEYWORDS: [&str; 2] = ["アウト", "帰り"];

/// Clock-in hours assumed when the line context says nothing.
const START_HOURS: std::ops::RangeInclusive<u32> = 6..=11;
/// Clock-out hours assumed when the line context says nothing.
const END_HOURS: std::ops::RangeInclusive<u32> = 17..=23;

/// Rendered column width per cell; a row holds three in/out pairs.
const CELL_WIDTH: usize = 8;

/// A detected time token, classified from its source line.
struct TimeToken {
    text: String,
    start_like: bool,
    end_like: bool,
}

/// Rebuild a clean, tabular transcript from the raw OCR text.
///
/// This is a second, independent pass over the same input: it ignores the
/// structured extraction entirely except for the header fields already on the
/// record. The output is what a reviewer reads and edits downstream.
pub fn format_transcript(raw: &str, record: &AttendanceRecord) -> String {
    let lines = candidate_lines(raw);

    let mut out = String::new();
    out.push_str("タイムカード");
    if record.work_date.is_empty() {
        out.push('\n');
    } else {
        out.push_str(&format!("  {}分\n", record.work_date));
    }
    if !record.employee_name.is_empty() {
        out.push_str(&format!("氏名: {}\n", record.employee_name));
    }
    if !record.department.is_empty() {
        out.push_str(&format!("部署: {}\n", record.department));
    }
    out.push('\n');

    for row in pack_rows(&collect_tokens(&lines)) {
        out.push_str(&row);
        out.push('\n');
    }
    out
}

fn collect_tokens(lines: &[String]) -> Vec<TimeToken> {
    let mut tokens = Vec::new();
    for line in lines {
        for c in re_time_token().captures_iter(line) {
            let Ok(hour) = c[1].parse::<u32>() else { continue };
            tokens.push(TimeToken {
                // Tokens render verbatim; 9:05 is not re-padded.
                text: c[0].to_string(),
                start_like: CHECK_IN_KEYWORDS.iter().any(|k| line.contains(k))
                    || START_HOURS.contains(&hour),
                end_like: CHECK_OUT_KEYWORDS.iter().any(|k| line.contains(k))
                    || END_HOURS.contains(&hour),
            });
        }
    }
    tokens
}

/// Pack classified tokens into rows of three in/out pairs (slots 0/2/4 for
/// clock-ins, 1/3/5 for clock-outs). A row is flushed as soon as any pair is
/// complete, or when input runs out.
///
/// Start classification is tried first, so a token that qualifies as both
/// lands in a clock-in slot. Tokens in the 12–16 hour band with no keyword
/// context qualify as neither and are skipped.
fn pack_rows(tokens: &[TimeToken]) -> Vec<String> {
    let mut rows = Vec::new();
    let mut slots: [Option<&str>; 6] = [None; 6];

    for (i, token) in tokens.iter().enumerate() {
        if token.start_like {
            if let Some(&slot) = [0, 2, 4].iter().find(|&&s| slots[s].is_none()) {
                slots[slot] = Some(&token.text);
            }
        } else if token.end_like {
            // Prefer completing a pair whose clock-in is already placed.
            let slot = if slots[0].is_some() && slots[1].is_none() {
                Some(1)
            } else if slots[2].is_some() && slots[3].is_none() {
                Some(3)
            } else if slots[4].is_some() && slots[5].is_none() {
                Some(5)
            } else if slots[1].is_none() {
                Some(1)
            } else if slots[3].is_none() {
                Some(3)
            } else if slots[5].is_none() {
                Some(5)
            } else {
                None
            };
            if let Some(slot) = slot {
                slots[slot] = Some(&token.text);
            }
        }

        if pair_complete(&slots) || i == tokens.len() - 1 {
            let rendered = render_row(&slots);
            if !rendered.is_empty() {
                rows.push(rendered);
            }
            slots = [None; 6];
        }
    }
    rows
}

fn pair_complete(slots: &[Option<&str>; 6]) -> bool {
    (slots[0].is_some() && slots[1].is_some())
        || (slots[2].is_some() && slots[3].is_some())
        || (slots[4].is_some() && slots[5].is_some())
}

/// Fixed-width cells, right-trimmed; an all-blank row renders empty.
fn render_row(slots: &[Option<&str>; 6]) -> String {
    let mut row = String::new();
    for slot in slots {
        match slot {
            Some(text) => row.push_str(&format!("{text:<width$}", width = CELL_WIDTH)),
            None => row.push_str(&" ".repeat(CELL_WIDTH)),
        }
    }
    row.trim_end().to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with(name: &str, dept: &str, date: &str) -> AttendanceRecord {
        AttendanceRecord {
            employee_name: name.to_string(),
            department: dept.to_string(),
            work_date: date.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn header_only_for_text_without_times() {
        let out = format_transcript("ただのメモ", &AttendanceRecord::default());
        assert_eq!(out, "タイムカード\n\n");
    }

    #[test]
    fn header_carries_recovered_fields() {
        let out = format_transcript("ただのメモ", &record_with("山田太郎", "営業部", "2024-06"));
        assert_eq!(out, "タイムカード  2024-06分\n氏名: 山田太郎\n部署: 営業部\n\n");
    }

    #[test]
    fn morning_and_evening_pair_one_row() {
        let out = format_transcript("09:00\n18:00", &AttendanceRecord::default());
        assert_eq!(out, "タイムカード\n\n09:00   18:00\n");
    }

    #[test]
    fn keyword_context_overrides_hour_band() {
        // 13:00 and 14:00 sit in the unclassifiable hour band; the keywords
        // decide instead.
        let out = format_transcript("イン 13:00\nアウト 14:00", &AttendanceRecord::default());
        assert_eq!(out, "タイムカード\n\n13:00   14:00\n");
    }

    #[test]
    fn start_classification_wins_ties() {
        // イン context plus an 18h clock both apply; the token must land in a
        // clock-in slot.
        let out = format_transcript("イン 18:00\n19:00", &AttendanceRecord::default());
        assert_eq!(out, "タイムカード\n\n18:00   19:00\n");
    }

    #[test]
    fn midday_tokens_without_context_are_skipped() {
        let out = format_transcript("12:30\n13:15", &AttendanceRecord::default());
        assert_eq!(out, "タイムカード\n\n");
    }

    #[test]
    fn row_flushes_on_first_completed_pair() {
        // Two clock-ins stack into slots 0 and 2; the clock-out completes the
        // first pair and flushes the row with the second clock-in dangling.
        let out = format_transcript("08:00\n09:00\n17:00", &AttendanceRecord::default());
        assert_eq!(out, "タイムカード\n\n08:00   17:00   09:00\n");
    }

    #[test]
    fn multiple_rows_for_multiple_pairs() {
        let out = format_transcript("09:00\n18:00\n08:30\n17:30", &AttendanceRecord::default());
        assert_eq!(out, "タイムカード\n\n09:00   18:00\n08:30   17:30\n");
    }

    #[test]
    fn clock_outs_without_ins_keep_their_columns() {
        let out = format_transcript("18:00\n19:00", &AttendanceRecord::default());
        assert_eq!(out, "タイムカード\n\n        18:00           19:00\n");
    }

    #[test]
    fn tokens_render_verbatim_without_repadding() {
        let out = format_transcript("9:05\n18:40", &AttendanceRecord::default());
        assert_eq!(out, "タイムカード\n\n9:05    18:40\n");
    }
}
