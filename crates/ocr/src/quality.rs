use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

fn re_japanese() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"[ぁ-ゟ一-龯ァ-ヾ]").expect("invalid regex"))
}

fn re_time_token() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"\d{1,2}:\d{2}").expect("invalid regex"))
}

fn re_date_token() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"\d{4}[-/年]\d{1,2}[-/月]\d{1,2}").expect("invalid regex"))
}

/// Heuristic confidence in a raw transcript, with the reasons it lost points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextQuality {
    /// 0–100, additive rubric.
    pub score: u8,
    pub issues: Vec<String>,
}

/// Score a raw OCR transcript before extraction. Advisory only: callers may
/// surface it to reviewers, but extraction never consults it.
pub fn evaluate(raw: &str) -> TextQuality {
    if raw.is_empty() {
        return TextQuality {
            score: 0,
            issues: vec!["text is empty".to_string()],
        };
    }

    let mut score = 0u8;
    let mut issues = Vec::new();

    let len = raw.chars().count();
    if len >= 50 {
        score += 20;
    } else if len >= 20 {
        score += 15;
    } else {
        issues.push("text is too short".to_string());
    }

    if re_japanese().is_match(raw) {
        score += 30;
    } else {
        issues.push("no Japanese characters detected".to_string());
    }

    if raw.chars().any(|c| c.is_ascii_digit()) {
        score += 20;
    } else {
        issues.push("no digits detected".to_string());
    }

    if re_time_token().is_match(raw) {
        score += 20;
    } else {
        issues.push("no clock-time pattern detected".to_string());
    }

    // Month-header sheets legitimately carry no full date; score it, don't
    // flag it.
    if re_date_token().is_match(raw) {
        score += 10;
    }

    TextQuality { score, issues }
}
