use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::sections::{contains_any, report_lines};

pub const FOLLOW_UP_CUES: &[&str] = &[
    "follow-up",
    "follow up",
    "next visit",
    "return",
    "appointment",
    "check-up",
    "checkup",
    "revisit",
];

const URGENT_TERMS: &[&str] = &["acute", "severe", "critical", "emergency"];
const LONG_TERM_TERMS: &[&str] = &["chronic", "stable", "controlled"];

pub const URGENT_FOLLOW_UP: &str = "Follow-up recommended in 1 week";
pub const LONG_TERM_FOLLOW_UP: &str = "Follow-up recommended in 3 months";
pub const DEFAULT_FOLLOW_UP: &str = "Follow-up recommended in 1 month";

/// Lines read after a cue line when looking for a period or date.
const CONTEXT_LINES_AFTER_CUE: usize = 2;

static RELATIVE_PERIOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:in|after|within)\s+([0-9]+)\s+(day|days|week|weeks|month|months)")
        .expect("Invalid follow-up period pattern")
});

// Word boundaries keep 2025-03-15 whole instead of matching 25-03-15 inside it.
static DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // 03/15/2025, 15-03-25
        Regex::new(r"\b[0-9]{1,2}[/-][0-9]{1,2}[/-][0-9]{2,4}\b").expect("Invalid date pattern"),
        // 2025-03-15
        Regex::new(r"\b[0-9]{4}[/-][0-9]{1,2}[/-][0-9]{1,2}\b").expect("Invalid date pattern"),
    ]
});

/// Resolve the follow-up recommendation for a report.
///
/// Tries, in order: a relative period or explicit date near a follow-up cue,
/// a severity-based default, and finally a one-month default.
pub fn resolve_follow_up(text: &str) -> String {
    let lines = report_lines(text);

    for (i, line) in lines.iter().enumerate() {
        if !contains_any(&line.to_lowercase(), FOLLOW_UP_CUES) {
            continue;
        }

        let end = (i + 1 + CONTEXT_LINES_AFTER_CUE).min(lines.len());
        let window = lines[i..end].join(" ").to_lowercase();

        if let Some(resolution) = resolve_window(&window) {
            debug!(line = i, %resolution, "follow-up resolved from cue");
            return resolution;
        }
    }

    let text_lower = text.to_lowercase();
    if contains_any(&text_lower, URGENT_TERMS) {
        URGENT_FOLLOW_UP.to_string()
    } else if contains_any(&text_lower, LONG_TERM_TERMS) {
        LONG_TERM_FOLLOW_UP.to_string()
    } else {
        DEFAULT_FOLLOW_UP.to_string()
    }
}

fn resolve_window(window: &str) -> Option<String> {
    if let Some(caps) = RELATIVE_PERIOD.captures(window) {
        let count = normalize_count(&caps[1]);
        let unit = &caps[2];
        let unit = if unit.starts_with("day") {
            "day"
        } else if unit.starts_with("week") {
            "week"
        } else {
            "month"
        };
        return Some(format!("Follow-up recommended in {count} {unit}(s)"));
    }

    DATE_PATTERNS
        .iter()
        .find_map(|pattern| pattern.find(window))
        .map(|date| format!("Follow-up scheduled: {}", date.as_str()))
}

/// Print a digit run as an integer: leading zeros dropped, "0" kept.
fn normalize_count(digits: &str) -> &str {
    match digits.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    }
}
