//! Presentation helpers.
//!
//! Pure formatting functions used by front ends. None of these feed back
//! into the canonical model.

use crate::model::RequestContext;

/// Parse the leading integer of a code, the way a lenient form field would
/// ("70", "70 ", "70th" → 70).
fn leading_int(code: &str) -> Option<i64> {
    let trimmed = code.trim();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// Human label for a grade code.
///
/// 0 → Kindergarten, 10–90 and 100–120 → `Grade code/10`,
/// 130 → University/College, anything else verbatim. Empty → `N/A`.
pub fn format_grade(code: &str) -> String {
    if code.trim().is_empty() {
        return "N/A".to_string();
    }
    match leading_int(code) {
        Some(0) => "Kindergarten".to_string(),
        Some(n @ (10..=90 | 100..=120)) => format!("Grade {}", n as f64 / 10.0),
        Some(130) => "University/College".to_string(),
        _ => code.to_string(),
    }
}

/// Easy / Medium / Hard bucket for a numeric difficulty code.
pub fn difficulty_label(code: &str) -> &'static str {
    match leading_int(code) {
        None => "N/A",
        Some(n) if n <= 300 => "Easy",
        Some(n) if n <= 600 => "Medium",
        Some(_) => "Hard",
    }
}

pub fn format_locale(locale: &str) -> String {
    match locale.trim() {
        "" => "—".to_string(),
        "en_US" => "English (US)".to_string(),
        "pt_BR" => "Portuguese (BR)".to_string(),
        other => other.to_string(),
    }
}

/// Summary of the question types a list request asked for.
pub fn requested_types(context: &RequestContext) -> String {
    let mcq = context.num_mcq_requested;
    let open = context.num_open_ended_requested;
    match (mcq, open) {
        (0, 0) => "—".to_string(),
        (m, 0) => format!("{m} MCQ only"),
        (0, o) => format!("{o} Open-ended only"),
        (m, o) => format!("{m} MCQ, {o} Open-ended"),
    }
}

/// Truncate to `max_chars` characters, appending `...` when shortened.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{head}...")
}
