//! Shared formatting utilities for the UI layer.
use chrono::NaiveDate;
use shared_types::{Capability, WorkingWeek};

const DAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Format a date as "20 Jan 2026", or `-` when unset.
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%-d %b %Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// `YYYY-MM-DD` for `<input type="date">`; empty when unset.
pub fn date_input_value(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Parse the value of a date input. Blank or malformed input is `None`.
pub fn parse_date_input(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Convert a kebab-case key to sentence case
/// (e.g. "can-manage-material-take-off" -> "Manage material take off").
pub fn format_kebab_sentence(s: &str) -> String {
    let mut words = s.split('-').filter(|w| !w.is_empty());
    let mut out = match words.next() {
        Some(first) => {
            let mut chars = first.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        }
        None => return String::new(),
    };
    for word in words {
        out.push(' ');
        out.push_str(word);
    }
    out
}

pub fn capability_label(capability: Capability) -> String {
    format_kebab_sentence(capability.key().trim_start_matches("can-"))
}

/// Weekday pairs for the working-week checkboxes, Monday first.
pub fn working_week_days(week: &WorkingWeek) -> [(&'static str, bool); 7] {
    let bits = week.bits();
    let mut days = [("", false); 7];
    for (i, label) in DAY_LABELS.iter().enumerate() {
        days[i] = (*label, bits & (1 << i) != 0);
    }
    days
}

/// Toggle one weekday (0 = Monday) in a working week.
pub fn toggle_working_day(week: WorkingWeek, index: usize) -> WorkingWeek {
    WorkingWeek::from_bits(week.bits() ^ (1 << index))
}

/// Compact label such as "Mon-Fri" or "Mon, Wed, Sat".
pub fn format_working_week(week: &WorkingWeek) -> String {
    let bits = week.bits();
    match bits {
        0 => "No working days".to_string(),
        0b001_1111 => "Mon-Fri".to_string(),
        0b011_1111 => "Mon-Sat".to_string(),
        0b111_1111 => "Every day".to_string(),
        _ => DAY_LABELS
            .iter()
            .enumerate()
            .filter(|(i, _)| bits & (1 << i) != 0)
            .map(|(_, d)| *d)
            .collect::<Vec<_>>()
            .join(", "),
    }
}
