use crate::workflows::forecast::domain::Eligibility;
use chrono::{NaiveDate, NaiveTime};

pub(crate) fn clean_name(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Join key shared by the attendance and payment tables: the alphabetic
/// characters of each part, concatenated without a separator.
pub fn child_key(parts: &[&str]) -> String {
    parts
        .iter()
        .flat_map(|part| part.chars())
        .filter(|ch| ch.is_alphabetic())
        .collect()
}

/// Resolves the child identifier, preferring names over an explicit ID column.
pub(crate) fn resolve_child_id(
    first_name: Option<&str>,
    last_name: Option<&str>,
    explicit_id: Option<&str>,
) -> Option<String> {
    if first_name.is_some() || last_name.is_some() {
        let key = child_key(&[first_name.unwrap_or(""), last_name.unwrap_or("")]);
        if !key.is_empty() {
            return Some(key);
        }
    }

    let explicit = explicit_id?.trim();
    let key = child_key(&[explicit]);
    if !key.is_empty() {
        Some(key)
    } else if !explicit.is_empty() {
        Some(explicit.to_string())
    } else {
        None
    }
}

/// The explicit ID's key when names are present and spell a different child.
/// Numeric IDs never conflict.
pub(crate) fn conflicting_explicit_id(
    first_name: Option<&str>,
    last_name: Option<&str>,
    explicit_id: Option<&str>,
) -> Option<String> {
    let name_key = child_key(&[first_name.unwrap_or(""), last_name.unwrap_or("")]);
    let explicit_key = child_key(&[explicit_id?]);
    (!name_key.is_empty() && !explicit_key.is_empty() && name_key != explicit_key)
        .then_some(explicit_key)
}

/// "9:15 AM" -> "09:15 AM"
pub(crate) fn pad_hour(value: &str) -> String {
    let trimmed = value.trim();
    match trimmed.split_once(':') {
        Some((hour, _)) if hour.len() == 1 => format!("0{trimmed}"),
        _ => trimmed.to_string(),
    }
}

pub(crate) fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let padded = pad_hour(value).to_ascii_uppercase();
    NaiveTime::parse_from_str(&padded, "%I:%M %p")
        .or_else(|_| NaiveTime::parse_from_str(&padded, "%I:%M:%S %p"))
        .ok()
}

pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%m/%d/%Y"))
        .ok()
}

pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(true),
        "no" | "n" | "false" | "0" | "" => Some(false),
        _ => None,
    }
}

/// Accepts "$1,250.00" style amounts.
pub(crate) fn parse_money(value: &str) -> Option<f64> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|ch| !matches!(ch, '$' | ',' | ' '))
        .collect();
    cleaned.parse::<f64>().ok().filter(|amount| amount.is_finite())
}

/// A month has at most 31 days and a stay counts for at most two day units.
pub(crate) const MAX_DAYS_APPROVED: u32 = 31 * 2;

pub(crate) fn parse_days(value: &str) -> Option<u32> {
    let trimmed = value.trim();
    trimmed
        .parse::<u32>()
        .ok()
        .or_else(|| {
            // spreadsheets export whole counts as "5.0"
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|days| *days >= 0.0 && days.fract() == 0.0 && *days <= u32::MAX as f64)
                .map(|days| days as u32)
        })
        .filter(|days| *days <= MAX_DAYS_APPROVED)
}

pub(crate) fn parse_eligibility(value: &str) -> Eligibility {
    match value.trim().to_ascii_lowercase().as_str() {
        "no" | "false" | "ineligible" | "expired" | "inactive" | "closed" => {
            Eligibility::Ineligible
        }
        _ => Eligibility::Eligible,
    }
}
