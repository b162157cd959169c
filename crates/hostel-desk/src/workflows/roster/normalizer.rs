use crate::workflows::onboarding::catalog::{RoomKind, RoomStatus};

pub(crate) fn normalize_cell(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}

/// Unknown or blank statuses default to available.
pub(crate) fn parse_status(raw: Option<&str>) -> RoomStatus {
    let normalized = raw.map(normalize_cell).unwrap_or_default();
    match normalized.as_str() {
        "occupied" | "booked" => RoomStatus::Occupied,
        "maintenance" | "under maintenance" | "repair" => RoomStatus::UnderMaintenance,
        _ => RoomStatus::Available,
    }
}

/// Unknown or blank room types default to shared.
pub(crate) fn parse_kind(raw: Option<&str>) -> RoomKind {
    let normalized = raw.map(normalize_cell).unwrap_or_default();
    match normalized.as_str() {
        "single" => RoomKind::Single,
        "double" => RoomKind::Double,
        "dorm" | "dormitory" => RoomKind::Dormitory,
        _ => RoomKind::Shared,
    }
}

/// Parse an amount cell, tolerating thousands separators.
pub(crate) fn parse_amount(raw: &str) -> Option<u32> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

pub(crate) fn slugify(value: &str) -> String {
    normalize_cell(value)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
