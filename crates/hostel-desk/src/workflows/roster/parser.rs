use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::normalizer::{normalize_cell, parse_amount, parse_kind, parse_status};
use super::RosterImportError;
use crate::workflows::onboarding::catalog::{RoomKind, RoomStatus};

#[derive(Debug)]
pub(crate) struct RosterRecord {
    pub(crate) property: String,
    pub(crate) room_number: String,
    pub(crate) kind: RoomKind,
    pub(crate) capacity: u8,
    pub(crate) floor: i8,
    pub(crate) monthly_rent: u32,
    pub(crate) status: RoomStatus,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<RosterRecord>, RosterImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for record in csv_reader.deserialize::<RosterRow>() {
        let row = record?;

        let property = row.property.trim().to_string();
        let room_number = row.room_number.trim().to_string();
        if property.is_empty() || room_number.is_empty() {
            continue;
        }

        let monthly_rent = parse_amount(&row.monthly_rent).ok_or_else(|| {
            RosterImportError::InvalidCell {
                column: "Monthly Rent",
                value: row.monthly_rent.clone(),
            }
        })?;

        records.push(RosterRecord {
            property,
            room_number,
            kind: parse_kind(row.kind.as_deref()),
            capacity: row.parsed_capacity(),
            floor: row.parsed_floor(),
            monthly_rent,
            status: parse_status(row.status.as_deref()),
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "Property")]
    property: String,
    #[serde(rename = "Room Number")]
    room_number: String,
    #[serde(rename = "Type", default, deserialize_with = "empty_string_as_none")]
    kind: Option<String>,
    #[serde(rename = "Capacity", default, deserialize_with = "empty_string_as_none")]
    capacity: Option<String>,
    #[serde(rename = "Floor", default, deserialize_with = "empty_string_as_none")]
    floor: Option<String>,
    #[serde(rename = "Monthly Rent")]
    monthly_rent: String,
    #[serde(rename = "Status", default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
}

impl RosterRow {
    fn parsed_capacity(&self) -> u8 {
        self.capacity
            .as_deref()
            .map(normalize_cell)
            .and_then(|value| value.parse().ok())
            .unwrap_or(1)
    }

    fn parsed_floor(&self) -> i8 {
        self.floor
            .as_deref()
            .map(normalize_cell)
            .and_then(|value| value.parse().ok())
            .unwrap_or(0)
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
