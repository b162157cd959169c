use serde::{Deserialize, Serialize};

/// Identifier wrapper for hostel properties.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PropertyId(pub String);

/// Identifier wrapper for rooms.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoomId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomKind {
    Single,
    Double,
    Shared,
    Dormitory,
}

impl RoomKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::Double => "Double",
            Self::Shared => "Shared",
            Self::Dormitory => "Dormitory",
        }
    }
}

/// Occupancy state as published by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    Available,
    Occupied,
    UnderMaintenance,
}

impl RoomStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Occupied => "Occupied",
            Self::UnderMaintenance => "Under Maintenance",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub room_number: String,
    pub kind: RoomKind,
    pub capacity: u8,
    pub floor: i8,
    pub monthly_rent: u32,
    pub status: RoomStatus,
}

impl Room {
    pub const fn is_selectable(&self) -> bool {
        matches!(self.status, RoomStatus::Available)
    }
}

/// Read-only lookup over the property/room catalog.
pub trait RoomCatalog: Send + Sync {
    fn properties(&self) -> Result<Vec<Property>, CatalogError>;
    fn rooms(&self, property: &PropertyId) -> Result<Vec<Room>, CatalogError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("property {0} not found")]
    PropertyNotFound(String),
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Rooms offered for selection. Occupied and maintenance rooms are excluded
/// outright, and lookup failures degrade to an empty list.
pub fn selectable_rooms<C>(catalog: &C, property: &PropertyId) -> Vec<Room>
where
    C: RoomCatalog + ?Sized,
{
    match catalog.rooms(property) {
        Ok(rooms) => rooms.into_iter().filter(Room::is_selectable).collect(),
        Err(_) => Vec::new(),
    }
}
