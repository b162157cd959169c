//! Roster seeding: a one-off CSV import that hydrates the room catalog from a
//! hostel roster export.

mod normalizer;
mod parser;

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Serialize;

use crate::workflows::onboarding::catalog::{
    CatalogError, Property, PropertyId, Room, RoomCatalog, RoomId, RoomStatus,
};

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidCell {
        column: &'static str,
        value: String,
    },
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster export: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::InvalidCell { column, value } => {
                write!(f, "roster cell '{}' is not a valid {}", value, column)
            }
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::InvalidCell { .. } => None,
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<SeededCatalog, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Build a catalog from a roster export. Duplicate property/room rows keep
    /// the first occurrence.
    pub fn from_reader<R: Read>(reader: R) -> Result<SeededCatalog, RosterImportError> {
        let mut catalog = SeededCatalog::default();

        for record in parser::parse_records(reader)? {
            let property_id = PropertyId(normalizer::slugify(&record.property));
            let room_id = RoomId(format!(
                "{}-{}",
                property_id.0,
                normalizer::slugify(&record.room_number)
            ));

            let rooms = catalog.rooms.entry(property_id.clone()).or_default();
            if !catalog.properties.iter().any(|p| p.id == property_id) {
                catalog.properties.push(Property {
                    id: property_id,
                    name: record.property.clone(),
                });
            }
            if rooms.iter().any(|room: &Room| room.id == room_id) {
                continue;
            }

            rooms.push(Room {
                id: room_id,
                room_number: record.room_number,
                kind: record.kind,
                capacity: record.capacity,
                floor: record.floor,
                monthly_rent: record.monthly_rent,
                status: record.status,
            });
        }

        Ok(catalog)
    }
}

/// In-memory catalog hydrated from a roster export.
#[derive(Debug, Default, Clone)]
pub struct SeededCatalog {
    properties: Vec<Property>,
    rooms: BTreeMap<PropertyId, Vec<Room>>,
}

impl SeededCatalog {
    pub fn summary(&self) -> RosterSummary {
        let rooms: usize = self.rooms.values().map(Vec::len).sum();
        let occupied = self
            .rooms
            .values()
            .flatten()
            .filter(|room| room.status == RoomStatus::Occupied)
            .count();

        RosterSummary {
            properties: self.properties.len(),
            rooms,
            occupied,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl RoomCatalog for SeededCatalog {
    fn properties(&self) -> Result<Vec<Property>, CatalogError> {
        Ok(self.properties.clone())
    }

    fn rooms(&self, property: &PropertyId) -> Result<Vec<Room>, CatalogError> {
        self.rooms
            .get(property)
            .cloned()
            .ok_or_else(|| CatalogError::PropertyNotFound(property.0.clone()))
    }
}

/// Counts reported after a seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RosterSummary {
    pub properties: usize,
    pub rooms: usize,
    pub occupied: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::onboarding::catalog::{selectable_rooms, RoomKind};
    use std::io::Cursor;

    const ROSTER: &str = "\
Property,Room Number,Type,Capacity,Floor,Monthly Rent,Status
North Wing,101,Single,1,1,12000,AVAILABLE
North Wing,102,Double,2,1,\"15,000\",OCCUPIED
North Wing,103,,,,9000,
Annex,A-1,Dormitory,6,0,6500,Under Maintenance
";

    #[test]
    fn importer_builds_catalog_with_normalized_cells() {
        let catalog = RosterImporter::from_reader(Cursor::new(ROSTER)).expect("import succeeds");
        let summary = catalog.summary();
        assert_eq!(summary.properties, 2);
        assert_eq!(summary.rooms, 4);
        assert_eq!(summary.occupied, 1);

        let north = PropertyId("north-wing".to_string());
        let rooms = catalog.rooms(&north).expect("north wing present");
        assert_eq!(rooms.len(), 3);
        assert_eq!(rooms[1].monthly_rent, 15_000);
        assert_eq!(rooms[1].status, RoomStatus::Occupied);
        assert_eq!(rooms[2].kind, RoomKind::Shared);
        assert_eq!(rooms[2].status, RoomStatus::Available);
    }

    #[test]
    fn importer_keeps_first_occurrence_of_duplicate_rooms() {
        let csv = "\
Property,Room Number,Type,Capacity,Floor,Monthly Rent,Status
North Wing,101,Single,1,1,12000,AVAILABLE
North Wing,101,Single,1,1,99999,OCCUPIED
";
        let catalog = RosterImporter::from_reader(Cursor::new(csv)).expect("import succeeds");
        let rooms = catalog
            .rooms(&PropertyId("north-wing".to_string()))
            .expect("rooms");
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].monthly_rent, 12_000);
    }

    #[test]
    fn importer_rejects_unparseable_rent() {
        let csv = "\
Property,Room Number,Type,Capacity,Floor,Monthly Rent,Status
North Wing,101,Single,1,1,free,AVAILABLE
";
        match RosterImporter::from_reader(Cursor::new(csv)) {
            Err(RosterImportError::InvalidCell { column, .. }) => {
                assert_eq!(column, "Monthly Rent");
            }
            other => panic!("expected invalid cell error, got {other:?}"),
        }
    }

    #[test]
    fn importer_skips_blank_identifier_rows() {
        let csv = "\
Property,Room Number,Type,Capacity,Floor,Monthly Rent,Status
,101,Single,1,1,12000,AVAILABLE
North Wing,,Single,1,1,12000,AVAILABLE
";
        let catalog = RosterImporter::from_reader(Cursor::new(csv)).expect("import succeeds");
        assert!(catalog.is_empty());
    }

    #[test]
    fn importer_from_path_propagates_io_errors() {
        match RosterImporter::from_path("./does-not-exist.csv") {
            Err(RosterImportError::Io(_)) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn occupied_rooms_never_reach_the_selectable_list() {
        let catalog = RosterImporter::from_reader(Cursor::new(ROSTER)).expect("import succeeds");
        let north = PropertyId("north-wing".to_string());
        let selectable = selectable_rooms(&catalog, &north);
        assert!(selectable.iter().all(|room| room.status == RoomStatus::Available));
        assert!(!selectable.iter().any(|room| room.room_number == "102"));
    }
}
