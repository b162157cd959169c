use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

use hostel_desk::workflows::onboarding::{
    BookingId, BookingRecord, BookingRepository, DeskAlert, DeskNotifier, DirectoryError,
    DirectoryRole, GuestDirectory, IdentityRecord, NotifyError, RepositoryError,
};
use hostel_desk::workflows::roster::{RosterImporter, SeededCatalog};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryBookingRepository {
    records: Arc<Mutex<HashMap<BookingId, BookingRecord>>>,
}

impl BookingRepository for InMemoryBookingRepository {
    fn insert(&self, record: BookingRecord) -> Result<BookingRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.booking_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.booking_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &BookingId) -> Result<Option<BookingRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_by_reference(&self, reference: &str) -> Result<Option<BookingRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|record| record.reference() == reference)
            .cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<BookingRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<BookingRecord> = guard.values().cloned().collect();
        records.sort_by(|a, b| b.booking_id.0.cmp(&a.booking_id.0));
        records.truncate(limit);
        Ok(records)
    }
}

/// Notifier that logs alerts and keeps them for the demo to print.
#[derive(Default, Clone)]
pub(crate) struct LoggingDeskNotifier {
    events: Arc<Mutex<Vec<DeskAlert>>>,
}

impl LoggingDeskNotifier {
    pub(crate) fn events(&self) -> Vec<DeskAlert> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

impl DeskNotifier for LoggingDeskNotifier {
    fn publish(&self, alert: DeskAlert) -> Result<(), NotifyError> {
        info!(template = %alert.template, booking = %alert.booking_id.0, "desk alert");
        self.events
            .lock()
            .expect("alert mutex poisoned")
            .push(alert);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryDirectory {
    records: Vec<(DirectoryRole, IdentityRecord)>,
}

impl InMemoryDirectory {
    pub(crate) fn with_records(records: Vec<(DirectoryRole, IdentityRecord)>) -> Self {
        Self { records }
    }
}

impl GuestDirectory for InMemoryDirectory {
    fn search(
        &self,
        query: &str,
        role: DirectoryRole,
    ) -> Result<Vec<IdentityRecord>, DirectoryError> {
        let needle = query.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self
            .records
            .iter()
            .filter(|(record_role, _)| *record_role == role)
            .map(|(_, record)| record)
            .filter(|record| {
                record.name.to_ascii_lowercase().contains(&needle)
                    || record.email.to_ascii_lowercase().contains(&needle)
                    || record
                        .cnic
                        .as_deref()
                        .is_some_and(|cnic| cnic.contains(&needle))
            })
            .cloned()
            .collect())
    }
}

const DEMO_ROSTER: &str = "\
Property,Room Number,Type,Capacity,Floor,Monthly Rent,Status
North Wing,101,Single,1,1,12000,AVAILABLE
North Wing,102,Double,2,1,15000,OCCUPIED
North Wing,103,Shared,4,1,9000,AVAILABLE
South Wing,201,Dormitory,6,2,6500,AVAILABLE
South Wing,202,Single,1,2,11000,Under Maintenance
";

pub(crate) fn demo_catalog() -> SeededCatalog {
    RosterImporter::from_reader(Cursor::new(DEMO_ROSTER)).expect("embedded roster is valid")
}

pub(crate) fn demo_directory() -> InMemoryDirectory {
    InMemoryDirectory::with_records(vec![
        (
            DirectoryRole::Guest,
            IdentityRecord {
                id: "guest-042".to_string(),
                name: "Ayesha Khan".to_string(),
                email: "ayesha@example.com".to_string(),
                phone: "0301-1234567".to_string(),
                cnic: Some("35202-1234567-1".to_string()),
                address: Some("14 Canal Road, Lahore".to_string()),
                guardian_name: Some("Imran Khan".to_string()),
                guardian_phone: Some("0300-7654321".to_string()),
                emergency_contact: Some("0321-0000000".to_string()),
            },
        ),
        (
            DirectoryRole::Resident,
            IdentityRecord {
                id: "resident-007".to_string(),
                name: "Usman Tariq".to_string(),
                email: "usman@example.com".to_string(),
                phone: "0345-9998877".to_string(),
                cnic: None,
                address: None,
                guardian_name: None,
                guardian_phone: None,
                emergency_contact: None,
            },
        ),
    ])
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
