use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::response::Response;
use serde_json::Value;

use crate::config::OnboardingConfig;
use crate::workflows::onboarding::catalog::{
    CatalogError, Property, PropertyId, Room, RoomCatalog, RoomId, RoomKind, RoomStatus,
};
use crate::workflows::onboarding::directory::{DirectoryError, DirectoryRole, GuestDirectory};
use crate::workflows::onboarding::domain::{FieldValue, FlowVariant, IdentityRecord, WizardField};
use crate::workflows::onboarding::repository::{
    BookingId, BookingRecord, BookingRepository, DeskAlert, DeskNotifier, NotifyError,
    RepositoryError,
};
use crate::workflows::onboarding::router::{onboarding_router, OnboardingGateway};
use crate::workflows::onboarding::service::BookingService;
use crate::workflows::onboarding::wizard::OnboardingWizard;

pub(super) fn onboarding_config() -> OnboardingConfig {
    OnboardingConfig {
        deposit_months: 1,
        search_debounce: Duration::from_millis(500),
    }
}

pub(super) fn property() -> Property {
    Property {
        id: PropertyId("north-wing".to_string()),
        name: "North Wing".to_string(),
    }
}

pub(super) fn available_room() -> Room {
    Room {
        id: RoomId("north-wing-101".to_string()),
        room_number: "101".to_string(),
        kind: RoomKind::Single,
        capacity: 1,
        floor: 1,
        monthly_rent: 10_000,
        status: RoomStatus::Available,
    }
}

pub(super) fn occupied_room() -> Room {
    Room {
        id: RoomId("north-wing-102".to_string()),
        room_number: "102".to_string(),
        kind: RoomKind::Double,
        capacity: 2,
        floor: 1,
        monthly_rent: 15_000,
        status: RoomStatus::Occupied,
    }
}

pub(super) fn identity_record() -> IdentityRecord {
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
    }
}

pub(super) fn fill_guest_details(wizard: &mut OnboardingWizard) {
    wizard
        .set_field(
            WizardField::GuestName,
            FieldValue::Text("Bilal Ahmed".to_string()),
        )
        .expect("name writable");
    wizard
        .set_field(
            WizardField::GuestEmail,
            FieldValue::Text("bilal@example.com".to_string()),
        )
        .expect("email writable");
    wizard
        .set_field(
            WizardField::GuestPhone,
            FieldValue::Text("0333-5550001".to_string()),
        )
        .expect("phone writable");
}

/// Wizard advanced to the Review step of the standard flow with a valid
/// booking accumulated.
pub(super) fn wizard_at_review() -> OnboardingWizard {
    let mut wizard = OnboardingWizard::new(FlowVariant::Standard, &onboarding_config());
    fill_guest_details(&mut wizard);
    wizard.go_next().expect("guest details pass");

    wizard
        .select_room(&property(), &available_room())
        .expect("room selectable");
    wizard.go_next().expect("assignment passes");

    wizard
        .set_field(
            WizardField::CheckInDate,
            FieldValue::Text("2026-09-01".to_string()),
        )
        .expect("check-in writable");
    wizard
        .set_field(WizardField::AdvanceMonths, FieldValue::Amount(2))
        .expect("advance writable");
    wizard.go_next().expect("financial terms pass");

    wizard
}

#[derive(Default, Clone)]
pub(super) struct MemoryBookingRepository {
    pub(super) records: Arc<Mutex<HashMap<BookingId, BookingRecord>>>,
}

impl BookingRepository for MemoryBookingRepository {
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
        Ok(guard.values().take(limit).cloned().collect())
    }
}

pub(super) struct UnavailableRepository;

impl BookingRepository for UnavailableRepository {
    fn insert(&self, _record: BookingRecord) -> Result<BookingRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &BookingId) -> Result<Option<BookingRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_by_reference(&self, _reference: &str) -> Result<Option<BookingRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn recent(&self, _limit: usize) -> Result<Vec<BookingRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    events: Arc<Mutex<Vec<DeskAlert>>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<DeskAlert> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

impl DeskNotifier for MemoryNotifier {
    fn publish(&self, alert: DeskAlert) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("alert mutex poisoned")
            .push(alert);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryDirectory {
    pub(super) records: Vec<IdentityRecord>,
}

impl GuestDirectory for MemoryDirectory {
    fn search(
        &self,
        query: &str,
        _role: DirectoryRole,
    ) -> Result<Vec<IdentityRecord>, DirectoryError> {
        let needle = query.trim().to_ascii_lowercase();
        Ok(self
            .records
            .iter()
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

pub(super) struct FailingDirectory;

impl GuestDirectory for FailingDirectory {
    fn search(
        &self,
        _query: &str,
        _role: DirectoryRole,
    ) -> Result<Vec<IdentityRecord>, DirectoryError> {
        Err(DirectoryError::Unavailable("search backend down".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct StaticCatalog {
    pub(super) properties: Vec<Property>,
    pub(super) rooms: Vec<(PropertyId, Room)>,
}

impl RoomCatalog for StaticCatalog {
    fn properties(&self) -> Result<Vec<Property>, CatalogError> {
        Ok(self.properties.clone())
    }

    fn rooms(&self, property: &PropertyId) -> Result<Vec<Room>, CatalogError> {
        Ok(self
            .rooms
            .iter()
            .filter(|(id, _)| id == property)
            .map(|(_, room)| room.clone())
            .collect())
    }
}

pub(super) fn seeded_catalog() -> StaticCatalog {
    let property = property();
    StaticCatalog {
        properties: vec![property.clone()],
        rooms: vec![
            (property.id.clone(), available_room()),
            (property.id.clone(), occupied_room()),
        ],
    }
}

pub(super) fn build_service() -> (
    BookingService<MemoryBookingRepository, MemoryNotifier>,
    Arc<MemoryBookingRepository>,
    Arc<MemoryNotifier>,
) {
    let repository = Arc::new(MemoryBookingRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = BookingService::new(repository.clone(), notifier.clone());
    (service, repository, notifier)
}

pub(super) fn build_router() -> axum::Router {
    let (service, _, _) = build_service();
    let gateway = OnboardingGateway {
        catalog: Arc::new(seeded_catalog()),
        directory: Arc::new(MemoryDirectory {
            records: vec![identity_record()],
        }),
        service: Arc::new(service),
    };
    onboarding_router(gateway)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
