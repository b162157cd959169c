use std::sync::Arc;

use super::common::*;
use crate::workflows::onboarding::charges::DerivedCharges;
use crate::workflows::onboarding::domain::ValidationError;
use crate::workflows::onboarding::repository::{BookingId, BookingRepository, RepositoryError};
use crate::workflows::onboarding::service::{BookingService, SubmissionError};

#[test]
fn create_stores_booking_and_notifies_front_desk() {
    let (service, repository, notifier) = build_service();
    let draft = wizard_at_review().draft().expect("valid draft");

    let record = service.create(draft).expect("booking stored");
    let stored = repository
        .fetch(&record.booking_id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.draft.guest.name, "Bilal Ahmed");

    let events = notifier.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].template, "booking_confirmed");
    assert_eq!(events[0].details.get("room"), Some(&"101".to_string()));
}

#[test]
fn new_guests_get_a_generated_one_time_credential() {
    let (service, _, _) = build_service();
    let draft = wizard_at_review().draft().expect("valid draft");

    let record = service.create(draft).expect("booking stored");
    let credential = record.credential.expect("credential issued");
    assert!(credential.0.starts_with("otp-"));
    assert!(credential.0.len() > 8);
}

#[test]
fn existing_guests_get_no_credential() {
    let (service, _, _) = build_service();
    let mut draft = wizard_at_review().draft().expect("valid draft");
    draft.existing_guest_id = Some("guest-042".to_string());

    let record = service.create(draft).expect("booking stored");
    assert!(record.credential.is_none());
}

#[test]
fn duplicate_stay_is_rejected() {
    let (service, _, _) = build_service();
    let draft = wizard_at_review().draft().expect("valid draft");

    service.create(draft.clone()).expect("first booking stored");
    match service.create(draft) {
        Err(SubmissionError::Duplicate { reference }) => {
            assert!(reference.contains("bilal@example.com"));
        }
        other => panic!("expected duplicate error, got {other:?}"),
    }
}

#[test]
fn tampered_charges_are_rejected() {
    let (service, repository, _) = build_service();
    let mut draft = wizard_at_review().draft().expect("valid draft");
    draft.charges = DerivedCharges {
        security_deposit: 1,
        total_amount: 1,
    };

    match service.create(draft) {
        Err(SubmissionError::StaleCharges { expected_total, .. }) => {
            assert_eq!(expected_total, 30_000);
        }
        other => panic!("expected stale charges error, got {other:?}"),
    }
    assert!(repository.records.lock().expect("lock").is_empty());
}

#[test]
fn invalid_draft_is_rejected_before_any_write() {
    let (service, repository, notifier) = build_service();
    let mut draft = wizard_at_review().draft().expect("valid draft");
    draft.guest.email = "nowhere".to_string();

    match service.create(draft) {
        Err(SubmissionError::Validation(ValidationError::GuestEmailInvalid)) => {}
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(repository.records.lock().expect("lock").is_empty());
    assert!(notifier.events().is_empty());
}

#[test]
fn repository_outage_surfaces_verbatim() {
    let repository = Arc::new(UnavailableRepository);
    let notifier = Arc::new(MemoryNotifier::default());
    let service = BookingService::new(repository, notifier.clone());
    let draft = wizard_at_review().draft().expect("valid draft");

    match service.create(draft) {
        Err(SubmissionError::Repository(RepositoryError::Unavailable(message))) => {
            assert_eq!(message, "database offline");
        }
        other => panic!("expected unavailable error, got {other:?}"),
    }
    assert!(notifier.events().is_empty());
}

#[test]
fn get_propagates_not_found() {
    let (service, _, _) = build_service();
    match service.get(&BookingId("missing".to_string())) {
        Err(SubmissionError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found error, got {other:?}"),
    }
}

#[test]
fn status_view_exposes_totals_and_credential() {
    let (service, _, _) = build_service();
    let draft = wizard_at_review().draft().expect("valid draft");
    let record = service.create(draft).expect("booking stored");

    let view = record.status_view();
    assert_eq!(view.status, "confirmed");
    assert_eq!(view.security_deposit, 10_000);
    assert_eq!(view.total_amount, 30_000);
    assert!(view.credential.is_some());
}
