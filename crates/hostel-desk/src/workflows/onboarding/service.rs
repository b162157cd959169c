use std::collections::BTreeMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use super::charges;
use super::domain::{BookingDraft, ValidationError};
use super::repository::{
    BookingId, BookingRecord, BookingRepository, BookingStatus, DeskAlert, DeskNotifier,
    GuestCredential, NotifyError, RepositoryError,
};

/// Service issuing the single booking write at the end of the wizard flow.
/// Overlapping submits are rejected by an in-flight latch, and a repeat of the
/// same guest/room/check-in is rejected as a duplicate.
pub struct BookingService<R, N> {
    repository: Arc<R>,
    notifier: Arc<N>,
    in_flight: AtomicBool,
}

static BOOKING_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_booking_id() -> BookingId {
    let id = BOOKING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    BookingId(format!("bk-{id:06}"))
}

fn issue_credential(booking_id: &BookingId, draft: &BookingDraft) -> GuestCredential {
    let mut hasher = DefaultHasher::new();
    booking_id.0.hash(&mut hasher);
    draft.guest.email.hash(&mut hasher);
    draft.room.id.0.hash(&mut hasher);
    draft.check_in.hash(&mut hasher);
    GuestCredential(format!("otp-{:010x}", hasher.finish() & 0xff_ffff_ffff))
}

impl<R, N> BookingService<R, N>
where
    R: BookingRepository + 'static,
    N: DeskNotifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>) -> Self {
        Self {
            repository,
            notifier,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Create a booking from an accumulated draft. Exactly one write; any
    /// failure before the write leaves nothing stored, and the caller's data
    /// stays intact for retry either way.
    pub fn create(&self, draft: BookingDraft) -> Result<BookingRecord, SubmissionError> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return Err(SubmissionError::AlreadyInFlight);
        }

        let result = self.create_inner(draft);
        self.in_flight.store(false, Ordering::Release);
        result
    }

    fn create_inner(&self, draft: BookingDraft) -> Result<BookingRecord, SubmissionError> {
        draft.validate()?;

        let expected = charges::quote(
            draft.room.monthly_rent,
            draft.advance_months,
            draft.deposit_months,
        );
        if draft.charges != expected {
            return Err(SubmissionError::StaleCharges {
                submitted_total: draft.charges.total_amount,
                expected_total: expected.total_amount,
            });
        }

        let reference = draft.reference();
        if self.repository.find_by_reference(&reference)?.is_some() {
            return Err(SubmissionError::Duplicate { reference });
        }

        let booking_id = next_booking_id();
        let credential = draft
            .existing_guest_id
            .is_none()
            .then(|| issue_credential(&booking_id, &draft));

        let record = BookingRecord {
            booking_id,
            draft,
            status: BookingStatus::Confirmed,
            credential,
        };
        let stored = self.repository.insert(record)?;

        let mut details = BTreeMap::new();
        details.insert("room".to_string(), stored.draft.room.room_number.clone());
        details.insert(
            "total_amount".to_string(),
            stored.draft.charges.total_amount.to_string(),
        );
        if stored.credential.is_some() {
            details.insert("credential_issued".to_string(), "true".to_string());
        }
        self.notifier.publish(DeskAlert {
            template: "booking_confirmed".to_string(),
            booking_id: stored.booking_id.clone(),
            details,
        })?;

        Ok(stored)
    }

    /// Fetch a booking and current status for API responses.
    pub fn get(&self, booking_id: &BookingId) -> Result<BookingRecord, SubmissionError> {
        let record = self
            .repository
            .fetch(booking_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }
}

/// Error raised by the booking service.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("a booking submit is already in flight")]
    AlreadyInFlight,
    #[error("this session already submitted its booking")]
    AlreadyCompleted,
    #[error("duplicate booking for {reference}")]
    Duplicate { reference: String },
    #[error("submitted charges are stale (submitted total {submitted_total}, expected {expected_total})")]
    StaleCharges {
        submitted_total: u32,
        expected_total: u32,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}
