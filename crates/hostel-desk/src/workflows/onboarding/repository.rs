use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::BookingDraft;

/// Identifier wrapper for confirmed bookings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(pub String);

/// One-time credential issued when a guest account is auto-created. Shown to
/// the operator once; never a shared literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestCredential(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
}

impl BookingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::CheckedIn => "checked_in",
            Self::CheckedOut => "checked_out",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Repository record for a stored booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRecord {
    pub booking_id: BookingId,
    pub draft: BookingDraft,
    pub status: BookingStatus,
    pub credential: Option<GuestCredential>,
}

impl BookingRecord {
    pub fn reference(&self) -> String {
        self.draft.reference()
    }

    pub fn status_view(&self) -> BookingStatusView {
        BookingStatusView {
            booking_id: self.booking_id.clone(),
            status: self.status.label(),
            guest_name: self.draft.guest.name.clone(),
            room_number: self.draft.room.room_number.clone(),
            check_in: self.draft.check_in.to_string(),
            security_deposit: self.draft.charges.security_deposit,
            total_amount: self.draft.charges.total_amount,
            credential: self
                .credential
                .as_ref()
                .map(|credential| credential.0.clone()),
        }
    }
}

/// Storage abstraction so the booking service can be exercised in isolation.
pub trait BookingRepository: Send + Sync {
    fn insert(&self, record: BookingRecord) -> Result<BookingRecord, RepositoryError>;
    fn fetch(&self, id: &BookingId) -> Result<Option<BookingRecord>, RepositoryError>;
    fn find_by_reference(&self, reference: &str) -> Result<Option<BookingRecord>, RepositoryError>;
    fn recent(&self, limit: usize) -> Result<Vec<BookingRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("booking already exists")]
    Conflict,
    #[error("booking not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound notification hook (front-desk dashboard, e-mail adapter, ...).
pub trait DeskNotifier: Send + Sync {
    fn publish(&self, alert: DeskAlert) -> Result<(), NotifyError>;
}

/// Notification payload so routes/tests can assert integration boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeskAlert {
    pub template: String,
    pub booking_id: BookingId,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Sanitized representation of a booking's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct BookingStatusView {
    pub booking_id: BookingId,
    pub status: &'static str,
    pub guest_name: String,
    pub room_number: String,
    pub check_in: String,
    pub security_deposit: u32,
    pub total_amount: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}
