use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::catalog::{PropertyId, Room, RoomId};
use super::charges::DerivedCharges;

/// Ordered steps of the guest onboarding wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    GuestDetails,
    RoomAssignment,
    FinancialTerms,
    Documents,
    Review,
}

impl OnboardingStep {
    pub const fn label(self) -> &'static str {
        match self {
            Self::GuestDetails => "Guest Details",
            Self::RoomAssignment => "Room Assignment",
            Self::FinancialTerms => "Financial Terms",
            Self::Documents => "Identity Documents",
            Self::Review => "Review & Submit",
        }
    }
}

/// Which onboarding flow is being driven. Guest deployments require identity
/// document attachments; walk-in bookings do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowVariant {
    Standard,
    GuestDeployment,
}

impl FlowVariant {
    pub const fn steps(self) -> &'static [OnboardingStep] {
        match self {
            Self::Standard => &[
                OnboardingStep::GuestDetails,
                OnboardingStep::RoomAssignment,
                OnboardingStep::FinancialTerms,
                OnboardingStep::Review,
            ],
            Self::GuestDeployment => &[
                OnboardingStep::GuestDetails,
                OnboardingStep::RoomAssignment,
                OnboardingStep::FinancialTerms,
                OnboardingStep::Documents,
                OnboardingStep::Review,
            ],
        }
    }

    pub const fn step_count(self) -> usize {
        self.steps().len()
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Standard => "Walk-in Booking",
            Self::GuestDeployment => "Guest Deployment",
        }
    }
}

/// Form fields accumulated across wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardField {
    GuestName,
    GuestEmail,
    GuestPhone,
    GuestCnic,
    GuestAddress,
    GuardianName,
    GuardianPhone,
    EmergencyContact,
    CheckInDate,
    CheckOutDate,
    AdvanceMonths,
    DocumentFront,
    DocumentBack,
    Notes,
}

impl WizardField {
    /// Fields overwritten wholesale (and locked) when an existing guest is selected.
    pub const fn is_identity(self) -> bool {
        matches!(
            self,
            Self::GuestName
                | Self::GuestEmail
                | Self::GuestPhone
                | Self::GuestCnic
                | Self::GuestAddress
                | Self::GuardianName
                | Self::GuardianPhone
                | Self::EmergencyContact
        )
    }

    pub const fn identity_fields() -> [Self; 8] {
        [
            Self::GuestName,
            Self::GuestEmail,
            Self::GuestPhone,
            Self::GuestCnic,
            Self::GuestAddress,
            Self::GuardianName,
            Self::GuardianPhone,
            Self::EmergencyContact,
        ]
    }
}

/// Value stored for a wizard field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Amount(u32),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value.as_str()),
            FieldValue::Amount(_) => None,
        }
    }

    pub fn as_amount(&self) -> Option<u32> {
        match self {
            FieldValue::Amount(value) => Some(*value),
            FieldValue::Text(_) => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(value) => value.trim().is_empty(),
            FieldValue::Amount(_) => false,
        }
    }
}

/// A previously registered person fetchable by directory search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub cnic: Option<String>,
    pub address: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub emergency_contact: Option<String>,
}

/// Which identity source is authoritative for the session. Exactly one holds
/// at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentitySource {
    Manual,
    Existing(IdentityRecord),
}

impl IdentitySource {
    pub fn existing(&self) -> Option<&IdentityRecord> {
        match self {
            IdentitySource::Existing(record) => Some(record),
            IdentitySource::Manual => None,
        }
    }
}

/// Per-step validation failures. First error wins; the message names the
/// offending field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("guest name required")]
    GuestNameRequired,
    #[error("guest email required")]
    GuestEmailRequired,
    #[error("guest email must contain '@'")]
    GuestEmailInvalid,
    #[error("guest phone required")]
    GuestPhoneRequired,
    #[error("property selection required")]
    PropertyRequired,
    #[error("room selection required")]
    RoomRequired,
    #[error("check-in date required")]
    CheckInRequired,
    #[error("check-in date must be YYYY-MM-DD, got '{0}'")]
    CheckInInvalid(String),
    #[error("check-out date must be YYYY-MM-DD, got '{0}'")]
    CheckOutInvalid(String),
    #[error("check-out date precedes check-in")]
    CheckOutBeforeCheckIn,
    #[error("identity document (front) required")]
    DocumentFrontRequired,
    #[error("identity document (back) required")]
    DocumentBackRequired,
}

/// Failures raised by wizard operations outside step validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("field {0:?} is locked while an existing guest is selected")]
    FieldLocked(WizardField),
    #[error("room {room_number} is not available for booking")]
    RoomUnavailable { room_number: String },
}

/// Room subset carried on the booking write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub id: RoomId,
    pub room_number: String,
    pub monthly_rent: u32,
}

impl From<&Room> for RoomSummary {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.clone(),
            room_number: room.room_number.clone(),
            monthly_rent: room.monthly_rent,
        }
    }
}

/// Guest identity as accumulated by the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub cnic: Option<String>,
    pub address: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub emergency_contact: Option<String>,
}

/// The single write issued at the end of the flow: accumulated fields plus
/// computed charges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub flow: FlowVariant,
    pub guest: GuestProfile,
    pub existing_guest_id: Option<String>,
    pub property_id: PropertyId,
    pub property_name: String,
    pub room: RoomSummary,
    pub check_in: NaiveDate,
    pub check_out: Option<NaiveDate>,
    pub advance_months: u32,
    pub deposit_months: u32,
    pub charges: DerivedCharges,
    pub notes: Option<String>,
}

impl BookingDraft {
    /// Natural key used to reject duplicate submissions of the same stay.
    pub fn reference(&self) -> String {
        format!(
            "{}|{}|{}",
            self.guest.email.trim().to_ascii_lowercase(),
            self.room.id.0,
            self.check_in
        )
    }

    /// Full-form validation mirroring the wizard's per-step rules, re-run on
    /// drafts arriving straight off the wire.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.guest.name.trim().is_empty() {
            return Err(ValidationError::GuestNameRequired);
        }
        if self.guest.email.trim().is_empty() {
            return Err(ValidationError::GuestEmailRequired);
        }
        if !self.guest.email.contains('@') {
            return Err(ValidationError::GuestEmailInvalid);
        }
        if self.guest.phone.trim().is_empty() {
            return Err(ValidationError::GuestPhoneRequired);
        }
        if self.room.room_number.trim().is_empty() {
            return Err(ValidationError::RoomRequired);
        }
        if let Some(check_out) = self.check_out {
            if check_out < self.check_in {
                return Err(ValidationError::CheckOutBeforeCheckIn);
            }
        }
        Ok(())
    }
}
