//! Guest onboarding: the step-indexed wizard, derived charge computation,
//! room catalog filtering, identity directory search, and the single booking
//! write at the end of the flow.

pub mod catalog;
pub mod charges;
pub mod directory;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use catalog::{
    selectable_rooms, CatalogError, Property, PropertyId, Room, RoomCatalog, RoomId, RoomKind,
    RoomStatus,
};
pub use charges::{quote, DerivedCharges};
pub use directory::{
    run_search, DirectoryError, DirectoryRole, GuestDirectory, QueryTicket, SearchDebouncer,
    SearchSession,
};
pub use domain::{
    BookingDraft, FieldValue, FlowVariant, GuestProfile, IdentityRecord, IdentitySource,
    OnboardingStep, RoomSummary, ValidationError, WizardError, WizardField,
};
pub use repository::{
    BookingId, BookingRecord, BookingRepository, BookingStatus, BookingStatusView, DeskAlert,
    DeskNotifier, GuestCredential, NotifyError, RepositoryError,
};
pub use router::{onboarding_router, OnboardingGateway};
pub use service::{BookingService, SubmissionError};
pub use wizard::OnboardingWizard;
