use std::collections::BTreeMap;
use std::time::Duration;

use chrono::NaiveDate;

use crate::config::OnboardingConfig;

use super::catalog::{Property, Room};
use super::charges::{self, DerivedCharges};
use super::directory::SearchSession;
use super::domain::{
    BookingDraft, FieldValue, FlowVariant, GuestProfile, IdentityRecord, IdentitySource,
    OnboardingStep, RoomSummary, ValidationError, WizardError, WizardField,
};
use super::repository::{BookingRecord, BookingRepository, DeskNotifier};
use super::service::{BookingService, SubmissionError};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Step-indexed controller for the guest onboarding flow. Lives in memory for
/// one session; forward navigation is gated on per-step validation, derived
/// charges track their drivers synchronously, and exactly one booking write
/// happens at the end.
#[derive(Debug)]
pub struct OnboardingWizard {
    variant: FlowVariant,
    deposit_months: u32,
    position: usize,
    fields: BTreeMap<WizardField, FieldValue>,
    identity: IdentitySource,
    selected_property: Option<Property>,
    selected_room: Option<Room>,
    charges: DerivedCharges,
    cleared: Vec<OnboardingStep>,
    completed: bool,
    search: SearchSession,
}

impl OnboardingWizard {
    pub fn new(variant: FlowVariant, config: &OnboardingConfig) -> Self {
        Self::with_dials(variant, config.deposit_months, config.search_debounce)
    }

    pub fn with_dials(variant: FlowVariant, deposit_months: u32, search_debounce: Duration) -> Self {
        Self {
            variant,
            deposit_months: deposit_months.max(1),
            position: 0,
            fields: BTreeMap::new(),
            identity: IdentitySource::Manual,
            selected_property: None,
            selected_room: None,
            charges: DerivedCharges::default(),
            cleared: Vec::new(),
            completed: false,
            search: SearchSession::new(search_debounce),
        }
    }

    pub fn variant(&self) -> FlowVariant {
        self.variant
    }

    pub fn current_step(&self) -> OnboardingStep {
        self.variant.steps()[self.position]
    }

    /// 1-based step index, always within `[1, step_count]`.
    pub fn step_number(&self) -> usize {
        self.position + 1
    }

    pub fn step_count(&self) -> usize {
        self.variant.step_count()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn charges(&self) -> DerivedCharges {
        self.charges
    }

    pub fn field(&self, field: WizardField) -> Option<&FieldValue> {
        self.fields.get(&field)
    }

    pub fn fields(&self) -> &BTreeMap<WizardField, FieldValue> {
        &self.fields
    }

    pub fn identity(&self) -> &IdentitySource {
        &self.identity
    }

    pub fn selected_room(&self) -> Option<&Room> {
        self.selected_room.as_ref()
    }

    pub fn search(&mut self) -> &mut SearchSession {
        &mut self.search
    }

    pub fn cleared_steps(&self) -> &[OnboardingStep] {
        &self.cleared
    }

    /// Validate the current step and advance one position on success. The
    /// failed case leaves the position untouched and reports the first
    /// missing/invalid field.
    pub fn go_next(&mut self) -> Result<OnboardingStep, ValidationError> {
        let step = self.current_step();
        self.validate_step(step)?;

        if !self.cleared.contains(&step) {
            self.cleared.push(step);
        }

        let last = self.variant.step_count() - 1;
        self.position = (self.position + 1).min(last);
        Ok(self.current_step())
    }

    /// Back navigation is always allowed and never re-validates.
    pub fn go_back(&mut self) -> OnboardingStep {
        self.position = self.position.saturating_sub(1);
        self.current_step()
    }

    /// Write a field value. Identity fields are rejected while an existing
    /// guest is selected; changing the advance-months driver recomputes the
    /// derived charges before returning.
    pub fn set_field(&mut self, field: WizardField, value: FieldValue) -> Result<(), WizardError> {
        if field.is_identity() && self.identity.existing().is_some() {
            return Err(WizardError::FieldLocked(field));
        }

        self.fields.insert(field, value);
        if field == WizardField::AdvanceMonths {
            self.recompute_charges();
        }
        Ok(())
    }

    /// Select a room (the other financial driver). Non-available rooms are
    /// rejected here even if a stale list offered one.
    pub fn select_room(&mut self, property: &Property, room: &Room) -> Result<(), WizardError> {
        if !room.is_selectable() {
            return Err(WizardError::RoomUnavailable {
                room_number: room.room_number.clone(),
            });
        }

        self.selected_property = Some(property.clone());
        self.selected_room = Some(room.clone());
        self.recompute_charges();
        Ok(())
    }

    pub fn clear_room(&mut self) {
        self.selected_property = None;
        self.selected_room = None;
        self.recompute_charges();
    }

    /// Adopt an existing guest: identity fields are overwritten wholesale,
    /// locked for the rest of the session, and pending search state is
    /// dropped.
    pub fn select_existing_identity(&mut self, record: IdentityRecord) {
        self.write_identity_fields(&record);
        self.identity = IdentitySource::Existing(record);
        self.search.clear();
    }

    /// Round-trip back to manual entry: unlock and blank the identity fields.
    pub fn clear_identity_selection(&mut self) {
        self.identity = IdentitySource::Manual;
        for field in WizardField::identity_fields() {
            self.fields.remove(&field);
        }
    }

    /// Recompute derived charges from the current drivers. Always a full
    /// recomputation; never accumulates.
    pub fn recompute_charges(&mut self) {
        let monthly_rent = self
            .selected_room
            .as_ref()
            .map(|room| room.monthly_rent)
            .unwrap_or(0);
        self.charges = charges::quote(monthly_rent, self.advance_months(), self.deposit_months);
    }

    /// Defensive full-form re-check, then the single booking write. Success
    /// moves the wizard to its terminal state; any failure leaves every field
    /// intact for retry.
    pub fn submit<R, N>(
        &mut self,
        service: &BookingService<R, N>,
    ) -> Result<BookingRecord, SubmissionError>
    where
        R: BookingRepository + 'static,
        N: DeskNotifier + 'static,
    {
        if self.completed {
            return Err(SubmissionError::AlreadyCompleted);
        }

        let draft = self.draft()?;
        let record = service.create(draft)?;
        self.completed = true;
        Ok(record)
    }

    /// Assemble the booking write from the accumulated fields, re-validating
    /// every step of the variant first.
    pub fn draft(&self) -> Result<BookingDraft, ValidationError> {
        for step in self.variant.steps() {
            self.validate_step(*step)?;
        }

        let property = self
            .selected_property
            .as_ref()
            .ok_or(ValidationError::PropertyRequired)?;
        let room = self
            .selected_room
            .as_ref()
            .ok_or(ValidationError::RoomRequired)?;

        let check_in = self
            .parse_date_field(WizardField::CheckInDate)?
            .ok_or(ValidationError::CheckInRequired)?;
        let check_out = self.parse_date_field(WizardField::CheckOutDate)?;

        Ok(BookingDraft {
            flow: self.variant,
            guest: GuestProfile {
                name: self.text(WizardField::GuestName).unwrap_or_default(),
                email: self.text(WizardField::GuestEmail).unwrap_or_default(),
                phone: self.text(WizardField::GuestPhone).unwrap_or_default(),
                cnic: self.text(WizardField::GuestCnic),
                address: self.text(WizardField::GuestAddress),
                guardian_name: self.text(WizardField::GuardianName),
                guardian_phone: self.text(WizardField::GuardianPhone),
                emergency_contact: self.text(WizardField::EmergencyContact),
            },
            existing_guest_id: self.identity.existing().map(|record| record.id.clone()),
            property_id: property.id.clone(),
            property_name: property.name.clone(),
            room: RoomSummary::from(room),
            check_in,
            check_out,
            advance_months: self.advance_months(),
            deposit_months: self.deposit_months,
            charges: self.charges,
            notes: self.text(WizardField::Notes),
        })
    }

    pub fn validate_step(&self, step: OnboardingStep) -> Result<(), ValidationError> {
        match step {
            OnboardingStep::GuestDetails => self.validate_guest_details(),
            OnboardingStep::RoomAssignment => self.validate_room_assignment(),
            OnboardingStep::FinancialTerms => self.validate_financial_terms(),
            OnboardingStep::Documents => self.validate_documents(),
            OnboardingStep::Review => Ok(()),
        }
    }

    fn validate_guest_details(&self) -> Result<(), ValidationError> {
        if self.identity.existing().is_some() {
            return Ok(());
        }

        let name = self.text(WizardField::GuestName).unwrap_or_default();
        if name.trim().is_empty() {
            return Err(ValidationError::GuestNameRequired);
        }

        let email = self.text(WizardField::GuestEmail).unwrap_or_default();
        if email.trim().is_empty() {
            return Err(ValidationError::GuestEmailRequired);
        }
        if !email.contains('@') {
            return Err(ValidationError::GuestEmailInvalid);
        }

        let phone = self.text(WizardField::GuestPhone).unwrap_or_default();
        if phone.trim().is_empty() {
            return Err(ValidationError::GuestPhoneRequired);
        }

        Ok(())
    }

    fn validate_room_assignment(&self) -> Result<(), ValidationError> {
        if self.selected_property.is_none() {
            return Err(ValidationError::PropertyRequired);
        }
        if self.selected_room.is_none() {
            return Err(ValidationError::RoomRequired);
        }
        Ok(())
    }

    fn validate_financial_terms(&self) -> Result<(), ValidationError> {
        let check_in = self
            .parse_date_field(WizardField::CheckInDate)?
            .ok_or(ValidationError::CheckInRequired)?;

        if let Some(check_out) = self.parse_date_field(WizardField::CheckOutDate)? {
            if check_out < check_in {
                return Err(ValidationError::CheckOutBeforeCheckIn);
            }
        }

        Ok(())
    }

    fn validate_documents(&self) -> Result<(), ValidationError> {
        if self.blank(WizardField::DocumentFront) {
            return Err(ValidationError::DocumentFrontRequired);
        }
        if self.blank(WizardField::DocumentBack) {
            return Err(ValidationError::DocumentBackRequired);
        }
        Ok(())
    }

    fn write_identity_fields(&mut self, record: &IdentityRecord) {
        let IdentityRecord {
            id: _,
            name,
            email,
            phone,
            cnic,
            address,
            guardian_name,
            guardian_phone,
            emergency_contact,
        } = record;

        let pairs = [
            (WizardField::GuestName, Some(name.clone())),
            (WizardField::GuestEmail, Some(email.clone())),
            (WizardField::GuestPhone, Some(phone.clone())),
            (WizardField::GuestCnic, cnic.clone()),
            (WizardField::GuestAddress, address.clone()),
            (WizardField::GuardianName, guardian_name.clone()),
            (WizardField::GuardianPhone, guardian_phone.clone()),
            (WizardField::EmergencyContact, emergency_contact.clone()),
        ];

        for (field, value) in pairs {
            match value {
                Some(value) => {
                    self.fields.insert(field, FieldValue::Text(value));
                }
                None => {
                    self.fields.remove(&field);
                }
            }
        }
    }

    fn advance_months(&self) -> u32 {
        self.fields
            .get(&WizardField::AdvanceMonths)
            .and_then(FieldValue::as_amount)
            .unwrap_or(0)
    }

    fn text(&self, field: WizardField) -> Option<String> {
        self.fields
            .get(&field)
            .and_then(FieldValue::as_text)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    fn blank(&self, field: WizardField) -> bool {
        self.fields
            .get(&field)
            .map(FieldValue::is_blank)
            .unwrap_or(true)
    }

    fn parse_date_field(&self, field: WizardField) -> Result<Option<NaiveDate>, ValidationError> {
        let Some(raw) = self.text(field) else {
            return Ok(None);
        };

        let parsed = NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| match field {
            WizardField::CheckOutDate => ValidationError::CheckOutInvalid(raw.clone()),
            _ => ValidationError::CheckInInvalid(raw.clone()),
        })?;

        Ok(Some(parsed))
    }
}
