use crate::infra::{
    demo_catalog, demo_directory, parse_date, InMemoryBookingRepository, LoggingDeskNotifier,
};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use hostel_desk::config::OnboardingConfig;
use hostel_desk::error::AppError;
use hostel_desk::workflows::onboarding::{
    run_search, selectable_rooms, BookingService, DirectoryRole, FieldValue, FlowVariant,
    OnboardingStep, OnboardingWizard, RoomCatalog, WizardField,
};
use hostel_desk::workflows::roster::{RosterImporter, SeededCatalog};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Check-in date (YYYY-MM-DD). Defaults to 14 days from today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) check_in: Option<NaiveDate>,
    /// Months of rent collected in advance
    #[arg(long, default_value_t = 2)]
    pub(crate) advance_months: u32,
    /// Optional roster CSV export to seed the catalog
    #[arg(long)]
    pub(crate) roster_csv: Option<PathBuf>,
    /// Search the directory and onboard the first matching existing guest
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Drive the guest-deployment variant (adds the documents step)
    #[arg(long)]
    pub(crate) deployment: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RosterInspectArgs {
    /// Roster CSV export to summarize
    #[arg(long)]
    pub(crate) csv: PathBuf,
}

pub(crate) fn run_roster_inspect(args: RosterInspectArgs) -> Result<(), AppError> {
    let catalog = RosterImporter::from_path(&args.csv)?;
    let summary = catalog.summary();

    println!("Roster export: {}", args.csv.display());
    println!("- properties: {}", summary.properties);
    println!("- rooms: {}", summary.rooms);
    println!("- occupied: {}", summary.occupied);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        check_in,
        advance_months,
        roster_csv,
        search,
        deployment,
    } = args;

    let check_in = check_in.unwrap_or_else(|| Local::now().date_naive() + chrono::Duration::days(14));
    let catalog = load_catalog(roster_csv)?;
    let directory = demo_directory();

    let variant = if deployment {
        FlowVariant::GuestDeployment
    } else {
        FlowVariant::Standard
    };
    let config = OnboardingConfig::default();
    let mut wizard = OnboardingWizard::new(variant, &config);

    println!("Onboarding demo: {}", wizard.variant().label());
    let summary = catalog.summary();
    println!(
        "Catalog: {} properties, {} rooms ({} occupied)",
        summary.properties, summary.rooms, summary.occupied
    );

    // Guest details, either via debounced directory search or manual entry.
    if let Some(query) = search {
        let started = Instant::now();
        let session = wizard.search();
        for (idx, ch) in query.char_indices() {
            session.input(&query[..idx + ch.len_utf8()], started);
        }
        let Some(ticket) = session.due(started + config.search_debounce) else {
            println!("Search never fired for '{query}'");
            return Ok(());
        };
        println!(
            "Directory search '{}' as {} (query #{}, after {}ms pause)",
            ticket.query,
            DirectoryRole::Guest.label(),
            ticket.generation,
            config.search_debounce.as_millis()
        );

        let candidates = run_search(&directory, &ticket, DirectoryRole::Guest);
        wizard.search().apply(candidates);
        match wizard.search().results().first().cloned() {
            Some(record) => {
                println!("- matched {} <{}>", record.name, record.email);
                wizard.select_existing_identity(record);
            }
            None => {
                println!("- no candidates; falling back to manual entry");
                fill_demo_guest(&mut wizard)?;
            }
        }
    } else {
        fill_demo_guest(&mut wizard)?;
    }
    advance(&mut wizard)?;

    // Room assignment from the first property with a selectable room.
    let properties = catalog.properties().unwrap_or_default();
    let Some((property, room)) = properties.iter().find_map(|property| {
        selectable_rooms(&catalog, &property.id)
            .into_iter()
            .next()
            .map(|room| (property.clone(), room))
    }) else {
        println!("No selectable rooms in the catalog; nothing to book");
        return Ok(());
    };
    println!("Selectable rooms in {}:", property.name);
    for candidate in selectable_rooms(&catalog, &property.id) {
        println!(
            "- room {} ({}, {} PKR/month, {})",
            candidate.room_number,
            candidate.kind.label(),
            candidate.monthly_rent,
            candidate.status.label()
        );
    }
    println!(
        "Assigning {} room {} ({} PKR/month)",
        property.name, room.room_number, room.monthly_rent
    );
    if let Err(err) = wizard.select_room(&property, &room) {
        println!("Room selection rejected: {err}");
        return Ok(());
    }
    advance(&mut wizard)?;

    // Financial terms.
    set(
        &mut wizard,
        WizardField::CheckInDate,
        FieldValue::Text(check_in.to_string()),
    )?;
    set(
        &mut wizard,
        WizardField::AdvanceMonths,
        FieldValue::Amount(advance_months),
    )?;
    let charges = wizard.charges();
    println!(
        "Quoted charges: deposit {} + {} months advance = {} PKR total",
        charges.security_deposit, advance_months, charges.total_amount
    );
    advance(&mut wizard)?;

    if wizard.current_step() == OnboardingStep::Documents {
        set(
            &mut wizard,
            WizardField::DocumentFront,
            FieldValue::Text("uploads/cnic-front.jpg".to_string()),
        )?;
        set(
            &mut wizard,
            WizardField::DocumentBack,
            FieldValue::Text("uploads/cnic-back.jpg".to_string()),
        )?;
        advance(&mut wizard)?;
    }

    println!(
        "Review step {}/{}; submitting booking",
        wizard.step_number(),
        wizard.step_count()
    );

    let repository = Arc::new(InMemoryBookingRepository::default());
    let notifier = Arc::new(LoggingDeskNotifier::default());
    let service = BookingService::new(repository, notifier.clone());

    let record = match wizard.submit(&service) {
        Ok(record) => record,
        Err(err) => {
            println!("Submission rejected: {err}");
            return Ok(());
        }
    };

    let view = record.status_view();
    println!(
        "Booking {} -> {} for {} in room {}, check-in {}",
        view.booking_id.0, view.status, view.guest_name, view.room_number, view.check_in
    );
    match &view.credential {
        Some(credential) => println!("One-time guest credential: {credential}"),
        None => println!("Existing guest account; no credential issued"),
    }
    match serde_json::to_string_pretty(&view) {
        Ok(json) => println!("Public status payload:\n{json}"),
        Err(err) => println!("Public status payload unavailable: {err}"),
    }

    let events = notifier.events();
    if events.is_empty() {
        println!("Desk alerts: none dispatched");
    } else {
        println!("Desk alerts:");
        for alert in events {
            println!("  - template={} -> {}", alert.template, alert.booking_id.0);
        }
    }

    Ok(())
}

fn load_catalog(roster_csv: Option<PathBuf>) -> Result<SeededCatalog, AppError> {
    match roster_csv {
        Some(path) => Ok(RosterImporter::from_path(path)?),
        None => Ok(demo_catalog()),
    }
}

fn fill_demo_guest(wizard: &mut OnboardingWizard) -> Result<(), AppError> {
    set(
        wizard,
        WizardField::GuestName,
        FieldValue::Text("Bilal Ahmed".to_string()),
    )?;
    set(
        wizard,
        WizardField::GuestEmail,
        FieldValue::Text("bilal@example.com".to_string()),
    )?;
    set(
        wizard,
        WizardField::GuestPhone,
        FieldValue::Text("0333-5550001".to_string()),
    )?;
    Ok(())
}

fn set(
    wizard: &mut OnboardingWizard,
    field: WizardField,
    value: FieldValue,
) -> Result<(), AppError> {
    wizard.set_field(field, value)?;
    Ok(())
}

fn advance(wizard: &mut OnboardingWizard) -> Result<(), AppError> {
    let step = wizard.go_next()?;
    println!(
        "-> step {}/{}: {}",
        wizard.step_number(),
        wizard.step_count(),
        step.label()
    );
    Ok(())
}
