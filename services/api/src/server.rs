use crate::cli::ServeArgs;
use crate::infra::{
    demo_catalog, demo_directory, AppState, InMemoryBookingRepository, LoggingDeskNotifier,
};
use crate::routes::with_onboarding_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

use hostel_desk::config::AppConfig;
use hostel_desk::error::AppError;
use hostel_desk::telemetry;
use hostel_desk::workflows::onboarding::{BookingService, OnboardingGateway};
use hostel_desk::workflows::roster::RosterImporter;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config)?;

    let catalog = match args.roster_csv.take() {
        Some(path) => {
            let catalog = RosterImporter::from_path(&path)?;
            let summary = catalog.summary();
            info!(
                roster = %path.display(),
                properties = summary.properties,
                rooms = summary.rooms,
                occupied = summary.occupied,
                "catalog seeded from roster export"
            );
            catalog
        }
        None => demo_catalog(),
    };

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryBookingRepository::default());
    let notifier = Arc::new(LoggingDeskNotifier::default());
    let gateway = OnboardingGateway {
        catalog: Arc::new(catalog),
        directory: Arc::new(demo_directory()),
        service: Arc::new(BookingService::new(repository, notifier)),
    };

    let app = with_onboarding_routes(gateway)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "hostel desk service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
