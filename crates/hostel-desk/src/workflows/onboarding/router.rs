use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::catalog::{selectable_rooms, PropertyId, RoomCatalog};
use super::directory::{DirectoryRole, GuestDirectory};
use super::domain::BookingDraft;
use super::repository::{BookingId, BookingRepository, DeskNotifier, RepositoryError};
use super::service::{BookingService, SubmissionError};

/// Shared state for the onboarding endpoints: the three collaborators the
/// wizard consumes.
pub struct OnboardingGateway<C, D, R, N> {
    pub catalog: Arc<C>,
    pub directory: Arc<D>,
    pub service: Arc<BookingService<R, N>>,
}

impl<C, D, R, N> Clone for OnboardingGateway<C, D, R, N> {
    fn clone(&self) -> Self {
        Self {
            catalog: self.catalog.clone(),
            directory: self.directory.clone(),
            service: self.service.clone(),
        }
    }
}

/// Router builder exposing directory search, catalog lookup, and booking
/// submission.
pub fn onboarding_router<C, D, R, N>(gateway: OnboardingGateway<C, D, R, N>) -> Router
where
    C: RoomCatalog + 'static,
    D: GuestDirectory + 'static,
    R: BookingRepository + 'static,
    N: DeskNotifier + 'static,
{
    Router::new()
        .route(
            "/api/v1/directory/search",
            get(search_handler::<C, D, R, N>),
        )
        .route(
            "/api/v1/catalog/properties",
            get(properties_handler::<C, D, R, N>),
        )
        .route(
            "/api/v1/catalog/properties/:property_id/rooms",
            get(rooms_handler::<C, D, R, N>),
        )
        .route(
            "/api/v1/onboarding/bookings",
            post(submit_handler::<C, D, R, N>),
        )
        .route(
            "/api/v1/onboarding/bookings/:booking_id",
            get(status_handler::<C, D, R, N>),
        )
        .with_state(gateway)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchParams {
    #[serde(default)]
    q: String,
    role: Option<DirectoryRole>,
}

pub(crate) async fn search_handler<C, D, R, N>(
    State(gateway): State<OnboardingGateway<C, D, R, N>>,
    Query(params): Query<SearchParams>,
) -> Response
where
    C: RoomCatalog + 'static,
    D: GuestDirectory + 'static,
    R: BookingRepository + 'static,
    N: DeskNotifier + 'static,
{
    let role = params.role.unwrap_or(DirectoryRole::Guest);
    // Lookup failures degrade to an empty candidate list.
    let candidates = gateway
        .directory
        .search(&params.q, role)
        .unwrap_or_default();
    (StatusCode::OK, axum::Json(candidates)).into_response()
}

pub(crate) async fn properties_handler<C, D, R, N>(
    State(gateway): State<OnboardingGateway<C, D, R, N>>,
) -> Response
where
    C: RoomCatalog + 'static,
    D: GuestDirectory + 'static,
    R: BookingRepository + 'static,
    N: DeskNotifier + 'static,
{
    let properties = gateway.catalog.properties().unwrap_or_default();
    (StatusCode::OK, axum::Json(properties)).into_response()
}

pub(crate) async fn rooms_handler<C, D, R, N>(
    State(gateway): State<OnboardingGateway<C, D, R, N>>,
    Path(property_id): Path<String>,
) -> Response
where
    C: RoomCatalog + 'static,
    D: GuestDirectory + 'static,
    R: BookingRepository + 'static,
    N: DeskNotifier + 'static,
{
    let rooms = selectable_rooms(gateway.catalog.as_ref(), &PropertyId(property_id));
    (StatusCode::OK, axum::Json(rooms)).into_response()
}

pub(crate) async fn submit_handler<C, D, R, N>(
    State(gateway): State<OnboardingGateway<C, D, R, N>>,
    axum::Json(draft): axum::Json<BookingDraft>,
) -> Response
where
    C: RoomCatalog + 'static,
    D: GuestDirectory + 'static,
    R: BookingRepository + 'static,
    N: DeskNotifier + 'static,
{
    match gateway.service.create(draft) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(error @ (SubmissionError::Validation(_) | SubmissionError::StaleCharges { .. })) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(
            error @ (SubmissionError::AlreadyInFlight
            | SubmissionError::Duplicate { .. }
            | SubmissionError::Repository(RepositoryError::Conflict)),
        ) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn status_handler<C, D, R, N>(
    State(gateway): State<OnboardingGateway<C, D, R, N>>,
    Path(booking_id): Path<String>,
) -> Response
where
    C: RoomCatalog + 'static,
    D: GuestDirectory + 'static,
    R: BookingRepository + 'static,
    N: DeskNotifier + 'static,
{
    let id = BookingId(booking_id);
    match gateway.service.get(&id) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(SubmissionError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({ "error": format!("booking {} not found", id.0) });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
