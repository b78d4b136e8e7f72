// Event CRUD HTTP routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use convene_contracts::{
    CreateEventRequest, Event, EventsResponse, MessageResponse, UpdateEventRequest,
};
use convene_core::Result;
use convene_storage::Database;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::services::EventService;

/// App state for event routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EventService>,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            service: Arc::new(EventService::new(db)),
        }
    }
}

/// Create event routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/events", post(create_event).get(list_events))
        .route(
            "/events/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
        .with_state(state)
}

/// POST /events - Create a new event
#[utoipa::path(
    post,
    path = "/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, description = "Validation failure"),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "events"
)]
pub async fn create_event(
    user: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>)> {
    let event = state.service.create(&user, req).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /events - List all events
#[utoipa::path(
    get,
    path = "/events",
    responses(
        (status = 200, description = "List of events", body = EventsResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "events"
)]
pub async fn list_events(
    _user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<EventsResponse>> {
    let events = state.service.list().await?;
    Ok(Json(EventsResponse { events }))
}

/// GET /events/:id - Get event by ID
#[utoipa::path(
    get,
    path = "/events/{id}",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn get_event(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Event>> {
    let event = state.service.get(id).await?;
    Ok(Json(event))
}

/// PUT /events/:id - Update an event (creator only)
#[utoipa::path(
    put,
    path = "/events/{id}",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 403, description = "Caller is not the creator"),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn update_event(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Json<Event>> {
    let event = state.service.update(&user, id, req).await?;
    Ok(Json(event))
}

/// DELETE /events/:id - Delete an event and all its RSVPs (creator only)
#[utoipa::path(
    delete,
    path = "/events/{id}",
    params(
        ("id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event deleted", body = MessageResponse),
        (status = 403, description = "Caller is not the creator"),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn delete_event(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>> {
    state.service.delete(&user, id).await?;
    Ok(Json(MessageResponse::new("event deleted successfully")))
}
