// Participant (RSVP) HTTP routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use convene_contracts::{
    CreateParticipantRequest, MessageResponse, MyRsvpsResponse, Participant, ParticipantsResponse,
};
use convene_core::Result;
use convene_storage::Database;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::services::ParticipantService;

/// App state for participant routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ParticipantService>,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            service: Arc::new(ParticipantService::new(db)),
        }
    }
}

/// Create participant routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/participants", post(create_participant))
        .route("/participants/my-rsvps", get(my_rsvps))
        .route("/participants/:id", delete(cancel_participant))
        .route("/participants/event/:event_id", get(list_event_participants))
        .route(
            "/participants/event/:event_id/user/:user_id",
            delete(cancel_for_event),
        )
        .with_state(state)
}

/// POST /participants - RSVP to an event
#[utoipa::path(
    post,
    path = "/participants",
    request_body = CreateParticipantRequest,
    responses(
        (status = 201, description = "RSVP created", body = Participant),
        (status = 400, description = "Validation failure, duplicate RSVP, or event full"),
        (status = 404, description = "Event not found")
    ),
    tag = "participants"
)]
pub async fn create_participant(
    user: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateParticipantRequest>,
) -> Result<(StatusCode, Json<Participant>)> {
    let participant = state.service.rsvp(&user, req).await?;
    Ok((StatusCode::CREATED, Json(participant)))
}

/// GET /participants/event/:event_id - List RSVPs for an event
#[utoipa::path(
    get,
    path = "/participants/event/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "RSVPs for the event", body = ParticipantsResponse)
    ),
    tag = "participants"
)]
pub async fn list_event_participants(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<ParticipantsResponse>> {
    let response = state.service.list_for_event(event_id).await?;
    Ok(Json(response))
}

/// GET /participants/my-rsvps - List the caller's RSVPs
#[utoipa::path(
    get,
    path = "/participants/my-rsvps",
    responses(
        (status = 200, description = "The caller's RSVPs", body = MyRsvpsResponse)
    ),
    tag = "participants"
)]
pub async fn my_rsvps(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<MyRsvpsResponse>> {
    let response = state.service.my_rsvps(&user).await?;
    Ok(Json(response))
}

/// DELETE /participants/:id - Cancel an RSVP by id (owner only)
#[utoipa::path(
    delete,
    path = "/participants/{id}",
    params(
        ("id" = Uuid, Path, description = "RSVP ID")
    ),
    responses(
        (status = 200, description = "RSVP cancelled", body = MessageResponse),
        (status = 403, description = "Caller does not own the RSVP"),
        (status = 404, description = "RSVP not found")
    ),
    tag = "participants"
)]
pub async fn cancel_participant(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>> {
    state.service.cancel(&user, id).await?;
    Ok(Json(MessageResponse::new("RSVP cancelled successfully")))
}

/// DELETE /participants/event/:event_id/user/:user_id - Cancel by pair (self only)
#[utoipa::path(
    delete,
    path = "/participants/event/{event_id}/user/{user_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event ID"),
        ("user_id" = Uuid, Path, description = "User ID (must be the caller)")
    ),
    responses(
        (status = 200, description = "RSVP cancelled", body = MessageResponse),
        (status = 403, description = "Caller may only cancel their own RSVP"),
        (status = 404, description = "No RSVP for this event")
    ),
    tag = "participants"
)]
pub async fn cancel_for_event(
    user: AuthUser,
    State(state): State<AppState>,
    Path((event_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MessageResponse>> {
    state.service.cancel_for_event(&user, event_id, user_id).await?;
    Ok(Json(MessageResponse::new("RSVP cancelled successfully")))
}
