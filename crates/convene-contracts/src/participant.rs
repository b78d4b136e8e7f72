// Participant (RSVP) DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// One user's attendance commitment to one event
///
/// User and event display fields are snapshots taken at RSVP time, so an
/// RSVP list stays renderable even after the source records change.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub event_title: String,
    pub event_date: DateTime<Utc>,
    pub rsvped_at: DateTime<Utc>,
}

/// Request to RSVP to an event
///
/// `eventId` is optional at the serde level so a missing field surfaces
/// as a 400 validation error rather than a body rejection.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateParticipantRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

/// Response for GET /participants/event/:eventId
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ParticipantsResponse {
    pub participants: Vec<Participant>,
    pub count: i64,
}

/// Response for GET /participants/my-rsvps
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MyRsvpsResponse {
    pub rsvps: Vec<Participant>,
}
