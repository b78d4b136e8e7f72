// Participant (RSVP) service for business logic

use std::sync::Arc;

use convene_contracts::{
    CreateParticipantRequest, MyRsvpsResponse, Participant, ParticipantsResponse,
};
use convene_core::{AppError, Result};
use convene_storage::{
    models::{CreateParticipant, ParticipantRow},
    Database,
};
use uuid::Uuid;

use crate::auth::AuthUser;

pub struct ParticipantService {
    db: Arc<Database>,
}

impl ParticipantService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Capacity-checked RSVP creation; admission itself happens inside the
    /// storage layer's revision-guarded transaction.
    pub async fn rsvp(
        &self,
        caller: &AuthUser,
        req: CreateParticipantRequest,
    ) -> Result<Participant> {
        let raw = req
            .event_id
            .ok_or_else(|| AppError::validation("eventId is required"))?;

        let event_id = Uuid::parse_str(raw.trim())
            .map_err(|_| AppError::validation("eventId must be a valid event id"))?;

        let row = self
            .db
            .create_participant(CreateParticipant {
                event_id,
                user_id: caller.id,
                user_name: caller.name.clone(),
                user_email: caller.email.clone(),
            })
            .await?;

        Ok(row_to_participant(row))
    }

    pub async fn list_for_event(&self, event_id: Uuid) -> Result<ParticipantsResponse> {
        let rows = self.db.list_participants_by_event(event_id).await?;
        let count = rows.len() as i64;

        Ok(ParticipantsResponse {
            participants: rows.into_iter().map(row_to_participant).collect(),
            count,
        })
    }

    pub async fn my_rsvps(&self, caller: &AuthUser) -> Result<MyRsvpsResponse> {
        let rows = self.db.list_participants_by_user(caller.id).await?;

        Ok(MyRsvpsResponse {
            rsvps: rows.into_iter().map(row_to_participant).collect(),
        })
    }

    /// Cancel by RSVP id; owner only.
    pub async fn cancel(&self, caller: &AuthUser, id: Uuid) -> Result<()> {
        let row = self
            .db
            .get_participant(id)
            .await?
            .ok_or_else(|| AppError::not_found("RSVP not found"))?;

        if row.user_id != caller.id {
            return Err(AppError::authorization("you can only cancel your own RSVP"));
        }

        // The row may have raced away since the ownership check
        if !self.db.delete_participant(id).await? {
            return Err(AppError::not_found("RSVP not found"));
        }

        Ok(())
    }

    /// Cancel by (event, user) pair; callers may only cancel themselves.
    pub async fn cancel_for_event(
        &self,
        caller: &AuthUser,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<()> {
        if user_id != caller.id {
            return Err(AppError::authorization("you can only cancel your own RSVP"));
        }

        match self.db.delete_participant_by_pair(event_id, user_id).await? {
            0 => Err(AppError::not_found("no RSVP found for this event")),
            1 => Ok(()),
            rows => {
                // The unique pair index should make this unrepresentable
                tracing::warn!(
                    event_id = %event_id,
                    user_id = %user_id,
                    rows,
                    "removed multiple RSVP rows for one (event, user) pair"
                );
                Ok(())
            }
        }
    }
}

fn row_to_participant(row: ParticipantRow) -> Participant {
    Participant {
        id: row.id,
        event_id: row.event_id,
        user_id: row.user_id,
        user_name: row.user_name,
        user_email: row.user_email,
        event_title: row.event_title,
        event_date: row.event_date,
        rsvped_at: row.rsvped_at,
    }
}
