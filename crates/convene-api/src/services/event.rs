// Event service for business logic

use std::sync::Arc;

use chrono::{DateTime, Utc};
use convene_contracts::{CreateEventRequest, Event, UpdateEventRequest};
use convene_core::{AppError, Result};
use convene_storage::{
    models::{CreateEvent, EventRow, UpdateEvent},
    Database,
};
use uuid::Uuid;

use crate::auth::AuthUser;

pub struct EventService {
    db: Arc<Database>,
}

impl EventService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn create(&self, caller: &AuthUser, req: CreateEventRequest) -> Result<Event> {
        let input = CreateEvent {
            title: require_text(&req.title, "title is required")?,
            description: require_text(&req.description, "description is required")?,
            date: parse_date(&req.date)?,
            location: require_text(&req.location, "location is required")?,
            max_participants: require_capacity(req.max_participants)?,
            created_by: caller.id,
            creator_name: caller.name.clone(),
        };

        let row = self.db.create_event(input).await?;
        Ok(row_to_event(row))
    }

    pub async fn list(&self) -> Result<Vec<Event>> {
        let rows = self.db.list_events().await?;
        Ok(rows.into_iter().map(row_to_event).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<Event> {
        let row = self
            .db
            .get_event(id)
            .await?
            .ok_or_else(|| AppError::not_found("event not found"))?;

        Ok(row_to_event(row))
    }

    /// Partial update, creator only. Lowering the capacity below the
    /// current participant count is allowed; it only blocks new RSVPs.
    pub async fn update(
        &self,
        caller: &AuthUser,
        id: Uuid,
        req: UpdateEventRequest,
    ) -> Result<Event> {
        let existing = self
            .db
            .get_event(id)
            .await?
            .ok_or_else(|| AppError::not_found("event not found"))?;

        if existing.created_by != caller.id {
            return Err(AppError::authorization(
                "only the event creator can update this event",
            ));
        }

        let input = UpdateEvent {
            title: req
                .title
                .map(|t| require_text(&t, "title cannot be empty"))
                .transpose()?,
            description: req
                .description
                .map(|d| require_text(&d, "description cannot be empty"))
                .transpose()?,
            date: req.date.map(|d| parse_date(&d)).transpose()?,
            location: req
                .location
                .map(|l| require_text(&l, "location cannot be empty"))
                .transpose()?,
            max_participants: require_capacity(req.max_participants)?,
        };

        let row = self
            .db
            .update_event(id, input)
            .await?
            .ok_or_else(|| AppError::not_found("event not found"))?;

        Ok(row_to_event(row))
    }

    /// Cascade delete, creator only. Removes every RSVP for the event and
    /// the event itself in one transaction.
    pub async fn delete(&self, caller: &AuthUser, id: Uuid) -> Result<()> {
        let existing = self
            .db
            .get_event(id)
            .await?
            .ok_or_else(|| AppError::not_found("event not found"))?;

        if existing.created_by != caller.id {
            return Err(AppError::authorization(
                "only the event creator can delete this event",
            ));
        }

        match self.db.delete_event_with_participants(id).await? {
            Some(removed) => {
                tracing::info!(event_id = %id, participants_removed = removed, "event deleted");
                Ok(())
            }
            None => Err(AppError::not_found("event not found")),
        }
    }
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::validation("date must be a valid ISO-8601 timestamp"))
}

fn require_text(value: &str, message: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(message));
    }
    Ok(trimmed.to_string())
}

fn require_capacity(value: Option<i32>) -> Result<Option<i32>> {
    match value {
        Some(cap) if cap <= 0 => Err(AppError::validation(
            "maxParticipants must be a positive integer",
        )),
        other => Ok(other),
    }
}

fn row_to_event(row: EventRow) -> Event {
    Event {
        id: row.id,
        title: row.title,
        description: row.description,
        date: row.date,
        location: row.location,
        max_participants: row.max_participants,
        created_by: row.created_by,
        creator_name: row.creator_name,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_accepts_rfc3339() {
        let parsed = parse_date("2025-01-01T09:00:00Z").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2025-01-01T09:00:00+00:00");
    }

    #[test]
    fn test_parse_date_accepts_offsets() {
        let parsed = parse_date("2025-01-01T10:00:00+01:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2025-01-01T09:00:00+00:00");
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("next tuesday").is_err());
        assert!(parse_date("2025-01-01").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_require_text_trims() {
        assert_eq!(require_text("  Standup  ", "x").unwrap(), "Standup");
        assert!(require_text("   ", "title is required").is_err());
    }

    #[test]
    fn test_require_capacity() {
        assert_eq!(require_capacity(None).unwrap(), None);
        assert_eq!(require_capacity(Some(2)).unwrap(), Some(2));
        assert!(require_capacity(Some(0)).is_err());
        assert!(require_capacity(Some(-5)).is_err());
    }
}
