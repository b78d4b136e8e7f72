// Repository layer for database operations

use convene_core::{admission, AppError, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::*;

const EVENT_COLUMNS: &str = "id, rev, title, description, date, location, max_participants, \
                             created_by, creator_name, created_at, updated_at";

const PARTICIPANT_COLUMNS: &str =
    "id, event_id, user_id, user_name, user_email, event_title, event_date, rsvped_at";

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::internal(format!("migration failed: {e}")))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // ============================================
    // Users
    // ============================================

    pub async fn create_user(&self, input: CreateUser) -> Result<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, email, name, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, password_hash, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.email)
        .bind(&input.name)
        .bind(&input.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                AppError::conflict("email already registered")
            } else {
                AppError::Store(e)
            }
        })?;

        Ok(row)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    // ============================================
    // Events
    // ============================================

    pub async fn create_event(&self, input: CreateEvent) -> Result<EventRow> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            INSERT INTO events (id, rev, title, description, date, location, max_participants, created_by, creator_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {EVENT_COLUMNS}
            "#,
        ))
        .bind(Uuid::now_v7())
        .bind(Uuid::now_v7())
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.date)
        .bind(&input.location)
        .bind(input.max_participants)
        .bind(input.created_by)
        .bind(&input.creator_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_event(&self, id: Uuid) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_events(&self) -> Result<Vec<EventRow>> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY date ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Partial update; every update replaces the revision token so
    /// in-flight RSVP admissions re-read the event before committing.
    pub async fn update_event(&self, id: Uuid, input: UpdateEvent) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            UPDATE events
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                date = COALESCE($4, date),
                location = COALESCE($5, location),
                max_participants = COALESCE($6, max_participants),
                rev = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.date)
        .bind(&input.location)
        .bind(input.max_participants)
        .bind(Uuid::now_v7())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Cascade delete in one transaction. Returns the number of
    /// participants removed, or `None` if the event was already gone.
    ///
    /// The event row goes first: holding its lock blocks any in-flight
    /// RSVP admission at the revision CAS, and an admission that already
    /// claimed the revision commits before this delete proceeds, so the
    /// participant sweep below always sees every committed RSVP.
    pub async fn delete_event_with_participants(&self, id: Uuid) -> Result<Option<u64>> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let removed = sqlx::query("DELETE FROM participants WHERE event_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        Ok(Some(removed))
    }

    // ============================================
    // Participants
    // ============================================

    /// Capacity-checked RSVP creation.
    ///
    /// Runs as a bounded optimistic retry loop: each attempt decides under
    /// the event revision it read, then commits only if that revision is
    /// still current. A lost race costs one retry, never a capacity
    /// violation.
    pub async fn create_participant(&self, input: CreateParticipant) -> Result<ParticipantRow> {
        for attempt in 1..=admission::RSVP_MAX_ATTEMPTS {
            match self.try_create_participant(&input).await? {
                Some(row) => return Ok(row),
                None => {
                    tracing::debug!(
                        event_id = %input.event_id,
                        user_id = %input.user_id,
                        attempt,
                        "event revision moved during RSVP, retrying"
                    );
                }
            }
        }

        Err(AppError::internal(format!(
            "RSVP retry budget exhausted for event {}",
            input.event_id
        )))
    }

    /// One revision-guarded admission attempt. `Ok(None)` means the event
    /// revision moved between read and commit; the caller retries.
    async fn try_create_participant(
        &self,
        input: &CreateParticipant,
    ) -> Result<Option<ParticipantRow>> {
        let mut tx = self.pool.begin().await?;

        let event = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(input.event_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found("event not found"))?;

        let duplicates = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM participants WHERE event_id = $1 AND user_id = $2",
        )
        .bind(input.event_id)
        .bind(input.user_id)
        .fetch_one(&mut *tx)
        .await?;

        if duplicates > 0 {
            return Err(AppError::conflict("you have already RSVP'd to this event"));
        }

        let current = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM participants WHERE event_id = $1",
        )
        .bind(input.event_id)
        .fetch_one(&mut *tx)
        .await?;

        admission::check(event.max_participants, current)?;

        // Claim the revision the decision was made under. Zero rows means
        // another capacity-affecting commit intervened.
        let claimed = sqlx::query("UPDATE events SET rev = $1 WHERE id = $2 AND rev = $3")
            .bind(Uuid::now_v7())
            .bind(event.id)
            .bind(event.rev)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if claimed == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let row = sqlx::query_as::<_, ParticipantRow>(&format!(
            r#"
            INSERT INTO participants (id, event_id, user_id, user_name, user_email, event_title, event_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PARTICIPANT_COLUMNS}
            "#,
        ))
        .bind(Uuid::now_v7())
        .bind(event.id)
        .bind(input.user_id)
        .bind(&input.user_name)
        .bind(&input.user_email)
        .bind(&event.title)
        .bind(event.date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(row))
    }

    pub async fn get_participant(&self, id: Uuid) -> Result<Option<ParticipantRow>> {
        let row = sqlx::query_as::<_, ParticipantRow>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_participants_by_event(&self, event_id: Uuid) -> Result<Vec<ParticipantRow>> {
        let rows = sqlx::query_as::<_, ParticipantRow>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE event_id = $1 ORDER BY rsvped_at ASC"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_participants_by_user(&self, user_id: Uuid) -> Result<Vec<ParticipantRow>> {
        let rows = sqlx::query_as::<_, ParticipantRow>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE user_id = $1 ORDER BY rsvped_at ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Cancellation frees a capacity slot and never invalidates a
    /// concurrent admission, so no revision bump is needed here.
    pub async fn delete_participant(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM participants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete by (event, user) pair; returns the number of rows removed.
    /// The unique pair index keeps this at most one in a healthy database.
    pub async fn delete_participant_by_pair(&self, event_id: Uuid, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM participants WHERE event_id = $1 AND user_id = $2")
            .bind(event_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
