// Bearer-token extractor
//
// Implements the authenticate-user collaborator contract: missing or
// invalid credential -> 401, credential valid but subject gone -> 404.

use std::sync::Arc;

use axum::{async_trait, extract::FromRequestParts, http::header, http::request::Parts};
use chrono::{DateTime, Utc};
use convene_core::{AppError, Result};
use convene_storage::Database;
use uuid::Uuid;

use super::jwt::JwtKeys;

/// Shared auth dependencies, installed as a request extension in main
#[derive(Clone)]
pub struct AuthState {
    pub db: Arc<Database>,
    pub jwt: Arc<JwtKeys>,
}

impl AuthState {
    pub fn new(db: Arc<Database>, jwt: Arc<JwtKeys>) -> Self {
        Self { db, jwt }
    }
}

/// Caller identity resolved from the bearer token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        let auth = parts
            .extensions
            .get::<AuthState>()
            .cloned()
            .ok_or_else(|| AppError::internal("auth state not installed"))?;

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| AppError::authentication("missing bearer token"))?;

        let claims = auth.jwt.verify(token)?;

        // The credential may outlive its subject
        let user = auth
            .db
            .get_user(claims.sub)
            .await?
            .ok_or_else(|| AppError::not_found("user no longer exists"))?;

        Ok(AuthUser {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
        })
    }
}
