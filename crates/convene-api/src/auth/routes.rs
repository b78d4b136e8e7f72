// Auth HTTP routes: register, login, me

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use convene_contracts::{AuthResponse, LoginRequest, RegisterRequest, User};
use convene_core::Result;
use convene_storage::Database;

use super::jwt::JwtKeys;
use super::middleware::AuthUser;
use crate::services::AuthService;

/// App state for auth routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AuthService>,
}

impl AppState {
    pub fn new(db: Arc<Database>, jwt: Arc<JwtKeys>) -> Self {
        Self {
            service: Arc::new(AuthService::new(db, jwt)),
        }
    }
}

/// Create auth routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .with_state(state)
}

/// POST /auth/register - Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Validation failure or email already registered")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let response = state.service.register(req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /auth/login - Exchange credentials for a token
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let response = state.service.login(req).await?;
    Ok(Json(response))
}

/// GET /auth/me - The resolved caller
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "auth"
)]
pub async fn me(user: AuthUser) -> Json<User> {
    Json(User {
        id: user.id,
        email: user.email,
        name: user.name,
        created_at: user.created_at,
    })
}
