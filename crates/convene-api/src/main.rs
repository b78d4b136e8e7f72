// Convene API server
// Event & RSVP service: JWT-authenticated CRUD over events and
// participants, with capacity-safe RSVP admission

mod auth;
mod config;
mod events;
mod participants;
mod services;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::{routing::get, Json, Router};
use convene_contracts::*;
use convene_storage::Database;
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{AuthState, JwtKeys};
use crate::config::ApiConfig;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::routes::register,
        auth::routes::login,
        auth::routes::me,
        events::create_event,
        events::list_events,
        events::get_event,
        events::update_event,
        events::delete_event,
        participants::create_participant,
        participants::list_event_participants,
        participants::my_rsvps,
        participants::cancel_participant,
        participants::cancel_for_event,
    ),
    components(
        schemas(
            User,
            RegisterRequest, LoginRequest, AuthResponse,
            Event, CreateEventRequest, UpdateEventRequest, EventsResponse,
            Participant, CreateParticipantRequest,
            ParticipantsResponse, MyRsvpsResponse,
            MessageResponse,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login, and caller identity"),
        (name = "events", description = "Event management endpoints"),
        (name = "participants", description = "RSVP management endpoints")
    ),
    info(
        title = "Convene API",
        version = "0.1.0",
        description = "Event & RSVP management API",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "convene_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("convene-api starting...");

    let config = ApiConfig::from_env().context("Failed to load configuration")?;

    // Initialize database
    let db = Database::from_url(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    db.migrate().await.context("Failed to run migrations")?;
    tracing::info!("Connected to database");

    let db = Arc::new(db);
    let jwt = Arc::new(JwtKeys::new(&config.jwt_secret, config.token_lifetime));

    // Auth state is installed as an extension so the AuthUser extractor
    // can resolve callers on any route
    let auth_state = AuthState::new(db.clone(), jwt.clone());

    // Create module-specific states
    let auth_routes_state = auth::AppState::new(db.clone(), jwt.clone());
    let events_state = events::AppState::new(db.clone());
    let participants_state = participants::AppState::new(db.clone());

    // Load CORS allowed origins from configuration (optional)
    // Only needed when the UI is served from a different origin than the API
    let cors_origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    if cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
    } else {
        tracing::info!(origins = ?cors_origins, "CORS origins configured");
    }

    // Build API routes
    let api_routes = Router::new()
        .merge(auth::routes(auth_routes_state))
        .merge(events::routes(events_state))
        .merge(participants::routes(participants_state));

    let app = Router::new()
        .route("/health", get(health))
        .merge(api_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(axum::Extension(auth_state));

    // Add CORS layer only if origins are configured
    let app = if !cors_origins.is_empty() {
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::ORIGIN,
                ])
                .allow_credentials(true),
        )
    } else {
        app
    };

    // Add tracing
    let app = app.layer(TraceLayer::new_for_http());

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
