// Postgres storage layer with sqlx
//
// `Database` wraps the connection pool with one method per query. The
// revision-guarded RSVP admission transaction lives here; the pure
// capacity decision it applies comes from convene-core.

pub mod models;
pub mod repositories;

pub use models::*;
pub use repositories::Database;
