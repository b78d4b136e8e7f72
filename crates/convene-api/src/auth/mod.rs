// Authentication module
// Decision: stateless JWT bearer tokens; the subject is re-resolved from
// the store on every request so a deleted user cannot keep acting

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod routes;

pub use jwt::JwtKeys;
pub use middleware::{AuthState, AuthUser};
pub use routes::{routes, AppState};
