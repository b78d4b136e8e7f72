// Public contracts for the Convene API
// DTOs use camelCase on the wire for compatibility with the existing JSON surface

pub mod auth;
pub mod common;
pub mod event;
pub mod participant;
pub mod user;

pub use auth::*;
pub use common::*;
pub use event::*;
pub use participant::*;
pub use user::*;
