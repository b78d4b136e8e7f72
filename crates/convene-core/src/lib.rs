// Shared core for the convene workspace: error taxonomy and RSVP admission policy

pub mod admission;
pub mod error;

pub use error::{AppError, Result};
