//! Middleware for session resolution and route guarding.

mod session;

pub use session::{guard_response, session_guard};
