mod session_store;

pub use session_store::{IssuedSession, Registration, SessionService, SessionStore};

#[cfg(any(test, feature = "test-utils"))]
pub use session_store::MockSessionService;
