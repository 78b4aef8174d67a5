//! Custom extractors.

mod session;
mod validated_json;

pub use session::{CurrentSession, ManagerSession};
pub use validated_json::ValidatedJson;
