//! Board Service Library
//!
//! Projects and tasks as the board pages see them: the dashboard, project
//! listings with derived progress, the per-project task columns, and the
//! manager and assignee operations that change them.

pub mod service;
pub mod view;

pub use crate::service::{BoardService, ProjectBoard};
pub use crate::view::{ProjectDetail, TaskCard, TaskColumns};

#[cfg(any(test, feature = "test-utils"))]
pub use crate::service::MockBoardService;
