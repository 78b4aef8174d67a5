//! Domain layer - Core business entities and derivations.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! users and sessions, projects and tasks, the progress aggregator and the
//! access guard. Everything here is shared by the services and the gateway.

pub mod constants;
pub mod error;
pub mod guard;
pub mod id;
pub mod password;
pub mod project;
pub mod stats;
pub mod task;
pub mod user;

mod serde_util;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use guard::{navigation, AccessGuard, GuardDecision, Route, SessionState};
pub use id::EntityId;
pub use password::Password;
pub use project::{NewProject, Project, ProjectDraft};
pub use stats::{
    latest_done_tasks, project_stats, projects_with_stats, status_counts, CompletedTask,
    Dashboard, ProjectStats, ProjectStatus, ProjectWithStats, StatusCounts, TaskCounts,
};
pub use task::{Move, NewTask, Priority, Task, TaskDraft, TaskPatch, TaskStatus};
pub use user::{NewUser, Role, Session, User, UserChanges, UserResponse};
