//! Task entity, its status pipeline and the drafts validated before writes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{
    PRIORITY_ALTA, PRIORITY_BAJA, PRIORITY_MEDIA, STATUS_EN_PROGRESO, STATUS_FINALIZADO,
    STATUS_PENDIENTE,
};
use crate::error::{DomainError, DomainResult};
use crate::id::EntityId;
use crate::serde_util::lenient_date;

/// Position of a task in the `pendiente → en progreso → finalizado` pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "pendiente")]
    Pendiente,
    #[serde(rename = "en progreso")]
    EnProgreso,
    #[serde(rename = "finalizado")]
    Finalizado,
}

/// Direction of a one-step status move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Advance,
    Retreat,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pendiente => STATUS_PENDIENTE,
            TaskStatus::EnProgreso => STATUS_EN_PROGRESO,
            TaskStatus::Finalizado => STATUS_FINALIZADO,
        }
    }

    /// Next status, or `None` when already finished.
    pub fn advance(self) -> Option<Self> {
        match self {
            TaskStatus::Pendiente => Some(TaskStatus::EnProgreso),
            TaskStatus::EnProgreso => Some(TaskStatus::Finalizado),
            TaskStatus::Finalizado => None,
        }
    }

    /// Previous status, or `None` when still pending.
    pub fn retreat(self) -> Option<Self> {
        match self {
            TaskStatus::Pendiente => None,
            TaskStatus::EnProgreso => Some(TaskStatus::Pendiente),
            TaskStatus::Finalizado => Some(TaskStatus::EnProgreso),
        }
    }

    /// Apply a one-step move, rejecting moves past either end of the pipeline.
    pub fn apply(self, step: Move) -> DomainResult<Self> {
        let next = match step {
            Move::Advance => self.advance(),
            Move::Retreat => self.retreat(),
        };
        next.ok_or_else(|| {
            DomainError::validation(format!(
                "Task in status '{}' cannot {}",
                self,
                match step {
                    Move::Advance => "advance",
                    Move::Retreat => "move back",
                }
            ))
        })
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Baja,
    #[default]
    Media,
    Alta,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Baja => PRIORITY_BAJA,
            Priority::Media => PRIORITY_MEDIA,
            Priority::Alta => PRIORITY_ALTA,
        }
    }
}

/// Task record as stored in the `tasks` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub user_id: Option<EntityId>,
    pub project_id: EntityId,
}

impl Task {
    pub fn belongs_to(&self, project_id: &EntityId) -> bool {
        &self.project_id == project_id
    }

    pub fn is_assigned_to(&self, user_id: &EntityId) -> bool {
        self.user_id.as_ref() == Some(user_id)
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Finalizado
    }
}

/// User-entered task fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    pub user_id: Option<EntityId>,
}

impl TaskDraft {
    /// Validate and place the task in a project. New tasks start pending.
    pub fn into_new_task(self, project_id: EntityId) -> DomainResult<NewTask> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("Task title is required"));
        }
        if self.description.trim().is_empty() {
            return Err(DomainError::validation("Task description is required"));
        }
        let start_date = self
            .start_date
            .ok_or_else(|| DomainError::validation("Start date is required"))?;
        let due_date = self
            .due_date
            .ok_or_else(|| DomainError::validation("Due date is required"))?;
        if start_date >= due_date {
            return Err(DomainError::validation(
                "Start date must be before the due date",
            ));
        }
        let user_id = self
            .user_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| DomainError::validation("The task must be assigned to a user"))?;

        Ok(NewTask {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            start_date,
            due_date,
            priority: self.priority,
            status: TaskStatus::Pendiente,
            user_id,
            project_id,
        })
    }
}

/// Validated payload for POST on `tasks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub priority: Priority,
    pub status: TaskStatus,
    pub user_id: EntityId,
    pub project_id: EntityId,
}

/// Partial update for PATCH on `tasks/{id}`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<EntityId>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Validate the patch against the task it applies to.
    pub fn validate_against(&self, current: &Task) -> DomainResult<()> {
        if matches!(&self.title, Some(t) if t.trim().is_empty()) {
            return Err(DomainError::validation("Task title is required"));
        }
        if matches!(&self.description, Some(d) if d.trim().is_empty()) {
            return Err(DomainError::validation("Task description is required"));
        }
        if let Some(next) = self.status {
            if next != current.status
                && current.status.advance() != Some(next)
                && current.status.retreat() != Some(next)
            {
                return Err(DomainError::validation(format!(
                    "Task cannot jump from '{}' to '{}'",
                    current.status, next
                )));
            }
        }
        let start = self.start_date.or(current.start_date);
        let due = self.due_date.or(current.due_date);
        if let (Some(start), Some(due)) = (start, due) {
            if start >= due {
                return Err(DomainError::validation(
                    "Start date must be before the due date",
                ));
            }
        }
        Ok(())
    }
}
