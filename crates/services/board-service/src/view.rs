//! Read models returned by the board.

use chrono::NaiveDate;
use serde::Serialize;

use domain::{
    project_stats, EntityId, Project, ProjectStats, Task, TaskStatus, User, UNASSIGNED_NAME,
};

/// Task as shown on a board column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TaskCard {
    #[serde(flatten)]
    pub task: Task,
    /// Assignee's display name
    pub assignee: String,
}

/// Tasks of a project split by status.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TaskColumns {
    pub pending: Vec<TaskCard>,
    pub doing: Vec<TaskCard>,
    pub done: Vec<TaskCard>,
}

impl TaskColumns {
    pub fn build(tasks: Vec<Task>, users: &[User]) -> Self {
        let mut columns = Self::default();
        for task in tasks {
            let card = TaskCard {
                assignee: assignee_name(task.user_id.as_ref(), users),
                task,
            };
            match card.task.status {
                TaskStatus::Pendiente => columns.pending.push(card),
                TaskStatus::EnProgreso => columns.doing.push(card),
                TaskStatus::Finalizado => columns.done.push(card),
            }
        }
        columns
    }
}

fn assignee_name(user_id: Option<&EntityId>, users: &[User]) -> String {
    user_id
        .and_then(|id| users.iter().find(|u| &u.id == id))
        .map(|u| u.name.clone())
        .unwrap_or_else(|| UNASSIGNED_NAME.to_string())
}

/// Everything the project page renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    pub project: Project,
    pub stats: ProjectStats,
    /// Days until the end date, never negative
    pub remaining_days: i64,
    pub manager: Option<String>,
    pub columns: TaskColumns,
}

impl ProjectDetail {
    pub fn build(project: Project, tasks: Vec<Task>, users: &[User], today: NaiveDate) -> Self {
        let stats = project_stats(&project.id, &tasks);
        let manager = project
            .manager_id
            .as_ref()
            .and_then(|id| users.iter().find(|u| &u.id == id))
            .map(|u| u.name.clone());

        Self {
            remaining_days: project.remaining_days(today),
            stats,
            manager,
            columns: TaskColumns::build(tasks, users),
            project,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Priority, ProjectStatus, Role};

    fn task(id: &str, status: TaskStatus, user: Option<&str>) -> Task {
        Task {
            id: EntityId::from(id),
            title: format!("Tarea {}", id),
            description: String::new(),
            start_date: None,
            due_date: None,
            priority: Priority::Media,
            status,
            user_id: user.map(EntityId::from),
            project_id: EntityId::from("1"),
        }
    }

    fn user(id: &str, name: &str) -> User {
        User {
            id: EntityId::from(id),
            name: name.into(),
            email: format!("{}@x.com", id),
            password: String::new(),
            role: Role::Usuario,
        }
    }

    #[test]
    fn columns_split_by_status_with_assignee_names() {
        let columns = TaskColumns::build(
            vec![
                task("1", TaskStatus::Pendiente, Some("7")),
                task("2", TaskStatus::EnProgreso, Some("99")),
                task("3", TaskStatus::Finalizado, None),
            ],
            &[user("7", "Sofía")],
        );

        assert_eq!(columns.pending[0].assignee, "Sofía");
        assert_eq!(columns.doing[0].assignee, UNASSIGNED_NAME);
        assert_eq!(columns.done[0].assignee, UNASSIGNED_NAME);
    }

    #[test]
    fn detail_carries_stats_and_manager() {
        let project = Project {
            id: EntityId::from("1"),
            name: "Portal".into(),
            description: "Web".into(),
            start_date: None,
            end_date: Some("2024-01-11".parse().unwrap()),
            image_url: None,
            manager_id: Some(EntityId::from("7")),
        };
        let detail = ProjectDetail::build(
            project,
            vec![
                task("1", TaskStatus::Finalizado, None),
                task("2", TaskStatus::Pendiente, None),
            ],
            &[user("7", "Sofía")],
            "2024-01-01".parse().unwrap(),
        );

        assert_eq!(detail.stats.progress, 50);
        assert_eq!(detail.stats.status, ProjectStatus::EnProgreso);
        assert_eq!(detail.remaining_days, 10);
        assert_eq!(detail.manager.as_deref(), Some("Sofía"));
    }
}
