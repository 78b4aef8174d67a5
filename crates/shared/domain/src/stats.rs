//! Project progress derivation.
//!
//! Everything here is a pure function of a project snapshot and a task
//! snapshot. Results are recomputed on every request and never stored.

use std::cmp::Reverse;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{
    LATEST_DONE_LIMIT, PROJECT_COMPLETADO, PROJECT_EN_PROGRESO, PROJECT_SIN_INICIAR,
    UNKNOWN_PROJECT_NAME,
};
use crate::id::EntityId;
use crate::project::Project;
use crate::task::{Task, TaskStatus};

/// Coarse project status derived from progress alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum ProjectStatus {
    #[serde(rename = "sin iniciar")]
    SinIniciar,
    #[serde(rename = "en progreso")]
    EnProgreso,
    #[serde(rename = "completado")]
    Completado,
}

impl ProjectStatus {
    pub fn from_progress(progress: u8) -> Self {
        match progress {
            0 => ProjectStatus::SinIniciar,
            100..=u8::MAX => ProjectStatus::Completado,
            _ => ProjectStatus::EnProgreso,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::SinIniciar => PROJECT_SIN_INICIAR,
            ProjectStatus::EnProgreso => PROJECT_EN_PROGRESO,
            ProjectStatus::Completado => PROJECT_COMPLETADO,
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partition of a project's tasks by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TaskCounts {
    pub pending: usize,
    pub doing: usize,
    pub done: usize,
}

impl TaskCounts {
    pub fn total(&self) -> usize {
        self.pending + self.doing + self.done
    }

    fn record(&mut self, status: TaskStatus) {
        match status {
            TaskStatus::Pendiente => self.pending += 1,
            TaskStatus::EnProgreso => self.doing += 1,
            TaskStatus::Finalizado => self.done += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProjectStats {
    /// Percentage of finished tasks, 0..=100
    pub progress: u8,
    pub tasks: TaskCounts,
    pub status: ProjectStatus,
}

impl ProjectStats {
    pub fn from_counts(tasks: TaskCounts) -> Self {
        let progress = progress(tasks.done, tasks.total());
        Self {
            progress,
            tasks,
            status: ProjectStatus::from_progress(progress),
        }
    }
}

/// Rounded completion percentage.
///
/// Rounds half up, then keeps 0 and 100 exclusive to "nothing done" and
/// "everything done": 1 of 300 reports 1, 199 of 200 reports 99.
pub fn progress(done: usize, total: usize) -> u8 {
    if total == 0 || done == 0 {
        return 0;
    }
    if done >= total {
        return 100;
    }
    let rounded = (200 * done + total) / (2 * total);
    rounded.clamp(1, 99) as u8
}

/// Stats for one project over the full task list.
pub fn project_stats(project_id: &EntityId, tasks: &[Task]) -> ProjectStats {
    let mut counts = TaskCounts::default();
    tasks
        .iter()
        .filter(|t| t.belongs_to(project_id))
        .for_each(|t| counts.record(t.status));
    ProjectStats::from_counts(counts)
}

/// A project together with its derived stats, flattened on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProjectWithStats {
    #[serde(flatten)]
    pub project: Project,
    #[serde(flatten)]
    pub stats: ProjectStats,
}

pub fn projects_with_stats(projects: &[Project], tasks: &[Task]) -> Vec<ProjectWithStats> {
    projects
        .iter()
        .map(|p| ProjectWithStats {
            project: p.clone(),
            stats: project_stats(&p.id, tasks),
        })
        .collect()
}

/// Finished task as listed on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CompletedTask {
    pub id: EntityId,
    pub title: String,
    /// Project display name, or a placeholder for dangling references
    pub project: String,
    pub due_date: Option<NaiveDate>,
}

/// The most recently due finished tasks, newest first.
///
/// The sort is stable, so equal due dates keep input order. Tasks without a
/// due date sort after every dated task.
pub fn latest_done_tasks(tasks: &[Task], projects: &[Project]) -> Vec<CompletedTask> {
    let mut done: Vec<&Task> = tasks.iter().filter(|t| t.is_done()).collect();
    done.sort_by_key(|t| Reverse(t.due_date));

    done.into_iter()
        .take(LATEST_DONE_LIMIT)
        .map(|t| CompletedTask {
            id: t.id.clone(),
            title: t.title.clone(),
            project: projects
                .iter()
                .find(|p| p.id == t.project_id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| UNKNOWN_PROJECT_NAME.to_string()),
            due_date: t.due_date,
        })
        .collect()
}

/// Number of projects under each status label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub not_started: usize,
    pub in_progress: usize,
    pub completed: usize,
}

pub fn status_counts(projects: &[ProjectWithStats]) -> StatusCounts {
    projects
        .iter()
        .fold(StatusCounts::default(), |mut acc, p| {
            match p.stats.status {
                ProjectStatus::SinIniciar => acc.not_started += 1,
                ProjectStatus::EnProgreso => acc.in_progress += 1,
                ProjectStatus::Completado => acc.completed += 1,
            }
            acc
        })
}

/// Everything the dashboard view renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub stats: StatusCounts,
    pub projects: Vec<ProjectWithStats>,
    pub latest_done_tasks: Vec<CompletedTask>,
}

impl Dashboard {
    pub fn build(projects: &[Project], tasks: &[Task]) -> Self {
        let with_stats = projects_with_stats(projects, tasks);
        Self {
            stats: status_counts(&with_stats),
            latest_done_tasks: latest_done_tasks(tasks, projects),
            projects: with_stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;

    fn project(id: &str, name: &str) -> Project {
        Project {
            id: EntityId::from(id),
            name: name.to_string(),
            description: String::new(),
            start_date: None,
            end_date: None,
            image_url: None,
            manager_id: None,
        }
    }

    fn task(id: &str, project_id: &str, status: TaskStatus, due: Option<&str>) -> Task {
        Task {
            id: EntityId::from(id),
            title: format!("task {}", id),
            description: String::new(),
            start_date: None,
            due_date: due.map(|d| d.parse().unwrap()),
            priority: Priority::Media,
            status,
            user_id: None,
            project_id: EntityId::from(project_id),
        }
    }

    #[test]
    fn mixed_project_is_half_done() {
        let tasks = vec![
            task("1", "p1", TaskStatus::Pendiente, None),
            task("2", "p1", TaskStatus::EnProgreso, None),
            task("3", "p1", TaskStatus::Finalizado, None),
            task("4", "p1", TaskStatus::Finalizado, None),
            task("5", "p2", TaskStatus::Finalizado, None),
        ];
        let stats = project_stats(&EntityId::from("p1"), &tasks);

        assert_eq!(
            stats.tasks,
            TaskCounts {
                pending: 1,
                doing: 1,
                done: 2
            }
        );
        assert_eq!(stats.progress, 50);
        assert_eq!(stats.status, ProjectStatus::EnProgreso);
    }

    #[test]
    fn empty_project_is_not_started() {
        let stats = project_stats(&EntityId::from("p2"), &[]);
        assert_eq!(stats.progress, 0);
        assert_eq!(stats.status, ProjectStatus::SinIniciar);
        assert_eq!(stats.tasks.total(), 0);
    }

    #[test]
    fn progress_rounds_half_up() {
        assert_eq!(progress(1, 3), 33);
        assert_eq!(progress(2, 3), 67);
        assert_eq!(progress(1, 8), 13);
        assert_eq!(progress(3, 3), 100);
    }

    #[test]
    fn progress_keeps_bounds_exclusive() {
        assert_eq!(progress(1, 300), 1);
        assert_eq!(progress(199, 200), 99);
        assert_eq!(progress(0, 5), 0);
    }

    #[test]
    fn progress_properties_hold_for_all_small_partitions() {
        for total in 0..=60usize {
            for done in 0..=total {
                let p = progress(done, total);
                assert_eq!(p == 0, done == 0, "done={} total={}", done, total);
                assert_eq!(p == 100, total > 0 && done == total);
                assert!(p <= 100);
            }
        }
    }

    #[test]
    fn status_depends_only_on_progress() {
        assert_eq!(ProjectStatus::from_progress(0), ProjectStatus::SinIniciar);
        assert_eq!(ProjectStatus::from_progress(1), ProjectStatus::EnProgreso);
        assert_eq!(ProjectStatus::from_progress(99), ProjectStatus::EnProgreso);
        assert_eq!(ProjectStatus::from_progress(100), ProjectStatus::Completado);
    }

    #[test]
    fn latest_done_tasks_sorted_and_capped() {
        let projects = vec![project("p1", "Portal")];
        let tasks = vec![
            task("a", "p1", TaskStatus::Finalizado, Some("2024-01-01")),
            task("b", "p1", TaskStatus::Finalizado, Some("2024-03-01")),
            task("c", "p1", TaskStatus::EnProgreso, Some("2024-12-01")),
            task("d", "p9", TaskStatus::Finalizado, Some("2024-02-01")),
            task("e", "p1", TaskStatus::Finalizado, Some("2024-02-15")),
            task("f", "p1", TaskStatus::Finalizado, Some("2023-06-01")),
            task("g", "p1", TaskStatus::Finalizado, None),
            task("h", "p1", TaskStatus::Finalizado, Some("2024-04-01")),
        ];

        let latest = latest_done_tasks(&tasks, &projects);
        let ids: Vec<&str> = latest.iter().map(|t| t.id.as_str()).collect();

        assert_eq!(ids, vec!["h", "b", "e", "d", "a"]);
        assert_eq!(latest[3].project, UNKNOWN_PROJECT_NAME);
        assert_eq!(latest[0].project, "Portal");
    }

    #[test]
    fn latest_done_tasks_shorter_than_limit() {
        let tasks = vec![
            task("a", "p1", TaskStatus::Finalizado, Some("2024-01-01")),
            task("b", "p1", TaskStatus::Pendiente, Some("2024-03-01")),
        ];
        assert_eq!(latest_done_tasks(&tasks, &[]).len(), 1);
    }

    #[test]
    fn equal_due_dates_keep_input_order() {
        let tasks = vec![
            task("x", "p1", TaskStatus::Finalizado, Some("2024-01-01")),
            task("y", "p1", TaskStatus::Finalizado, Some("2024-01-01")),
        ];
        let latest = latest_done_tasks(&tasks, &[]);
        assert_eq!(latest[0].id.as_str(), "x");
        assert_eq!(latest[1].id.as_str(), "y");
    }

    #[test]
    fn dashboard_counts_projects_per_status() {
        let projects = vec![
            project("p1", "A"),
            project("p2", "B"),
            project("p3", "C"),
            project("p4", "D"),
        ];
        let tasks = vec![
            task("1", "p1", TaskStatus::Finalizado, None),
            task("2", "p2", TaskStatus::Finalizado, None),
            task("3", "p2", TaskStatus::Pendiente, None),
            task("4", "p3", TaskStatus::EnProgreso, None),
        ];

        let dashboard = Dashboard::build(&projects, &tasks);
        assert_eq!(
            dashboard.stats,
            StatusCounts {
                not_started: 2,
                in_progress: 1,
                completed: 1
            }
        );
        assert_eq!(dashboard.projects.len(), 4);
        assert_eq!(dashboard.projects[0].stats.progress, 100);
    }

    #[test]
    fn project_with_stats_flattens_on_the_wire() {
        let with_stats = projects_with_stats(
            &[project("p1", "A")],
            &[task("1", "p1", TaskStatus::Pendiente, None)],
        );
        let json = serde_json::to_value(&with_stats[0]).unwrap();
        assert_eq!(json["name"], "A");
        assert_eq!(json["progress"], 0);
        assert_eq!(json["status"], "sin iniciar");
        assert_eq!(json["tasks"]["pending"], 1);
    }
}
