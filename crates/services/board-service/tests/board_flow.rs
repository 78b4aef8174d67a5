//! A manager sets up a project and its assignee works through a task.

use std::sync::Arc;

use board_service_lib::{BoardService, ProjectBoard};
use domain::{
    EntityId, Move, Priority, ProjectDraft, ProjectStatus, Role, Session, TaskDraft, TaskStatus,
};
use remote::InMemoryBackend;
use tokio_test::assert_ok;

fn session(id: &str, role: Role) -> Session {
    Session {
        id: EntityId::from(id),
        name: "x".into(),
        email: format!("{}@example.com", id),
        role,
    }
}

#[tokio::test]
async fn project_progresses_as_tasks_finish() {
    let backend = Arc::new(InMemoryBackend::new());
    let board = ProjectBoard::new(backend.clone(), backend.clone(), backend);
    let manager = session("1", Role::Gerente);
    let worker = session("2", Role::Usuario);

    let project = assert_ok!(
        board
            .create_project(
                &manager,
                ProjectDraft {
                    name: "Migración".into(),
                    description: "Mover servidores".into(),
                    start_date: "2024-01-01".parse().ok(),
                    end_date: "2024-02-01".parse().ok(),
                    image_url: None,
                },
            )
            .await
    );

    let task = assert_ok!(
        board
            .create_task(
                &project.id,
                TaskDraft {
                    title: "Inventario".into(),
                    description: "Listar equipos".into(),
                    start_date: "2024-01-02".parse().ok(),
                    due_date: "2024-01-05".parse().ok(),
                    priority: Priority::Alta,
                    user_id: Some(worker.id.clone()),
                },
            )
            .await
    );

    let listed = assert_ok!(board.projects().await);
    assert_eq!(listed[0].stats.status, ProjectStatus::SinIniciar);

    assert_ok!(board.move_task(&worker, &task.id, Move::Advance).await);
    let done = assert_ok!(board.move_task(&worker, &task.id, Move::Advance).await);
    assert_eq!(done.status, TaskStatus::Finalizado);

    let dashboard = assert_ok!(board.dashboard().await);
    assert_eq!(dashboard.projects[0].stats.progress, 100);
    assert_eq!(dashboard.stats.completed, 1);
    assert_eq!(dashboard.latest_done_tasks[0].project, "Migración");

    assert_ok!(board.delete_project(&project.id).await);
    assert!(assert_ok!(board.projects().await).is_empty());
}
