mod common;

use std::sync::Arc;

use time::macros::date;
use time::Date;

use common::{Factory, LiveServer, RecordingFrontend};
use worklog::manager::{
    Direction, NotificationLevel, PeriodView, StatusFilter, TaskForm, TaskManager, UiEvent,
};
use worklog::models::{WorkLogId, WorkStatus};
use worklog::repositories::WorkLogRepository;
use worklog::services::HttpWorkLogApi;

const TODAY: Date = date!(2024 - 01 - 19);

fn manager_for(server: &LiveServer, frontend: Arc<RecordingFrontend>) -> TaskManager {
    let api = HttpWorkLogApi::new(&server.client_config()).unwrap();
    TaskManager::with_clock(Arc::new(api), frontend, Arc::new(|| TODAY))
}

fn form(content: &str, status: WorkStatus, start: Date) -> TaskForm {
    TaskForm {
        project_content: content.to_string(),
        status: Some(status),
        start_date: Some(start),
        ..TaskForm::default()
    }
}

#[tokio::test]
async fn test_create_complete_and_reload() {
    let server = LiveServer::start().await;
    let frontend = Arc::new(RecordingFrontend::new(true));
    let mut manager = manager_for(&server, frontend.clone());
    manager.init().await;

    manager
        .handle(UiEvent::Submit(form(
            "A",
            WorkStatus::Scheduled,
            date!(2024 - 01 - 15),
        )))
        .await;
    assert_eq!(frontend.last_level(), Some(NotificationLevel::Success));
    assert_eq!(manager.tasks().len(), 1);
    let id = manager.tasks()[0].id;

    // Server-side timestamps before completing
    manager.load().await.unwrap();
    let before = manager.task(id).unwrap().updated_at.unwrap();

    manager.handle(UiEvent::Complete(id)).await;
    let task = manager.task(id).unwrap();
    assert_eq!(task.status, WorkStatus::Closed);
    assert_eq!(task.end_date, Some(TODAY));

    manager.handle(UiEvent::Reload).await;
    let task = manager.task(id).unwrap();
    assert_eq!(task.status, WorkStatus::Closed);
    assert_eq!(task.end_date, Some(TODAY));
    assert_eq!(task.project_content, "A");
    assert!(task.updated_at.unwrap() > before);
}

#[tokio::test]
async fn test_views_and_stats_over_loaded_tasks() {
    let server = LiveServer::start().await;
    let factory = Factory::new(&server.state);
    factory
        .create_work_log(date!(2024 - 01 - 15), WorkStatus::Scheduled, "monday")
        .await;
    factory
        .create_work_log(date!(2024 - 01 - 19), WorkStatus::InProgress, "friday")
        .await;
    factory
        .create_work_log(date!(2024 - 01 - 19), WorkStatus::Closed, "friday-done")
        .await;
    factory
        .create_work_log(date!(2024 - 02 - 01), WorkStatus::Closed, "february")
        .await;

    let frontend = Arc::new(RecordingFrontend::new(true));
    let mut manager = manager_for(&server, frontend);

    let view = manager.init().await;
    assert_eq!(view.period_label, "2024-01-19");
    assert_eq!(view.cards.len(), 2);

    let view = manager.handle(UiEvent::ChangeView(PeriodView::Week)).await;
    assert_eq!(view.period_label, "2024-01-15 ~ 2024-01-21");
    assert_eq!(view.stats.total, 3);
    assert_eq!(view.cards[0].content, "monday");

    let view = manager
        .handle(UiEvent::ToggleFilter(StatusFilter::Only(WorkStatus::InProgress)))
        .await;
    assert_eq!(view.cards.len(), 1);
    assert_eq!(view.cards[0].content, "friday");
    assert_eq!(view.stats.total, 3);
    assert_eq!(view.stats.in_progress, 1);

    let view = manager
        .handle(UiEvent::ToggleFilter(StatusFilter::Only(WorkStatus::InProgress)))
        .await;
    assert_eq!(view.cards.len(), 3);

    manager.handle(UiEvent::ChangeView(PeriodView::Month)).await;
    let view = manager.handle(UiEvent::Navigate(Direction::Next)).await;
    assert_eq!(view.period_label, "2024-02");
    assert_eq!(view.cards.len(), 1);
    assert_eq!(view.cards[0].content, "february");
}

#[tokio::test]
async fn test_edit_round_trip() {
    let server = LiveServer::start().await;
    let log = Factory::new(&server.state)
        .create_work_log(date!(2024 - 01 - 19), WorkStatus::InProgress, "draft")
        .await;

    let frontend = Arc::new(RecordingFrontend::new(true));
    let mut manager = manager_for(&server, frontend);
    manager.init().await;

    let view = manager.handle(UiEvent::BeginEdit(log.id)).await;
    assert!(view.cards[0].editing);

    let mut edit = TaskForm::from_task(manager.task(log.id).unwrap());
    edit.project_content = "final".to_string();
    edit.memo = "reviewed".to_string();
    let view = manager.handle(UiEvent::Submit(edit)).await;

    assert!(!view.cards[0].editing);
    assert_eq!(view.cards[0].content, "final");
    assert_eq!(manager.tasks().len(), 1);

    manager.handle(UiEvent::Reload).await;
    let task = manager.task(log.id).unwrap();
    assert_eq!(task.project_content, "final");
    assert_eq!(task.memo, "reviewed");
}

#[tokio::test]
async fn test_delete_asks_for_confirmation() {
    let server = LiveServer::start().await;
    let log = Factory::new(&server.state)
        .create_work_log(date!(2024 - 01 - 19), WorkStatus::Scheduled, "Old task")
        .await;

    let frontend = Arc::new(RecordingFrontend::new(true));
    let mut manager = manager_for(&server, frontend.clone());
    manager.init().await;

    let view = manager.handle(UiEvent::Delete(log.id)).await;
    assert!(view.cards.is_empty());
    assert_eq!(frontend.questions(), vec!["Delete \"Old task\"?".to_string()]);
    assert_eq!(frontend.last_level(), Some(NotificationLevel::Info));

    manager.handle(UiEvent::Reload).await;
    assert!(manager.tasks().is_empty());
}

#[tokio::test]
async fn test_failed_delete_restores_server_state() {
    let server = LiveServer::start().await;
    let factory = Factory::new(&server.state);
    let log = factory
        .create_work_log(date!(2024 - 01 - 19), WorkStatus::Scheduled, "Shared")
        .await;

    let frontend = Arc::new(RecordingFrontend::new(true));
    let mut manager = manager_for(&server, frontend.clone());
    manager.init().await;

    // Someone else deletes it and adds another task in the meantime
    server.state.repository.delete(log.id).await.unwrap();
    factory
        .create_work_log(date!(2024 - 01 - 19), WorkStatus::Scheduled, "Newer")
        .await;

    let view = manager.handle(UiEvent::Delete(log.id)).await;

    let errors = frontend
        .notifications()
        .into_iter()
        .filter(|n| n.level == NotificationLevel::Error)
        .count();
    assert_eq!(errors, 1);
    assert_eq!(view.cards.len(), 1);
    assert_eq!(view.cards[0].content, "Newer");
}

#[tokio::test]
async fn test_unknown_task_is_reported() {
    let server = LiveServer::start().await;
    let frontend = Arc::new(RecordingFrontend::new(true));
    let mut manager = manager_for(&server, frontend.clone());
    manager.init().await;

    manager.handle(UiEvent::Complete(WorkLogId::generate())).await;
    assert_eq!(frontend.last_level(), Some(NotificationLevel::Error));
    assert!(manager.tasks().is_empty());
}
