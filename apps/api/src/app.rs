//! # ルーター構築
//!
//! 依存コンポーネントからハンドラの State を組み立て、全ルートを持つ [`Router`] を返す。
//! `main.rs` と結合テストの双方から使う。

use std::sync::Arc;

use axum::{Router, routing::get};
use taskboard_domain::clock::Clock;
use taskboard_infra::repository::{HeadingRepository, TaskRepository};
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        HeadingState,
        TaskState,
        api_root,
        create_heading,
        create_task,
        delete_heading,
        delete_task,
        get_heading,
        get_task,
        health_check,
        list_headings,
        list_tasks,
        update_heading,
        update_task,
    },
    usecase::{HeadingUseCaseImpl, TaskUseCaseImpl},
};

/// API サーバーのルーターを構築する
pub fn router(
    heading_repository: Arc<dyn HeadingRepository>,
    task_repository: Arc<dyn TaskRepository>,
    clock: Arc<dyn Clock>,
) -> Router {
    let heading_state = Arc::new(HeadingState {
        usecase: HeadingUseCaseImpl::new(
            heading_repository.clone(),
            task_repository.clone(),
            clock.clone(),
        ),
    });
    let task_state = Arc::new(TaskState {
        usecase: TaskUseCaseImpl::new(heading_repository, task_repository, clock),
    });

    Router::new()
        .route("/health", get(health_check))
        .route("/api", get(api_root))
        .route("/api/", get(api_root))
        .merge(
            Router::new()
                .route("/api/headings", get(list_headings).post(create_heading))
                .route(
                    "/api/headings/{id}",
                    get(get_heading).put(update_heading).delete(delete_heading),
                )
                .with_state(heading_state),
        )
        .merge(
            Router::new()
                .route("/api/headings/{id}/tasks", get(list_tasks).post(create_task))
                .route(
                    "/api/tasks/{id}",
                    get(get_task).put(update_task).delete(delete_task),
                )
                .with_state(task_state),
        )
        .layer(TraceLayer::new_for_http())
}
