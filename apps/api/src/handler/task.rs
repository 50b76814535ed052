//! # タスクハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /api/headings/{id}/tasks` - 見出しの下にタスクを作成
//! - `GET /api/headings/{id}/tasks` - 見出しに属するタスク一覧
//! - `GET /api/tasks/{id}` - タスク詳細（所属見出しを展開）
//! - `PUT /api/tasks/{id}` - タスク更新（`heading` 指定で付け替え）
//! - `DELETE /api/tasks/{id}` - タスク削除

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Deserializer, Serialize};
use taskboard_domain::{
    heading::HeadingId,
    task::{Task, TaskId},
};
use taskboard_shared::ApiResponse;
use uuid::Uuid;

use super::heading::HeadingDto;
use crate::{
    error::ApiError,
    usecase::{CreateTaskInput, TaskUseCaseImpl, UpdateTaskInput},
};

/// タスク API の共有状態
pub struct TaskState {
    pub usecase: TaskUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// タスク作成リクエスト
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title:       Option<String>,
    pub description: Option<String>,
    pub due_date:    Option<String>,
    pub priority:    Option<String>,
}

/// タスク更新リクエスト
///
/// `dueDate` はキー無しなら変更なし、`null` ならクリア。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub heading:     Option<String>,
    pub title:       Option<String>,
    pub description: Option<String>,
    pub completed:   Option<bool>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub due_date:    Option<Option<String>>,
    pub priority:    Option<String>,
}

/// キーが存在すれば `Some`（値が `null` なら `Some(None)`）
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// タスク DTO
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
    pub id:          Uuid,
    pub heading:     Uuid,
    pub title:       String,
    pub description: String,
    pub completed:   bool,
    pub due_date:    Option<String>,
    pub priority:    String,
    pub created_at:  String,
    pub updated_at:  String,
}

impl From<&Task> for TaskDto {
    fn from(task: &Task) -> Self {
        Self {
            id:          *task.id().as_uuid(),
            heading:     *task.heading_id().as_uuid(),
            title:       task.title().as_str().to_string(),
            description: task.description().to_string(),
            completed:   task.completed(),
            due_date:    task.due_date().map(|d| d.to_rfc3339()),
            priority:    task.priority().as_str().to_string(),
            created_at:  task.created_at().to_rfc3339(),
            updated_at:  task.updated_at().to_rfc3339(),
        }
    }
}

/// 所属見出しを展開したタスク DTO
///
/// 見出しが既に存在しない場合 `heading` は `null`。
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetailDto {
    pub id:          Uuid,
    pub heading:     Option<HeadingDto>,
    pub title:       String,
    pub description: String,
    pub completed:   bool,
    pub due_date:    Option<String>,
    pub priority:    String,
    pub created_at:  String,
    pub updated_at:  String,
}

// --- ハンドラ ---

/// POST /api/headings/{id}/tasks
///
/// - `201 Created`: 作成されたタスク
/// - `400 Bad Request`: `title` が無い、日付・優先度が不正
/// - `404 Not Found`: 見出しが存在しない（本文の検証より先に判定し、何も書き込まない）
#[tracing::instrument(skip_all, fields(heading_id = %heading_id))]
pub async fn create_task(
    State(state): State<Arc<TaskState>>,
    Path(heading_id): Path<String>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let heading_id = HeadingId::parse(&heading_id)?;
    state.usecase.ensure_heading_exists(&heading_id).await?;
    let Json(req) = payload?;

    let task = state
        .usecase
        .create_task(CreateTaskInput {
            heading_id,
            title: req.title,
            description: req.description,
            due_date: req.due_date,
            priority: req.priority,
        })
        .await?;

    tracing::info!(task_id = %task.id(), "タスクを作成しました");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(TaskDto::from(&task)))))
}

/// GET /api/headings/{id}/tasks
///
/// 作成日時の昇順。存在しない見出しなら空配列。
#[tracing::instrument(skip_all, fields(heading_id = %heading_id))]
pub async fn list_tasks(
    State(state): State<Arc<TaskState>>,
    Path(heading_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let heading_id = HeadingId::parse(&heading_id)?;

    let tasks = state.usecase.list_tasks_by_heading(&heading_id).await?;
    let items: Vec<TaskDto> = tasks.iter().map(TaskDto::from).collect();

    Ok((StatusCode::OK, Json(ApiResponse::ok(items))))
}

/// GET /api/tasks/{id}
#[tracing::instrument(skip_all, fields(%id))]
pub async fn get_task(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = TaskId::parse(&id)?;

    let detail = state.usecase.get_task(&id).await?;
    let task = TaskDto::from(&detail.task);

    let dto = TaskDetailDto {
        id:          task.id,
        heading:     detail.heading.as_ref().map(HeadingDto::from),
        title:       task.title,
        description: task.description,
        completed:   task.completed,
        due_date:    task.due_date,
        priority:    task.priority,
        created_at:  task.created_at,
        updated_at:  task.updated_at,
    };

    Ok((StatusCode::OK, Json(ApiResponse::ok(dto))))
}

/// PUT /api/tasks/{id}
///
/// - `200 OK`: 更新後のタスク
/// - `400 Bad Request`: 空のタイトル、日付・優先度が不正
/// - `404 Not Found`: タスク、または付け替え先の見出しが存在しない
#[tracing::instrument(skip_all, fields(%id))]
pub async fn update_task(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = TaskId::parse(&id)?;
    let Json(req) = payload?;

    let heading = req.heading.as_deref().map(HeadingId::parse).transpose()?;

    let task = state
        .usecase
        .update_task(
            &id,
            UpdateTaskInput {
                heading,
                title: req.title,
                description: req.description,
                completed: req.completed,
                due_date: req.due_date,
                priority: req.priority,
            },
        )
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(TaskDto::from(&task)))))
}

/// DELETE /api/tasks/{id}
///
/// - `200 OK`: `{success:true, message:"Task deleted"}`
/// - `404 Not Found`: タスクが存在しない
#[tracing::instrument(skip_all, fields(%id))]
pub async fn delete_task(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = TaskId::parse(&id)?;

    state.usecase.delete_task(&id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::done("Task deleted"))))
}
