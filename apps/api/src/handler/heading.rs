//! # 見出しハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /api/headings` - 見出し作成
//! - `GET /api/headings` - 見出し一覧
//! - `GET /api/headings/{id}` - 見出し詳細（タスク展開）
//! - `PUT /api/headings/{id}` - 見出し更新
//! - `DELETE /api/headings/{id}` - 見出しと所属タスクの削除

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use taskboard_domain::heading::{Heading, HeadingId};
use taskboard_shared::ApiResponse;
use uuid::Uuid;

use super::task::TaskDto;
use crate::{
    error::ApiError,
    usecase::{CreateHeadingInput, HeadingUseCaseImpl, UpdateHeadingInput},
};

/// 見出し API の共有状態
pub struct HeadingState {
    pub usecase: HeadingUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// 見出し作成リクエスト
#[derive(Debug, Deserialize)]
pub struct CreateHeadingRequest {
    pub title:   Option<String>,
    pub summary: Option<String>,
}

/// 見出し更新リクエスト
///
/// `tasks` は受け付けない（送られても無視する）。
#[derive(Debug, Deserialize)]
pub struct UpdateHeadingRequest {
    pub title:   Option<String>,
    pub summary: Option<String>,
}

/// 見出し DTO
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeadingDto {
    pub id:         Uuid,
    pub title:      String,
    pub summary:    String,
    pub tasks:      Vec<Uuid>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Heading> for HeadingDto {
    fn from(heading: &Heading) -> Self {
        Self {
            id:         *heading.id().as_uuid(),
            title:      heading.title().as_str().to_string(),
            summary:    heading.summary().to_string(),
            tasks:      heading.task_ids().iter().map(|id| *id.as_uuid()).collect(),
            created_at: heading.created_at().to_rfc3339(),
            updated_at: heading.updated_at().to_rfc3339(),
        }
    }
}

/// 一覧用の軽量 DTO
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeadingSummaryDto {
    pub id:         Uuid,
    pub title:      String,
    pub summary:    String,
    pub tasks:      Vec<Uuid>,
    pub created_at: String,
}

/// タスクを展開した見出し DTO
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeadingDetailDto {
    pub id:         Uuid,
    pub title:      String,
    pub summary:    String,
    pub tasks:      Vec<TaskDto>,
    pub created_at: String,
    pub updated_at: String,
}

// --- ハンドラ ---

/// POST /api/headings
///
/// - `201 Created`: 作成された見出し（`tasks` は空）
/// - `400 Bad Request`: `title` が無い・空
#[tracing::instrument(skip_all)]
pub async fn create_heading(
    State(state): State<Arc<HeadingState>>,
    payload: Result<Json<CreateHeadingRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    let heading = state
        .usecase
        .create_heading(CreateHeadingInput {
            title:   req.title,
            summary: req.summary,
        })
        .await?;

    tracing::info!(heading_id = %heading.id(), "見出しを作成しました");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(HeadingDto::from(&heading))),
    ))
}

/// GET /api/headings
#[tracing::instrument(skip_all)]
pub async fn list_headings(
    State(state): State<Arc<HeadingState>>,
) -> Result<impl IntoResponse, ApiError> {
    let headings = state.usecase.list_headings().await?;

    let items: Vec<HeadingSummaryDto> = headings
        .iter()
        .map(|h| HeadingSummaryDto {
            id:         *h.id().as_uuid(),
            title:      h.title().as_str().to_string(),
            summary:    h.summary().to_string(),
            tasks:      h.task_ids().iter().map(|id| *id.as_uuid()).collect(),
            created_at: h.created_at().to_rfc3339(),
        })
        .collect();

    Ok((StatusCode::OK, Json(ApiResponse::ok(items))))
}

/// GET /api/headings/{id}
///
/// - `200 OK`: タスクを `tasks` 配列の順に展開した見出し
/// - `404 Not Found`: 見出しが存在しない
#[tracing::instrument(skip_all, fields(%id))]
pub async fn get_heading(
    State(state): State<Arc<HeadingState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = HeadingId::parse(&id)?;

    let detail = state.usecase.get_heading(&id).await?;

    let dto = HeadingDetailDto {
        id:         *detail.heading.id().as_uuid(),
        title:      detail.heading.title().as_str().to_string(),
        summary:    detail.heading.summary().to_string(),
        tasks:      detail.tasks.iter().map(TaskDto::from).collect(),
        created_at: detail.heading.created_at().to_rfc3339(),
        updated_at: detail.heading.updated_at().to_rfc3339(),
    };

    Ok((StatusCode::OK, Json(ApiResponse::ok(dto))))
}

/// PUT /api/headings/{id}
///
/// - `200 OK`: 更新後の見出し
/// - `400 Bad Request`: 空のタイトル
/// - `404 Not Found`: 見出しが存在しない
#[tracing::instrument(skip_all, fields(%id))]
pub async fn update_heading(
    State(state): State<Arc<HeadingState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateHeadingRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = HeadingId::parse(&id)?;
    let Json(req) = payload?;

    let heading = state
        .usecase
        .update_heading(
            &id,
            UpdateHeadingInput {
                title:   req.title,
                summary: req.summary,
            },
        )
        .await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(HeadingDto::from(&heading))),
    ))
}

/// DELETE /api/headings/{id}
///
/// 所属タスクを削除してから見出しを削除する。
///
/// - `200 OK`: `{success:true, message:"Heading and its tasks deleted"}`
/// - `404 Not Found`: 見出しが存在しない（何も削除しない）
#[tracing::instrument(skip_all, fields(%id))]
pub async fn delete_heading(
    State(state): State<Arc<HeadingState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = HeadingId::parse(&id)?;

    state.usecase.delete_heading(&id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::done("Heading and its tasks deleted")),
    ))
}
