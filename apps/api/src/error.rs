//! # API エラー定義
//!
//! ハンドラから返されるエラーと、レスポンスエンベロープへの変換を定義する。
//!
//! | ApiError | HTTP Status | エンベロープ |
//! |----------|-------------|--------------|
//! | `Validation` | 400 | `{success:false, message}` |
//! | `NotFound` | 404 | `{success:false, message}` |
//! | `Store` | 500 | `{success:false, error}` |
//! | `Cascade` | 500 | `{success:false, error}` |
//!
//! 500 系の `error` には下位層のエラーメッセージをそのまま載せる。

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use taskboard_domain::DomainError;
use taskboard_infra::InfraError;
use taskboard_shared::ApiResponse;
use thiserror::Error;

use crate::usecase::cascade::CascadeFailure;

/// API 層で発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
    /// 入力が不正（必須項目の欠落、ID・日付・列挙値の形式不正、壊れた JSON）
    #[error("{0}")]
    Validation(String),

    /// 参照先が存在しない（`"Heading not found"` など）
    #[error("{0}")]
    NotFound(String),

    /// データストアのエラー
    #[error(transparent)]
    Store(#[from] InfraError),

    /// 複数ステップの更新が途中で失敗した
    #[error(transparent)]
    Cascade(#[from] CascadeFailure),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => Self::Validation(msg),
            DomainError::NotFound { entity_type, .. } => {
                Self::NotFound(format!("{entity_type} not found"))
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, ApiResponse::rejected(msg)),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiResponse::rejected(msg)),
            ApiError::Store(e) => {
                tracing::error!(error = %e, span_trace = %e.span_trace(), "データストアエラー");
                (StatusCode::INTERNAL_SERVER_ERROR, ApiResponse::failed(e.to_string()))
            }
            ApiError::Cascade(failure) => {
                // 失敗したステップと残った不整合はカスケード実行時にログ済み
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::failed(failure.source_message()),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
