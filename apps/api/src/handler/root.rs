//! # ルートハンドラ
//!
//! `GET /api` と `GET /api/` で固定のレスポンスを返す。
//! 既存クライアントが文字列一致で確認しているため、メッセージの綴りは変えない。

use axum::Json;
use taskboard_shared::ApiResponse;

/// GET /api
pub async fn api_root() -> Json<ApiResponse<Vec<serde_json::Value>>> {
    Json(ApiResponse::ok_with_message(Vec::new(), "Get all entitys"))
}
