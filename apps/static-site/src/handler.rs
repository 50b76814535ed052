//! # HTTP リクエストハンドラ
//!
//! - `GET /health` - ヘルスチェック
//! - それ以外のすべてのパス - 許可リストに基づくアセット配信

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{Uri, header},
    response::{IntoResponse, Response},
};
use taskboard_shared::HealthResponse;

use crate::assets::{AssetStore, ServedAsset};

/// アセット配信の共有状態
pub struct AssetState {
    pub store: AssetStore,
}

impl IntoResponse for ServedAsset {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, self.content_type)],
            self.body,
        )
            .into_response()
    }
}

/// アセット配信ハンドラ
///
/// メソッドを問わず、パスだけで応答を決める。クエリ文字列は照合に含めない。
pub async fn serve_asset(State(state): State<Arc<AssetState>>, uri: Uri) -> ServedAsset {
    let path = uri.path();
    let served = state.store.serve(path).await;

    tracing::info!(
        path,
        status = served.status.as_u16(),
        file = served.file.unwrap_or("(inline)"),
        "アセットを配信しました"
    );
    served
}

/// ヘルスチェックエンドポイント
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}
