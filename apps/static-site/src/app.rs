//! # ルーター構築

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::{
    assets::AssetStore,
    handler::{AssetState, health_check, serve_asset},
};

/// 静的サイトサーバーのルーターを構築する
///
/// `/health` 以外はすべてアセット配信ハンドラに渡す。
pub fn router(store: AssetStore) -> Router {
    let state = Arc::new(AssetState { store });

    Router::new()
        .route("/health", get(health_check))
        .fallback(serve_asset)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
