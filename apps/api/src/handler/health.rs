//! # ヘルスチェックハンドラ
//!
//! ```text
//! GET /health
//! {"status":"healthy","version":"0.1.0"}
//! ```
//!
//! データストアへの接続は確認せず、プロセスの起動状態のみを返す。

use axum::Json;
use taskboard_shared::HealthResponse;

/// ヘルスチェックエンドポイント
///
/// 常に 200 OK を返す。
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_health_checkはパッケージのバージョンを返す() {
        let Json(body) = health_check().await;

        assert_eq!(body.status, "healthy");
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
    }
}
