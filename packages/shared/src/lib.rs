//! # Taskboard 共有ユーティリティ
//!
//! API サーバーと静的サイトサーバーの双方から使われる共通部品。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - axum への依存は入れない（`IntoResponse` 変換は各サービスの責務）

pub mod api_response;
pub mod health;
pub mod observability;

pub use api_response::ApiResponse;
pub use health::HealthResponse;
