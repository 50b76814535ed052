//! # Taskboard API サーバー
//!
//! 見出し（Heading）とタスク（Task）の CRUD を提供する JSON API。
//!
//! 見出しは所属タスクの ID 配列（`tasks`）を持ち、タスクは所属見出しの ID（`heading`）を持つ。
//! この双方向の参照は、タスクの作成・削除・付け替えと見出しの削除のたびに
//! [`usecase::CascadePlan`] を通して揃えられる。
//!
//! ## モジュール構成
//!
//! - [`app`] - ルーター構築
//! - [`config`] - アプリケーション設定（環境変数からの読み込み）
//! - [`error`] - API エラー定義と HTTP レスポンスへの変換
//! - [`handler`] - HTTP リクエストハンドラ
//! - [`usecase`] - ユースケースとカスケード実行
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use taskboard_api::app::router;
//!
//! let app = router(heading_repository, task_repository, Arc::new(SystemClock));
//! axum::serve(listener, app).await?;
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;
