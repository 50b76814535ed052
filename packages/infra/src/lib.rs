//! # Taskboard インフラ層
//!
//! PostgreSQL との接続とリポジトリの具体実装を提供する。
//!
//! ## 依存関係
//!
//! ```text
//! api → infra → domain
//! ```
//!
//! ドメイン層はインフラ層に依存しない。
//!
//! ## モジュール構成
//!
//! - [`db`] - 接続プールとマイグレーション
//! - [`error`] - インフラ層エラー定義
//! - [`repository`] - リポジトリトレイトと PostgreSQL 実装
//! - `mock` - インメモリ実装（`test-utils` feature）

pub mod db;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod repository;

pub use error::InfraError;
