//! # Taskboard ドメイン層
//!
//! 見出し（Heading）とタスク（Task）のドメインモデルを定義する。
//!
//! ## 関係
//!
//! ```text
//! Heading 1 ──── N Task
//!    │               │
//!    └─ tasks[] ◀────┘ heading（正）
//! ```
//!
//! - `Task::heading_id` が所属関係の正（source of truth）
//! - `Heading::task_ids` は一覧表示用の非正規化キャッシュ
//!
//! ドメイン層は永続化の詳細に依存しない。2 つのエンティティ間の整合性を保つ
//! 書き込み順序はユースケース層（`taskboard-api` のカスケード計画）が担う。
//!
//! ## モジュール構成
//!
//! - [`clock`] - 時刻プロバイダ
//! - [`error`] - ドメインエラー
//! - [`heading`] - 見出しエンティティ
//! - [`task`] - タスクエンティティ

#[macro_use]
mod macros;

pub mod clock;
pub mod error;
pub mod heading;
pub mod task;

pub use error::DomainError;
