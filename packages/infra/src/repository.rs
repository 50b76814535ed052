//! # リポジトリ実装
//!
//! 見出しとタスクの永続化を担当するリポジトリトレイトと PostgreSQL 実装。
//!
//! 2 つのテーブルにまたがる更新はトランザクションで束ねない。
//! 複数リポジトリにまたがる手順の順序付けはユースケース層のカスケード計画が担う。

pub mod heading_repository;
pub mod task_repository;

pub use heading_repository::{HeadingRepository, PostgresHeadingRepository};
pub use task_repository::{PostgresTaskRepository, TaskRepository};
