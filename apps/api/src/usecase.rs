//! # ユースケース層
//!
//! 見出し・タスクのビジネスロジックを実装する。
//!
//! - リポジトリは `Arc<dyn Trait>` で外部から注入する
//! - 複数テーブルにまたがる書き込みは [`cascade`] の計画として実行する
//!
//! ## モジュール構成
//!
//! - [`cascade`]: 順序付きの更新計画と実行器
//! - [`heading`]: 見出しのユースケース
//! - [`task`]: タスクのユースケース

pub mod cascade;
pub mod heading;
pub mod task;

pub use cascade::{CascadeExecutor, CascadeFailure, CascadePlan, CascadeReport, Consistency};
pub use heading::{CreateHeadingInput, HeadingUseCaseImpl, HeadingWithTasks, UpdateHeadingInput};
pub use task::{CreateTaskInput, TaskUseCaseImpl, TaskWithHeading, UpdateTaskInput};
