//! タスク管理ユースケース
//!
//! タスクの作成・削除・見出しの付け替えは [`CascadePlan`] を通して実行する。
//! 見出しの存在確認はいずれも最初の書き込みより前に行う。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use taskboard_domain::{
    DomainError,
    clock::Clock,
    heading::{Heading, HeadingId},
    task::{NewTask, Task, TaskChanges, TaskId, TaskPriority, TaskTitle, parse_due_date},
};
use taskboard_infra::repository::{HeadingRepository, TaskRepository};

use super::cascade::{CascadeExecutor, CascadePlan};
use crate::error::ApiError;

/// タスク作成の入力（見出し ID はパスから受け取る）
pub struct CreateTaskInput {
    pub heading_id:  HeadingId,
    pub title:       Option<String>,
    pub description: Option<String>,
    pub due_date:    Option<String>,
    pub priority:    Option<String>,
}

/// タスク更新の入力
///
/// - 各フィールドは変更なしなら `None`
/// - `due_date`: クリアは `Some(None)`
/// - `heading`: 別の見出しを指定すると付け替えになる
#[derive(Default)]
pub struct UpdateTaskInput {
    pub heading:     Option<HeadingId>,
    pub title:       Option<String>,
    pub description: Option<String>,
    pub completed:   Option<bool>,
    pub due_date:    Option<Option<String>>,
    pub priority:    Option<String>,
}

/// 所属見出しを展開したタスク
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskWithHeading {
    pub task:    Task,
    /// 見出しが既に存在しない場合は `None`
    pub heading: Option<Heading>,
}

/// タスク管理ユースケース
pub struct TaskUseCaseImpl {
    heading_repository: Arc<dyn HeadingRepository>,
    task_repository:    Arc<dyn TaskRepository>,
    cascade:            CascadeExecutor,
    clock:              Arc<dyn Clock>,
}

impl TaskUseCaseImpl {
    pub fn new(
        heading_repository: Arc<dyn HeadingRepository>,
        task_repository: Arc<dyn TaskRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cascade = CascadeExecutor::new(heading_repository.clone(), task_repository.clone());
        Self {
            heading_repository,
            task_repository,
            cascade,
            clock,
        }
    }

    /// 見出しの下にタスクを作成する
    ///
    /// 1. 見出しの存在確認（無ければ 404、何も書き込まない）
    /// 2. 入力のバリデーション
    /// 3. タスク挿入 → 見出しの `tasks` に追加
    pub async fn create_task(&self, input: CreateTaskInput) -> Result<Task, ApiError> {
        self.find_heading(&input.heading_id).await?;

        let title = TaskTitle::new(input.title.unwrap_or_default())?;
        let due_date = input.due_date.as_deref().map(parse_due_date).transpose()?;
        let priority = input
            .priority
            .as_deref()
            .map(TaskPriority::parse)
            .transpose()?;
        let now = self.clock.now();

        let task = Task::new(NewTask {
            id: TaskId::new(),
            heading_id: input.heading_id,
            title,
            description: input.description,
            due_date,
            priority,
            now,
        });
        self.cascade
            .execute(CascadePlan::create_task(task.clone(), now))
            .await?;

        Ok(task)
    }

    /// 見出しに属するタスクを作成日時順で取得する
    ///
    /// `heading_id` 列で引く。存在しない見出しなら空。
    pub async fn list_tasks_by_heading(&self, heading_id: &HeadingId) -> Result<Vec<Task>, ApiError> {
        Ok(self.task_repository.find_by_heading(heading_id).await?)
    }

    /// タスクを所属見出し付きで取得する
    pub async fn get_task(&self, id: &TaskId) -> Result<TaskWithHeading, ApiError> {
        let task = self.find_task(id).await?;
        let heading = self
            .heading_repository
            .find_by_id(task.heading_id())
            .await?;

        Ok(TaskWithHeading { task, heading })
    }

    /// タスクを部分更新する
    ///
    /// 所属見出しが変わる場合は、新しい見出しの存在を確認してから
    /// 付け替え計画（保存 → 新見出しに追加 → 旧見出しから除去）を実行する。
    pub async fn update_task(&self, id: &TaskId, input: UpdateTaskInput) -> Result<Task, ApiError> {
        let task = self.find_task(id).await?;

        let changes = TaskChanges {
            heading_id:  None,
            title:       input.title.map(TaskTitle::new).transpose()?,
            description: input.description,
            completed:   input.completed,
            due_date:    input
                .due_date
                .map(|due| due.as_deref().map(parse_due_date).transpose())
                .transpose()?,
            priority:    input
                .priority
                .as_deref()
                .map(TaskPriority::parse)
                .transpose()?,
        };
        let now = self.clock.now();

        match input.heading {
            Some(new_heading_id) if &new_heading_id != task.heading_id() => {
                self.reassign(task, new_heading_id, changes, now).await
            }
            _ => {
                let task = task.apply_changes(changes, now);
                self.task_repository.update(&task).await?;
                Ok(task)
            }
        }
    }

    /// 見出しが存在することを確認する
    ///
    /// リクエスト本文を解釈する前に呼び、存在しない見出しへの作成を本文の内容に関わらず 404 にする。
    pub async fn ensure_heading_exists(&self, heading_id: &HeadingId) -> Result<(), ApiError> {
        self.find_heading(heading_id).await.map(|_| ())
    }

    /// タスクを削除する（見出しの `tasks` から外してから削除）
    pub async fn delete_task(&self, id: &TaskId) -> Result<(), ApiError> {
        let task = self.find_task(id).await?;

        self.cascade
            .execute(CascadePlan::delete_task(&task, self.clock.now()))
            .await?;

        tracing::info!(task_id = %id, heading_id = %task.heading_id(), "タスクを削除しました");
        Ok(())
    }

    async fn reassign(
        &self,
        task: Task,
        new_heading_id: HeadingId,
        changes: TaskChanges,
        now: DateTime<Utc>,
    ) -> Result<Task, ApiError> {
        self.find_heading(&new_heading_id).await?;

        let previous_heading_id = task.heading_id().clone();
        let updated = task.apply_changes(
            TaskChanges {
                heading_id: Some(new_heading_id),
                ..changes
            },
            now,
        );
        self.cascade
            .execute(CascadePlan::reassign_task(
                updated.clone(),
                previous_heading_id,
                now,
            ))
            .await?;

        Ok(updated)
    }

    async fn find_heading(&self, id: &HeadingId) -> Result<Heading, ApiError> {
        self.heading_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound {
                    entity_type: "Heading",
                    id:          id.to_string(),
                }
                .into()
            })
    }

    async fn find_task(&self, id: &TaskId) -> Result<Task, ApiError> {
        self.task_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound {
                    entity_type: "Task",
                    id:          id.to_string(),
                }
                .into()
            })
    }
}
