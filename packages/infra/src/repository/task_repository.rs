//! # TaskRepository
//!
//! タスクの永続化を担当するリポジトリ。
//!
//! 見出しごとのタスク一覧は `heading_id` 列で引く。見出し側の `tasks` 配列は参照しない。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use taskboard_domain::{
    heading::HeadingId,
    task::{Task, TaskId, TaskPriority, TaskRecord, TaskTitle},
};
use uuid::Uuid;

use crate::error::InfraError;

/// タスクリポジトリトレイト
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// タスクを挿入する
    async fn insert(&self, task: &Task) -> Result<(), InfraError>;

    /// ID でタスクを検索する
    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, InfraError>;

    /// 複数 ID でタスクを検索する
    ///
    /// 存在しない ID は結果に含まれない。順序は保証しない。
    async fn find_by_ids(&self, ids: &[TaskId]) -> Result<Vec<Task>, InfraError>;

    /// 見出しに属するタスクを作成日時順で取得する
    async fn find_by_heading(&self, heading_id: &HeadingId) -> Result<Vec<Task>, InfraError>;

    /// タスクの全フィールドを保存する（所属見出しの変更を含む）
    async fn update(&self, task: &Task) -> Result<(), InfraError>;

    /// タスクを削除する
    async fn delete(&self, id: &TaskId) -> Result<(), InfraError>;

    /// 見出しに属するタスクを一括削除し、削除件数を返す
    async fn delete_by_heading(&self, heading_id: &HeadingId) -> Result<u64, InfraError>;
}

#[derive(sqlx::FromRow)]
struct TaskRow {
    id:          Uuid,
    heading_id:  Uuid,
    title:       String,
    description: String,
    completed:   bool,
    due_date:    Option<DateTime<Utc>>,
    priority:    String,
    created_at:  DateTime<Utc>,
    updated_at:  DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = InfraError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let title = TaskTitle::new(row.title)
            .map_err(|e| InfraError::unexpected(format!("stored task {}: {e}", row.id)))?;
        let priority = TaskPriority::parse(&row.priority)
            .map_err(|e| InfraError::unexpected(format!("stored task {}: {e}", row.id)))?;

        Ok(Task::from_db(TaskRecord {
            id: TaskId::from_uuid(row.id),
            heading_id: HeadingId::from_uuid(row.heading_id),
            title,
            description: row.description,
            completed: row.completed,
            due_date: row.due_date,
            priority,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }))
    }
}

/// PostgreSQL 実装の TaskRepository
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(id = %task.id(), heading_id = %task.heading_id()))]
    async fn insert(&self, task: &Task) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            INSERT INTO tasks (
                id, heading_id, title, description, completed,
                due_date, priority, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(task.id().as_uuid())
        .bind(task.heading_id().as_uuid())
        .bind(task.title().as_str())
        .bind(task.description())
        .bind(task.completed())
        .bind(task.due_date())
        .bind(task.priority().as_str())
        .bind(task.created_at())
        .bind(task.updated_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, InfraError> {
        let row: Option<TaskRow> = sqlx::query_as(
            r#"
            SELECT id, heading_id, title, description, completed,
                   due_date, priority, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Task::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(count = ids.len()))]
    async fn find_by_ids(&self, ids: &[TaskId]) -> Result<Vec<Task>, InfraError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows: Vec<TaskRow> = sqlx::query_as(
            r#"
            SELECT id, heading_id, title, description, completed,
                   due_date, priority, created_at, updated_at
            FROM tasks
            WHERE id = ANY($1)
            "#,
        )
        .bind(uuids)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Task::try_from).collect()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%heading_id))]
    async fn find_by_heading(&self, heading_id: &HeadingId) -> Result<Vec<Task>, InfraError> {
        let rows: Vec<TaskRow> = sqlx::query_as(
            r#"
            SELECT id, heading_id, title, description, completed,
                   due_date, priority, created_at, updated_at
            FROM tasks
            WHERE heading_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(heading_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Task::try_from).collect()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(id = %task.id()))]
    async fn update(&self, task: &Task) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            UPDATE tasks
            SET heading_id = $2, title = $3, description = $4, completed = $5,
                due_date = $6, priority = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(task.id().as_uuid())
        .bind(task.heading_id().as_uuid())
        .bind(task.title().as_str())
        .bind(task.description())
        .bind(task.completed())
        .bind(task.due_date())
        .bind(task.priority().as_str())
        .bind(task.updated_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn delete(&self, id: &TaskId) -> Result<(), InfraError> {
        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%heading_id))]
    async fn delete_by_heading(&self, heading_id: &HeadingId) -> Result<u64, InfraError> {
        let result = sqlx::query("DELETE FROM tasks WHERE heading_id = $1")
            .bind(heading_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
