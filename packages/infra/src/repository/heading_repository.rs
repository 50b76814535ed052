//! # HeadingRepository
//!
//! 見出しの永続化を担当するリポジトリ。
//!
//! `tasks` 配列は [`update`](HeadingRepository::update) では書き換えず、
//! [`push_task`](HeadingRepository::push_task) /
//! [`pull_task`](HeadingRepository::pull_task) の単一文で追加・削除する。
//! 同じ見出しへの同時のタスク作成でも ID は失われない。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use taskboard_domain::{
    heading::{Heading, HeadingId, HeadingRecord, HeadingTitle},
    task::TaskId,
};
use uuid::Uuid;

use crate::error::InfraError;

/// 見出しリポジトリトレイト
#[async_trait]
pub trait HeadingRepository: Send + Sync {
    /// 見出しを挿入する
    async fn insert(&self, heading: &Heading) -> Result<(), InfraError>;

    /// 全見出しを作成日時順で取得する
    async fn find_all(&self) -> Result<Vec<Heading>, InfraError>;

    /// ID で見出しを検索する
    async fn find_by_id(&self, id: &HeadingId) -> Result<Option<Heading>, InfraError>;

    /// タイトル・概要・更新日時を保存する（`tasks` 配列は変更しない）
    async fn update(&self, heading: &Heading) -> Result<(), InfraError>;

    /// `tasks` 配列の末尾にタスク ID を追加する（追加済みなら何もしない）
    async fn push_task(
        &self,
        id: &HeadingId,
        task_id: &TaskId,
        now: DateTime<Utc>,
    ) -> Result<(), InfraError>;

    /// `tasks` 配列からタスク ID を取り除く
    async fn pull_task(
        &self,
        id: &HeadingId,
        task_id: &TaskId,
        now: DateTime<Utc>,
    ) -> Result<(), InfraError>;

    /// 見出しを削除する
    async fn delete(&self, id: &HeadingId) -> Result<(), InfraError>;
}

#[derive(sqlx::FromRow)]
struct HeadingRow {
    id:         Uuid,
    title:      String,
    summary:    String,
    tasks:      Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<HeadingRow> for Heading {
    type Error = InfraError;

    fn try_from(row: HeadingRow) -> Result<Self, Self::Error> {
        let title = HeadingTitle::new(row.title)
            .map_err(|e| InfraError::unexpected(format!("stored heading {}: {e}", row.id)))?;

        Ok(Heading::from_db(HeadingRecord {
            id: HeadingId::from_uuid(row.id),
            title,
            summary: row.summary,
            task_ids: row.tasks.into_iter().map(TaskId::from_uuid).collect(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }))
    }
}

/// PostgreSQL 実装の HeadingRepository
#[derive(Debug, Clone)]
pub struct PostgresHeadingRepository {
    pool: PgPool,
}

impl PostgresHeadingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HeadingRepository for PostgresHeadingRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(id = %heading.id()))]
    async fn insert(&self, heading: &Heading) -> Result<(), InfraError> {
        let task_ids: Vec<Uuid> = heading.task_ids().iter().map(|id| *id.as_uuid()).collect();

        sqlx::query(
            r#"
            INSERT INTO headings (id, title, summary, tasks, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(heading.id().as_uuid())
        .bind(heading.title().as_str())
        .bind(heading.summary())
        .bind(task_ids)
        .bind(heading.created_at())
        .bind(heading.updated_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all(&self) -> Result<Vec<Heading>, InfraError> {
        let rows: Vec<HeadingRow> = sqlx::query_as(
            r#"
            SELECT id, title, summary, tasks, created_at, updated_at
            FROM headings
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Heading::try_from).collect()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn find_by_id(&self, id: &HeadingId) -> Result<Option<Heading>, InfraError> {
        let row: Option<HeadingRow> = sqlx::query_as(
            r#"
            SELECT id, title, summary, tasks, created_at, updated_at
            FROM headings
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Heading::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(id = %heading.id()))]
    async fn update(&self, heading: &Heading) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            UPDATE headings
            SET title = $2, summary = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(heading.id().as_uuid())
        .bind(heading.title().as_str())
        .bind(heading.summary())
        .bind(heading.updated_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id, %task_id))]
    async fn push_task(
        &self,
        id: &HeadingId,
        task_id: &TaskId,
        now: DateTime<Utc>,
    ) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            UPDATE headings
            SET tasks = array_append(tasks, $2), updated_at = $3
            WHERE id = $1 AND NOT ($2 = ANY(tasks))
            "#,
        )
        .bind(id.as_uuid())
        .bind(task_id.as_uuid())
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id, %task_id))]
    async fn pull_task(
        &self,
        id: &HeadingId,
        task_id: &TaskId,
        now: DateTime<Utc>,
    ) -> Result<(), InfraError> {
        sqlx::query(
            r#"
            UPDATE headings
            SET tasks = array_remove(tasks, $2), updated_at = $3
            WHERE id = $1 AND $2 = ANY(tasks)
            "#,
        )
        .bind(id.as_uuid())
        .bind(task_id.as_uuid())
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%id))]
    async fn delete(&self, id: &HeadingId) -> Result<(), InfraError> {
        sqlx::query("DELETE FROM headings WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
