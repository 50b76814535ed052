//! 見出し管理ユースケース

use std::{collections::HashMap, sync::Arc};

use taskboard_domain::{
    DomainError,
    clock::Clock,
    heading::{Heading, HeadingChanges, HeadingId, HeadingTitle, NewHeading},
    task::{Task, TaskId},
};
use taskboard_infra::repository::{HeadingRepository, TaskRepository};

use super::cascade::{CascadeExecutor, CascadePlan, CascadeReport};
use crate::error::ApiError;

/// 見出し作成の入力
pub struct CreateHeadingInput {
    pub title:   Option<String>,
    pub summary: Option<String>,
}

/// 見出し更新の入力
///
/// 各フィールドは変更なしなら `None`。
pub struct UpdateHeadingInput {
    pub title:   Option<String>,
    pub summary: Option<String>,
}

/// タスクを展開した見出し
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingWithTasks {
    pub heading: Heading,
    /// `tasks` 配列の順。既に存在しないタスクは含まない
    pub tasks:   Vec<Task>,
}

/// 見出し管理ユースケース
pub struct HeadingUseCaseImpl {
    heading_repository: Arc<dyn HeadingRepository>,
    task_repository:    Arc<dyn TaskRepository>,
    cascade:            CascadeExecutor,
    clock:              Arc<dyn Clock>,
}

impl HeadingUseCaseImpl {
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

    /// 見出しを作成する（`tasks` は空）
    pub async fn create_heading(&self, input: CreateHeadingInput) -> Result<Heading, ApiError> {
        let title = HeadingTitle::new(input.title.unwrap_or_default())?;

        let heading = Heading::new(NewHeading {
            id: HeadingId::new(),
            title,
            summary: input.summary,
            now: self.clock.now(),
        });
        self.heading_repository.insert(&heading).await?;

        Ok(heading)
    }

    /// 見出し一覧を取得する
    pub async fn list_headings(&self) -> Result<Vec<Heading>, ApiError> {
        Ok(self.heading_repository.find_all().await?)
    }

    /// 見出しを所属タスク付きで取得する
    ///
    /// タスクは `tasks` 配列の順に並べる。
    pub async fn get_heading(&self, id: &HeadingId) -> Result<HeadingWithTasks, ApiError> {
        let heading = self.find_heading(id).await?;

        let mut by_id: HashMap<TaskId, Task> = self
            .task_repository
            .find_by_ids(heading.task_ids())
            .await?
            .into_iter()
            .map(|task| (task.id().clone(), task))
            .collect();
        let tasks = heading
            .task_ids()
            .iter()
            .filter_map(|task_id| by_id.remove(task_id))
            .collect();

        Ok(HeadingWithTasks { heading, tasks })
    }

    /// 見出しのタイトル・概要を更新する
    pub async fn update_heading(
        &self,
        id: &HeadingId,
        input: UpdateHeadingInput,
    ) -> Result<Heading, ApiError> {
        let heading = self.find_heading(id).await?;

        let changes = HeadingChanges {
            title:   input.title.map(HeadingTitle::new).transpose()?,
            summary: input.summary,
        };
        let heading = heading.apply_changes(changes, self.clock.now());
        self.heading_repository.update(&heading).await?;

        Ok(heading)
    }

    /// 見出しを所属タスクごと削除する
    ///
    /// 存在確認は削除より前に行う。
    pub async fn delete_heading(&self, id: &HeadingId) -> Result<CascadeReport, ApiError> {
        let heading = self.find_heading(id).await?;

        let report = self
            .cascade
            .execute(CascadePlan::delete_heading(&heading, self.clock.now()))
            .await?;

        tracing::info!(heading_id = %id, deleted_tasks = report.deleted_tasks, "見出しを削除しました");
        Ok(report)
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
}
