//! # テスト用モックリポジトリ
//!
//! ユースケース・ハンドラのテストで使用するインメモリリポジトリ。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! taskboard-infra = { workspace = true, features = ["test-utils"] }
//! ```
//!
//! 各リポジトリは [`fail_next`](MockHeadingRepository::fail_next) で
//! 指定した操作を 1 回だけ失敗させられる。カスケードの途中失敗の再現に使う。

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use taskboard_domain::{
    heading::{Heading, HeadingId, HeadingRecord},
    task::{Task, TaskId},
};

use crate::{
    error::InfraError,
    repository::{HeadingRepository, TaskRepository},
};

/// 1 回限りの失敗指定
#[derive(Clone, Default)]
struct FailurePlan {
    operations: Arc<Mutex<Vec<&'static str>>>,
}

impl FailurePlan {
    fn push(&self, operation: &'static str) {
        self.operations.lock().unwrap().push(operation);
    }

    /// 指定済みなら消費してエラーを返す
    fn check(&self, operation: &'static str) -> Result<(), InfraError> {
        let mut operations = self.operations.lock().unwrap();
        match operations.iter().position(|op| *op == operation) {
            Some(index) => {
                operations.remove(index);
                Err(InfraError::unexpected(format!("injected failure: {operation}")))
            }
            None => Ok(()),
        }
    }
}

// ===== MockHeadingRepository =====

#[derive(Clone, Default)]
pub struct MockHeadingRepository {
    headings: Arc<Mutex<Vec<Heading>>>,
    failures: FailurePlan,
}

impl MockHeadingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_heading(&self, heading: Heading) {
        self.headings.lock().unwrap().push(heading);
    }

    /// 現在保存されている見出しのスナップショット
    pub fn headings(&self) -> Vec<Heading> {
        self.headings.lock().unwrap().clone()
    }

    pub fn get(&self, id: &HeadingId) -> Option<Heading> {
        self.headings
            .lock()
            .unwrap()
            .iter()
            .find(|h| h.id() == id)
            .cloned()
    }

    /// 次の `operation` 呼び出しを 1 回だけ失敗させる
    ///
    /// `operation` はトレイトのメソッド名（`"push_task"` など）。
    pub fn fail_next(&self, operation: &'static str) {
        self.failures.push(operation);
    }

    fn modify(&self, id: &HeadingId, f: impl FnOnce(Heading) -> Heading) {
        let mut headings = self.headings.lock().unwrap();
        if let Some(slot) = headings.iter_mut().find(|h| h.id() == id) {
            *slot = f(slot.clone());
        }
    }
}

#[async_trait]
impl HeadingRepository for MockHeadingRepository {
    async fn insert(&self, heading: &Heading) -> Result<(), InfraError> {
        self.failures.check("insert")?;
        self.headings.lock().unwrap().push(heading.clone());
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Heading>, InfraError> {
        self.failures.check("find_all")?;
        let mut headings = self.headings();
        headings.sort_by_key(Heading::created_at);
        Ok(headings)
    }

    async fn find_by_id(&self, id: &HeadingId) -> Result<Option<Heading>, InfraError> {
        self.failures.check("find_by_id")?;
        Ok(self.get(id))
    }

    async fn update(&self, heading: &Heading) -> Result<(), InfraError> {
        self.failures.check("update")?;
        // `tasks` 配列は保存済みの値を維持する
        self.modify(heading.id(), |stored| {
            Heading::from_db(HeadingRecord {
                id:         heading.id().clone(),
                title:      heading.title().clone(),
                summary:    heading.summary().to_string(),
                task_ids:   stored.task_ids().to_vec(),
                created_at: stored.created_at(),
                updated_at: heading.updated_at(),
            })
        });
        Ok(())
    }

    async fn push_task(
        &self,
        id: &HeadingId,
        task_id: &TaskId,
        now: DateTime<Utc>,
    ) -> Result<(), InfraError> {
        self.failures.check("push_task")?;
        self.modify(id, |heading| heading.with_task(task_id.clone(), now));
        Ok(())
    }

    async fn pull_task(
        &self,
        id: &HeadingId,
        task_id: &TaskId,
        now: DateTime<Utc>,
    ) -> Result<(), InfraError> {
        self.failures.check("pull_task")?;
        self.modify(id, |heading| heading.without_task(task_id, now));
        Ok(())
    }

    async fn delete(&self, id: &HeadingId) -> Result<(), InfraError> {
        self.failures.check("delete")?;
        self.headings.lock().unwrap().retain(|h| h.id() != id);
        Ok(())
    }
}

// ===== MockTaskRepository =====

#[derive(Clone, Default)]
pub struct MockTaskRepository {
    tasks:    Arc<Mutex<Vec<Task>>>,
    failures: FailurePlan,
}

impl MockTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_task(&self, task: Task) {
        self.tasks.lock().unwrap().push(task);
    }

    /// 現在保存されているタスクのスナップショット
    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.lock().unwrap().clone()
    }

    pub fn get(&self, id: &TaskId) -> Option<Task> {
        self.tasks
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id() == id)
            .cloned()
    }

    /// 次の `operation` 呼び出しを 1 回だけ失敗させる
    pub fn fail_next(&self, operation: &'static str) {
        self.failures.push(operation);
    }
}

#[async_trait]
impl TaskRepository for MockTaskRepository {
    async fn insert(&self, task: &Task) -> Result<(), InfraError> {
        self.failures.check("insert")?;
        self.tasks.lock().unwrap().push(task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, InfraError> {
        self.failures.check("find_by_id")?;
        Ok(self.get(id))
    }

    async fn find_by_ids(&self, ids: &[TaskId]) -> Result<Vec<Task>, InfraError> {
        self.failures.check("find_by_ids")?;
        Ok(self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .filter(|t| ids.contains(t.id()))
            .cloned()
            .collect())
    }

    async fn find_by_heading(&self, heading_id: &HeadingId) -> Result<Vec<Task>, InfraError> {
        self.failures.check("find_by_heading")?;
        let mut tasks: Vec<Task> = self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.heading_id() == heading_id)
            .cloned()
            .collect();
        tasks.sort_by_key(Task::created_at);
        Ok(tasks)
    }

    async fn update(&self, task: &Task) -> Result<(), InfraError> {
        self.failures.check("update")?;
        let mut tasks = self.tasks.lock().unwrap();
        if let Some(slot) = tasks.iter_mut().find(|t| t.id() == task.id()) {
            *slot = task.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: &TaskId) -> Result<(), InfraError> {
        self.failures.check("delete")?;
        self.tasks.lock().unwrap().retain(|t| t.id() != id);
        Ok(())
    }

    async fn delete_by_heading(&self, heading_id: &HeadingId) -> Result<u64, InfraError> {
        self.failures.check("delete_by_heading")?;
        let mut tasks = self.tasks.lock().unwrap();
        let before = tasks.len();
        tasks.retain(|t| t.heading_id() != heading_id);
        Ok((before - tasks.len()) as u64)
    }
}
