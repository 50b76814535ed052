//! # カスケード計画
//!
//! 見出しとタスクの 2 テーブルにまたがる更新を、順序付きのステップ列として表現する。
//!
//! 各ステップには「そのステップが失敗した場合に残る状態」（[`Consistency`]）を付与する。
//! [`CascadeExecutor`] はステップを順に実行し、最初の失敗で停止して
//! [`CascadeFailure`] を返す。ロールバックもリトライもしない。
//!
//! | 計画 | ステップ | 失敗時の状態 |
//! |------|----------|--------------|
//! | タスク作成 | 1. タスク挿入 / 2. 見出しへ ID 追加 | 1: 整合 / 2: タスク未掲載 |
//! | タスク削除 | 1. 見出しから ID 除去 / 2. タスク削除 | 1: 整合 / 2: タスク未掲載 |
//! | 見出し削除 | 1. 所属タスク一括削除 / 2. 見出し削除 | 1: タスク一部削除 / 2: 見出しに無効な参照 |
//! | タスク付け替え | 1. タスク保存 / 2. 新見出しへ追加 / 3. 旧見出しから除去 | 1: 整合 / 2: タスク未掲載 / 3: 旧見出しに無効な参照 |
//!
//! どの計画のどのステップで止まっても、存在しない見出しを指すタスクは生まれない。
//! [`Consistency`] にその状態を表すバリアントが無いのはこのため。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use derive_more::Display;
use taskboard_domain::{
    heading::{Heading, HeadingId},
    task::{Task, TaskId},
};
use taskboard_infra::{
    InfraError,
    repository::{HeadingRepository, TaskRepository},
};
use thiserror::Error;

/// カスケード計画の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CascadeOperation {
    #[display("create task")]
    CreateTask,
    #[display("delete task")]
    DeleteTask,
    #[display("delete heading")]
    DeleteHeading,
    #[display("reassign task")]
    ReassignTask,
}

/// カスケードの 1 ステップ（単一のデータストア書き込み）
#[derive(Debug, Clone, PartialEq, Eq, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum CascadeStep {
    /// タスクを新規に挿入する
    InsertTask(Task),
    /// タスクの全フィールドを保存する
    SaveTask(Task),
    /// 見出しの `tasks` 配列に ID を追加する
    AppendTaskRef {
        heading_id: HeadingId,
        task_id:    TaskId,
    },
    /// 見出しの `tasks` 配列から ID を取り除く
    RemoveTaskRef {
        heading_id: HeadingId,
        task_id:    TaskId,
    },
    DeleteTask(TaskId),
    /// `heading_id` が一致するタスクをすべて削除する
    DeleteTasksOfHeading(HeadingId),
    DeleteHeading(HeadingId),
}

impl CascadeStep {
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

/// ステップ失敗時にデータストアに残る状態
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Consistency {
    /// 不整合なし（このステップより前に書き込みが無い）
    #[display("intact")]
    Intact,

    /// タスクは正しい見出しを指しているが、見出しの `tasks` 配列に載っていない
    ///
    /// 一覧は `heading_id` で引くため利用者からは見えており、回復可能。
    #[display("task {task_id} is not listed in heading {heading_id}")]
    TaskUnlisted {
        task_id:    TaskId,
        heading_id: HeadingId,
    },

    /// 見出しの `tasks` 配列に、もう属していないタスクの ID が残っている
    #[display("heading {heading_id} still lists task {task_id}")]
    StaleTaskRef {
        heading_id: HeadingId,
        task_id:    TaskId,
    },

    /// 見出しの所属タスクが一部だけ削除された（見出しは残っている）
    #[display("tasks of heading {heading_id} were partially deleted")]
    TasksPartiallyDeleted { heading_id: HeadingId },

    /// 所属タスクはすべて削除されたが見出しが残り、`tasks` 配列が削除済みの ID を指している
    #[display("heading {heading_id} lists deleted tasks")]
    StaleTaskRefs { heading_id: HeadingId },
}

/// 失敗時の状態を付与したステップ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStep {
    pub step:       CascadeStep,
    pub on_failure: Consistency,
}

/// 順序付きのステップ列
///
/// `now` は `tasks` 配列の更新に伴う `updated_at` に使う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadePlan {
    operation: CascadeOperation,
    now:       DateTime<Utc>,
    steps:     Vec<PlannedStep>,
}

impl CascadePlan {
    /// タスク作成: タスクを挿入してから見出しに載せる
    pub fn create_task(task: Task, now: DateTime<Utc>) -> Self {
        let heading_id = task.heading_id().clone();
        let task_id = task.id().clone();

        Self {
            operation: CascadeOperation::CreateTask,
            now,
            steps: vec![
                PlannedStep {
                    step:       CascadeStep::InsertTask(task),
                    on_failure: Consistency::Intact,
                },
                PlannedStep {
                    step:       CascadeStep::AppendTaskRef {
                        heading_id: heading_id.clone(),
                        task_id:    task_id.clone(),
                    },
                    on_failure: Consistency::TaskUnlisted {
                        task_id,
                        heading_id,
                    },
                },
            ],
        }
    }

    /// タスク削除: 見出しから外してからタスクを削除する
    pub fn delete_task(task: &Task, now: DateTime<Utc>) -> Self {
        let heading_id = task.heading_id().clone();
        let task_id = task.id().clone();

        Self {
            operation: CascadeOperation::DeleteTask,
            now,
            steps: vec![
                PlannedStep {
                    step:       CascadeStep::RemoveTaskRef {
                        heading_id: heading_id.clone(),
                        task_id:    task_id.clone(),
                    },
                    on_failure: Consistency::Intact,
                },
                PlannedStep {
                    step:       CascadeStep::DeleteTask(task_id.clone()),
                    on_failure: Consistency::TaskUnlisted {
                        task_id,
                        heading_id,
                    },
                },
            ],
        }
    }

    /// 見出し削除: 所属タスクを先に削除し、最後に見出しを削除する
    pub fn delete_heading(heading: &Heading, now: DateTime<Utc>) -> Self {
        let heading_id = heading.id().clone();

        Self {
            operation: CascadeOperation::DeleteHeading,
            now,
            steps: vec![
                PlannedStep {
                    step:       CascadeStep::DeleteTasksOfHeading(heading_id.clone()),
                    on_failure: Consistency::TasksPartiallyDeleted {
                        heading_id: heading_id.clone(),
                    },
                },
                PlannedStep {
                    step:       CascadeStep::DeleteHeading(heading_id.clone()),
                    on_failure: Consistency::StaleTaskRefs { heading_id },
                },
            ],
        }
    }

    /// タスク付け替え: 保存 → 新しい見出しに追加 → 古い見出しから除去
    ///
    /// `updated` は付け替え後のタスク。`previous_heading_id` と異なる見出しを指していること。
    pub fn reassign_task(
        updated: Task,
        previous_heading_id: HeadingId,
        now: DateTime<Utc>,
    ) -> Self {
        let new_heading_id = updated.heading_id().clone();
        let task_id = updated.id().clone();

        Self {
            operation: CascadeOperation::ReassignTask,
            now,
            steps: vec![
                PlannedStep {
                    step:       CascadeStep::SaveTask(updated),
                    on_failure: Consistency::Intact,
                },
                PlannedStep {
                    step:       CascadeStep::AppendTaskRef {
                        heading_id: new_heading_id.clone(),
                        task_id:    task_id.clone(),
                    },
                    on_failure: Consistency::TaskUnlisted {
                        task_id:    task_id.clone(),
                        heading_id: new_heading_id,
                    },
                },
                PlannedStep {
                    step:       CascadeStep::RemoveTaskRef {
                        heading_id: previous_heading_id.clone(),
                        task_id:    task_id.clone(),
                    },
                    on_failure: Consistency::StaleTaskRef {
                        heading_id: previous_heading_id,
                        task_id,
                    },
                },
            ],
        }
    }

    pub fn operation(&self) -> CascadeOperation {
        self.operation
    }

    pub fn steps(&self) -> &[PlannedStep] {
        &self.steps
    }
}

/// 全ステップ完了時の結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeReport {
    /// 削除されたタスク数
    pub deleted_tasks: u64,
}

/// カスケードの途中失敗
#[derive(Debug, Error)]
#[error("{operation} failed at step {failed_step}: {source}")]
pub struct CascadeFailure {
    pub operation:   CascadeOperation,
    pub failed_step: &'static str,
    /// 失敗前に完了したステップ名（実行順）
    pub completed:   Vec<&'static str>,
    /// 失敗によって残った状態
    pub outcome:     Consistency,
    pub source:      InfraError,
}

impl CascadeFailure {
    /// 下位層のエラーメッセージ（API の `error` フィールドに載せる）
    pub fn source_message(&self) -> String {
        self.source.to_string()
    }
}

/// カスケード計画の実行器
#[derive(Clone)]
pub struct CascadeExecutor {
    heading_repository: Arc<dyn HeadingRepository>,
    task_repository:    Arc<dyn TaskRepository>,
}

impl CascadeExecutor {
    pub fn new(
        heading_repository: Arc<dyn HeadingRepository>,
        task_repository: Arc<dyn TaskRepository>,
    ) -> Self {
        Self {
            heading_repository,
            task_repository,
        }
    }

    /// 計画のステップを順に実行する
    ///
    /// 最初に失敗したステップで停止し、残りは実行しない。
    #[tracing::instrument(skip_all, fields(operation = %plan.operation))]
    pub async fn execute(&self, plan: CascadePlan) -> Result<CascadeReport, CascadeFailure> {
        let CascadePlan {
            operation,
            now,
            steps,
        } = plan;
        let mut report = CascadeReport::default();
        let mut completed = Vec::with_capacity(steps.len());

        for PlannedStep { step, on_failure } in steps {
            let name = step.name();
            match self.apply(step, now).await {
                Ok(deleted_tasks) => {
                    report.deleted_tasks += deleted_tasks;
                    completed.push(name);
                }
                Err(source) => {
                    tracing::error!(
                        %operation,
                        step = name,
                        completed = ?completed,
                        outcome = %on_failure,
                        error = %source,
                        "カスケードが途中で失敗しました"
                    );
                    return Err(CascadeFailure {
                        operation,
                        failed_step: name,
                        completed,
                        outcome: on_failure,
                        source,
                    });
                }
            }
        }

        tracing::debug!(%operation, deleted_tasks = report.deleted_tasks, "カスケード完了");
        Ok(report)
    }

    /// 1 ステップを実行し、削除したタスク数を返す
    async fn apply(&self, step: CascadeStep, now: DateTime<Utc>) -> Result<u64, InfraError> {
        match step {
            CascadeStep::InsertTask(task) => {
                self.task_repository.insert(&task).await?;
                Ok(0)
            }
            CascadeStep::SaveTask(task) => {
                self.task_repository.update(&task).await?;
                Ok(0)
            }
            CascadeStep::AppendTaskRef {
                heading_id,
                task_id,
            } => {
                self.heading_repository
                    .push_task(&heading_id, &task_id, now)
                    .await?;
                Ok(0)
            }
            CascadeStep::RemoveTaskRef {
                heading_id,
                task_id,
            } => {
                self.heading_repository
                    .pull_task(&heading_id, &task_id, now)
                    .await?;
                Ok(0)
            }
            CascadeStep::DeleteTask(task_id) => {
                self.task_repository.delete(&task_id).await?;
                Ok(1)
            }
            CascadeStep::DeleteTasksOfHeading(heading_id) => {
                self.task_repository.delete_by_heading(&heading_id).await
            }
            CascadeStep::DeleteHeading(heading_id) => {
                self.heading_repository.delete(&heading_id).await?;
                Ok(0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use taskboard_domain::{
        heading::{HeadingTitle, NewHeading},
        task::{NewTask, TaskTitle},
    };
    use taskboard_infra::mock::{MockHeadingRepository, MockTaskRepository};

    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn heading() -> Heading {
        Heading::new(NewHeading {
            id:      HeadingId::new(),
            title:   HeadingTitle::new("Groceries").unwrap(),
            summary: None,
            now:     now(),
        })
    }

    fn task_of(heading_id: &HeadingId, title: &str) -> Task {
        Task::new(NewTask {
            id:          TaskId::new(),
            heading_id:  heading_id.clone(),
            title:       TaskTitle::new(title).unwrap(),
            description: None,
            due_date:    None,
            priority:    None,
            now:         now(),
        })
    }

    struct Fixture {
        headings: MockHeadingRepository,
        tasks:    MockTaskRepository,
        sut:      CascadeExecutor,
    }

    fn fixture() -> Fixture {
        let headings = MockHeadingRepository::new();
        let tasks = MockTaskRepository::new();
        let sut = CascadeExecutor::new(Arc::new(headings.clone()), Arc::new(tasks.clone()));
        Fixture {
            headings,
            tasks,
            sut,
        }
    }

    fn step_names(plan: &CascadePlan) -> Vec<&'static str> {
        plan.steps().iter().map(|s| s.step.name()).collect()
    }

    // ===== 計画の構造 =====

    #[test]
    fn test_見出し削除はタスク削除が見出し削除より先() {
        let plan = CascadePlan::delete_heading(&heading(), now());

        assert_eq!(
            step_names(&plan),
            vec!["delete_tasks_of_heading", "delete_heading"]
        );
    }

    #[test]
    fn test_タスク作成は挿入が見出しへの追加より先で最初の失敗は整合() {
        let h = heading();
        let plan = CascadePlan::create_task(task_of(h.id(), "Milk"), now());

        assert_eq!(step_names(&plan), vec!["insert_task", "append_task_ref"]);
        assert_eq!(plan.steps()[0].on_failure, Consistency::Intact);
        assert!(matches!(
            plan.steps()[1].on_failure,
            Consistency::TaskUnlisted { .. }
        ));
    }

    #[test]
    fn test_タスク削除は参照除去がタスク削除より先() {
        let h = heading();
        let plan = CascadePlan::delete_task(&task_of(h.id(), "Milk"), now());

        assert_eq!(step_names(&plan), vec!["remove_task_ref", "delete_task"]);
        assert_eq!(plan.operation(), CascadeOperation::DeleteTask);
    }

    #[test]
    fn test_付け替えは保存_追加_除去の順() {
        let old = heading();
        let new = heading();
        let task = task_of(old.id(), "Milk");
        let moved = task.clone().apply_changes(
            taskboard_domain::task::TaskChanges {
                heading_id: Some(new.id().clone()),
                ..Default::default()
            },
            now(),
        );

        let plan = CascadePlan::reassign_task(moved, old.id().clone(), now());

        assert_eq!(
            step_names(&plan),
            vec!["save_task", "append_task_ref", "remove_task_ref"]
        );
        assert_eq!(
            plan.steps()[2].on_failure,
            Consistency::StaleTaskRef {
                heading_id: old.id().clone(),
                task_id:    task.id().clone(),
            }
        );
    }

    // ===== 実行 =====

    #[tokio::test]
    async fn test_タスク作成を実行するとタスクが保存され見出しに載る() {
        let f = fixture();
        let h = heading();
        f.headings.add_heading(h.clone());
        let task = task_of(h.id(), "Milk");

        f.sut
            .execute(CascadePlan::create_task(task.clone(), now()))
            .await
            .unwrap();

        assert_eq!(f.tasks.get(task.id()), Some(task.clone()));
        assert_eq!(f.headings.get(h.id()).unwrap().task_ids(), &[task.id().clone()]);
    }

    #[tokio::test]
    async fn test_見出しへの追加で失敗するとタスク未掲載の状態が報告される() {
        let f = fixture();
        let h = heading();
        f.headings.add_heading(h.clone());
        f.headings.fail_next("push_task");
        let task = task_of(h.id(), "Milk");

        let failure = f
            .sut
            .execute(CascadePlan::create_task(task.clone(), now()))
            .await
            .unwrap_err();

        assert_eq!(failure.operation, CascadeOperation::CreateTask);
        assert_eq!(failure.failed_step, "append_task_ref");
        assert_eq!(failure.completed, vec!["insert_task"]);
        assert_eq!(
            failure.outcome,
            Consistency::TaskUnlisted {
                task_id:    task.id().clone(),
                heading_id: h.id().clone(),
            }
        );
        // タスクは正しい見出しを指したまま残る
        assert_eq!(f.tasks.get(task.id()).unwrap().heading_id(), h.id());
        assert!(f.headings.get(h.id()).unwrap().task_ids().is_empty());
    }

    #[tokio::test]
    async fn test_見出し削除はタスク数を報告する() {
        let f = fixture();
        let h = heading();
        f.headings.add_heading(h.clone());
        f.tasks.add_task(task_of(h.id(), "Milk"));
        f.tasks.add_task(task_of(h.id(), "Eggs"));
        let other = task_of(&HeadingId::new(), "Paint");
        f.tasks.add_task(other.clone());

        let report = f
            .sut
            .execute(CascadePlan::delete_heading(&h, now()))
            .await
            .unwrap();

        assert_eq!(report.deleted_tasks, 2);
        assert_eq!(f.headings.get(h.id()), None);
        assert_eq!(f.tasks.tasks(), vec![other]);
    }

    #[tokio::test]
    async fn test_タスク一括削除で失敗すると見出しは削除されない() {
        let f = fixture();
        let h = heading();
        f.headings.add_heading(h.clone());
        let task = task_of(h.id(), "Milk");
        f.tasks.add_task(task.clone());
        f.tasks.fail_next("delete_by_heading");

        let failure = f
            .sut
            .execute(CascadePlan::delete_heading(&h, now()))
            .await
            .unwrap_err();

        assert_eq!(failure.failed_step, "delete_tasks_of_heading");
        assert!(failure.completed.is_empty());
        // 見出しが残るので孤立したタスクは生まれない
        assert!(f.headings.get(h.id()).is_some());
        assert!(f.tasks.get(task.id()).is_some());
    }

    #[tokio::test]
    async fn test_見出し削除で失敗すると削除済みタスクへの参照が残る() {
        let f = fixture();
        let h = heading();
        let task = task_of(h.id(), "Milk");
        f.headings.add_heading(h.clone().with_task(task.id().clone(), now()));
        f.tasks.add_task(task.clone());
        f.headings.fail_next("delete");

        let failure = f
            .sut
            .execute(CascadePlan::delete_heading(&h, now()))
            .await
            .unwrap_err();

        assert_eq!(
            failure.outcome,
            Consistency::StaleTaskRefs {
                heading_id: h.id().clone(),
            }
        );
        assert_eq!(failure.completed, vec!["delete_tasks_of_heading"]);
        assert!(f.tasks.tasks().is_empty());
        assert_eq!(
            f.headings.get(h.id()).unwrap().task_ids(),
            &[task.id().clone()]
        );
    }

    #[tokio::test]
    async fn test_失敗メッセージは下位層のエラーをそのまま含む() {
        let f = fixture();
        let h = heading();
        f.headings.add_heading(h.clone());
        let task = task_of(h.id(), "Milk");
        f.tasks.add_task(task.clone());
        f.tasks.fail_next("delete");

        let failure = f
            .sut
            .execute(CascadePlan::delete_task(&task, now()))
            .await
            .unwrap_err();

        assert_eq!(
            failure.source_message(),
            "unexpected error: injected failure: delete"
        );
        assert_eq!(
            failure.to_string(),
            "delete task failed at step delete_task: unexpected error: injected failure: delete"
        );
    }
}
