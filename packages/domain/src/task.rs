//! # タスク（Task）
//!
//! ちょうど 1 つの見出しに属する作業単位。
//!
//! `heading_id` は必須であり、見出しとタスクの所属関係の正（source of truth）。
//! 見出し側の `tasks` 配列はこのフィールドから導出されるキャッシュに過ぎない。

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::{DomainError, heading::HeadingId};

define_uuid_id! {
    /// タスクの一意識別子
    pub struct TaskId {
        label: "task",
    }
}

define_validated_string! {
    /// タスクタイトル（値オブジェクト）
    pub struct TaskTitle {
        label: "title",
    }
}

/// タスクの優先度
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TaskPriority {
    #[default]
    Low,
    Medium,
    High,
}

impl TaskPriority {
    /// 文字列から優先度をパースする
    ///
    /// `low` / `medium` / `high` 以外はバリデーションエラー。
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        Self::from_str(value).map_err(|_| {
            DomainError::Validation(format!(
                "priority must be one of low, medium, high: {value}"
            ))
        })
    }

    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// 期日文字列をパースする
///
/// RFC 3339 のタイムスタンプ、または `YYYY-MM-DD`（UTC の 0 時とみなす）を受け付ける。
pub fn parse_due_date(value: &str) -> Result<DateTime<Utc>, DomainError> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| DomainError::Validation(format!("invalid dueDate: {value}")))
}

/// タスクエンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id:          TaskId,
    heading_id:  HeadingId,
    title:       TaskTitle,
    description: String,
    completed:   bool,
    due_date:    Option<DateTime<Utc>>,
    priority:    TaskPriority,
    created_at:  DateTime<Utc>,
    updated_at:  DateTime<Utc>,
}

/// タスクの新規作成パラメータ
pub struct NewTask {
    pub id:          TaskId,
    pub heading_id:  HeadingId,
    pub title:       TaskTitle,
    pub description: Option<String>,
    pub due_date:    Option<DateTime<Utc>>,
    pub priority:    Option<TaskPriority>,
    pub now:         DateTime<Utc>,
}

/// タスクの DB 復元パラメータ
pub struct TaskRecord {
    pub id:          TaskId,
    pub heading_id:  HeadingId,
    pub title:       TaskTitle,
    pub description: String,
    pub completed:   bool,
    pub due_date:    Option<DateTime<Utc>>,
    pub priority:    TaskPriority,
    pub created_at:  DateTime<Utc>,
    pub updated_at:  DateTime<Utc>,
}

/// タスクの部分更新
///
/// - 各フィールドは `None` なら変更なし
/// - `due_date`: 変更なしは `None`、クリアは `Some(None)`
/// - `heading_id`: 所属見出しの付け替え。見出し側の `tasks` 配列の付け替えは
///   ユースケース層が行う
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub heading_id:  Option<HeadingId>,
    pub title:       Option<TaskTitle>,
    pub description: Option<String>,
    pub completed:   Option<bool>,
    pub due_date:    Option<Option<DateTime<Utc>>>,
    pub priority:    Option<TaskPriority>,
}

impl Task {
    /// 新しいタスクを作成する
    ///
    /// `completed` は `false`、`priority` は未指定なら `low`。
    pub fn new(params: NewTask) -> Self {
        Self {
            id:          params.id,
            heading_id:  params.heading_id,
            title:       params.title,
            description: params.description.unwrap_or_default(),
            completed:   false,
            due_date:    params.due_date,
            priority:    params.priority.unwrap_or_default(),
            created_at:  params.now,
            updated_at:  params.now,
        }
    }

    /// 既存のデータから復元する
    pub fn from_db(record: TaskRecord) -> Self {
        Self {
            id:          record.id,
            heading_id:  record.heading_id,
            title:       record.title,
            description: record.description,
            completed:   record.completed,
            due_date:    record.due_date,
            priority:    record.priority,
            created_at:  record.created_at,
            updated_at:  record.updated_at,
        }
    }

    /// 部分更新を適用したタスクを返す
    pub fn apply_changes(self, changes: TaskChanges, now: DateTime<Utc>) -> Self {
        Self {
            heading_id: changes.heading_id.unwrap_or(self.heading_id),
            title: changes.title.unwrap_or(self.title),
            description: changes.description.unwrap_or(self.description),
            completed: changes.completed.unwrap_or(self.completed),
            due_date: changes.due_date.unwrap_or(self.due_date),
            priority: changes.priority.unwrap_or(self.priority),
            updated_at: now,
            ..self
        }
    }

    // Getter メソッド

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn heading_id(&self) -> &HeadingId {
        &self.heading_id
    }

    pub fn title(&self) -> &TaskTitle {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    pub fn priority(&self) -> TaskPriority {
        self.priority
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
