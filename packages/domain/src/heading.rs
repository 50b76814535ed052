//! # 見出し（Heading）
//!
//! 0 個以上のタスクを束ねる名前付きリスト。
//!
//! ## `tasks` 配列の位置付け
//!
//! `task_ids` は「この見出しに属するタスク」の非正規化キャッシュであり、
//! 詳細表示で JOIN せずに並び順を得るために使う。所属関係の正は
//! [`Task::heading_id`](crate::task::Task::heading_id) 側にある。
//!
//! 配列はタスクの作成・削除・付け替え時にのみ更新され、同じ ID は高々 1 回しか
//! 現れない（[`Heading::with_task`] は追加済みなら何もしない）。
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use taskboard_domain::{
//!     heading::{Heading, HeadingId, HeadingTitle, NewHeading},
//!     task::TaskId,
//! };
//!
//! let now = chrono::Utc::now();
//! let heading = Heading::new(NewHeading {
//!     id:      HeadingId::new(),
//!     title:   HeadingTitle::new("Groceries")?,
//!     summary: None,
//!     now,
//! });
//! assert!(heading.task_ids().is_empty());
//!
//! let task_id = TaskId::new();
//! let heading = heading.with_task(task_id.clone(), now).with_task(task_id.clone(), now);
//! assert_eq!(heading.task_ids(), &[task_id]);
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};

use crate::task::TaskId;

define_uuid_id! {
    /// 見出しの一意識別子
    pub struct HeadingId {
        label: "heading",
    }
}

define_validated_string! {
    /// 見出しタイトル（値オブジェクト）
    ///
    /// 前後の空白を除去したうえで 1 文字以上。長さの上限は無い。
    pub struct HeadingTitle {
        label: "title",
    }
}

/// 見出しエンティティ
///
/// # 不変条件
///
/// - `title` は空でない
/// - `task_ids` に同じ ID は重複しない
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    id:         HeadingId,
    title:      HeadingTitle,
    summary:    String,
    task_ids:   Vec<TaskId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// 見出しの新規作成パラメータ
pub struct NewHeading {
    pub id:      HeadingId,
    pub title:   HeadingTitle,
    /// 未指定なら空文字列
    pub summary: Option<String>,
    pub now:     DateTime<Utc>,
}

/// 見出しの DB 復元パラメータ
pub struct HeadingRecord {
    pub id:         HeadingId,
    pub title:      HeadingTitle,
    pub summary:    String,
    pub task_ids:   Vec<TaskId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 見出しの部分更新
///
/// `None` のフィールドは変更しない。`task_ids` はクライアントから直接
/// 書き換えられないため含まない。
#[derive(Debug, Clone, Default)]
pub struct HeadingChanges {
    pub title:   Option<HeadingTitle>,
    pub summary: Option<String>,
}

impl Heading {
    /// 新しい見出しを作成する（タスクは空）
    pub fn new(params: NewHeading) -> Self {
        Self {
            id:         params.id,
            title:      params.title,
            summary:    params.summary.unwrap_or_default(),
            task_ids:   Vec::new(),
            created_at: params.now,
            updated_at: params.now,
        }
    }

    /// 既存のデータから復元する
    pub fn from_db(record: HeadingRecord) -> Self {
        Self {
            id:         record.id,
            title:      record.title,
            summary:    record.summary,
            task_ids:   record.task_ids,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    /// 部分更新を適用した見出しを返す
    pub fn apply_changes(self, changes: HeadingChanges, now: DateTime<Utc>) -> Self {
        Self {
            title: changes.title.unwrap_or(self.title),
            summary: changes.summary.unwrap_or(self.summary),
            updated_at: now,
            ..self
        }
    }

    /// タスク ID を末尾に追加した見出しを返す
    ///
    /// 追加済みの ID であれば `updated_at` も含めて変更しない。
    pub fn with_task(mut self, task_id: TaskId, now: DateTime<Utc>) -> Self {
        if !self.contains_task(&task_id) {
            self.task_ids.push(task_id);
            self.updated_at = now;
        }
        self
    }

    /// タスク ID を取り除いた見出しを返す
    pub fn without_task(mut self, task_id: &TaskId, now: DateTime<Utc>) -> Self {
        if self.contains_task(task_id) {
            self.task_ids.retain(|id| id != task_id);
            self.updated_at = now;
        }
        self
    }

    pub fn contains_task(&self, task_id: &TaskId) -> bool {
        self.task_ids.contains(task_id)
    }

    // Getter メソッド

    pub fn id(&self) -> &HeadingId {
        &self.id
    }

    pub fn title(&self) -> &HeadingTitle {
        &self.title
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn task_ids(&self) -> &[TaskId] {
        &self.task_ids
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
