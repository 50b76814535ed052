//! テスト共通フィクスチャ
//!
//! DB を使用する統合テストで共通利用するエンティティ生成ヘルパー。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use taskboard_domain::{
    heading::{Heading, HeadingId, HeadingTitle, NewHeading},
    task::{NewTask, Task, TaskId, TaskPriority, TaskTitle},
};

/// テスト用の固定日時
pub fn test_now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

/// 固定日時から `seconds` 秒後
pub fn test_later(seconds: i64) -> DateTime<Utc> {
    test_now() + Duration::seconds(seconds)
}

/// デフォルト値で Heading を作成
pub fn create_test_heading(title: &str) -> Heading {
    Heading::new(NewHeading {
        id:      HeadingId::new(),
        title:   HeadingTitle::new(title).unwrap(),
        summary: Some(format!("{title} summary")),
        now:     test_now(),
    })
}

/// 指定した見出しに属する Task を作成（作成日時は `offset` 秒ずらす）
pub fn create_test_task(heading_id: &HeadingId, title: &str, offset: i64) -> Task {
    Task::new(NewTask {
        id:          TaskId::new(),
        heading_id:  heading_id.clone(),
        title:       TaskTitle::new(title).unwrap(),
        description: None,
        due_date:    None,
        priority:    Some(TaskPriority::Medium),
        now:         test_later(offset),
    })
}
