//! # API レスポンスエンベロープ
//!
//! CRUD API の統一レスポンス形式を提供する。
//!
//! ```json
//! { "success": true,  "data": { ... } }
//! { "success": true,  "message": "Heading and its tasks deleted" }
//! { "success": false, "message": "Heading not found" }
//! { "success": false, "error": "データベースエラー: ..." }
//! ```
//!
//! 値が無いフィールドはシリアライズしない。

use serde::{Deserialize, Serialize};

/// 公開 API の統一レスポンス型
///
/// ## 使用例
///
/// ```
/// use taskboard_shared::ApiResponse;
///
/// let response = ApiResponse::ok("hello");
/// assert!(response.success);
/// assert_eq!(response.data, Some("hello"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data:    Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error:   Option<String>,
}

impl<T> ApiResponse<T> {
    /// データ付きの成功レスポンス
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data:    Some(data),
            message: None,
            error:   None,
        }
    }

    /// データとメッセージ付きの成功レスポンス
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::ok(data)
        }
    }
}

impl ApiResponse<()> {
    /// メッセージのみの成功レスポンス（削除完了など）
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data:    None,
            message: Some(message.into()),
            error:   None,
        }
    }

    /// 参照先が見つからない・入力が不正など、利用者向けメッセージ付きの失敗レスポンス
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data:    None,
            message: Some(message.into()),
            error:   None,
        }
    }

    /// 内部エラーの失敗レスポンス（下位層のメッセージをそのまま載せる）
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data:    None,
            message: None,
            error:   Some(error.into()),
        }
    }
}
