//! # ドメイン層エラー定義
//!
//! ビジネスルール違反やドメイン固有の例外状態を表現するエラー型。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | 入力値の検証失敗 |
//! | `NotFound` | 404 Not Found | 参照先エンティティが存在しない |
//!
//! ## 使用例
//!
//! ```rust
//! use taskboard_domain::DomainError;
//!
//! fn validate_title(title: &str) -> Result<(), DomainError> {
//!     if title.is_empty() {
//!         return Err(DomainError::Validation("title is required".to_string()));
//!     }
//!     Ok(())
//! }
//!
//! let error = DomainError::NotFound {
//!     entity_type: "Heading",
//!     id:          "0190aaaa-0000-7000-8000-000000000000".to_string(),
//! };
//! assert_eq!(error.to_string(), "Heading not found: 0190aaaa-0000-7000-8000-000000000000");
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
///
/// API 層でこのエラーを受け取り、レスポンスエンベロープに変換する。
#[derive(Debug, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// - 必須フィールド（`title`）が未入力
    /// - 列挙値（`priority`）が範囲外
    /// - ID や日付の形式が不正
    #[error("{0}")]
    Validation(String),

    /// エンティティが見つからない
    ///
    /// `entity_type` にはエンティティの種類（"Heading", "Task"）を指定する。
    #[error("{entity_type} not found: {id}")]
    NotFound {
        /// エンティティの種類
        entity_type: &'static str,
        /// 検索に使用した識別子
        id:          String,
    },
}
