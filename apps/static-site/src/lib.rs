//! # Taskboard 静的サイトサーバー
//!
//! 固定のパス一覧に一致したリクエストへ、ディスク上の HTML / CSS / 画像を返す。
//! 一致しないパスには 404 ページを返す。
//!
//! ## モジュール構成
//!
//! - [`app`] - ルーター構築
//! - [`assets`] - パスの許可リストとアセット読み込み
//! - [`config`] - アプリケーション設定
//! - [`handler`] - HTTP リクエストハンドラ

pub mod app;
pub mod assets;
pub mod config;
pub mod handler;
