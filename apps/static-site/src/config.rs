//! # アプリケーション設定
//!
//! | 変数名 | 必須 | デフォルト | 説明 |
//! |--------|------|------------|------|
//! | `STATIC_HOST` | No | `0.0.0.0` | バインドアドレス |
//! | `STATIC_PORT` | No | `3000` | ポート番号 |
//! | `STATIC_ASSET_DIR` | No | `apps/static-site/public` | アセットを置くディレクトリ |

use std::{env, path::PathBuf};

use thiserror::Error;

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} の値が不正です: {value}")]
    Invalid { name: &'static str, value: String },
}

/// 静的サイトサーバーの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticSiteConfig {
    pub host:      String,
    pub port:      u16,
    pub asset_dir: PathBuf,
}

impl StaticSiteConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込む
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("STATIC_PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "STATIC_PORT",
                value,
            })?,
            None => 3000,
        };

        Ok(Self {
            host: lookup("STATIC_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            asset_dir: lookup("STATIC_ASSET_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("apps/static-site/public")),
        })
    }
}
