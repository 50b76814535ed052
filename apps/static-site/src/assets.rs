//! # アセット解決
//!
//! リクエストパスを固定の許可リストと完全一致で照合し、配信するファイルと
//! Content-Type を決める。ディレクトリ走査やパスからのファイル名組み立ては行わない。
//!
//! | パス | ファイル | Content-Type |
//! |------|----------|--------------|
//! | `/` | `home.html` | `text/html` |
//! | `/about` | `about.html` | `text/html` |
//! | `/contact` | `contact.html` | `text/html` |
//! | `/styles.css` | `styles.css` | `text/css` |
//! | `/not-found.jpeg` | `not-found.jpeg` | `image/jpeg` |
//! | それ以外 | `not_found.html` | `text/html`（404） |
//!
//! 例外として `/health` はアセットではなくヘルスチェックハンドラが応答する
//! （[`crate::app::router`] でアセット配信より先にルーティングされる）。
//!
//! 許可リストのファイルが読めない場合も 404 ページに切り替える。
//! 404 ページ自体が読めない場合はインラインの HTML を返す。

use std::path::{Path, PathBuf};

use axum::http::StatusCode;

const TEXT_HTML: &str = "text/html";
const TEXT_CSS: &str = "text/css";
const IMAGE_JPEG: &str = "image/jpeg";

/// 404 ページファイルも読めないときの本文
pub const INLINE_NOT_FOUND: &str = "<h1>404 - Page Not Found</h1>";

/// 配信対象のファイルと Content-Type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Asset {
    pub file:         &'static str,
    pub content_type: &'static str,
}

/// 404 ページ
pub const NOT_FOUND_PAGE: Asset = Asset {
    file:         "not_found.html",
    content_type: TEXT_HTML,
};

/// パスに対応するアセットを返す（許可リストに無ければ `None`）
pub fn resolve(path: &str) -> Option<Asset> {
    let (file, content_type) = match path {
        "/" => ("home.html", TEXT_HTML),
        "/about" => ("about.html", TEXT_HTML),
        "/contact" => ("contact.html", TEXT_HTML),
        "/styles.css" => ("styles.css", TEXT_CSS),
        "/not-found.jpeg" => ("not-found.jpeg", IMAGE_JPEG),
        _ => return None,
    };
    Some(Asset { file, content_type })
}

/// 配信結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServedAsset {
    pub status:       StatusCode,
    pub content_type: &'static str,
    pub body:         Vec<u8>,
    /// 実際に読んだファイル（インライン本文なら `None`）
    pub file:         Option<&'static str>,
}

/// アセットディレクトリからの読み込み
#[derive(Debug, Clone)]
pub struct AssetStore {
    dir: PathBuf,
}

impl AssetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// リクエストパスに対する応答を組み立てる
    ///
    /// 失敗しない。読み込みエラーは警告ログに残して 404 ページに切り替える。
    pub async fn serve(&self, path: &str) -> ServedAsset {
        if let Some(asset) = resolve(path) {
            match self.read(asset).await {
                Ok(body) => {
                    return ServedAsset {
                        status: StatusCode::OK,
                        content_type: asset.content_type,
                        body,
                        file: Some(asset.file),
                    };
                }
                Err(e) => {
                    tracing::warn!(file = asset.file, error = %e, "アセットを読み込めません");
                }
            }
        }

        self.not_found().await
    }

    async fn not_found(&self) -> ServedAsset {
        let (body, file) = match self.read(NOT_FOUND_PAGE).await {
            Ok(body) => (body, Some(NOT_FOUND_PAGE.file)),
            Err(e) => {
                tracing::warn!(file = NOT_FOUND_PAGE.file, error = %e, "404 ページを読み込めません");
                (INLINE_NOT_FOUND.as_bytes().to_vec(), None)
            }
        };

        ServedAsset {
            status: StatusCode::NOT_FOUND,
            content_type: NOT_FOUND_PAGE.content_type,
            body,
            file,
        }
    }

    async fn read(&self, asset: Asset) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(self.dir.join(asset.file)).await
    }
}
