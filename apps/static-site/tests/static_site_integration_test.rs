//! 静的サイトサーバー統合テスト
//!
//! 同梱の `public/` ディレクトリを使い、ルーター全体の応答を検証する。

use std::path::{Path, PathBuf};

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use taskboard_static_site::{
    app::router,
    assets::{AssetStore, INLINE_NOT_FOUND},
};
use tower::ServiceExt;

// --- テストヘルパー ---

fn public_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("public")
}

fn create_test_app() -> Router {
    router(AssetStore::new(public_dir()))
}

/// ステータス、Content-Type、本文を返す
async fn get(app: Router, method: Method, uri: &str) -> (StatusCode, String, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();
    (status, content_type, body)
}

// --- テストケース ---

#[rstest]
#[case("/", "home.html", "text/html")]
#[case("/about", "about.html", "text/html")]
#[case("/contact", "contact.html", "text/html")]
#[case("/styles.css", "styles.css", "text/css")]
#[case("/not-found.jpeg", "not-found.jpeg", "image/jpeg")]
#[tokio::test]
async fn test_許可リストのパスはファイルとcontent_typeを返す(
    #[case] path: &str,
    #[case] file: &str,
    #[case] content_type: &str,
) {
    let (status, actual_type, body) = get(create_test_app(), Method::GET, path).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(actual_type, content_type);
    assert_eq!(body, std::fs::read(public_dir().join(file)).unwrap());
}

#[tokio::test]
async fn test_未知のパスは404ページを返す() {
    let (status, content_type, body) = get(create_test_app(), Method::GET, "/unknown-path").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(content_type, "text/html");
    assert_eq!(body, std::fs::read(public_dir().join("not_found.html")).unwrap());
}

#[tokio::test]
async fn test_クエリ文字列はパス照合に含めない() {
    let (status, content_type, _) = get(create_test_app(), Method::GET, "/styles.css?v=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "text/css");
}

#[tokio::test]
async fn test_get以外のメソッドでもパスで応答する() {
    let (status, content_type, _) = get(create_test_app(), Method::POST, "/about").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "text/html");
}

#[tokio::test]
async fn test_アセットディレクトリが無くてもプロセスは落ちずインラインの404を返す() {
    let sut = router(AssetStore::new("/nonexistent/taskboard/public"));

    let (status, content_type, body) = get(sut, Method::GET, "/").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(content_type, "text/html");
    assert_eq!(body, INLINE_NOT_FOUND.as_bytes());
}

#[tokio::test]
async fn test_ヘルスチェック() {
    let (status, content_type, body) = get(create_test_app(), Method::GET, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "application/json");
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "healthy");
}
