//! 見出し・タスク API 統合テスト
//!
//! ルーター全体を通して、見出しの `tasks` 配列とタスクの `heading` の
//! 双方向参照が複数操作を横断して揃っていることを検証する。
//!
//! ## テストケース
//!
//! - 見出し作成 → タスク作成 → 見出し取得 → 見出し削除 → タスク取得で 404
//! - 存在しない見出しへのタスク作成は 404 でタスクが作られない
//! - 存在しない見出しの削除は 404
//! - 見出し削除後に所属タスクが残らない
//! - 一覧はタスク側の `heading` を正とし、`tasks` 配列の状態に左右されない
//! - カスケード途中の失敗で、タスクが存在しない見出しを指す状態にならない

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use chrono::{DateTime, Utc};
use pretty_assertions::assert_eq;
use serde_json::{Value as JsonValue, json};
use taskboard_api::app::router;
use taskboard_domain::{clock::FixedClock, heading::HeadingId, task::TaskId};
use taskboard_infra::mock::{MockHeadingRepository, MockTaskRepository};
use tower::ServiceExt;

// --- テストヘルパー ---

fn fixed_now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

struct TestApp {
    app:      Router,
    headings: MockHeadingRepository,
    tasks:    MockTaskRepository,
}

/// テスト用アプリケーションを構築する
fn create_test_app() -> TestApp {
    let headings = MockHeadingRepository::new();
    let tasks = MockTaskRepository::new();
    let app = router(
        Arc::new(headings.clone()),
        Arc::new(tasks.clone()),
        Arc::new(FixedClock::new(fixed_now())),
    );
    TestApp {
        app,
        headings,
        tasks,
    }
}

/// レスポンスのステータスとボディ（JSON）を返す
async fn send(app: &Router, method: Method, uri: &str, body: Option<JsonValue>) -> (StatusCode, JsonValue) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn create_heading(app: &Router, title: &str) -> JsonValue {
    let (status, body) = send(app, Method::POST, "/api/headings", Some(json!({ "title": title }))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"].clone()
}

async fn create_task(app: &Router, heading_id: &str, title: &str) -> JsonValue {
    let (status, body) = send(
        app,
        Method::POST,
        &format!("/api/headings/{heading_id}/tasks"),
        Some(json!({ "title": title })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"].clone()
}

fn id_of(value: &JsonValue) -> String {
    value["id"].as_str().unwrap().to_string()
}

/// どのタスクも存在する見出しを指していること
fn assert_no_orphaned_tasks(sut: &TestApp) {
    for task in sut.tasks.tasks() {
        assert!(
            sut.headings.get(task.heading_id()).is_some(),
            "task {} points at missing heading {}",
            task.id(),
            task.heading_id()
        );
    }
}

// --- テストケース ---

#[tokio::test]
async fn test_見出しとタスクのライフサイクル() {
    let sut = create_test_app();

    // 見出し作成: tasks は空
    let heading = create_heading(&sut.app, "Groceries").await;
    let heading_id = id_of(&heading);
    assert_eq!(heading["tasks"], json!([]));

    // タスク作成: heading は見出しの ID
    let task = create_task(&sut.app, &heading_id, "Milk").await;
    let task_id = id_of(&task);
    assert_eq!(task["heading"], json!(heading_id));

    // 見出し取得: tasks にタスクが 1 件
    let (status, body) = send(&sut.app, Method::GET, &format!("/api/headings/{heading_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let tasks = body["data"]["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], json!(task_id));

    // 見出し削除
    let (status, body) = send(&sut.app, Method::DELETE, &format!("/api/headings/{heading_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": true, "message": "Heading and its tasks deleted" })
    );

    // タスク取得: 404
    let (status, body) = send(&sut.app, Method::GET, &format!("/api/tasks/{task_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "success": false, "message": "Task not found" }));
}

#[tokio::test]
async fn test_存在しない見出しへのタスク作成は404でタスクが作られない() {
    let sut = create_test_app();

    let (status, body) = send(
        &sut.app,
        Method::POST,
        &format!("/api/headings/{}/tasks", HeadingId::new()),
        Some(json!({ "title": "Milk" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "success": false, "message": "Heading not found" }));
    assert!(sut.tasks.tasks().is_empty());
}

#[tokio::test]
async fn test_存在しない見出しの削除は404() {
    let sut = create_test_app();

    let (status, body) = send(
        &sut.app,
        Method::DELETE,
        &format!("/api/headings/{}", HeadingId::new()),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!("Heading not found"));
}

#[tokio::test]
async fn test_長いタイトルの見出しとタスクを作成できる() {
    let sut = create_test_app();
    let long_title = "a".repeat(1000);

    let heading = create_heading(&sut.app, &long_title).await;
    let task = create_task(&sut.app, &id_of(&heading), &long_title).await;

    assert_eq!(heading["title"], json!(long_title));
    assert_eq!(task["title"], json!(long_title));
}

#[tokio::test]
async fn test_同じ見出しに作ったタスクは配列に一度ずつ載る() {
    let sut = create_test_app();
    let heading_id = id_of(&create_heading(&sut.app, "Groceries").await);

    let milk = id_of(&create_task(&sut.app, &heading_id, "Milk").await);
    let eggs = id_of(&create_task(&sut.app, &heading_id, "Eggs").await);

    let (_, body) = send(&sut.app, Method::GET, "/api/headings", None).await;
    assert_eq!(body["data"][0]["tasks"], json!([milk, eggs]));
}

#[tokio::test]
async fn test_見出しを削除すると所属タスクが残らず他の見出しは影響を受けない() {
    let sut = create_test_app();
    let groceries = id_of(&create_heading(&sut.app, "Groceries").await);
    let errands = id_of(&create_heading(&sut.app, "Errands").await);
    create_task(&sut.app, &groceries, "Milk").await;
    create_task(&sut.app, &groceries, "Eggs").await;
    let post = id_of(&create_task(&sut.app, &errands, "Post office").await);

    let (status, _) = send(&sut.app, Method::DELETE, &format!("/api/headings/{groceries}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, listed) = send(&sut.app, Method::GET, &format!("/api/headings/{groceries}/tasks"), None).await;
    assert_eq!(listed["data"], json!([]));
    let (status, _) = send(&sut.app, Method::GET, &format!("/api/headings/{groceries}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let remaining: Vec<String> = sut.tasks.tasks().iter().map(|t| t.id().to_string()).collect();
    assert_eq!(remaining, vec![post]);
}

#[tokio::test]
async fn test_タスクを削除すると元の見出しの配列から消える() {
    let sut = create_test_app();
    let heading_id = id_of(&create_heading(&sut.app, "Groceries").await);
    let milk = id_of(&create_task(&sut.app, &heading_id, "Milk").await);
    let eggs = id_of(&create_task(&sut.app, &heading_id, "Eggs").await);

    let (status, body) = send(&sut.app, Method::DELETE, &format!("/api/tasks/{milk}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "message": "Task deleted" }));

    let (status, _) = send(&sut.app, Method::GET, &format!("/api/tasks/{milk}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, heading) = send(&sut.app, Method::GET, &format!("/api/headings/{heading_id}"), None).await;
    let listed: Vec<&JsonValue> = heading["data"]["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| &t["id"])
        .collect();
    assert_eq!(listed, vec![&json!(eggs)]);
}

#[tokio::test]
async fn test_一覧はタスク側の参照を正とし配列の欠落に左右されない() {
    // Given: 見出しへの追加に失敗し、配列に載っていないタスクがある
    let sut = create_test_app();
    let heading_id = id_of(&create_heading(&sut.app, "Groceries").await);
    let milk = id_of(&create_task(&sut.app, &heading_id, "Milk").await);
    sut.headings.fail_next("push_task");
    let (status, _) = send(
        &sut.app,
        Method::POST,
        &format!("/api/headings/{heading_id}/tasks"),
        Some(json!({ "title": "Eggs" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    // When
    let (status, body) = send(&sut.app, Method::GET, &format!("/api/headings/{heading_id}/tasks"), None).await;

    // Then: 配列には 1 件、一覧には 2 件
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Milk", "Eggs"]);
    let stored = sut.headings.get(&HeadingId::parse(&heading_id).unwrap()).unwrap();
    assert_eq!(stored.task_ids(), &[TaskId::parse(&milk).unwrap()]);
}

#[tokio::test]
async fn test_タスク作成の途中失敗は500と生のエラーを返し孤立タスクを作らない() {
    let sut = create_test_app();
    let heading_id = id_of(&create_heading(&sut.app, "Groceries").await);
    sut.headings.fail_next("push_task");

    let (status, body) = send(
        &sut.app,
        Method::POST,
        &format!("/api/headings/{heading_id}/tasks"),
        Some(json!({ "title": "Milk" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "success": false, "error": "unexpected error: injected failure: push_task" })
    );
    assert_no_orphaned_tasks(&sut);
}

#[tokio::test]
async fn test_見出し削除の途中失敗で見出しは残り孤立タスクを作らない() {
    let sut = create_test_app();
    let heading_id = id_of(&create_heading(&sut.app, "Groceries").await);
    create_task(&sut.app, &heading_id, "Milk").await;
    sut.headings.fail_next("delete");

    let (status, _) = send(&sut.app, Method::DELETE, &format!("/api/headings/{heading_id}"), None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(sut.tasks.tasks().is_empty());
    assert!(sut.headings.get(&HeadingId::parse(&heading_id).unwrap()).is_some());
    assert_no_orphaned_tasks(&sut);
}

#[tokio::test]
async fn test_タスク一括削除の失敗で見出しもタスクも残る() {
    let sut = create_test_app();
    let heading_id = id_of(&create_heading(&sut.app, "Groceries").await);
    create_task(&sut.app, &heading_id, "Milk").await;
    sut.tasks.fail_next("delete_by_heading");

    let (status, _) = send(&sut.app, Method::DELETE, &format!("/api/headings/{heading_id}"), None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(sut.tasks.tasks().len(), 1);
    assert_eq!(sut.headings.headings().len(), 1);
    assert_no_orphaned_tasks(&sut);
}

#[tokio::test]
async fn test_存在しない見出しへの付け替えは404で何も変えない() {
    let sut = create_test_app();
    let heading_id = id_of(&create_heading(&sut.app, "Groceries").await);
    let milk = id_of(&create_task(&sut.app, &heading_id, "Milk").await);

    let (status, body) = send(
        &sut.app,
        Method::PUT,
        &format!("/api/tasks/{milk}"),
        Some(json!({ "heading": HeadingId::new().to_string(), "title": "Oat milk" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!("Heading not found"));
    let (_, task) = send(&sut.app, Method::GET, &format!("/api/tasks/{milk}"), None).await;
    assert_eq!(task["data"]["title"], json!("Milk"));
    assert_eq!(task["data"]["heading"]["id"], json!(heading_id));
}

#[tokio::test]
async fn test_apiルートは固定のメッセージを返す() {
    let sut = create_test_app();

    for uri in ["/api", "/api/"] {
        let (status, body) = send(&sut.app, Method::GET, uri, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "success": true, "data": [], "message": "Get all entitys" })
        );
    }
}

#[tokio::test]
async fn test_ヘルスチェック() {
    let sut = create_test_app();

    let (status, body) = send(&sut.app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("healthy"));
}
