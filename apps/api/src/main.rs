//! # Taskboard API サーバー
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `API_HOST` | No | バインドアドレス（既定 `0.0.0.0`） |
//! | `API_PORT` | No | ポート番号（既定 `3000`） |
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `DATABASE_MAX_CONNECTIONS` | No | 接続プールの上限 |
//! | `LOG_FORMAT` | No | `json` または `pretty` |
//! | `RUST_LOG` | No | ログレベル |

use std::{net::SocketAddr, sync::Arc};

use taskboard_api::{app::router, config::ApiConfig};
use taskboard_domain::clock::{Clock, SystemClock};
use taskboard_infra::{
    db,
    repository::{
        HeadingRepository,
        PostgresHeadingRepository,
        PostgresTaskRepository,
        TaskRepository,
    },
};
use taskboard_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env("taskboard-api");
    init_tracing(&tracing_config);
    let _tracing_guard = tracing::info_span!("app", service = "taskboard-api").entered();

    let config = ApiConfig::from_env()?;

    tracing::info!(
        "API サーバーを起動します: {}:{}",
        config.server.host,
        config.server.port
    );

    let pool = db::create_pool(&config.database.url, config.database.max_connections).await?;
    tracing::info!("データベースに接続しました");

    db::run_migrations(&pool).await?;
    tracing::info!("マイグレーションを適用しました");

    let heading_repository: Arc<dyn HeadingRepository> =
        Arc::new(PostgresHeadingRepository::new(pool.clone()));
    let task_repository: Arc<dyn TaskRepository> = Arc::new(PostgresTaskRepository::new(pool));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let app = router(heading_repository, task_repository, clock);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("API サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
