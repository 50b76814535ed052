//! # Taskboard 静的サイトサーバー
//!
//! 環境変数は [`taskboard_static_site::config`] を参照。

use std::net::SocketAddr;

use taskboard_shared::observability::{TracingConfig, init_tracing};
use taskboard_static_site::{app::router, assets::AssetStore, config::StaticSiteConfig};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env("taskboard-static-site");
    init_tracing(&tracing_config);
    let _tracing_guard = tracing::info_span!("app", service = "taskboard-static-site").entered();

    let config = StaticSiteConfig::from_env()?;

    tracing::info!(
        asset_dir = %config.asset_dir.display(),
        "静的サイトサーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    let app = router(AssetStore::new(config.asset_dir));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("静的サイトサーバーが起動しました: http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
