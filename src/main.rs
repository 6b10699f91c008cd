// src/main.rs

use axum::serve;
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::time::{timeout, Duration};
use tracing::{error, info};

use adx_endpoints::api;
use adx_endpoints::bidding::CatalogSource;
use adx_endpoints::build_state;
use adx_endpoints::config::{ConfigAdapter, ConfigManager, FileConfigAdapter};
use adx_endpoints::logging::{init_tracing, EventLogger};

#[derive(Parser, Debug)]
#[command(author = "whiteCcinn", version = "1.0", about = "Direct / dynamic / proxy ad delivery endpoints")]
struct CliArgs {
    #[arg(short, long, default_value_t = 8080)]
    port: u16,
    #[arg(long, default_value = "logs")]
    log_dir: String,
    #[arg(long, default_value = "static/server.json")]
    config: String,
    #[arg(long, default_value = "static/catalog.json")]
    catalog: String,
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    // 初始化全局 tracing 日志，guard 需持有到进程结束
    let _guard = init_tracing(&args.log_dir).expect("Unable to set global tracing subscriber");
    info!("ad endpoints starting on port {}", args.port);

    // 读取服务配置和创意库
    let adapter = FileConfigAdapter::new(&args.config, &args.catalog);
    let server_config = adapter.get_server_config().expect("Unable to load server config");
    let catalog = adapter.get_catalog().expect("Unable to load creative catalog");
    info!(
        zones = server_config.zones.len(),
        formats = server_config.formats.len(),
        creatives = catalog.len(),
        "configuration loaded"
    );

    let (events, events_writer) = EventLogger::new(
        &args.log_dir,
        server_config.event_buffer_size,
        server_config.event_batch_size,
        server_config.event_flush_interval_ms,
    );

    let state = build_state(
        ConfigManager::new(server_config),
        Arc::new(CatalogSource::new(catalog)),
        Arc::new(events),
    );
    let app = api::router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = TcpListener::bind(&addr).await.expect("Unable to bind listener");
    info!("ad endpoints running at http://{}", addr);

    if let Err(err) = serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = signal::ctrl_c().await;
            info!("Shutting down gracefully...");
        })
        .await
    {
        error!(error = %err, "server error");
    }

    // 路由释放后事件队列关闭，等待后台写入完成
    if timeout(Duration::from_secs(5), events_writer).await.is_err() {
        error!("event log writer did not finish in time");
    }
    info!("ad endpoints shut down.");
}
