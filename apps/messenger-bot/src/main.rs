use anyhow::Result;
use axum::serve;
use gsm_session::shared_memory_store;
use gsm_telemetry::install as init_telemetry;
use messenger_bot::{BotConfig, build_router, build_state, provision_profile, spawn_sweeper};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_telemetry("messenger-bot")?;

    let config = BotConfig::from_env()?;
    let http = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()?;

    if config.provision_profile {
        provision_profile(&config, &http).await;
    }

    let store = shared_memory_store();
    let sweeper = config
        .session_idle_ttl
        .map(|ttl| spawn_sweeper(store.clone(), ttl));

    let router = build_router(build_state(&config, http, store));
    let listener = TcpListener::bind(config.addr).await?;
    info!("messenger-bot listening on {}", config.addr);

    serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }
    Ok(())
}
