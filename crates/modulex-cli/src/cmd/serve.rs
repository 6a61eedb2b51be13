use anyhow::{Context, Result};
use modulex_core::config::Config;
use modulex_server::AppState;

pub fn run(config: Config, host: &str, port: u16) -> Result<()> {
    let state = AppState::from_config(&config)?;
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("{host}:{port}"))
            .await
            .with_context(|| format!("failed to bind {host}:{port}"))?;

        tracing::info!(
            signaling_url = %config.signaling_url,
            root = %config.storage_root.display(),
            "starting modulex"
        );

        // In-flight dispatch runs are abandoned on shutdown.
        tokio::select! {
            res = modulex_server::serve_on(state, listener) => res,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                Ok(())
            }
        }
    })
}
