use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hexvm_httpd::{app, Args};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if !args.www.is_dir() {
        warn!(
            www = %args.www.display(),
            "static asset directory missing; only control endpoints will answer"
        );
    }

    let app = app(&args);
    let listener = TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("failed to bind {}", args.listen))?;

    info!(
        addr = %args.listen,
        mode = ?args.load_mode,
        dump_capacity = args.dump_capacity,
        "hexvmd listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("hexvmd shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "could not listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
