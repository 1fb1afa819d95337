use minihttp::config::Config;
use minihttp::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    if let Some(dir) = &cfg.directory {
        tracing::info!("Serving files from {}", dir.display());
    }

    server::run(cfg).await
}
