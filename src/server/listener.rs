use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tracing::{Instrument, info};

use crate::config::Config;
use crate::http::connection::{self, Connection};

/// Pause after a failed accept so persistent errors (e.g. EMFILE) do not spin.
pub const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Binds the listening socket. Failure here is fatal for the process.
pub async fn bind(cfg: &Config) -> anyhow::Result<TcpListener> {
    TcpListener::bind(&cfg.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.listen_addr))
}

/// Binds and serves until Ctrl-C.
pub async fn run(cfg: Config) -> anyhow::Result<()> {
    let listener = bind(&cfg).await?;
    serve(listener, Arc::new(cfg), async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
    })
    .await
}

/// Accepts connections until `shutdown` resolves, spawning one task per
/// connection.
///
/// On shutdown the listener is closed and in-flight connections get
/// `shutdown_grace` to finish before they are aborted.
pub async fn serve<F>(listener: TcpListener, cfg: Arc<Config>, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()>,
{
    info!("Listening on {}", listener.local_addr()?);

    let mut tasks = JoinSet::new();
    tokio::pin!(shutdown);

    loop {
        // Reap finished connections so the set does not grow unbounded.
        while tasks.try_join_next().is_some() {}

        let (socket, peer) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    accept_failed(&e).await;
                    continue;
                }
            },
            _ = &mut shutdown => break,
        };
        info!("Accepted connection from {}", peer);

        let cfg = Arc::clone(&cfg);
        let span = tracing::info_span!("conn", %peer);
        tasks.spawn(
            async move {
                let mut conn = Connection::new(socket, cfg);
                if let Err(e) = conn.run().await {
                    if connection::is_timeout(&e) {
                        tracing::warn!("Connection from {} timed out: {:#}", peer, e);
                    } else {
                        tracing::error!("Connection error from {}: {:#}", peer, e);
                    }
                }
            }
            .instrument(span),
        );
    }

    drop(listener);
    drain(tasks, &cfg).await;
    Ok(())
}

async fn accept_failed(e: &io::Error) {
    tracing::error!(error = %e, "failed to accept connection");
    tokio::time::sleep(ACCEPT_BACKOFF).await;
}

async fn drain(mut tasks: JoinSet<()>, cfg: &Config) {
    if tasks.is_empty() {
        return;
    }

    info!(in_flight = tasks.len(), "waiting for open connections");
    let finished = tokio::time::timeout(cfg.shutdown_grace, async {
        while tasks.join_next().await.is_some() {}
    })
    .await;

    if finished.is_err() {
        tracing::warn!(aborted = tasks.len(), "grace period elapsed, aborting connections");
        tasks.shutdown().await;
    }
}
