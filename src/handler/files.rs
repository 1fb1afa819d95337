//! `/files/` downloads and uploads.
//!
//! Every read failure is answered with 404 and every write failure with 500;
//! the actual cause only shows up in the logs.

use std::io;
use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use tokio::io::AsyncWriteExt;

use crate::config::Config;
use crate::http::response::Response;

/// Permission bits for uploaded files.
#[cfg(unix)]
const UPLOAD_MODE: u32 = 0o644;

/// Joins `name` onto `base`, refusing anything that could escape it.
pub fn resolve(base: &Path, name: &str) -> Option<PathBuf> {
    let rel = Path::new(name);

    if name.is_empty()
        || !rel
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return None;
    }

    Some(base.join(rel))
}

fn target(cfg: &Config, name: &str) -> Option<PathBuf> {
    let Some(base) = cfg.directory.as_deref() else {
        tracing::warn!(file = name, "no directory configured for file requests");
        return None;
    };

    let path = resolve(base, name);
    if path.is_none() {
        tracing::warn!(file = name, "rejected file name");
    }
    path
}

pub async fn download(cfg: &Config, name: &str) -> Response {
    let Some(path) = target(cfg, name) else {
        return Response::not_found();
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            tracing::debug!(path = %path.display(), size = bytes.len(), "serving file");
            Response::octet_stream(bytes)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "file not found");
            Response::not_found()
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read file");
            Response::not_found()
        }
    }
}

pub async fn upload(cfg: &Config, name: &str, body: &[u8]) -> Response {
    let Some(path) = target(cfg, name) else {
        return Response::internal_error();
    };

    match write_file(&path, body).await {
        Ok(()) => {
            tracing::debug!(path = %path.display(), size = body.len(), "stored upload");
            Response::created()
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to store upload");
            Response::internal_error()
        }
    }
}

async fn write_file(path: &Path, body: &[u8]) -> anyhow::Result<()> {
    let mut opts = tokio::fs::OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    opts.mode(UPLOAD_MODE);

    let mut file = opts
        .open(path)
        .await
        .with_context(|| format!("opening {}", path.display()))?;
    file.write_all(body).await?;
    file.flush().await?;
    Ok(())
}
