use std::sync::Arc;

use anyhow::Context;
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

use crate::config::Config;
use crate::handler;
use crate::http::parser::{ParseError, parse_http_request};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;

/// Size of a single socket read.
pub const READ_CHUNK: usize = 1024;

/// Whether a connection error was caused by the read deadline expiring.
pub fn is_timeout(err: &anyhow::Error) -> bool {
    err.downcast_ref::<tokio::time::error::Elapsed>().is_some()
}

/// One client connection, served for exactly one request.
pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    state: ConnectionState,
    config: Arc<Config>,
}

pub enum ConnectionState {
    Reading,
    Dispatching(Request),
    Writing(ResponseWriter),
    Closed,
}

/// Result of waiting for a request on the socket.
enum ReadOutcome {
    Request(Request),
    /// The bytes received can never form a valid request.
    Rejected(anyhow::Error),
    /// Peer closed before sending anything.
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, config: Arc<Config>) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            state: ConnectionState::Reading,
            config,
        }
    }

    /// Drives the connection through read, dispatch and write, then closes it.
    ///
    /// Socket failures and read timeouts end the connection early and are
    /// returned to the caller; a request that cannot be parsed is answered
    /// with 400.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);

            self.state = match state {
                ConnectionState::Reading => match self.read_request().await? {
                    ReadOutcome::Request(req) => ConnectionState::Dispatching(req),
                    ReadOutcome::Rejected(e) => {
                        tracing::warn!(error = %e, "rejecting request");
                        ConnectionState::Writing(ResponseWriter::new(&Response::bad_request()))
                    }
                    ReadOutcome::Closed => ConnectionState::Closed,
                },

                ConnectionState::Dispatching(req) => {
                    let response = handler::handle(&req, &self.config).await;
                    tracing::info!(
                        method = req.method.as_str(),
                        path = %req.path,
                        status = response.status.as_u16(),
                        "request handled"
                    );
                    ConnectionState::Writing(ResponseWriter::new(&response))
                }

                ConnectionState::Writing(mut writer) => {
                    writer
                        .write_to_stream(&mut self.stream)
                        .await
                        .context("failed to write response")?;
                    ConnectionState::Closed
                }

                ConnectionState::Closed => break,
            };
        }

        // Best effort; the peer may already be gone.
        let _ = self.stream.shutdown().await;
        Ok(())
    }

    /// Reads until a full request is buffered.
    async fn read_request(&mut self) -> anyhow::Result<ReadOutcome> {
        loop {
            if !self.buffer.is_empty() {
                match parse_http_request(&self.buffer) {
                    Ok((request, _consumed)) => return Ok(ReadOutcome::Request(request)),
                    Err(ParseError::Incomplete) => {}
                    Err(e) => return Ok(ReadOutcome::Rejected(e.into())),
                }
            }

            if self.buffer.len() >= self.config.max_request_bytes {
                return Ok(ReadOutcome::Rejected(anyhow::anyhow!(
                    "request exceeds {} bytes",
                    self.config.max_request_bytes
                )));
            }

            let mut temp = [0u8; READ_CHUNK];
            let n = timeout(self.config.read_timeout, self.stream.read(&mut temp))
                .await
                .context("timed out waiting for request data")??;

            if n == 0 {
                if self.buffer.is_empty() {
                    return Ok(ReadOutcome::Closed);
                }
                return Ok(ReadOutcome::Rejected(ParseError::Incomplete.into()));
            }

            self.buffer.extend_from_slice(&temp[..n]);
        }
    }
}
