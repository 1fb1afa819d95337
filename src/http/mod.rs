//! HTTP/1.1 wire handling.
//!
//! Just enough of the protocol to serve one request per connection:
//!
//! - **`connection`**: per-connection state machine
//! - **`parser`**: frames a request out of the bytes read so far
//! - **`request`**: parsed request representation
//! - **`response`**: status codes and the response builder
//! - **`writer`**: serializes a response onto the socket
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← read 1 KiB chunks until a request is framed
//!        └──────┬──────┘
//!               │ request parsed           (malformed → 400 → Writing)
//!               ▼
//!        ┌──────────────────┐
//!        │   Dispatching    │ ← route and run the handler
//!        └──────┬───────────┘
//!               │ response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← send response
//!        └──────┬───────────┘
//!               ▼
//!            Closed            (also reached directly on any I/O error)
//! ```
//!
//! There is no keep-alive: every connection carries a single exchange.

pub mod connection;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;

/// Protocol version used on every status line.
pub const HTTP_VERSION: &str = "HTTP/1.1";
