//! minihttp - a minimal HTTP/1.1 server
//!
//! Hand-rolled request parsing, a fixed route table (echo, user-agent,
//! file download and upload) and one task per connection.

pub mod config;
pub mod handler;
pub mod http;
pub mod server;
