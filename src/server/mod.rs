//! Connection supervisor: accept loop and per-connection tasks.

pub mod listener;

pub use listener::{bind, run, serve};
