//! Beacon - single-connection key-value server
//!
//! Core library: request framing and parsing, the dispatch state machine,
//! key-value backends, the accept loop and a small client.

pub mod cli;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod server;
pub mod store;
