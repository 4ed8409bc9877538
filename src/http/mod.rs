//! HTTP-like wire protocol.
//!
//! Only the subset the key-value server needs: a request line, a
//! `Content-Length` framed body, and a plain-text response. One request per
//! connection, no keep-alive.
//!
//! # Architecture
//!
//! - **`reader`**: Buffers a complete request off the stream, honoring `Content-Length`
//! - **`parser`**: Splits a buffered request into method, path and body
//! - **`request`**: Request representation
//! - **`response`**: Response representation with builder pattern
//! - **`writer`**: Serializes and writes responses to the client
//! - **`connection`**: Per-connection state machine tying the above together
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Buffer one full request (or fail)
//!        └──────┬──────┘
//!               │ Request or recoverable error
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Dispatcher produces a response
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ▼
//!        ┌──────────────────┐
//!        │     Closed       │
//!        └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use beacon::dispatch::Dispatcher;
//! use beacon::http::connection::Connection;
//! use beacon::store::MemoryStore;
//!
//! let dispatcher = Dispatcher::new(MemoryStore::new());
//! let (socket, _addr) = listener.accept().await?;
//! let mut conn = Connection::new(socket, &dispatcher, 8000, Duration::from_secs(30));
//! conn.run().await?;
//! ```

pub mod connection;
pub mod parser;
pub mod reader;
pub mod request;
pub mod response;
pub mod writer;
