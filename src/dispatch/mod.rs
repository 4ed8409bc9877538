//! Request dispatch state machine.
//!
//! Every request runs through the same small machine and always ends in
//! `Exit` carrying the response to write:
//!
//! ```text
//!                 ┌───────────┐
//!                 │  Process  │ ← inspect method / parse outcome
//!                 └─────┬─────┘
//!        ┌──────────────┼──────────────┐
//!        ▼              ▼              ▼
//!   ┌─────────┐    ┌─────────┐    ┌───────────┐
//!   │   Get   │    │   Put   │    │  Invalid  │
//!   └────┬────┘    └────┬────┘    └─────┬─────┘
//!        └──────────────┼───────────────┘
//!                       ▼
//!                 ┌───────────┐
//!                 │   Exit    │ → response, connection closes
//!                 └───────────┘
//! ```

pub mod form;

use crate::error::{Error, Result};
use crate::http::request::{Method, Request};
use crate::http::response::Response;
use crate::store::Backend;

/// Body served for the index paths
pub const GREETING: &str = "Beacon Server\n";

/// Body served for a GET on a key that is not stored
pub const NOT_FOUND_BODY: &str = "Not found";

/// Body served after a successful PUT
pub const PUT_COMPLETE: &str = "PUT Complete\n";

/// States of the dispatch machine.
#[derive(Debug)]
pub enum State {
    Process(Result<Request>),
    Get(Request),
    Put(Request),
    Invalid,
    Exit(Response),
}

/// Where a GET path is routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GetRoute<'a> {
    /// The path mentions `all`: list every pair
    All,
    /// The path has a `?`: look up the key after it
    Key(&'a str),
    /// `/`, `/index` or `/index.html`
    Index,
    NotFound,
}

/// Classifies a GET path.
///
/// The checks run in a fixed order: `all` anywhere in the path wins over a
/// `?` key, which wins over the static index paths. `/data?all` is therefore
/// a listing, not a lookup of the key `all`.
pub fn route_get(path: &str) -> GetRoute<'_> {
    if path.contains("all") {
        GetRoute::All
    } else if let Some((_, query)) = path.split_once('?') {
        let key = query.split(' ').next().unwrap_or_default();
        GetRoute::Key(key)
    } else if matches!(path, "/" | "/index" | "/index.html") {
        GetRoute::Index
    } else {
        GetRoute::NotFound
    }
}

/// Maps a failure that happened before dispatch to its response.
///
/// Reader and parser errors get a 4xx. Socket and backend errors handed in
/// by an embedder get a 500.
pub fn error_response(err: &Error) -> Response {
    match err {
        Error::RequestTooLarge { .. } => Response::payload_too_large(),
        Error::BackendError(_) | Error::SocketError(_) => Response::internal_error(),
        Error::IncompleteRequest | Error::MalformedRequestLine => Response::bad_request(),
    }
}

pub struct Dispatcher<B> {
    backend: B,
}

impl<B: Backend> Dispatcher<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Runs the machine from `Process` to `Exit`.
    ///
    /// `parsed` is the outcome of reading and parsing. Failures never escape:
    /// reader and parser errors come back as a 4xx response, anything else as
    /// a 500.
    pub fn dispatch(&self, parsed: Result<Request>) -> Response {
        let mut state = State::Process(parsed);

        loop {
            state = match state {
                State::Process(parsed) => self.process(parsed),
                State::Get(req) => State::Exit(self.get(&req)),
                State::Put(req) => State::Exit(self.put(&req)),
                State::Invalid => State::Exit(Response::bad_request()),
                State::Exit(response) => return response,
            };
        }
    }

    fn process(&self, parsed: Result<Request>) -> State {
        match parsed {
            Ok(req) => {
                tracing::debug!(method = req.method.as_str(), path = %req.path, "Processing request");
                match req.method {
                    Method::GET => State::Get(req),
                    Method::PUT => State::Put(req),
                    Method::Unsupported(_) => State::Invalid,
                }
            }
            Err(e) if e.is_recoverable() => {
                tracing::debug!(error = %e, "Request could not be parsed");
                State::Exit(error_response(&e))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Request failed before dispatch");
                State::Exit(error_response(&e))
            }
        }
    }

    fn get(&self, req: &Request) -> Response {
        match route_get(&req.path) {
            GetRoute::All => match self.backend.fetch_all() {
                Ok(pairs) => {
                    let listing = pairs
                        .iter()
                        .map(|(k, v)| format!("{}:{}", k, v))
                        .collect::<Vec<_>>()
                        .join("\n");
                    Response::ok(listing)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Fetch-all failed");
                    Response::ok(Vec::new())
                }
            },
            GetRoute::Key(key) => match self.backend.fetch(key) {
                Ok(Some(value)) => Response::ok(value),
                Ok(None) => Response::ok(NOT_FOUND_BODY),
                Err(e) => {
                    tracing::warn!(key, error = %e, "Fetch failed");
                    Response::ok(NOT_FOUND_BODY)
                }
            },
            GetRoute::Index => Response::ok(GREETING),
            GetRoute::NotFound => Response::not_found(),
        }
    }

    fn put(&self, req: &Request) -> Response {
        let Some(body) = req.body_str() else {
            return Response::bad_request();
        };

        if !body.contains('=') {
            return Response::bad_request();
        }

        let Some((key, value)) = form::key_value(body) else {
            tracing::debug!(body, "PUT body carries no key");
            return Response::bad_request();
        };

        match self.backend.store(key, value) {
            Ok(()) => {
                tracing::debug!(key, value, "Stored");
                Response::ok(PUT_COMPLETE)
            }
            Err(e) => {
                tracing::error!(key, error = %e, "Store failed");
                Response::internal_error()
            }
        }
    }
}
