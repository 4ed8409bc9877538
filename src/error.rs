//! Error taxonomy for the request cycle.
//!
//! Reader and parser failures are recovered per connection and turned into a
//! 4xx response. Socket failures abandon the connection. Backend failures are
//! softened by the dispatcher.

use std::fmt;
use std::io;

use crate::store::StoreError;

#[derive(Debug)]
pub enum Error {
    /// The request grew past the configured maximum size.
    RequestTooLarge { limit: usize },
    /// The peer closed the stream before a full request was buffered.
    IncompleteRequest,
    /// The request line has no space-delimited path.
    MalformedRequestLine,
    /// The key-value backend failed to store or fetch.
    BackendError(StoreError),
    /// Accept, read or write failed on the socket.
    SocketError(io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the peer may still be able to receive a response.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::RequestTooLarge { .. } | Error::IncompleteRequest | Error::MalformedRequestLine
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::RequestTooLarge { limit } => {
                write!(f, "request exceeds the maximum size of {} bytes", limit)
            }
            Error::IncompleteRequest => write!(f, "connection closed before the request was complete"),
            Error::MalformedRequestLine => write!(f, "malformed request line"),
            Error::BackendError(e) => write!(f, "backend error: {}", e),
            Error::SocketError(e) => write!(f, "socket error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::BackendError(e) => Some(e),
            Error::SocketError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::SocketError(e)
    }
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        Error::BackendError(e)
    }
}
