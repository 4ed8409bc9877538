use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::dispatch::Dispatcher;
use crate::error::{Error, Result};
use crate::http::parser::parse_request;
use crate::http::reader::read_message;
use crate::http::request::Request;
use crate::http::writer::ResponseWriter;
use crate::store::Backend;

/// One request/response cycle on an accepted stream.
pub struct Connection<'a, S, B> {
    stream: S,
    dispatcher: &'a Dispatcher<B>,
    max_request_size: usize,
    read_timeout: Duration,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Result<Request>),
    Writing(ResponseWriter),
    Closed,
}

impl<'a, S, B> Connection<'a, S, B>
where
    S: AsyncRead + AsyncWrite + Unpin,
    B: Backend,
{
    pub fn new(
        stream: S,
        dispatcher: &'a Dispatcher<B>,
        max_request_size: usize,
        read_timeout: Duration,
    ) -> Self {
        Self {
            stream,
            dispatcher,
            max_request_size,
            read_timeout,
            state: ConnectionState::Reading,
        }
    }

    /// Drives the connection until it is closed.
    ///
    /// Request errors become a response; only socket failures and a read
    /// timeout are returned, in which case nothing was written.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.state = match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    let read = tokio::time::timeout(
                        self.read_timeout,
                        read_message(&mut self.stream, self.max_request_size),
                    )
                    .await
                    .map_err(|_| {
                        Error::SocketError(std::io::Error::new(
                            std::io::ErrorKind::TimedOut,
                            "timed out reading request",
                        ))
                    })?;

                    match read {
                        Ok(raw) => ConnectionState::Processing(parse_request(&raw)),
                        Err(e) if e.is_recoverable() => ConnectionState::Processing(Err(e)),
                        Err(e) => return Err(e),
                    }
                }

                ConnectionState::Processing(parsed) => {
                    let response = self.dispatcher.dispatch(parsed);
                    tracing::debug!(status = response.status.as_u16(), "Response ready");
                    ConnectionState::Writing(ResponseWriter::new(&response))
                }

                ConnectionState::Writing(mut writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    ConnectionState::Closed
                }

                ConnectionState::Closed => {
                    // Best effort; the peer may already be gone.
                    let _ = self.stream.shutdown().await;
                    break;
                }
            };
        }

        Ok(())
    }
}
