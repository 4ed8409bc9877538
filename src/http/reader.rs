//! Content-Length framing.
//!
//! Requests and responses share the same framing, so the client reads
//! responses with the same function the server reads requests with.

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{Error, Result};
use crate::http::parser::{HEADER_TERMINATOR, content_length, find_headers_end};

/// Size of each read from the stream
const CHUNK_SIZE: usize = 1024;

/// Upper bound on a buffered request unless configured otherwise
pub const DEFAULT_MAX_REQUEST_SIZE: usize = 8000;

/// Reads one complete message off `stream`.
///
/// Bytes accumulate until the header terminator shows up. The header block is
/// then scanned for `Content-Length` and reading continues until the headers
/// plus that many body bytes are buffered. Anything the peer sends past that
/// point is dropped.
///
/// Fails with [`Error::RequestTooLarge`] as soon as the buffer, or the total
/// the headers announce, goes over `max_size`, and with
/// [`Error::IncompleteRequest`] if the stream ends first.
pub async fn read_message<R>(stream: &mut R, max_size: usize) -> Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = BytesMut::with_capacity(CHUNK_SIZE);
    let mut total_length: Option<usize> = None;

    loop {
        let n = stream.read_buf(&mut buffer).await?;

        if n == 0 {
            tracing::debug!(
                buffered = buffer.len(),
                expected = ?total_length,
                "Stream closed before message was complete"
            );
            return Err(Error::IncompleteRequest);
        }

        if total_length.is_none() {
            if let Some(end) = find_headers_end(&buffer) {
                let header_length = end + HEADER_TERMINATOR.len();
                let declared = content_length(&buffer[..header_length]);

                let total = match header_length.checked_add(declared) {
                    Some(total) if total <= max_size => total,
                    _ => {
                        tracing::debug!(declared, limit = max_size, "Declared length over limit");
                        return Err(Error::RequestTooLarge { limit: max_size });
                    }
                };

                total_length = Some(total);
            }
        }

        if let Some(total) = total_length {
            if buffer.len() >= total {
                buffer.truncate(total);
                return Ok(buffer.to_vec());
            }
        }

        if buffer.len() > max_size {
            return Err(Error::RequestTooLarge { limit: max_size });
        }

        buffer.reserve(CHUNK_SIZE);
    }
}
