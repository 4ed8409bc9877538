//! Response serialization.
//!
//! Every response goes out as `HTTP/1.0` with the headers in the order the
//! builder recorded them.

use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::{Error, Result};
use crate::http::response::Response;

const HTTP_VERSION: &[u8] = b"HTTP/1.0";

/// Renders `resp` as wire bytes: status line, headers, blank line, body.
pub fn serialize_response(resp: &Response) -> Bytes {
    let head_len: usize = resp
        .headers
        .iter()
        .map(|(k, v)| k.len() + v.len() + 4)
        .sum();
    let mut buf = BytesMut::with_capacity(32 + head_len + resp.body.len());

    buf.put_slice(HTTP_VERSION);
    buf.put_u8(b' ');
    buf.put_slice(resp.status.as_u16().to_string().as_bytes());
    buf.put_u8(b' ');
    buf.put_slice(resp.status.reason_phrase().as_bytes());
    buf.put_slice(b"\r\n");

    for (name, value) in &resp.headers {
        buf.put_slice(name.as_bytes());
        buf.put_slice(b": ");
        buf.put_slice(value.as_bytes());
        buf.put_slice(b"\r\n");
    }

    buf.put_slice(b"\r\n");
    buf.put_slice(&resp.body);

    buf.freeze()
}

/// Pending output for one response.
///
/// The buffer is consumed as the stream accepts bytes, so a short write
/// resumes where it stopped.
pub struct ResponseWriter {
    pending: Bytes,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            pending: serialize_response(response),
        }
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while !self.pending.is_empty() {
            if stream.write_buf(&mut self.pending).await? == 0 {
                return Err(Error::SocketError(std::io::Error::new(
                    std::io::ErrorKind::WriteZero,
                    "peer stopped accepting the response",
                )));
            }
        }

        stream.flush().await?;
        Ok(())
    }
}
