//! Client for a running server.
//!
//! Every call opens a fresh connection, sends one request, reads the
//! Content-Length framed response and lets the server close the connection.

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::http::parser::{HEADER_TERMINATOR, find_headers_end};
use crate::http::reader::read_message;
use crate::http::request::{Method, Request, RequestBuilder};
use crate::http::response::{Response, ResponseBuilder, StatusCode};

/// Path the key-value resource lives under
pub const DATA_PATH: &str = "/ibeacons/data";

/// Largest response the client will buffer
const MAX_RESPONSE_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct Client {
    addr: String,
}

impl Client {
    /// `addr` is a `host:port` pair.
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    /// Builds a client from a base URL such as `http://localhost:8080`.
    pub fn from_url(base: &str) -> Result<Self> {
        let url = url::Url::parse(base).context("Invalid server URL")?;

        let host = url.host_str().context("Server URL missing host")?;
        let port = url.port_or_known_default().context("Server URL missing port")?;

        Ok(Self::new(format!("{}:{}", host, port)))
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Lists every stored pair.
    pub async fn get_all(&self) -> Result<Response> {
        self.send(&get_request(format!("{}?all", DATA_PATH))?).await
    }

    /// Fetches the value stored under `key`.
    pub async fn get(&self, key: &str) -> Result<Response> {
        check_token(key, "key")?;
        self.send(&get_request(format!("{}?{}", DATA_PATH, key))?).await
    }

    /// Stores `value` under `key`.
    pub async fn put(&self, key: &str, value: &str) -> Result<Response> {
        check_token(key, "key")?;
        check_token(value, "value")?;

        let request = RequestBuilder::new()
            .method(Method::PUT)
            .path(DATA_PATH)
            .body(format!("val={}&key={}", value, key))
            .build()
            .map_err(anyhow::Error::msg)?;

        self.send(&request).await
    }

    /// Fetches the index page.
    pub async fn index(&self) -> Result<Response> {
        self.send(&get_request("/")?).await
    }

    pub async fn send(&self, request: &Request) -> Result<Response> {
        let mut stream = TcpStream::connect(&self.addr)
            .await
            .with_context(|| format!("Failed to connect to {}", self.addr))?;

        stream.write_all(&request.to_bytes()).await?;
        stream.flush().await?;

        tracing::debug!(
            method = request.method.as_str(),
            path = %request.path,
            "Request sent"
        );

        let raw = read_message(&mut stream, MAX_RESPONSE_SIZE)
            .await
            .context("Failed to read response")?;

        parse_response(&raw)
    }
}

fn get_request(path: impl Into<String>) -> Result<Request> {
    RequestBuilder::new()
        .method(Method::GET)
        .path(path)
        .build()
        .map_err(anyhow::Error::msg)
}

/// Rejects text that would break the request line or the form body.
fn check_token(s: &str, what: &str) -> Result<()> {
    if s.is_empty() {
        anyhow::bail!("{} must not be empty", what);
    }
    if s.chars().any(|c| c.is_whitespace() || c == '&' || c == '=' || c == '?') {
        anyhow::bail!("{} {:?} contains a reserved character", what, s);
    }
    Ok(())
}

/// Parses a complete, framed response.
pub fn parse_response(buf: &[u8]) -> Result<Response> {
    let headers_end = find_headers_end(buf).context("Response has no header terminator")?;
    let head = std::str::from_utf8(&buf[..headers_end]).context("Invalid UTF-8 in response headers")?;

    let mut lines = head.split("\r\n");

    let status_line = lines.next().context("Empty response")?;
    let mut parts = status_line.splitn(3, ' ');
    let _version = parts.next();
    let code: u16 = parts
        .next()
        .context("Status line missing code")?
        .parse()
        .with_context(|| format!("Invalid status line: {}", status_line))?;
    let status = StatusCode::from_u16(code)
        .with_context(|| format!("Unexpected status code {}", code))?;

    let mut builder = ResponseBuilder::new(status);
    for line in lines {
        if let Some((key, value)) = line.split_once(':') {
            builder = builder.header(key.trim(), value.trim());
        }
    }

    Ok(builder
        .body(buf[headers_end + HEADER_TERMINATOR.len()..].to_vec())
        .build())
}
