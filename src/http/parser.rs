use crate::error::{Error, Result};
use crate::http::request::{Method, Request};

pub(crate) const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Parses a complete, already framed request.
///
/// The request line is everything up to the first line break. The body is
/// everything after the header terminator; a buffer without a terminator has
/// an empty body. Headers other than `Content-Length` carry no meaning here
/// and are skipped.
pub fn parse_request(buf: &[u8]) -> Result<Request> {
    let line_end = buf
        .iter()
        .position(|&b| b == b'\n')
        .unwrap_or(buf.len());

    let request_line = std::str::from_utf8(&buf[..line_end])
        .map_err(|_| Error::MalformedRequestLine)?
        .trim_end_matches('\r');

    let mut parts = request_line.split_whitespace();

    let method = parts.next().ok_or(Error::MalformedRequestLine)?;
    let path = parts.next().ok_or(Error::MalformedRequestLine)?;
    let version = parts.next().unwrap_or("HTTP/1.0");

    let body = match find_headers_end(buf) {
        Some(end) => buf[end + HEADER_TERMINATOR.len()..].to_vec(),
        None => Vec::new(),
    };

    Ok(Request {
        method: Method::from_token(method),
        path: path.to_string(),
        version: version.to_string(),
        body,
    })
}

/// Offset of the `\r\n\r\n` that ends the header block.
pub fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(HEADER_TERMINATOR.len())
        .position(|w| w == HEADER_TERMINATOR)
}

/// Declared body length in a header block.
///
/// Returns 0 when the header is missing or its value is not a number.
pub fn content_length(head: &[u8]) -> usize {
    String::from_utf8_lossy(head)
        .split("\r\n")
        .skip(1)
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("Content-Length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let req = b"GET / HTTP/1.0\r\nHost: example.com\r\n\r\n";

        let parsed = parse_request(req).unwrap();

        assert_eq!(parsed.method, Method::GET);
        assert_eq!(parsed.path, "/");
        assert!(parsed.body.is_empty());
    }

    #[test]
    fn content_length_ignores_request_line() {
        let head = b"GET /Content-Length:9 HTTP/1.0\r\n\r\n";

        assert_eq!(content_length(head), 0);
    }
}
