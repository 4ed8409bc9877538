/// Request methods understood by the server.
///
/// Only GET and PUT are routed to handlers. Any other token is kept verbatim
/// in `Unsupported` so it can be logged before the request is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Read one value, all values, or the index page
    GET,
    /// PUT - Store a key/value pair carried in the body
    PUT,
    /// Any other method token
    Unsupported(String),
}

/// A parsed request, fully buffered before it was built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The request method
    pub method: Method,
    /// The request path, including any `?` suffix (e.g. "/ibeacons/data?foo")
    pub path: String,
    /// Protocol version from the request line (informational only)
    pub version: String,
    /// Everything after the header terminator
    pub body: Vec<u8>,
}

/// Builder for constructing Request objects.
pub struct RequestBuilder {
    method: Option<Method>,
    path: Option<String>,
    version: Option<String>,
    body: Vec<u8>,
}

impl Method {
    /// Maps a method token onto the enum.
    ///
    /// Matching is case-sensitive, as on the wire.
    ///
    /// # Example
    ///
    /// ```
    /// # use beacon::http::request::Method;
    /// assert_eq!(Method::from_token("GET"), Method::GET);
    /// assert_eq!(Method::from_token("get"), Method::Unsupported("get".to_string()));
    /// ```
    pub fn from_token(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "PUT" => Method::PUT,
            other => Method::Unsupported(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::PUT => "PUT",
            Method::Unsupported(token) => token,
        }
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            path: None,
            version: None,
            body: Vec::new(),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        Ok(Request {
            method: self.method.ok_or("method missing")?,
            path: self.path.ok_or("path missing")?,
            version: self.version.unwrap_or_else(|| "HTTP/1.0".to_string()),
            body: self.body,
        })
    }
}

impl Request {
    /// The body as text, if it is valid UTF-8.
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Serializes the request for the wire, adding `Content-Length` when a
    /// body is present.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = format!("{} {} {}\r\n", self.method.as_str(), self.path, self.version)
            .into_bytes();

        if !self.body.is_empty() {
            buf.extend_from_slice(format!("Content-Length: {}\r\n", self.body.len()).as_bytes());
        }

        buf.extend_from_slice(b"\r\n");
        buf.extend_from_slice(&self.body);
        buf
    }
}
