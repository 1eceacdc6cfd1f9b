use bytes::Bytes;

/// Version written on every status line.
pub const HTTP_VERSION: &str = "HTTP/1.0";

/// Content type used when a file declares none, and for error responses.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// HTTP status codes the server produces.
///
/// - `Ok` (200): file found and read
/// - `NotFound` (404): URI not in the path map
/// - `InternalServerError` (500): file registered but unreadable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use webviewer::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the reason phrase written after the code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StatusCode::Ok)
    }
}

/// The header block of a response, before encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHeader {
    pub status_line: String,
    pub content_length: usize,
    pub content_type: String,
    /// `Some("keep-alive")` when the connection stays open
    pub connection: Option<&'static str>,
}

impl ResponseHeader {
    /// Renders the header lines joined by `\n`, followed by the blank line
    /// that separates them from the body.
    pub fn to_text(&self) -> String {
        let mut lines = vec![
            self.status_line.clone(),
            format!("Content-length: {}", self.content_length),
            format!("Content-type: {}", self.content_type),
        ];

        if let Some(directive) = self.connection {
            lines.push(format!("Connection: {}", directive));
        }

        lines.join("\n") + "\n\n"
    }
}

/// A complete response ready to be serialized.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    /// Declared type of the body; `None` falls back to `text/plain`
    pub content_type: Option<String>,
    pub keep_alive: bool,
    pub body: Bytes,
}

/// Builder for constructing responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .content_type("text/html")
///     .keep_alive(true)
///     .body(Bytes::from_static(b"<p>hi</p>"))
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    content_type: Option<String>,
    keep_alive: bool,
    body: Bytes,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            content_type: None,
            keep_alive: false,
            body: Bytes::new(),
        }
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Builds the final Response.
    ///
    /// Error statuses never carry a body or a declared type.
    pub fn build(self) -> Response {
        if self.status.is_success() {
            Response {
                status: self.status,
                content_type: self.content_type,
                keep_alive: self.keep_alive,
                body: self.body,
            }
        } else {
            Response {
                status: self.status,
                content_type: None,
                keep_alive: self.keep_alive,
                body: Bytes::new(),
            }
        }
    }
}

impl Response {
    /// Creates a 200 OK response carrying a file's bytes.
    pub fn ok(content_type: Option<&str>, body: impl Into<Bytes>, keep_alive: bool) -> Self {
        let builder = ResponseBuilder::new(StatusCode::Ok)
            .keep_alive(keep_alive)
            .body(body);

        match content_type {
            Some(ct) => builder.content_type(ct).build(),
            None => builder.build(),
        }
    }

    /// Creates a 404 Not Found response.
    pub fn not_found(keep_alive: bool) -> Self {
        Self::error(StatusCode::NotFound, keep_alive)
    }

    /// Creates a 500 Internal Server Error response.
    ///
    /// The connection is always closed afterwards.
    pub fn internal_error() -> Self {
        Self::error(StatusCode::InternalServerError, false)
    }

    /// Creates an empty error response with the given status.
    pub fn error(status: StatusCode, keep_alive: bool) -> Self {
        ResponseBuilder::new(status).keep_alive(keep_alive).build()
    }

    pub fn header(&self) -> ResponseHeader {
        ResponseHeader {
            status_line: format!(
                "{} {} {}",
                HTTP_VERSION,
                self.status.as_u16(),
                self.status.reason_phrase()
            ),
            content_length: self.body.len(),
            content_type: self
                .content_type
                .clone()
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            connection: self.keep_alive.then_some("keep-alive"),
        }
    }
}
