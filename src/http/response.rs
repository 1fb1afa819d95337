/// HTTP status codes the server can answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 201 Created
    Created,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// ```
    /// # use minihttp::http::response::StatusCode;
    /// assert_eq!(StatusCode::Created.as_u16(), 201);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
        }
    }

    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

pub const TEXT_PLAIN: &str = "text/plain";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// A complete HTTP response ready to be serialized.
///
/// Headers keep their insertion order, which is the order they go on the
/// wire. Responses built through [`ResponseBuilder`] always carry
/// `Content-Type` and a `Content-Length` matching `body`.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// ```
/// # use minihttp::http::response::{ResponseBuilder, StatusCode};
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "application/octet-stream")
///     .body(b"abc".to_vec())
///     .build();
/// assert_eq!(response.header("content-length"), Some("3"));
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Adds a header, replacing an existing one with the same
    /// (case-insensitive) name in place.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();

        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&key))
        {
            Some(slot) => slot.1 = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    pub fn content_type(self, value: &str) -> Self {
        self.header("Content-Type", value)
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Builds the final Response.
    ///
    /// Defaults `Content-Type` to `text/plain` and always recomputes
    /// `Content-Length` from the body; a value set by the caller is dropped.
    pub fn build(mut self) -> Response {
        if !self
            .headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("Content-Type"))
        {
            self.headers
                .insert(0, ("Content-Type".to_string(), TEXT_PLAIN.to_string()));
        }

        self.headers
            .retain(|(k, _)| !k.eq_ignore_ascii_case("Content-Length"));
        self.headers
            .push(("Content-Length".to_string(), self.body.len().to_string()));

        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// 200 OK with a `text/plain` body.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        ResponseBuilder::new(StatusCode::Ok).body(body).build()
    }

    /// 200 OK carrying raw file bytes.
    pub fn octet_stream(body: impl Into<Vec<u8>>) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .content_type(OCTET_STREAM)
            .body(body)
            .build()
    }

    pub fn created() -> Self {
        ResponseBuilder::new(StatusCode::Created).build()
    }

    pub fn bad_request() -> Self {
        ResponseBuilder::new(StatusCode::BadRequest).build()
    }

    pub fn not_found() -> Self {
        ResponseBuilder::new(StatusCode::NotFound).build()
    }

    pub fn internal_error() -> Self {
        ResponseBuilder::new(StatusCode::InternalServerError).build()
    }

    /// The status line without its terminating CRLF, e.g. `HTTP/1.1 200 OK`.
    pub fn status_line(&self) -> String {
        format!(
            "{} {} {}",
            crate::http::HTTP_VERSION,
            self.status.as_u16(),
            self.status.reason_phrase()
        )
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}
