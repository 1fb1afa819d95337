use std::collections::HashMap;
use std::fmt;

use crate::http::request::{Method, Request};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The buffer does not yet hold a complete request.
    Incomplete,
    /// The request line is not `<METHOD> <PATH> <VERSION>`.
    MalformedRequestLine,
    InvalidMethod,
    InvalidContentLength,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Incomplete => f.write_str("incomplete request"),
            ParseError::MalformedRequestLine => f.write_str("malformed request line"),
            ParseError::InvalidMethod => f.write_str("unsupported method"),
            ParseError::InvalidContentLength => f.write_str("invalid Content-Length"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parses one request out of `buf`.
///
/// Returns the request and the number of bytes it occupied. When the header
/// terminator or the declared body has not arrived yet the result is
/// [`ParseError::Incomplete`] and the caller is expected to read more.
pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    let (head_end, body_start) = find_headers_end(buf).ok_or(ParseError::Incomplete)?;

    let head = std::str::from_utf8(&buf[..head_end])
        .map_err(|_| ParseError::MalformedRequestLine)?;

    let mut lines = head
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line));

    // Request line
    let request_line = lines.next().ok_or(ParseError::MalformedRequestLine)?;
    let (method, path, version) = parse_request_line(request_line)?;

    // Headers
    let mut headers = HashMap::new();

    for line in lines {
        match line.split_once(": ") {
            Some((name, value)) => {
                headers.insert(name.to_ascii_lowercase(), value.to_string());
            }
            None => {
                tracing::trace!(line, "ignoring header line without separator");
            }
        }
    }

    // Body
    let content_length = headers
        .get("content-length")
        .map(|v| {
            v.trim()
                .parse::<usize>()
                .map_err(|_| ParseError::InvalidContentLength)
        })
        .transpose()?;

    let rest = &buf[body_start..];

    let (body, consumed) = match content_length {
        Some(len) => {
            if rest.len() < len {
                return Err(ParseError::Incomplete);
            }
            (rest[..len].to_vec(), body_start + len)
        }
        None => (trim_nul_padding(rest).to_vec(), buf.len()),
    };

    let request = Request {
        method,
        path: path.to_string(),
        version: version.to_string(),
        headers,
        body,
    };

    Ok((request, consumed))
}

fn parse_request_line(line: &str) -> Result<(Method, &str, &str), ParseError> {
    let mut parts = line.split(' ');

    let (Some(method), Some(path), Some(version), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ParseError::MalformedRequestLine);
    };

    if !path.starts_with('/') || version.is_empty() {
        return Err(ParseError::MalformedRequestLine);
    }

    let method = Method::from_str(method).ok_or(ParseError::InvalidMethod)?;
    Ok((method, path, version))
}

/// Finds the empty line that ends the header section.
///
/// Returns `(head_end, body_start)`: the header section is `buf[..head_end]`
/// and the body begins at `body_start`. Both `\r\n\r\n` and a bare `\n\n`
/// are accepted.
fn find_headers_end(buf: &[u8]) -> Option<(usize, usize)> {
    buf.iter()
        .enumerate()
        .filter(|&(_, &b)| b == b'\n')
        .find_map(|(i, _)| {
            let rest = &buf[i + 1..];
            if rest.starts_with(b"\r\n") {
                Some((i, i + 3))
            } else if rest.starts_with(b"\n") {
                Some((i, i + 2))
            } else {
                None
            }
        })
}

fn trim_nul_padding(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |i| i + 1);
    &bytes[..end]
}
