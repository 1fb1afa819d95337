use minihttp::http::parser::{ParseError, parse_http_request};
use minihttp::http::request::Method;

#[test]
fn test_parse_simple_get_request() {
    let req = b"GET / HTTP/1.1\r\nHost: localhost:4221\r\n\r\n";
    let (parsed, consumed) = parse_http_request(req).unwrap();

    assert_eq!(parsed.method, Method::GET);
    assert_eq!(parsed.path, "/");
    assert_eq!(parsed.version, "HTTP/1.1");
    assert_eq!(parsed.headers.get("host").unwrap(), "localhost:4221");
    assert!(parsed.body.is_empty());
    assert_eq!(consumed, req.len());
}

#[test]
fn test_parse_request_without_headers() {
    let req = b"GET /echo/abc HTTP/1.1\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.path, "/echo/abc");
    assert!(parsed.headers.is_empty());
}

#[test]
fn test_parse_post_request_with_body() {
    let req = b"POST /files/a.txt HTTP/1.1\r\nHost: localhost\r\nContent-Length: 5\r\n\r\nhello";
    let (parsed, consumed) = parse_http_request(req).unwrap();

    assert_eq!(parsed.method, Method::POST);
    assert_eq!(parsed.path, "/files/a.txt");
    assert_eq!(parsed.body, b"hello".to_vec());
    assert_eq!(consumed, req.len());
}

#[test]
fn test_parse_header_names_are_lowercased() {
    let req = b"GET /user-agent HTTP/1.1\r\nUser-Agent: foo/1.0\r\nACCEPT: */*\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.headers.get("user-agent").unwrap(), "foo/1.0");
    assert_eq!(parsed.headers.get("accept").unwrap(), "*/*");
    assert_eq!(parsed.header("USER-AGENT"), Some("foo/1.0"));
    assert!(!parsed.headers.contains_key("User-Agent"));
}

#[test]
fn test_parse_duplicate_header_last_wins() {
    let req = b"GET / HTTP/1.1\r\nX-Token: first\r\nx-token: second\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.header("x-token"), Some("second"));
}

#[test]
fn test_parse_header_without_separator_is_ignored() {
    let req = b"GET / HTTP/1.1\r\nBrokenHeader\r\nNoSpace:value\r\nHost: h\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.headers.len(), 1);
    assert_eq!(parsed.header("host"), Some("h"));
}

#[test]
fn test_parse_bare_lf_line_endings() {
    let req = b"GET /user-agent HTTP/1.1\nUser-Agent: lf-client\n\n";
    let (parsed, consumed) = parse_http_request(req).unwrap();

    assert_eq!(parsed.path, "/user-agent");
    assert_eq!(parsed.header("user-agent"), Some("lf-client"));
    assert_eq!(consumed, req.len());
}

#[test]
fn test_parse_request_with_path_and_query_string() {
    let req = b"GET /search?q=rust HTTP/1.1\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.path, "/search?q=rust");
}

#[test]
fn test_parse_incomplete_request_missing_blank_line() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n";
    let result = parse_http_request(req);

    assert!(matches!(result, Err(ParseError::Incomplete)));
}

#[test]
fn test_parse_incomplete_request_partial_body() {
    let req = b"POST /files/x HTTP/1.1\r\nContent-Length: 10\r\n\r\nhello";
    let result = parse_http_request(req);

    assert!(matches!(result, Err(ParseError::Incomplete)));
}

#[test]
fn test_parse_body_surplus_is_not_consumed() {
    let req = b"POST /files/x HTTP/1.1\r\nContent-Length: 3\r\n\r\nabcdef";
    let (parsed, consumed) = parse_http_request(req).unwrap();

    assert_eq!(parsed.body, b"abc".to_vec());
    assert_eq!(consumed, req.len() - 3);
}

#[test]
fn test_parse_trailing_nul_padding_is_dropped() {
    let mut buf = b"POST /files/x HTTP/1.1\r\nHost: h\r\n\r\nabc".to_vec();
    buf.resize(1024, 0);
    let (parsed, _) = parse_http_request(&buf).unwrap();

    assert_eq!(parsed.body, b"abc".to_vec());
}

#[test]
fn test_parse_declared_length_keeps_nul_bytes() {
    let req = b"POST /files/x HTTP/1.1\r\nContent-Length: 4\r\n\r\n\x00\x01\x00\x00";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.body, vec![0, 1, 0, 0]);
}

#[test]
fn test_parse_too_few_request_line_tokens() {
    for req in [
        &b"GET /\r\n\r\n"[..],
        &b"GET\r\n\r\n"[..],
        &b"\r\n\r\n"[..],
        &b"GET  HTTP/1.1\r\n\r\n"[..],
    ] {
        let result = parse_http_request(req);
        assert!(
            matches!(result, Err(ParseError::MalformedRequestLine)),
            "{:?}",
            String::from_utf8_lossy(req)
        );
    }
}

#[test]
fn test_parse_path_must_be_absolute() {
    let result = parse_http_request(b"GET echo HTTP/1.1\r\n\r\n");

    assert!(matches!(result, Err(ParseError::MalformedRequestLine)));
}

#[test]
fn test_parse_invalid_http_method() {
    let result = parse_http_request(b"BREW / HTTP/1.1\r\n\r\n");

    assert!(matches!(result, Err(ParseError::InvalidMethod)));
}

#[test]
fn test_parse_invalid_content_length() {
    let result = parse_http_request(b"POST /files/x HTTP/1.1\r\nContent-Length: ten\r\n\r\n");

    assert!(matches!(result, Err(ParseError::InvalidContentLength)));
}

#[test]
fn test_parse_non_utf8_head_is_malformed() {
    let result = parse_http_request(b"GET /\xff HTTP/1.1\r\n\r\n");

    assert!(matches!(result, Err(ParseError::MalformedRequestLine)));
}

#[test]
fn test_parse_various_http_methods() {
    let methods = vec![
        ("GET", Method::GET),
        ("POST", Method::POST),
        ("PUT", Method::PUT),
        ("DELETE", Method::DELETE),
        ("HEAD", Method::HEAD),
        ("OPTIONS", Method::OPTIONS),
        ("PATCH", Method::PATCH),
        ("TRACE", Method::TRACE),
        ("CONNECT", Method::CONNECT),
    ];

    for (method_str, expected_method) in methods {
        let req = format!("{} / HTTP/1.1\r\n\r\n", method_str);
        let (parsed, _) = parse_http_request(req.as_bytes()).unwrap();
        assert_eq!(parsed.method, expected_method);
    }
}
