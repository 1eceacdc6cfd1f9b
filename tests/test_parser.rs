use webviewer::http::codec;
use webviewer::http::parser::{ParseError, parse_request};
use webviewer::http::request::ParsedRequest;

#[test]
fn test_parse_simple_get_request() {
    let parsed = parse_request("GET /index.html HTTP/1.0\r\n\r\n").unwrap();

    assert_eq!(parsed, ParsedRequest::new("/index.html", false));
    assert_eq!(parsed.method, "GET");
}

#[test]
fn test_parse_strips_query_string() {
    let with_query = parse_request("GET /index.html?x=1 HTTP/1.0\r\n\r\n").unwrap();
    let without = parse_request("GET /index.html HTTP/1.0\r\n\r\n").unwrap();

    assert_eq!(with_query, without);
}

#[test]
fn test_parse_keeps_path_verbatim() {
    let cases = [
        ("GET /Docs/ HTTP/1.0\r\n\r\n", "/Docs/"),
        ("GET /a%20b.html HTTP/1.0\r\n\r\n", "/a%20b.html"),
        ("GET /? HTTP/1.0\r\n\r\n", "/"),
        ("GET  HTTP/1.0\r\n\r\n", ""),
    ];

    for (req, uri) in cases {
        assert_eq!(parse_request(req).unwrap().uri, uri);
    }
}

#[test]
fn test_parse_rejects_other_methods() {
    for req in ["POST / HTTP/1.0\r\n\r\n", "HEAD / HTTP/1.0\r\n\r\n", " GET / HTTP/1.0", "GET", ""] {
        assert_eq!(parse_request(req), Err(ParseError::NotGet), "{:?}", req);
    }
}

#[test]
fn test_parse_missing_target_terminator() {
    assert_eq!(parse_request("GET /index.html"), Err(ParseError::MissingTarget));
    assert_eq!(parse_request("GET /index.html\r\n\r\n"), Err(ParseError::MissingTarget));
}

#[test]
fn test_parse_keep_alive_substring() {
    let req = "GET / HTTP/1.0\r\nConnection: keep-alive\r\n\r\n";
    assert!(parse_request(req).unwrap().keep_alive());

    // Matched anywhere, not only as a header line.
    let req = "GET / HTTP/1.0\r\nX-Note: Connection: keep-alive\r\n\r\n";
    assert!(parse_request(req).unwrap().keep_alive);

    // Case matters.
    let req = "GET / HTTP/1.0\r\nconnection: Keep-Alive\r\n\r\n";
    assert!(!parse_request(req).unwrap().keep_alive);
}

#[test]
fn test_parse_decoded_non_utf8_request() {
    let data = codec::decode(b"GET /caf\xe9.html HTTP/1.0\r\n\r\n");
    let parsed = parse_request(&data).unwrap();

    assert_eq!(parsed.uri, "/caf\u{e9}.html");
}
