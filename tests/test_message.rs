use httpmsg::{
    header::{Header, HeaderField, LOCATION, SetCookie},
    message::{Request, Response},
};

#[allow(dead_code)]
mod message_generator;

#[test]
fn test_header_line_with_serde_in_scope() {
    use serde::Serialize;

    fn to_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string(value).unwrap()
    }

    let header = Header::parse_line("Set-Cookie: sid=1; Path=/").unwrap().unwrap();
    let cookie = header.as_set_cookie().unwrap();

    assert_eq!(header.to_line(), "Set-Cookie: sid=1; Path=/");
    assert_eq!(cookie.to_line(), "Set-Cookie: sid=1; Path=/");
    assert_eq!(header.to_string(), header.to_line());
    assert!(to_json(&header).contains("set-cookie"));
}

#[test]
fn test_basic_header_line_round_trip() {
    for round in 0..500 {
        let mut rng = message_generator::rng(round);
        let name = message_generator::header_name(&mut rng);
        let value = message_generator::printable(&mut rng, 0, 60, &[]);

        let header = Header::new(name.as_str(), value.as_str());
        let line = header.to_line();
        let parsed = Header::parse_line(&line).unwrap().unwrap();

        assert_eq!(parsed.name(), name, "line {:?}", line);
        assert_eq!(parsed.value(), value, "line {:?}", line);
        assert!(parsed.as_basic().is_some());
    }
}

#[test]
fn test_parse_redirect_response() {
    let response = Response::parse(b"HTTP/1.1 302 Found\r\nLocation: http://b.test/\r\n\r\n");

    assert_eq!(response.status_code(), 302);
    assert_eq!(response.reason(), "Found");
    assert_eq!(response.headers.len(), 1);
    assert_eq!(response.headers.get_all(LOCATION).count(), 1);
    assert_eq!(response.location().as_deref(), Some("http://b.test/"));
    assert!(response.body().is_empty());
    assert!(response.is_redirect());
}

#[test]
fn test_response_serialize_parse() {
    let mut response = Response::new();
    response.set_status_code(404);
    response.headers.add(Header::new("Content-Type", "text/plain; charset=utf-8"));
    response.add_cookie(SetCookie::new("id", "a b").with_expire(1_700_000_000).with_http_only(true));
    response.set_body("missing\r\n\r\nreally");

    let data = response.to_bytes();
    let parsed = Response::parse(&data);

    assert_eq!(parsed.status_code(), 404);
    assert_eq!(parsed.reason(), "Not Found");
    assert_eq!(parsed.body(), b"missing\r\n\r\nreally");

    let content_type = parsed.headers.get("content-type").unwrap();
    assert_eq!(
        content_type.as_content_type().and_then(|c| c.charset()),
        Some("utf-8")
    );

    let cookie = parsed.cookie("id").unwrap();
    assert_eq!(cookie.value, "a b");
    assert_eq!(cookie.expire, 1_700_000_000);
    assert!(cookie.http_only);
}

#[test]
fn test_request_serialize_parse() {
    let mut request = Request::new(Request::METHOD_POST, "http://a.test:8080/form?x=1").unwrap();
    request.add_cookie("session", "abc");
    request.set_body("a=1");

    let data = request.to_bytes();
    assert!(data.starts_with(b"POST /form?x=1 HTTP/1.1\r\nHost: a.test:8080\r\n"));

    let parsed = Request::parse(&data);
    assert_eq!(parsed.method(), "POST");
    assert_eq!(parsed.uri(), "/form?x=1");
    assert_eq!(parsed.host().as_deref(), Some("a.test:8080"));
    assert_eq!(parsed.cookie_value("session").as_deref(), Some("abc"));
    assert_eq!(parsed.query_params().get("x"), Some("1"));
    assert_eq!(parsed.body(), b"a=1");
}

#[tracing_test::traced_test]
#[test]
fn test_parse_garbage() {
    let response = Response::parse(b"\x00\xffnot http\r\nno separator here");

    assert_eq!(response.status_code(), 0);
    assert!(response.headers.is_empty());
    assert!(logs_contain("skipping line without header separator"));

    let request = Request::parse(b"");
    assert!(request.headers.is_empty());
    assert!(request.body().is_empty());
}
