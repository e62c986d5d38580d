use std::{
    io::{Read, Write},
    net::{TcpListener, TcpStream},
    thread::JoinHandle,
};

use flate2::{Compression, write::GzEncoder};
use httpmsg::{
    client::Client,
    cookie_jar::CookieJar,
    error::TransportErrorKind,
    message::Request,
    params::Parameters,
    transport::{TcpTransport, Transport, TransportOptions},
};

/// Serves one canned response per connection and returns the raw requests.
fn serve(responses: Vec<Vec<u8>>) -> (String, JoinHandle<Vec<Vec<u8>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap().to_string();

    let handle = std::thread::spawn(move || {
        let mut requests = Vec::new();

        for response in responses {
            let (mut stream, _) = listener.accept().unwrap();
            requests.push(read_request(&mut stream));
            stream.write_all(&response).unwrap();
        }

        requests
    });

    (address, handle)
}

fn read_request(stream: &mut TcpStream) -> Vec<u8> {
    let mut data = Vec::new();
    let mut buf = [0u8; 1024];

    let head_len = loop {
        if let Some(index) = data.windows(4).position(|window| window == b"\r\n\r\n") {
            break index + 4;
        }

        let len = stream.read(&mut buf).unwrap();
        assert!(len > 0);
        data.extend_from_slice(&buf[..len]);
    };

    let body_len = Request::parse(&data[..head_len])
        .headers
        .get_value("content-length")
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or_default();

    while data.len() < head_len + body_len {
        let len = stream.read(&mut buf).unwrap();
        assert!(len > 0);
        data.extend_from_slice(&buf[..len]);
    }

    data
}

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn chunked(data: &[u8], size: usize) -> Vec<u8> {
    let mut output = Vec::new();

    for chunk in data.chunks(size) {
        output.extend_from_slice(format!("{:x}\r\n", chunk.len()).as_bytes());
        output.extend_from_slice(chunk);
        output.extend_from_slice(b"\r\n");
    }

    output.extend_from_slice(b"0\r\n\r\n");
    output
}

#[tracing_test::traced_test]
#[test]
fn test_chunked_gzip_response() {
    let text = "hello world! ".repeat(500);
    let mut response = b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nTransfer-Encoding: chunked\r\nContent-Encoding: gzip\r\n\r\n".to_vec();
    response.extend_from_slice(&chunked(&gzip(text.as_bytes()), 100));

    let (address, handle) = serve(vec![response]);
    let request = Request::new(Request::METHOD_GET, &format!("http://{}/text", address)).unwrap();

    let response = TcpTransport::new()
        .send(&request, &TransportOptions::default(), None)
        .unwrap();

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.body(), text.as_bytes());
    assert!(response.headers.get("content-type").unwrap().as_content_type().is_some());

    let requests = handle.join().unwrap();
    let head = String::from_utf8_lossy(&requests[0]);
    assert!(head.starts_with("GET /text HTTP/1.1\r\n"));
    assert!(head.contains("Connection: close\r\n"));
}

#[test]
fn test_content_length_to_sink() {
    let response = b"HTTP/1.1 100 Continue\r\n\r\nHTTP/1.1 201 Created\r\nContent-Length: 5\r\n\r\nabcdeIGNORED".to_vec();
    let (address, handle) = serve(vec![response]);

    let mut request = Request::new(Request::METHOD_POST, &format!("http://{}/upload", address)).unwrap();
    request.set_body("data");

    let mut sink = Vec::new();
    let response = TcpTransport::new()
        .send(
            &request,
            &TransportOptions::default(),
            Some(&mut sink as &mut dyn Write),
        )
        .unwrap();

    assert_eq!(response.status_code(), 201);
    assert_eq!(response.reason(), "Created");
    assert!(response.body().is_empty());
    assert_eq!(sink, b"abcde");

    let requests = handle.join().unwrap();
    let head = String::from_utf8_lossy(&requests[0]);
    assert!(head.contains("Content-Length: 4\r\n"));
}

#[test]
fn test_client_redirect_and_cookie() {
    let first = b"HTTP/1.1 302 Found\r\nLocation: /landing\r\nSet-Cookie: sid=abc; Path=/\r\nContent-Length: 0\r\n\r\n".to_vec();
    let second = b"HTTP/1.1 200 OK\r\nSet-Cookie: seen=1\r\n\r\nlanding page".to_vec();
    let third = b"HTTP/1.1 204 No Content\r\n\r\n".to_vec();

    let (address, handle) = serve(vec![first, second, third]);

    let mut client = Client::new(TcpTransport::new());
    client.set_follow_location_header(true);
    client.set_cookie_jar(Some(CookieJar::new()));

    let response = client
        .get(&format!("http://{}/start", address), &Parameters::new())
        .unwrap();

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.body(), b"landing page");

    let response = client
        .get(&format!("http://{}/again", address), &Parameters::new())
        .unwrap();
    assert_eq!(response.status_code(), 204);

    let requests = handle.join().unwrap();
    let second_request = Request::parse(&requests[1]);
    let third_request = Request::parse(&requests[2]);

    assert_eq!(second_request.uri(), "/landing");
    assert_eq!(third_request.cookie_value("seen").as_deref(), Some("1"));
}

#[tracing_test::traced_test]
#[test]
fn test_malformed_field_line_keeps_later_cookie() {
    let first = b"HTTP/1.1 200 OK\r\n\
        X-A: 1\r\n\
        Bad Header: x\r\n\
        X-Folded: a\r\n  b\r\n\
        Set-Cookie: sid=1; Path=/\r\n\
        Content-Length: 2\r\n\
        \r\nok"
        .to_vec();
    let second = b"HTTP/1.1 204 No Content\r\n\r\n".to_vec();

    let (address, handle) = serve(vec![first, second]);

    let mut client = Client::new(TcpTransport::new());
    client.set_cookie_jar(Some(CookieJar::new()));

    let response = client
        .get(&format!("http://{}/", address), &Parameters::new())
        .unwrap();

    assert_eq!(response.body(), b"ok");
    assert_eq!(response.headers.get_value("x-folded").as_deref(), Some("a b"));
    assert_eq!(response.cookies().count(), 1);
    assert!(logs_contain("skipping malformed field line"));

    client
        .get(&format!("http://{}/next", address), &Parameters::new())
        .unwrap();

    let requests = handle.join().unwrap();
    let second_request = Request::parse(&requests[1]);
    assert_eq!(second_request.cookie_value("sid").as_deref(), Some("1"));
}

#[test]
fn test_redirects_streamed_to_sink() {
    let first = b"HTTP/1.1 302 Found\r\nLocation: /two\r\nContent-Length: 3\r\n\r\nr1;".to_vec();
    let second = b"HTTP/1.1 301 Moved Permanently\r\nLocation: /three\r\nContent-Length: 3\r\n\r\nr2;".to_vec();
    let mut third = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n".to_vec();
    third.extend_from_slice(&chunked(b"final body", 4));

    let (address, handle) = serve(vec![first, second, third]);

    let request = Request::new(Request::METHOD_GET, &format!("http://{}/one", address)).unwrap();
    let options = TransportOptions {
        follow_location_header: true,
        ..Default::default()
    };

    let mut sink = Vec::new();
    let response = TcpTransport::new()
        .execute(&request, &options, Some(&mut sink as &mut dyn Write))
        .unwrap();

    assert_eq!(response.status_code(), 200);
    assert!(response.body().is_empty());
    assert_eq!(sink, b"r1;r2;final body");

    let requests = handle.join().unwrap();
    assert_eq!(Request::parse(&requests[1]).uri(), "/two");
    assert_eq!(Request::parse(&requests[2]).uri(), "/three");
}

#[test]
fn test_unable_to_connect() {
    let address = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let request = Request::new(Request::METHOD_GET, &format!("http://{}/", address)).unwrap();
    let error = TcpTransport::new()
        .send(&request, &TransportOptions::default(), None)
        .unwrap_err();

    assert_eq!(error.kind(), TransportErrorKind::UnableToConnect);
}
