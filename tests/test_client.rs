use std::{collections::HashMap, io::Write};

use httpmsg::{
    client::Client,
    cookie_jar::CookieJar,
    error::{TransportError, TransportErrorKind},
    header::{BasicHeader, Header, SetCookie},
    message::{Request, Response},
    params::Parameters,
    transport::{Transport, TransportOptions},
};

/// Serves canned responses by URL and records the requests it receives.
#[derive(Debug, Default)]
struct MockTransport {
    routes: HashMap<String, Response>,
    sent: Vec<Request>,
}

impl MockTransport {
    fn route(mut self, url: &str, response: Response) -> Self {
        self.routes.insert(url.to_string(), response);
        self
    }

    fn redirect(self, url: &str, location: &str) -> Self {
        let mut response = Response::new();
        response.redirect(location, 302);
        self.route(url, response)
    }
}

impl Transport for MockTransport {
    fn send(
        &mut self,
        request: &Request,
        _options: &TransportOptions,
        sink: Option<&mut dyn Write>,
    ) -> Result<Response, TransportError> {
        self.sent.push(request.clone());

        let url = request
            .url()
            .ok_or_else(|| TransportError::new(TransportErrorKind::Other))?;
        let mut response = self
            .routes
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| TransportError::new(TransportErrorKind::UnknownHost).with_context(url.as_str()))?;

        if let Some(sink) = sink {
            sink.write_all(response.body())?;
            response.clear_body();
        }

        Ok(response)
    }
}

fn ok(body: &str) -> Response {
    let mut response = Response::new();
    response.set_body(body);
    response
}

#[test]
fn test_redirect_chain_followed() {
    let transport = MockTransport::default()
        .redirect("http://a.test/start", "http://b.test/next")
        .redirect("http://b.test/next", "/final")
        .route("http://b.test/final", ok("done"));

    let mut client = Client::new(transport);
    client.set_follow_location_header(true);

    let mut request = Request::new(Request::METHOD_POST, "http://a.test/start").unwrap();
    request.set_body("payload");
    let response = client.request(&mut request).unwrap();

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.body(), b"done");

    let sent = &client.transport().sent;
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0].method(), "POST");

    for hop in &sent[1..] {
        assert_eq!(hop.method(), "GET");
        assert!(hop.body().is_empty());
    }

    assert_eq!(sent[2].host().as_deref(), Some("b.test"));
    assert_eq!(sent[2].uri(), "/final");
}

#[tracing_test::traced_test]
#[test]
fn test_redirect_limit_returns_last_response() {
    let transport = MockTransport::default()
        .redirect("http://a.test/1", "http://a.test/2")
        .redirect("http://a.test/2", "http://a.test/3")
        .redirect("http://a.test/3", "http://a.test/4")
        .route("http://a.test/4", ok("end"));

    let mut client = Client::new(transport);
    client.set_follow_location_header(true);
    client.set_max_redirects(2);

    let response = client.get("http://a.test/1", &Parameters::new()).unwrap();

    assert_eq!(response.status_code(), 302);
    assert_eq!(response.location().as_deref(), Some("http://a.test/4"));
    assert_eq!(client.transport().sent.len(), 3);
    assert!(logs_contain("redirect limit reached"));
}

#[test]
fn test_redirect_not_followed_by_default() {
    let transport = MockTransport::default().redirect("http://a.test/", "http://b.test/");
    let mut client = Client::new(transport);

    let response = client.get("http://a.test/", &Parameters::new()).unwrap();

    assert_eq!(response.status_code(), 302);
    assert_eq!(client.transport().sent.len(), 1);
}

#[test]
fn test_transport_error_propagated() {
    let mut client = Client::new(MockTransport::default());
    let error = client.get("http://nowhere.test/", &Parameters::new()).unwrap_err();

    assert_eq!(
        error.as_transport().map(TransportError::kind),
        Some(TransportErrorKind::UnknownHost)
    );
    assert_eq!(client.transport().sent.len(), 1);
}

#[test]
fn test_cookies_shared_across_hosts() {
    let mut login = ok("welcome");
    login.add_cookie(SetCookie::new("sid", "42").with_domain("example.test"));
    login.add_cookie(SetCookie::new("local", "x"));

    let transport = MockTransport::default()
        .route("http://login.example.test/", login)
        .route("http://www.example.test/", ok("home"))
        .route("http://other.test/", ok("other"));

    let mut client = Client::new(transport);
    client.set_cookie_jar(Some(CookieJar::new()));
    client.add_header(BasicHeader::new("User-Agent", "httpmsg-test"));

    for url in [
        "http://login.example.test/",
        "http://www.example.test/",
        "http://other.test/",
    ] {
        client.get(url, &Parameters::new()).unwrap();
    }

    let sent = &client.transport().sent;
    assert_eq!(sent[1].cookie_value("sid").as_deref(), Some("42"));
    assert_eq!(sent[1].cookie_value("local"), None);
    assert!(sent[2].cookie_values().is_empty());

    for request in sent {
        assert_eq!(request.headers.get_value("user-agent").as_deref(), Some("httpmsg-test"));
    }

    let jar = client.take_cookie_jar().unwrap();
    assert_eq!(jar.cookies("login.example.test").len(), 1);
    assert_eq!(jar.cookies("example.test").len(), 1);
}

#[test]
fn test_cookie_deletion_from_response() {
    let mut set = ok("");
    set.add_cookie(SetCookie::new("sid", "42"));
    let mut unset = ok("");
    unset.headers.add(Header::new("Set-Cookie", "sid=; Path=/"));

    let transport = MockTransport::default()
        .route("http://a.test/set", set)
        .route("http://a.test/unset", unset)
        .route("http://a.test/check", ok(""));

    let mut client = Client::new(transport);
    client.set_cookie_jar(Some(CookieJar::new()));

    client.get("http://a.test/set", &Parameters::new()).unwrap();
    client.get("http://a.test/unset", &Parameters::new()).unwrap();
    client.get("http://a.test/check", &Parameters::new()).unwrap();

    let sent = &client.transport().sent;
    assert_eq!(sent[1].cookie_value("sid").as_deref(), Some("42"));
    assert_eq!(sent[2].cookie_value("sid"), None);
    assert!(client.cookie_jar().unwrap().is_empty());
}

#[test]
fn test_body_streamed_to_sink() {
    let transport = MockTransport::default().route("http://a.test/file", ok("file contents"));
    let mut client = Client::new(transport);

    let mut request = Request::new(Request::METHOD_GET, "http://a.test/file").unwrap();
    let mut sink = Vec::new();
    let response = client
        .request_to(&mut request, Some(&mut sink as &mut dyn Write))
        .unwrap();

    assert!(response.body().is_empty());
    assert_eq!(sink, b"file contents");
}

#[test]
fn test_redirect_chain_streams_every_hop_to_sink() {
    let mut first = Response::new();
    first.redirect("http://b.test/next", 302);
    first.set_body("moved;");
    let mut second = Response::new();
    second.redirect("/final", 307);
    second.set_body("again;");

    let mut transport = MockTransport::default()
        .route("http://a.test/start", first)
        .route("http://b.test/next", second)
        .route("http://b.test/final", ok("done"));
    let options = TransportOptions {
        follow_location_header: true,
        ..Default::default()
    };

    let request = Request::new(Request::METHOD_GET, "http://a.test/start").unwrap();
    let mut sink = Vec::new();
    let response = transport
        .execute(&request, &options, Some(&mut sink as &mut dyn Write))
        .unwrap();

    assert_eq!(response.status_code(), 200);
    assert!(response.body().is_empty());
    assert_eq!(sink, b"moved;again;done");
    assert_eq!(transport.sent.len(), 3);

    let mut client = Client::new(transport);
    client.set_follow_location_header(true);

    let mut request = Request::new(Request::METHOD_GET, "http://a.test/start").unwrap();
    let mut sink = Vec::new();
    client
        .request_to(&mut request, Some(&mut sink as &mut dyn Write))
        .unwrap();

    assert_eq!(sink, b"moved;again;done");
    assert_eq!(client.transport().sent.len(), 6);
}

#[test]
fn test_get_query_parameters() {
    let transport = MockTransport::default().route("http://a.test/search?q=a+b&page=2", ok(""));
    let mut client = Client::new(transport);

    let query = [("q", "a b"), ("page", "2")].into_iter().collect::<Parameters>();
    client.get("http://a.test/search", &query).unwrap();

    assert_eq!(client.transport().sent[0].uri(), "/search?q=a+b&page=2");
}
