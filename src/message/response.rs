use std::io::Write;

use crate::header::{Header, LOCATION, SET_COOKIE, SetCookie};

use super::{Envelope, HTTP_1_1, Headers, serialize_message, status};

/// HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    http_version: String,
    status_code: u16,
    reason: String,
    pub headers: Headers,
    body: Vec<u8>,
}

impl Response {
    /// Creates an `HTTP/1.1 200 OK` response.
    pub fn new() -> Self {
        Self {
            http_version: HTTP_1_1.to_string(),
            status_code: 200,
            reason: "OK".to_string(),
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    pub fn http_version(&self) -> &str {
        &self.http_version
    }

    pub fn set_http_version<S: Into<String>>(&mut self, version: S) {
        self.http_version = version.into();
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Sets the status code and the standard reason phrase for it.
    ///
    /// The reason is unchanged for codes without a standard phrase.
    pub fn set_status_code(&mut self, code: u16) {
        self.status_code = code;

        if let Some(reason) = status::reason_phrase(code) {
            self.reason = reason.to_string();
        }
    }

    /// Sets the status code and reason phrase as given.
    pub fn set_status<S: Into<String>>(&mut self, code: u16, reason: S) {
        self.status_code = code;
        self.reason = reason.into();
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn set_reason<S: Into<String>>(&mut self, reason: S) {
        self.reason = reason.into();
    }

    /// Sets the `Location` header and a redirect status code.
    pub fn redirect(&mut self, url: &str, code: u16) {
        self.headers.set(Header::new(LOCATION, url));
        self.set_status_code(code);
    }

    pub fn is_redirect(&self) -> bool {
        status::is_redirect(self.status_code)
    }

    pub fn location(&self) -> Option<String> {
        self.headers.get_value(LOCATION)
    }

    pub fn add_cookie(&mut self, cookie: SetCookie) {
        self.headers.add(cookie);
    }

    /// Returns the first `Set-Cookie` with the cookie name.
    pub fn cookie(&self, name: &str) -> Option<&SetCookie> {
        self.cookies().find(|cookie| cookie.name == name)
    }

    pub fn cookies(&self) -> impl Iterator<Item = &SetCookie> {
        self.headers.iter().filter_map(Header::as_set_cookie)
    }

    /// Removes every `Set-Cookie` with the cookie name.
    pub fn remove_cookie(&mut self, name: &str) {
        self.headers
            .retain(|h| !h.as_set_cookie().is_some_and(|cookie| cookie.name == name));
    }

    pub fn clear_cookies(&mut self) {
        self.headers.remove(SET_COOKIE);
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Vec<u8> {
        &mut self.body
    }

    pub fn set_body<B: Into<Vec<u8>>>(&mut self, body: B) {
        self.body = body.into();
    }

    pub fn append_body(&mut self, data: &[u8]) {
        self.body.extend_from_slice(data);
    }

    pub fn clear_body(&mut self) {
        self.body.clear();
    }

    /// Parses a raw response.
    ///
    /// A status code that is not a number is read as 0.
    pub fn parse(input: &[u8]) -> Self {
        let envelope = Envelope::split(input);
        let [version, code, reason] = envelope.start_line_parts();

        Self {
            http_version: version.to_string(),
            status_code: code.parse().unwrap_or_default(),
            reason: reason.to_string(),
            headers: envelope.headers,
            body: envelope.body.to_vec(),
        }
    }

    pub fn serialize<W: Write>(&self, buf: W) -> std::io::Result<()> {
        let start_line = format!("{} {} {}", self.http_version, self.status_code, self.reason);
        serialize_message(buf, &start_line, &self.headers, &self.body)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        // Writing to a Vec does not fail
        let _ = self.serialize(&mut buf);
        buf
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.to_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::HeaderKind;

    #[test]
    fn test_response_default() {
        let response = Response::new();

        assert_eq!(response.to_bytes(), b"HTTP/1.1 200 OK\r\n\r\n");
    }

    #[test]
    fn test_response_parse_redirect() {
        let response = Response::parse(b"HTTP/1.1 302 Found\r\nLocation: http://b.test/\r\n\r\n");

        assert_eq!(response.status_code(), 302);
        assert_eq!(response.reason(), "Found");
        assert_eq!(response.headers.len(), 1);
        assert_eq!(response.location().as_deref(), Some("http://b.test/"));
        assert!(response.body().is_empty());
        assert!(response.is_redirect());
    }

    #[test]
    fn test_response_parse_reason_with_spaces() {
        let response = Response::parse(b"HTTP/1.0 404 Not Found\r\n\r\nmissing");

        assert_eq!(response.http_version(), "HTTP/1.0");
        assert_eq!(response.reason(), "Not Found");
        assert_eq!(response.body(), b"missing");
    }

    #[test]
    fn test_response_parse_garbage() {
        let response = Response::parse(b"junk");

        assert_eq!(response.http_version(), "junk");
        assert_eq!(response.status_code(), 0);
        assert_eq!(response.reason(), "");
    }

    #[test]
    fn test_response_status() {
        let mut response = Response::new();

        response.set_status_code(404);
        assert_eq!(response.reason(), "Not Found");

        response.set_status_code(599);
        assert_eq!(response.status_code(), 599);
        assert_eq!(response.reason(), "Not Found");

        response.set_status(299, "Custom");
        assert_eq!(response.reason(), "Custom");

        response.redirect("/next", 301);
        assert_eq!(response.status_code(), 301);
        assert_eq!(response.reason(), "Moved Permanently");
        assert_eq!(response.location().as_deref(), Some("/next"));
    }

    #[test]
    fn test_response_cookies() {
        let mut response = Response::new();
        response.add_cookie(SetCookie::new("a", "1"));
        response.add_cookie(SetCookie::new("b", "2").with_path("/"));
        response.add_cookie(SetCookie::new("a", "3"));

        assert_eq!(response.cookies().count(), 3);
        assert_eq!(response.cookie("a").map(|c| c.value.as_str()), Some("1"));

        response.remove_cookie("a");
        assert_eq!(response.cookies().count(), 1);

        let parsed = Response::parse(&response.to_bytes());
        let header = parsed.headers.get("set-cookie").unwrap();
        assert_eq!(header.kind(), HeaderKind::SetCookie);
        assert_eq!(parsed.cookie("b").map(|c| c.path.as_str()), Some("/"));

        response.clear_cookies();
        assert_eq!(response.cookies().count(), 0);
    }
}
