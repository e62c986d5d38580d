use std::io::Write;

use url::Url;

use crate::{
    codec::{BodyCodec, FormUrlEncoded},
    header::{COOKIE, Cookie, HOST, Header, HeaderField},
    params::Parameters,
};

use super::{Envelope, HTTP_1_1, Headers, serialize_message};

/// HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: String,
    uri: String,
    scheme: String,
    http_version: String,
    pub headers: Headers,
    body: Vec<u8>,
}

impl Request {
    pub const METHOD_GET: &'static str = "GET";
    pub const METHOD_POST: &'static str = "POST";
    pub const METHOD_PUT: &'static str = "PUT";
    pub const METHOD_DELETE: &'static str = "DELETE";
    pub const METHOD_HEAD: &'static str = "HEAD";

    /// Creates a `GET /` request without headers.
    pub fn empty() -> Self {
        Self {
            method: Self::METHOD_GET.to_string(),
            uri: "/".to_string(),
            scheme: "http".to_string(),
            http_version: HTTP_1_1.to_string(),
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    /// Creates a request for the URL.
    ///
    /// The `Host` header and request URI are derived from the URL.
    pub fn new<M: Into<String>>(method: M, url: &str) -> Result<Self, url::ParseError> {
        let mut request = Self::empty();
        request.method = method.into();
        request.set_url(url)?;
        Ok(request)
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn set_method<S: Into<String>>(&mut self, method: S) {
        self.method = method.into();
    }

    /// Returns the request target such as `/index.html?q=1`.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn set_uri<S: Into<String>>(&mut self, uri: S) {
        self.uri = uri.into();
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn set_scheme<S: Into<String>>(&mut self, scheme: S) {
        self.scheme = scheme.into();
    }

    pub fn http_version(&self) -> &str {
        &self.http_version
    }

    pub fn set_http_version<S: Into<String>>(&mut self, version: S) {
        self.http_version = version.into();
    }

    /// Sets the scheme, `Host` header and request URI from a URL.
    pub fn set_url(&mut self, url: &str) -> Result<(), url::ParseError> {
        let url = Url::parse(url)?;

        if let Some(host) = url.host_str() {
            let host = match url.port() {
                Some(port) => format!("{}:{}", host, port),
                None => host.to_string(),
            };
            self.headers.set(Header::new(HOST, host));
        }

        self.uri = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        self.scheme = url.scheme().to_string();

        Ok(())
    }

    /// Returns the absolute URL built from the scheme, `Host` header and URI.
    ///
    /// Returns `None` without a `Host` header.
    pub fn url(&self) -> Option<Url> {
        let host = self.headers.get_value(HOST)?;

        match Url::parse(&format!("{}://{}{}", self.scheme, host, self.uri)) {
            Ok(url) => Some(url),
            Err(error) => {
                tracing::debug!(%error, host, uri = self.uri, "request URL does not parse");
                None
            }
        }
    }

    pub fn host(&self) -> Option<String> {
        self.headers.get_value(HOST)
    }

    /// Returns the query string parameters of the URI.
    pub fn query_params(&self) -> Parameters {
        match self.uri.split_once('?') {
            Some((_path, query)) => FormUrlEncoded.decode(query.as_bytes(), None),
            None => Parameters::new(),
        }
    }

    /// Replaces the query string of the URI.
    ///
    /// An empty set of parameters removes the query string.
    pub fn set_query_params(&mut self, params: &Parameters) {
        let path = self.uri.split_once('?').map_or(self.uri.as_str(), |(path, _query)| path);

        self.uri = if params.is_empty() {
            path.to_string()
        } else {
            let query = FormUrlEncoded.encode(params, None);
            format!("{}?{}", path, String::from_utf8_lossy(&query))
        };
    }

    /// Sets a cookie value in the first `Cookie` header, adding the header
    /// if needed.
    pub fn add_cookie<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) {
        match self.headers.get_mut(COOKIE) {
            Some(Header::Cookie(cookie)) => cookie.set(name, value),
            Some(header) => {
                let mut cookie = Cookie::from_value(&header.value());
                cookie.set(name, value);
                *header = cookie.into();
            }
            None => {
                let mut cookie = Cookie::default();
                cookie.set(name, value);
                self.headers.add(cookie);
            }
        }
    }

    /// Returns the cookie values of all `Cookie` headers.
    ///
    /// A later header overrides a value of an earlier header.
    pub fn cookie_values(&self) -> Parameters {
        let mut values = Parameters::new();

        for header in self.headers.get_all(COOKIE) {
            match header {
                Header::Cookie(cookie) => values.extend(cookie.values.iter()),
                other => {
                    let cookie = Cookie::from_value(&other.value());
                    values.extend(cookie.values);
                }
            }
        }

        values
    }

    pub fn cookie_value(&self, name: &str) -> Option<String> {
        self.cookie_values().remove(name)
    }

    /// Removes the cookie from all `Cookie` headers.
    ///
    /// Headers left without cookies are removed.
    pub fn remove_cookie(&mut self, name: &str) {
        for header in self.headers.get_all_mut(COOKIE) {
            let mut cookie = match &*header {
                Header::Cookie(cookie) => cookie.clone(),
                other => Cookie::from_value(&other.value()),
            };
            cookie.remove(name);
            *header = cookie.into();
        }

        self.headers
            .retain(|h| !h.as_cookie().is_some_and(Cookie::is_empty));
    }

    pub fn clear_cookies(&mut self) {
        self.headers.remove(COOKIE);
    }

    pub fn body(&self) -> &[u8] {
        &self.body
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

    /// Parses a raw request.
    ///
    /// Missing parts of the request line are left empty.
    pub fn parse(input: &[u8]) -> Self {
        let envelope = Envelope::split(input);
        let [method, uri, version] = envelope.start_line_parts();

        Self {
            method: method.to_string(),
            uri: uri.to_string(),
            scheme: "http".to_string(),
            http_version: version.to_string(),
            headers: envelope.headers,
            body: envelope.body.to_vec(),
        }
    }

    pub fn serialize<W: Write>(&self, buf: W) -> std::io::Result<()> {
        let start_line = format!("{} {} {}", self.method, self.uri, self.http_version);
        serialize_message(buf, &start_line, &self.headers, &self.body)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        // Writing to a Vec does not fail
        let _ = self.serialize(&mut buf);
        buf
    }
}

impl Default for Request {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Display for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.to_bytes()))
    }
}
