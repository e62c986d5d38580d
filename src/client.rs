//! Client that sends requests through a transport
//!
//! The client adds its default headers to each request, attaches cookies
//! from its cookie jar, and stores the cookies set by the response.
use std::{io::Write, path::PathBuf, time::Duration};

use crate::{
    codec::{BodyCodec, FormUrlEncoded},
    cookie_jar::CookieJar,
    error::{GeneralError, TransportError},
    header::Header,
    message::{Headers, Request, Response},
    params::Parameters,
    transport::{Transport, TransportOptions},
};

#[derive(Debug)]
pub struct Client<T: Transport> {
    transport: T,
    headers: Headers,
    options: TransportOptions,
    cookie_jar: Option<CookieJar>,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            headers: Headers::new(),
            options: TransportOptions::default(),
            cookie_jar: None,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Default headers added to every request.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn add_header<H: Into<Header>>(&mut self, header: H) {
        self.headers.add(header);
    }

    pub fn set_header<H: Into<Header>>(&mut self, header: H) {
        self.headers.set(header);
    }

    pub fn remove_header(&mut self, name: &str) -> usize {
        self.headers.remove(name)
    }

    pub fn options(&self) -> &TransportOptions {
        &self.options
    }

    pub fn set_follow_location_header(&mut self, value: bool) {
        self.options.follow_location_header = value;
    }

    pub fn set_max_redirects(&mut self, value: u32) {
        self.options.max_redirects = value;
    }

    pub fn set_certificates(&mut self, path: Option<PathBuf>) {
        self.options.certificates = path;
    }

    pub fn set_proxy(&mut self, address: Option<String>) {
        self.options.proxy = address;
    }

    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.options.timeout = timeout;
    }

    pub fn cookie_jar(&self) -> Option<&CookieJar> {
        self.cookie_jar.as_ref()
    }

    pub fn cookie_jar_mut(&mut self) -> Option<&mut CookieJar> {
        self.cookie_jar.as_mut()
    }

    pub fn set_cookie_jar(&mut self, cookie_jar: Option<CookieJar>) {
        self.cookie_jar = cookie_jar;
    }

    pub fn take_cookie_jar(&mut self) -> Option<CookieJar> {
        self.cookie_jar.take()
    }

    /// Sends the request and returns the response with its body.
    ///
    /// The default headers are appended to the request and cookies from
    /// the jar are attached before the request is sent.
    pub fn request(&mut self, request: &mut Request) -> Result<Response, TransportError> {
        self.request_to(request, None)
    }

    /// Sends the request and writes the response body to the sink if
    /// given.
    pub fn request_to(
        &mut self,
        request: &mut Request,
        sink: Option<&mut dyn Write>,
    ) -> Result<Response, TransportError> {
        request.headers.extend(self.headers.iter().cloned());

        if let Some(jar) = &self.cookie_jar {
            jar.append_cookies(request);
        }

        tracing::debug!(method = request.method(), uri = request.uri(), "client request");
        let response = self.transport.execute(request, &self.options, sink)?;

        if let Some(jar) = &mut self.cookie_jar {
            jar.extract_cookies(request, &response);
        }

        Ok(response)
    }

    /// Sends a `GET` request with the query parameters appended to the URL.
    pub fn get(&mut self, url: &str, query: &Parameters) -> Result<Response, GeneralError> {
        let mut request = Request::new(Request::METHOD_GET, url)?;

        if !query.is_empty() {
            request.set_query_params(query);
        }

        Ok(self.request(&mut request)?)
    }

    /// Sends a `POST` request with a form encoded body.
    pub fn post(
        &mut self,
        url: &str,
        form: &Parameters,
        query: &Parameters,
    ) -> Result<Response, GeneralError> {
        let mut request = Request::new(Request::METHOD_POST, url)?;

        if !query.is_empty() {
            request.set_query_params(query);
        }

        let content_type = FormUrlEncoded::content_type();
        request.set_body(FormUrlEncoded.encode(form, Some(&content_type)));
        request.headers.set(content_type);

        Ok(self.request(&mut request)?)
    }
}
