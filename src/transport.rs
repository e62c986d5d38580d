//! Transports that exchange a request for a response
//!
//! A transport sends one request and returns the response. The provided
//! [`Transport::execute`] method follows `Location` headers when
//! [`TransportOptions::follow_location_header`] is set. Each redirect is
//! sent as a new `GET` request without a body. When the redirect limit is
//! reached, the last response is returned as is.
pub mod h1;
mod tcp;

use std::{io::Write, path::PathBuf, time::Duration};

use url::Url;

use crate::{
    error::TransportError,
    message::{Request, Response},
};

pub use tcp::TcpTransport;

/// Options passed to a transport with each request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOptions {
    /// Path to CA certificates for TLS.
    pub certificates: Option<PathBuf>,
    pub follow_location_header: bool,
    pub max_redirects: u32,
    /// Proxy address as `host:port`.
    pub proxy: Option<String>,
    /// Read and write timeout.
    pub timeout: Option<Duration>,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            certificates: None,
            follow_location_header: false,
            max_redirects: 5,
            proxy: None,
            timeout: None,
        }
    }
}

pub trait Transport {
    /// Sends a request and receives the response.
    ///
    /// When a sink is given, the response body is written to it instead of
    /// the returned response.
    fn send(
        &mut self,
        request: &Request,
        options: &TransportOptions,
        sink: Option<&mut dyn Write>,
    ) -> Result<Response, TransportError>;

    /// Sends a request and follows redirects as configured.
    fn execute(
        &mut self,
        request: &Request,
        options: &TransportOptions,
        mut sink: Option<&mut dyn Write>,
    ) -> Result<Response, TransportError> {
        let mut response = self.send(
            request,
            options,
            sink.as_mut().map(|s| &mut **s as &mut dyn Write),
        )?;

        if !options.follow_location_header {
            return Ok(response);
        }

        let mut remaining = options.max_redirects;
        let mut url = request.url();

        while remaining > 0 {
            let Some(location) = response.location() else {
                break;
            };

            remaining -= 1;

            let next_url = resolve_location(url.as_ref(), &location)?;
            tracing::debug!(url = %next_url, status = response.status_code(), remaining, "following redirect");

            let next = Request::new(Request::METHOD_GET, next_url.as_str())?;
            response = self.send(
                &next,
                options,
                sink.as_mut().map(|s| &mut **s as &mut dyn Write),
            )?;
            url = Some(next_url);
        }

        if remaining == 0 && response.location().is_some() {
            tracing::debug!(status = response.status_code(), "redirect limit reached");
        }

        Ok(response)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(
        &mut self,
        request: &Request,
        options: &TransportOptions,
        sink: Option<&mut dyn Write>,
    ) -> Result<Response, TransportError> {
        (**self).send(request, options, sink)
    }
}

/// Resolves a `Location` value against the URL of the request it answers.
fn resolve_location(base: Option<&Url>, location: &str) -> Result<Url, url::ParseError> {
    match base {
        Some(base) => base.join(location),
        None => Url::parse(location),
    }
}
