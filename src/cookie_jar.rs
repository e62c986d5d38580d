//! Cookie storage across requests
//!
//! Cookies are stored by lowercase domain. Looking up the cookies for a
//! host walks its domain suffixes from the top level domain to the full
//! host name, so cookies stored for `example.com` are sent to
//! `www.example.com` unless the more specific domain stores a cookie of the
//! same name.
//!
//! Expiry, `Secure` and `Path` attributes are stored but not checked
//! when cookies are attached to a request.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    header::{Cookie, HeaderField, SET_COOKIE, SetCookie},
    message::{Request, Response},
    params::Parameters,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieJar {
    domains: HashMap<String, Vec<SetCookie>>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the cookie for the domain.
    ///
    /// A cookie with an empty value removes the stored cookie of the same
    /// name instead.
    pub fn set_cookie(&mut self, domain: &str, cookie: SetCookie) {
        let domain = domain.to_lowercase();

        if cookie.is_deletion() {
            if let Some(cookies) = self.domains.get_mut(&domain) {
                cookies.retain(|c| c.name != cookie.name);

                if cookies.is_empty() {
                    self.domains.remove(&domain);
                }
            }

            tracing::debug!(domain, name = cookie.name, "cookie removed");
            return;
        }

        tracing::debug!(domain, name = cookie.name, "cookie stored");
        let cookies = self.domains.entry(domain).or_default();

        match cookies.iter_mut().find(|c| c.name == cookie.name) {
            Some(stored) => *stored = cookie,
            None => cookies.push(cookie),
        }
    }

    /// Stores the cookies set by a response.
    ///
    /// Cookies without a domain attribute belong to the host of the request.
    pub fn extract_cookies(&mut self, request: &Request, response: &Response) {
        let default_domain = request.host().map(|host| host_domain(&host).to_string());

        for header in response.headers.get_all(SET_COOKIE) {
            let cookie = match header.as_set_cookie() {
                Some(cookie) => cookie.clone(),
                None => {
                    let mut cookie = SetCookie::default();

                    if let Err(error) = cookie.set_value(&header.value()) {
                        tracing::debug!(%error, "skipping malformed Set-Cookie");
                        continue;
                    }

                    cookie
                }
            };

            if !cookie.domain.is_empty() {
                let domain = cookie.domain.clone();
                self.set_cookie(&domain, cookie);
            } else if let Some(domain) = &default_domain {
                self.set_cookie(domain, cookie);
            } else {
                tracing::debug!(name = cookie.name, "skipping cookie for request without Host");
            }
        }
    }

    /// Adds a `Cookie` header with the stored cookies for the request host.
    pub fn append_cookies(&self, request: &mut Request) {
        let Some(host) = request.host() else {
            tracing::debug!("not appending cookies to request without Host");
            return;
        };

        if let Some(cookie) = self.get_cookie(host_domain(&host)) {
            request.headers.add(cookie);
        }
    }

    /// Returns the cookies that apply to the domain.
    pub fn get_cookie(&self, domain: &str) -> Option<Cookie> {
        let domain = domain.to_lowercase();
        let mut suffix = String::new();
        let mut values = Parameters::new();

        for label in domain.rsplit('.') {
            if suffix.is_empty() {
                suffix = label.to_string();
            } else {
                suffix = format!("{}.{}", label, suffix);
            }

            if let Some(cookies) = self.domains.get(&suffix) {
                for cookie in cookies {
                    values.insert(cookie.name.as_str(), cookie.value.as_str());
                }
            }
        }

        if values.is_empty() {
            None
        } else {
            Some(Cookie::new(values))
        }
    }

    /// Returns the cookies stored for exactly the domain.
    pub fn cookies(&self, domain: &str) -> &[SetCookie] {
        self.domains
            .get(&domain.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.domains.keys().map(String::as_str)
    }

    /// Returns the number of stored cookies.
    pub fn len(&self) -> usize {
        self.domains.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn clear(&mut self) {
        self.domains.clear();
    }
}

/// Removes a port from a `Host` value.
fn host_domain(host: &str) -> &str {
    match host.rsplit_once(':') {
        Some((domain, port))
            if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) && !domain.ends_with(':') =>
        {
            domain
        }
        _ => host,
    }
}
