use std::borrow::Cow;

use chrono::{DateTime, NaiveDateTime, Utc};
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::error::{GrammarError, GrammarErrorKind};

use super::{HeaderField, SET_COOKIE};

/// Controls, separators, `%` and `+`. Non-ASCII bytes are always encoded.
const COOKIE_VALUE_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b',')
    .add(b';')
    .add(b'%')
    .add(b'+');

const EXPIRES_FORMAT: &str = "%a, %d-%b-%Y %H:%M:%S GMT";
const EXPIRES_FORMAT_RFC1123: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Percent-encodes characters that cannot appear in a cookie value.
pub fn encode_cookie_value(value: &str) -> Cow<'_, str> {
    utf8_percent_encode(value, COOKIE_VALUE_ENCODE_SET).into()
}

/// Decodes a cookie value where `+` stands for a space.
pub fn decode_cookie_value(value: &str) -> String {
    let value = value.replace('+', " ");
    percent_decode_str(&value).decode_utf8_lossy().into_owned()
}

/// Response `Set-Cookie` header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    /// Unix timestamp, or 0 for a session cookie.
    pub expire: i64,
    pub path: String,
    pub domain: String,
    pub secure: bool,
    pub http_only: bool,
}

impl SetCookie {
    pub fn new<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn with_expire(mut self, expire: i64) -> Self {
        self.expire = expire;
        self
    }

    pub fn with_path<S: Into<String>>(mut self, path: S) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_domain<S: Into<String>>(mut self, domain: S) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn is_session(&self) -> bool {
        self.expire == 0
    }

    /// Returns whether storing this cookie removes the cookie of the same name.
    pub fn is_deletion(&self) -> bool {
        self.value.is_empty()
    }

    /// Returns the expiration time, clamped to the range chrono can represent.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        match self.expire {
            0 => None,
            expire => Some(DateTime::from_timestamp(expire, 0).unwrap_or(if expire > 0 {
                DateTime::<Utc>::MAX_UTC
            } else {
                DateTime::<Utc>::MIN_UTC
            })),
        }
    }

    fn apply_attribute(&mut self, name: &str, value: Option<&str>) {
        let value = value.unwrap_or_default();

        if name.eq_ignore_ascii_case("expires") {
            match parse_expires(value) {
                Some(timestamp) => self.expire = timestamp,
                None => tracing::debug!(value, "ignoring unrecognized cookie date"),
            }
        } else if name.eq_ignore_ascii_case("max-age") {
            match value.parse::<i64>() {
                Ok(seconds) => self.expire = Utc::now().timestamp().saturating_add(seconds),
                Err(_) => tracing::debug!(value, "ignoring unrecognized cookie max-age"),
            }
        } else if name.eq_ignore_ascii_case("path") {
            self.path = value.to_string();
        } else if name.eq_ignore_ascii_case("domain") {
            self.domain = value.strip_prefix('.').unwrap_or(value).to_string();
        } else if name.eq_ignore_ascii_case("secure") {
            self.secure = true;
        } else if name.eq_ignore_ascii_case("httponly") {
            self.http_only = true;
        } else {
            tracing::trace!(name, "ignoring cookie attribute");
        }
    }
}

fn parse_expires(value: &str) -> Option<i64> {
    [EXPIRES_FORMAT, EXPIRES_FORMAT_RFC1123]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|datetime| datetime.and_utc().timestamp())
        .or_else(|| {
            DateTime::parse_from_rfc2822(value)
                .ok()
                .map(|datetime| datetime.timestamp())
        })
}

impl HeaderField for SetCookie {
    fn name(&self) -> &str {
        SET_COOKIE
    }

    fn value(&self) -> String {
        let mut value = format!("{}={}", self.name, encode_cookie_value(&self.value));

        if let Some(expires) = self.expires_at() {
            value.push_str("; Expires=");
            value.push_str(&expires.format(EXPIRES_FORMAT).to_string());
        }

        if !self.path.is_empty() {
            value.push_str("; Path=");
            value.push_str(&self.path);
        }

        if !self.domain.is_empty() {
            value.push_str("; Domain=");
            value.push_str(&self.domain);
        }

        if self.secure {
            value.push_str("; Secure");
        }

        if self.http_only {
            value.push_str("; HttpOnly");
        }

        value
    }

    fn set_value(&mut self, value: &str) -> Result<(), GrammarError> {
        let mut segments = value.split(';');
        let pair = segments.next().unwrap_or_default().trim();

        let Some((name, cookie_value)) = pair.split_once('=') else {
            return Err(GrammarError::new(GrammarErrorKind::MissingSeparator).with_remaining(pair));
        };

        let name = name.trim();

        if name.is_empty() {
            return Err(GrammarError::new(GrammarErrorKind::ExpectedToken).with_remaining(pair));
        }

        let mut cookie = Self::new(name, decode_cookie_value(cookie_value.trim()));

        for segment in segments {
            let segment = segment.trim();

            if segment.is_empty() {
                continue;
            }

            match segment.split_once('=') {
                Some((name, value)) => cookie.apply_attribute(name.trim(), Some(value.trim())),
                None => cookie.apply_attribute(segment, None),
            }
        }

        *self = cookie;
        Ok(())
    }
}
