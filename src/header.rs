//! Header fields
//!
//! A header is a name and a value. Most headers are kept as text in a
//! [`BasicHeader`]. Headers with a registered structured form, such as
//! `Content-Type` or `Set-Cookie`, are parsed into their own types so
//! their values can be inspected and modified.
mod accept;
mod basic;
mod content_type;
mod cookie;
mod set_cookie;

use serde::Serialize;

use crate::error::GrammarError;

pub use accept::Accept;
pub use basic::BasicHeader;
pub use content_type::ContentType;
pub use cookie::Cookie;
pub use set_cookie::{SetCookie, decode_cookie_value, encode_cookie_value};

pub const ACCEPT: &str = "Accept";
pub const CONTENT_LENGTH: &str = "Content-Length";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const COOKIE: &str = "Cookie";
pub const HOST: &str = "Host";
pub const LOCATION: &str = "Location";
pub const SET_COOKIE: &str = "Set-Cookie";

/// Common operations of all header types.
pub trait HeaderField {
    /// Returns the field name.
    fn name(&self) -> &str;

    /// Formats the value as it appears on the wire.
    fn value(&self) -> String;

    /// Replaces the contents by parsing a value.
    fn set_value(&mut self, value: &str) -> Result<(), GrammarError>;

    /// Returns `Name: value`.
    fn to_line(&self) -> String {
        format!("{}: {}", self.name(), self.value())
    }
}

/// Structured representation chosen for a header name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderKind {
    Basic,
    ContentType,
    Accept,
    Cookie,
    SetCookie,
}

const REGISTRY: [(&str, HeaderKind); 4] = [
    (CONTENT_TYPE, HeaderKind::ContentType),
    (ACCEPT, HeaderKind::Accept),
    (COOKIE, HeaderKind::Cookie),
    (SET_COOKIE, HeaderKind::SetCookie),
];

impl HeaderKind {
    /// Looks up the header kind by name, ignoring case.
    pub fn for_name(name: &str) -> Self {
        REGISTRY
            .iter()
            .find(|(n, _kind)| n.eq_ignore_ascii_case(name))
            .map(|(_n, kind)| *kind)
            .unwrap_or(Self::Basic)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Header {
    Basic(BasicHeader),
    ContentType(ContentType),
    Accept(Accept),
    Cookie(Cookie),
    SetCookie(SetCookie),
}

impl Header {
    /// Creates an unstructured header.
    pub fn new<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        Self::Basic(BasicHeader::new(name, value))
    }

    /// Creates a header of the kind registered for the name.
    pub fn parse(name: &str, value: &str) -> Result<Self, GrammarError> {
        let header = match HeaderKind::for_name(name) {
            HeaderKind::Basic => Self::new(name, value),
            HeaderKind::ContentType => Self::parsed(ContentType::default(), value)?,
            HeaderKind::Accept => Self::parsed(Accept::default(), value)?,
            HeaderKind::Cookie => Self::parsed(Cookie::default(), value)?,
            HeaderKind::SetCookie => Self::parsed(SetCookie::default(), value)?,
        };

        Ok(header)
    }

    fn parsed<H>(mut header: H, value: &str) -> Result<Self, GrammarError>
    where
        H: HeaderField + Into<Self>,
    {
        header.set_value(value)?;
        Ok(header.into())
    }

    /// Like [`Self::parse`] but keeps a value that does not parse as a
    /// basic header.
    pub fn parse_lenient(name: &str, value: &str) -> Self {
        match Self::parse(name, value) {
            Ok(header) => header,
            Err(error) => {
                tracing::warn!(name, %error, "keeping malformed header value as text");
                Self::new(name, value)
            }
        }
    }

    /// Splits `Name: value` and parses the value.
    ///
    /// Returns `None` when the line has no colon separator.
    pub fn parse_line(line: &str) -> Result<Option<Self>, GrammarError> {
        match split_line(line) {
            Some((name, value)) => Ok(Some(Self::parse(name, value)?)),
            None => Ok(None),
        }
    }

    /// Like [`Self::parse_line`] but falls back to a basic header.
    pub fn parse_line_lenient(line: &str) -> Option<Self> {
        split_line(line).map(|(name, value)| Self::parse_lenient(name, value))
    }

    pub fn kind(&self) -> HeaderKind {
        match self {
            Self::Basic(_) => HeaderKind::Basic,
            Self::ContentType(_) => HeaderKind::ContentType,
            Self::Accept(_) => HeaderKind::Accept,
            Self::Cookie(_) => HeaderKind::Cookie,
            Self::SetCookie(_) => HeaderKind::SetCookie,
        }
    }

    /// Returns whether the header has the name, ignoring case.
    pub fn is_named(&self, name: &str) -> bool {
        self.name().eq_ignore_ascii_case(name)
    }

    fn field(&self) -> &dyn HeaderField {
        match self {
            Self::Basic(h) => h,
            Self::ContentType(h) => h,
            Self::Accept(h) => h,
            Self::Cookie(h) => h,
            Self::SetCookie(h) => h,
        }
    }

    fn field_mut(&mut self) -> &mut dyn HeaderField {
        match self {
            Self::Basic(h) => h,
            Self::ContentType(h) => h,
            Self::Accept(h) => h,
            Self::Cookie(h) => h,
            Self::SetCookie(h) => h,
        }
    }

    pub fn as_basic(&self) -> Option<&BasicHeader> {
        if let Self::Basic(v) = self {
            Some(v)
        } else {
            None
        }
    }

    pub fn as_content_type(&self) -> Option<&ContentType> {
        if let Self::ContentType(v) = self {
            Some(v)
        } else {
            None
        }
    }

    pub fn as_accept(&self) -> Option<&Accept> {
        if let Self::Accept(v) = self {
            Some(v)
        } else {
            None
        }
    }

    pub fn as_cookie(&self) -> Option<&Cookie> {
        if let Self::Cookie(v) = self {
            Some(v)
        } else {
            None
        }
    }

    pub fn as_cookie_mut(&mut self) -> Option<&mut Cookie> {
        if let Self::Cookie(v) = self {
            Some(v)
        } else {
            None
        }
    }

    pub fn as_set_cookie(&self) -> Option<&SetCookie> {
        if let Self::SetCookie(v) = self {
            Some(v)
        } else {
            None
        }
    }
}

impl HeaderField for Header {
    fn name(&self) -> &str {
        self.field().name()
    }

    fn value(&self) -> String {
        self.field().value()
    }

    fn set_value(&mut self, value: &str) -> Result<(), GrammarError> {
        self.field_mut().set_value(value)
    }
}

impl std::fmt::Display for Header {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_line())
    }
}

impl From<BasicHeader> for Header {
    fn from(value: BasicHeader) -> Self {
        Self::Basic(value)
    }
}

impl From<ContentType> for Header {
    fn from(value: ContentType) -> Self {
        Self::ContentType(value)
    }
}

impl From<Accept> for Header {
    fn from(value: Accept) -> Self {
        Self::Accept(value)
    }
}

impl From<Cookie> for Header {
    fn from(value: Cookie) -> Self {
        Self::Cookie(value)
    }
}

impl From<SetCookie> for Header {
    fn from(value: SetCookie) -> Self {
        Self::SetCookie(value)
    }
}

/// Splits a header line at the first colon.
///
/// A single space after the colon belongs to the separator.
fn split_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (name, value) = line.split_once(':')?;

    if name.is_empty() {
        return None;
    }

    Some((name, value.strip_prefix(' ').unwrap_or(value)))
}
