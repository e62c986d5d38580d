use serde::Serialize;

use crate::{
    error::GrammarError,
    grammar,
    media::{MediaRange, escape_value},
    params::Parameters,
};

use super::{CONTENT_TYPE, HeaderField};

/// `Content-Type` header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentType {
    #[serde(rename = "type")]
    pub type_: String,
    pub subtype: String,
    pub parameters: Parameters,
}

impl ContentType {
    pub fn new<T: Into<String>, S: Into<String>>(type_: T, subtype: S) -> Self {
        Self {
            type_: type_.into(),
            subtype: subtype.into(),
            parameters: Parameters::new(),
        }
    }

    pub fn with_parameter<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.parameters.insert(name, value);
        self
    }

    /// Returns `type/subtype`.
    pub fn media_type(&self) -> String {
        format!("{}/{}", self.type_, self.subtype)
    }

    pub fn charset(&self) -> Option<&str> {
        self.parameters.get("charset")
    }

    pub fn to_media_range(&self) -> MediaRange {
        MediaRange {
            type_: self.type_.clone(),
            subtype: self.subtype.clone(),
            parameters: self.parameters.clone(),
        }
    }
}

impl From<MediaRange> for ContentType {
    fn from(value: MediaRange) -> Self {
        Self {
            type_: value.type_,
            subtype: value.subtype,
            parameters: value.parameters,
        }
    }
}

impl HeaderField for ContentType {
    fn name(&self) -> &str {
        CONTENT_TYPE
    }

    fn value(&self) -> String {
        let mut value = self.media_type();

        for (name, param) in &self.parameters {
            value.push_str("; ");
            value.push_str(name);
            value.push('=');
            value.push_str(&escape_value(param));
        }

        value
    }

    fn set_value(&mut self, value: &str) -> Result<(), GrammarError> {
        *self = grammar::parse_media_range(value)?.into();
        Ok(())
    }
}
