use serde::Serialize;

use crate::{error::GrammarError, params::Parameters};

use super::{COOKIE, HeaderField, decode_cookie_value, encode_cookie_value};

/// Request `Cookie` header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cookie {
    pub values: Parameters,
}

impl Cookie {
    pub fn new(values: Parameters) -> Self {
        Self { values }
    }

    /// Parses a value that has no failure mode.
    pub fn from_value(value: &str) -> Self {
        let mut cookie = Self::default();
        cookie.set_cookie_pairs(value);
        cookie
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name)
    }

    pub fn set<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) {
        self.values.insert(name, value);
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn set_cookie_pairs(&mut self, value: &str) {
        self.values.clear();

        for segment in value.split("; ") {
            if let Some((name, value)) = segment.split_once('=') {
                self.values.insert(name, decode_cookie_value(value));
            }
        }
    }
}

impl HeaderField for Cookie {
    fn name(&self) -> &str {
        COOKIE
    }

    fn value(&self) -> String {
        self.values
            .iter()
            .map(|(name, value)| format!("{}={}", name, encode_cookie_value(value)))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn set_value(&mut self, value: &str) -> Result<(), GrammarError> {
        self.set_cookie_pairs(value);
        Ok(())
    }
}
