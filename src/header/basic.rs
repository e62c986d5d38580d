use serde::Serialize;

use crate::error::GrammarError;

use super::HeaderField;

/// Header with an unstructured value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BasicHeader {
    pub name: String,
    pub value: String,
}

impl BasicHeader {
    pub fn new<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns the item at the index when the value is split by the delimiter.
    ///
    /// Items are trimmed of surrounding white space.
    pub fn item(&self, index: usize, delimiter: char) -> Option<&str> {
        self.value.split(delimiter).nth(index).map(str::trim)
    }

    pub fn items(&self, delimiter: char) -> impl Iterator<Item = &str> {
        self.value.split(delimiter).map(str::trim)
    }
}

impl HeaderField for BasicHeader {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> String {
        self.value.clone()
    }

    fn set_value(&mut self, value: &str) -> Result<(), GrammarError> {
        self.value = value.to_string();
        Ok(())
    }
}
