use serde::Serialize;

use crate::{
    error::GrammarError,
    grammar,
    media::AcceptEntry,
    negotiate,
};

use super::{ACCEPT, HeaderField};

/// `Accept` header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Accept {
    pub entries: Vec<AcceptEntry>,
}

impl Accept {
    pub fn new(entries: Vec<AcceptEntry>) -> Self {
        Self { entries }
    }

    /// Returns the entries in input order, or in order of preference when
    /// `sorted` is true.
    pub fn entries(&self, sorted: bool) -> Vec<&AcceptEntry> {
        let mut entries = self.entries.iter().collect::<Vec<_>>();

        if sorted {
            negotiate::sort_by_preference(&mut entries);
        }

        entries
    }

    pub fn push(&mut self, entry: AcceptEntry) {
        self.entries.push(entry);
    }

    /// Selects the supported media type that best satisfies this header.
    pub fn best_media_range_match<'s, S: AsRef<str>>(
        &self,
        supported: &'s [S],
    ) -> Result<Option<&'s str>, GrammarError> {
        negotiate::best_media_range_match(&self.entries, supported)
    }
}

impl HeaderField for Accept {
    fn name(&self) -> &str {
        ACCEPT
    }

    fn value(&self) -> String {
        self.entries
            .iter()
            .map(AcceptEntry::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn set_value(&mut self, value: &str) -> Result<(), GrammarError> {
        self.entries = grammar::parse_accept_value(value)?;
        Ok(())
    }
}
