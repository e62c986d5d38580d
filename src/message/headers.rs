use std::io::Write;

use crate::header::{Header, HeaderField};

/// Ordered list of headers.
///
/// Several headers may share a name. Lookups compare names without
/// regard to ASCII case and return the first header added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    headers: Vec<Header>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn clear(&mut self) {
        self.headers.clear();
    }

    /// Appends the header after any headers of the same name.
    pub fn add<H: Into<Header>>(&mut self, header: H) {
        self.headers.push(header.into());
    }

    /// Replaces all headers of the same name with the header.
    ///
    /// The header takes the position of the first header it replaces.
    pub fn set<H: Into<Header>>(&mut self, header: H) {
        let header = header.into();

        match self.headers.iter().position(|h| h.is_named(header.name())) {
            Some(index) => {
                let name = header.name().to_string();
                self.headers[index] = header;

                let mut current = 0;
                self.headers.retain(|h| {
                    let keep = current <= index || !h.is_named(&name);
                    current += 1;
                    keep
                });
            }
            None => self.headers.push(header),
        }
    }

    /// Removes all headers with the name and returns how many were removed.
    pub fn remove(&mut self, name: &str) -> usize {
        let len = self.headers.len();
        self.headers.retain(|h| !h.is_named(name));
        len - self.headers.len()
    }

    /// Keeps only the headers for which the predicate returns true.
    pub fn retain<F: FnMut(&Header) -> bool>(&mut self, predicate: F) {
        self.headers.retain(predicate);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h.is_named(name))
    }

    pub fn get(&self, name: &str) -> Option<&Header> {
        self.headers.iter().find(|h| h.is_named(name))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Header> {
        self.headers.iter_mut().find(|h| h.is_named(name))
    }

    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Header> + 'a {
        self.headers.iter().filter(move |h| h.is_named(name))
    }

    pub fn get_all_mut<'a>(&'a mut self, name: &'a str) -> impl Iterator<Item = &'a mut Header> + 'a {
        self.headers.iter_mut().filter(move |h| h.is_named(name))
    }

    /// Returns the formatted value of the first header with the name.
    pub fn get_value(&self, name: &str) -> Option<String> {
        self.get(name).map(HeaderField::value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Header> {
        self.headers.iter()
    }

    pub fn serialize<W: Write>(&self, mut buf: W) -> std::io::Result<()> {
        for header in &self.headers {
            buf.write_all(header.to_line().as_bytes())?;
            buf.write_all(b"\r\n")?;
        }

        Ok(())
    }
}

impl<H: Into<Header>> Extend<H> for Headers {
    fn extend<T: IntoIterator<Item = H>>(&mut self, iter: T) {
        self.headers.extend(iter.into_iter().map(Into::into));
    }
}

impl<H: Into<Header>> FromIterator<H> for Headers {
    fn from_iter<T: IntoIterator<Item = H>>(iter: T) -> Self {
        let mut headers = Self::new();
        headers.extend(iter);
        headers
    }
}

impl IntoIterator for Headers {
    type Item = Header;
    type IntoIter = std::vec::IntoIter<Header>;

    fn into_iter(self) -> Self::IntoIter {
        self.headers.into_iter()
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = &'a Header;
    type IntoIter = std::slice::Iter<'a, Header>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
