//! Ordered name-value parameters
//!
//! Parameters appear in media types (`charset=utf-8`), in the `Cookie`
//! header and in form encoded bodies. Names are compared exactly and a
//! later write to an existing name replaces the value in place, keeping
//! the position of the first occurrence.
mod de;
mod ser;

/// Ordered map of parameter names to values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    pairs: Vec<(String, String)>,
}

impl Parameters {
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pairs: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn clear(&mut self) {
        self.pairs.clear()
    }

    /// Sets the value for the name and returns the value it replaced.
    pub fn insert<N, V>(&mut self, name: N, value: V) -> Option<String>
    where
        N: Into<String>,
        V: Into<String>,
    {
        let name = name.into();
        let value = value.into();

        if let Some((_n, v)) = self.pairs.iter_mut().find(|(n, _v)| *n == name) {
            Some(std::mem::replace(v, value))
        } else {
            self.pairs.push((name, value));
            None
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.pairs.iter().position(|(n, _v)| n == name)?;
        Some(self.pairs.remove(index).1)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.pairs.iter().any(|(n, _v)| n == name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _v)| n == name)
            .map(|(_n, v)| v.as_str())
    }

    /// Returns whether every pair in `self` is present in `other` with an
    /// equal value.
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.pairs
            .iter()
            .all(|(name, value)| other.get(name) == Some(value.as_str()))
    }

    pub fn iter(&self) -> ParametersIter<'_> {
        ParametersIter {
            pairs: self.pairs.iter(),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(n, _v)| n.as_str())
    }
}

impl IntoIterator for Parameters {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = (&'a str, &'a str);
    type IntoIter = ParametersIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<N: Into<String>, V: Into<String>> Extend<(N, V)> for Parameters {
    fn extend<T: IntoIterator<Item = (N, V)>>(&mut self, iter: T) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Parameters {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut parameters = Self::new();
        parameters.extend(iter);
        parameters
    }
}

pub struct ParametersIter<'a> {
    pairs: std::slice::Iter<'a, (String, String)>,
}

impl<'a> Iterator for ParametersIter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.pairs.next().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pairs.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameters_insert_replaces_in_place() {
        let mut p = Parameters::new();

        assert_eq!(p.insert("a", "1"), None);
        assert_eq!(p.insert("b", "2"), None);
        assert_eq!(p.insert("a", "3"), Some("1".to_string()));

        assert_eq!(p.len(), 2);
        assert_eq!(p.iter().collect::<Vec<_>>(), vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_parameters_case_sensitive() {
        let p = Parameters::from_iter([("Level", "1")]);

        assert!(p.contains_name("Level"));
        assert!(!p.contains_name("level"));
        assert_eq!(p.get("level"), None);
    }

    #[test]
    fn test_parameters_remove() {
        let mut p = Parameters::from_iter([("a", "1"), ("b", "2")]);

        assert_eq!(p.remove("a"), Some("1".to_string()));
        assert_eq!(p.remove("a"), None);
        assert_eq!(p.names().collect::<Vec<_>>(), vec!["b"]);

        p.clear();
        assert!(p.is_empty());
    }

    #[test]
    fn test_parameters_subset() {
        let small = Parameters::from_iter([("level", "1")]);
        let big = Parameters::from_iter([("charset", "utf-8"), ("level", "1")]);
        let other = Parameters::from_iter([("level", "2")]);

        assert!(Parameters::new().is_subset_of(&small));
        assert!(small.is_subset_of(&big));
        assert!(!big.is_subset_of(&small));
        assert!(!other.is_subset_of(&big));
    }
}
