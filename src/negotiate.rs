//! Content negotiation
//!
//! Accept entries are tried from most to least preferred. Preference is
//! the quality value and, for equal qualities, how specific the media
//! range is. For each entry, the supported media types are scanned in
//! the order given and the first match wins.
use std::borrow::Borrow;

use crate::{
    error::GrammarError,
    grammar,
    media::{AcceptEntry, MediaRange},
};

/// Ranks a media range from least (0) to most (3) specific.
///
/// `*/*` ranks 0, `type/*` ranks 1, `type/subtype` ranks 2 and a
/// concrete range with parameters ranks 3.
pub fn specificity(range: &MediaRange) -> u8 {
    if range.is_wildcard_type() {
        0
    } else if range.is_wildcard_subtype() {
        1
    } else if range.parameters.is_empty() {
        2
    } else {
        3
    }
}

/// Sorts entries by descending quality, then descending specificity.
///
/// The sort is stable so equally preferred entries keep their input order.
pub fn sort_by_preference<E: Borrow<AcceptEntry>>(entries: &mut [E]) {
    entries.sort_by_key(|entry| {
        let entry = entry.borrow();
        std::cmp::Reverse((entry.quality(), specificity(&entry.range)))
    });
}

/// Returns whether a supported media type satisfies an accepted media range.
///
/// A `*` on either side matches any type or subtype. Every parameter of
/// the supported type must be present in the accepted range with an equal
/// value.
pub fn matches(supported: &MediaRange, accepted: &MediaRange) -> bool {
    let type_matches = supported.is_wildcard_type()
        || accepted.is_wildcard_type()
        || supported.type_ == accepted.type_;
    let subtype_matches = supported.is_wildcard_subtype()
        || accepted.is_wildcard_subtype()
        || supported.subtype == accepted.subtype;

    type_matches && subtype_matches && supported.parameters.is_subset_of(&accepted.parameters)
}

/// Selects the supported media type that best satisfies the accept entries.
///
/// Returns an error if a supported media type is malformed.
pub fn best_media_range_match<'s, S: AsRef<str>>(
    accept: &[AcceptEntry],
    supported: &'s [S],
) -> Result<Option<&'s str>, GrammarError> {
    let supported_ranges = supported
        .iter()
        .map(|text| Ok((text.as_ref(), grammar::parse_media_range(text.as_ref())?)))
        .collect::<Result<Vec<_>, GrammarError>>()?;

    let mut entries = accept.iter().collect::<Vec<_>>();
    sort_by_preference(&mut entries);

    for entry in entries {
        for (text, range) in &supported_ranges {
            if matches(range, &entry.range) {
                tracing::debug!(accepted = %entry, supported = text, "media type match");
                return Ok(Some(*text));
            }
        }
    }

    tracing::debug!("no acceptable media type");
    Ok(None)
}

/// Parses an `Accept` value and selects the best supported media type.
pub fn negotiate<'s, S: AsRef<str>>(
    accept: &str,
    supported: &'s [S],
) -> Result<Option<&'s str>, GrammarError> {
    let entries = grammar::parse_accept_value(accept)?;
    best_media_range_match(&entries, supported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GrammarErrorKind;

    #[test]
    fn test_specificity() {
        let parse = |s: &str| grammar::parse_media_range(s).unwrap();

        assert_eq!(specificity(&parse("*/*")), 0);
        assert_eq!(specificity(&parse("text/*")), 1);
        assert_eq!(specificity(&parse("text/html")), 2);
        assert_eq!(specificity(&parse("text/html;level=1")), 3);
    }

    #[test]
    fn test_matches() {
        let parse = |s: &str| grammar::parse_media_range(s).unwrap();

        assert!(matches(&parse("text/html"), &parse("text/html")));
        assert!(matches(&parse("text/html"), &parse("text/*")));
        assert!(matches(&parse("text/html"), &parse("*/*")));
        assert!(matches(&parse("*/*"), &parse("application/json")));
        assert!(!matches(&parse("text/html"), &parse("application/json")));
        assert!(matches(
            &parse("text/html;level=1"),
            &parse("text/html;level=1;charset=utf-8")
        ));
        assert!(!matches(&parse("text/html;level=1"), &parse("text/html")));
        assert!(matches(&parse("text/html"), &parse("text/html;level=1")));
    }

    #[test]
    fn test_quality_beats_input_order() {
        let supported = ["text/html", "application/json"];
        let result = negotiate("text/html;q=0.5, application/json;q=0.9", &supported);

        assert_eq!(result.unwrap(), Some("application/json"));
    }

    #[test]
    fn test_wildcard_fallback() {
        let accept = "text/html;q=0.5, application/json;q=0.9";

        assert_eq!(
            negotiate(accept, &["text/plain", "image/png"]).unwrap(),
            None
        );
        assert_eq!(
            negotiate(accept, &["text/html", "*/*"]).unwrap(),
            Some("*/*")
        );
    }

    #[test]
    fn test_specificity_breaks_ties() {
        let supported = ["text/plain", "text/html;level=1"];
        let result = negotiate("text/*, text/html;level=1", &supported);

        assert_eq!(result.unwrap(), Some("text/html;level=1"));
    }

    #[test]
    fn test_supported_order_within_entry() {
        let supported = ["text/plain", "text/html"];

        assert_eq!(negotiate("text/*", &supported).unwrap(), Some("text/plain"));
    }

    #[test]
    fn test_malformed_supported_type() {
        let error = negotiate("*/*", &["text/html; =bad"]).unwrap_err();

        assert_eq!(error.kind(), GrammarErrorKind::ExpectedToken);
    }

    #[test]
    fn test_sort_is_stable() {
        let mut entries = grammar::parse_accept_value("text/a, text/b, text/c;q=1").unwrap();
        sort_by_preference(&mut entries);

        let order = entries
            .iter()
            .map(|e| e.range.subtype.as_str())
            .collect::<Vec<_>>();
        assert_eq!(order, vec!["a", "b", "c"]);
    }
}
