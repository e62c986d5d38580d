//! Media ranges, quality values and accept entries
use std::{borrow::Cow, fmt::Display, str::FromStr};

use serde::Serialize;

use crate::{
    error::{GrammarError, GrammarErrorKind},
    grammar::{self, lexical},
    params::Parameters,
};

/// Media range such as `text/html;level=1` or `*/*`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MediaRange {
    #[serde(rename = "type")]
    pub type_: String,
    pub subtype: String,
    pub parameters: Parameters,
}

impl MediaRange {
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

    /// Returns `type/subtype` without parameters.
    pub fn essence(&self) -> String {
        format!("{}/{}", self.type_, self.subtype)
    }

    pub fn is_wildcard_type(&self) -> bool {
        self.type_ == "*"
    }

    pub fn is_wildcard_subtype(&self) -> bool {
        self.subtype == "*"
    }
}

impl Display for MediaRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.type_, self.subtype)?;

        for (index, (name, value)) in self.parameters.iter().enumerate() {
            if index == 0 {
                f.write_str(";")?;
            } else {
                f.write_str("; ")?;
            }

            write!(f, "{}={}", name, escape_value(value))?;
        }

        Ok(())
    }
}

impl FromStr for MediaRange {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        grammar::parse_media_range(s)
    }
}

/// Quality value in thousandths, from 0 to 1000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "f32")]
pub struct QValue(u16);

impl QValue {
    pub const MIN: Self = Self(0);
    pub const MAX: Self = Self(1000);

    pub fn from_thousandths(value: u16) -> Option<Self> {
        if value <= 1000 {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn thousandths(self) -> u16 {
        self.0
    }

    pub fn as_f32(self) -> f32 {
        f32::from(self.0) / 1000.0
    }

    pub fn is_max(self) -> bool {
        self == Self::MAX
    }
}

impl Default for QValue {
    fn default() -> Self {
        Self::MAX
    }
}

impl From<QValue> for f32 {
    fn from(value: QValue) -> Self {
        value.as_f32()
    }
}

impl Display for QValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            1000 => f.write_str("1"),
            0 => f.write_str("0"),
            value => {
                let digits = format!("{:03}", value);
                write!(f, "0.{}", digits.trim_end_matches('0'))
            }
        }
    }
}

impl FromStr for QValue {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match lexical::qvalue(s) {
            Ok(("", text)) => Ok(Self::from_lexeme(text)),
            Ok((remaining, text)) => Err(GrammarError::new(GrammarErrorKind::TrailingInput)
                .with_consumed(text)
                .with_remaining(remaining)),
            Err(_) => Err(GrammarError::new(GrammarErrorKind::ExpectedQValue).with_remaining(s)),
        }
    }
}

impl QValue {
    /// Converts text already matched by the qvalue rule.
    pub(crate) fn from_lexeme(text: &str) -> Self {
        let (integer, fraction) = text.split_once('.').unwrap_or((text, ""));

        if integer == "1" {
            return Self::MAX;
        }

        let value = fraction
            .chars()
            .chain(std::iter::repeat('0'))
            .take(3)
            .filter_map(|c| c.to_digit(10))
            .fold(0u16, |acc, digit| acc * 10 + digit as u16);

        Self(value)
    }
}

/// Quality and extension parameters following a media range in `Accept`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AcceptParams {
    pub quality: Option<QValue>,
    pub extensions: Vec<(String, Option<String>)>,
}

impl AcceptParams {
    /// Returns the quality, defaulting to 1.
    pub fn quality(&self) -> QValue {
        self.quality.unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.quality.is_none() && self.extensions.is_empty()
    }
}

impl Display for AcceptParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let quality = self.quality();
        let mut parts = Vec::new();

        if !quality.is_max() || !self.extensions.is_empty() {
            parts.push(format!("q={}", quality));
        }

        for (name, value) in &self.extensions {
            match value {
                Some(value) => parts.push(format!("{}={}", name, escape_value(value))),
                None => parts.push(name.clone()),
            }
        }

        f.write_str(&parts.join("; "))
    }
}

/// Media range with its accept parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AcceptEntry {
    pub range: MediaRange,
    pub params: AcceptParams,
}

impl AcceptEntry {
    pub fn new(range: MediaRange) -> Self {
        Self {
            range,
            params: AcceptParams::default(),
        }
    }

    pub fn with_quality(mut self, quality: QValue) -> Self {
        self.params.quality = Some(quality);
        self
    }

    pub fn quality(&self) -> QValue {
        self.params.quality()
    }
}

impl Display for AcceptEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.range)?;

        let params = self.params.to_string();

        if !params.is_empty() {
            write!(f, "; {}", params)?;
        }

        Ok(())
    }
}

/// Formats a parameter value as a token when possible or as a quoted string.
pub fn escape_value(value: &str) -> Cow<'_, str> {
    if !value.is_empty() && value.chars().all(lexical::is_token_char) {
        return Cow::Borrowed(value);
    }

    let mut output = String::with_capacity(value.len() + 2);
    output.push('"');

    for c in value.chars() {
        if c == '"' || c == '\\' {
            output.push('\\');
        }
        output.push(c);
    }

    output.push('"');
    Cow::Owned(output)
}
