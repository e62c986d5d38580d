//! Error representations
use std::{backtrace::Backtrace, fmt::Display};

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GeneralError {
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GeneralError {
    pub fn is_grammar(&self) -> bool {
        matches!(self, Self::Grammar(..))
    }

    pub fn as_grammar(&self) -> Option<&GrammarError> {
        if let Self::Grammar(v) = self {
            Some(v)
        } else {
            None
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(..))
    }

    pub fn as_transport(&self) -> Option<&TransportError> {
        if let Self::Transport(v) = self {
            Some(v)
        } else {
            None
        }
    }

    pub fn is_url(&self) -> bool {
        matches!(self, Self::Url(..))
    }

    pub fn as_url(&self) -> Option<&url::ParseError> {
        if let Self::Url(v) = self {
            Some(v)
        } else {
            None
        }
    }

    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(..))
    }

    pub fn as_io(&self) -> Option<&std::io::Error> {
        if let Self::Io(v) = self {
            Some(v)
        } else {
            None
        }
    }
}

/// Error for malformed header value grammar.
///
/// The error records where the parser stopped: the text that was still
/// unconsumed and the text consumed before the failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct GrammarError {
    kind: GrammarErrorKind,
    remaining: String,
    consumed: String,
}

impl GrammarError {
    pub fn new(kind: GrammarErrorKind) -> Self {
        Self {
            kind,
            remaining: String::new(),
            consumed: String::new(),
        }
    }

    pub fn with_remaining<S: Into<String>>(mut self, value: S) -> Self {
        self.remaining = value.into();
        self
    }

    pub fn with_consumed<S: Into<String>>(mut self, value: S) -> Self {
        self.consumed = value.into();
        self
    }

    pub fn kind(&self) -> GrammarErrorKind {
        self.kind
    }

    /// Text the parser had not consumed when it failed.
    pub fn remaining(&self) -> &str {
        &self.remaining
    }

    /// Text the parser consumed before it failed.
    pub fn consumed(&self) -> &str {
        &self.consumed
    }
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "grammar error: {}", self.kind)?;

        if !self.consumed.is_empty() {
            write!(f, " after '{}'", self.consumed.escape_debug())?;
        }

        if self.remaining.is_empty() {
            write!(f, " at end of input")?;
        } else {
            write!(f, " near '{}'", self.remaining.escape_debug())?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum GrammarErrorKind {
    ExpectedLinearWhiteSpace,
    ExpectedToken,
    ExpectedChar(char),
    UnterminatedQuotedString,
    ExpectedQuality,
    ExpectedQValue,
    MissingSeparator,
    TrailingInput,
}

impl Display for GrammarErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExpectedLinearWhiteSpace => write!(f, "linear white space expected"),
            Self::ExpectedToken => write!(f, "token expected"),
            Self::ExpectedChar(c) => write!(f, "'{}' expected", c.escape_debug()),
            Self::UnterminatedQuotedString => write!(f, "unterminated quoted string"),
            Self::ExpectedQuality => write!(f, "expected token 'q' in accept-params"),
            Self::ExpectedQValue => write!(f, "q-value expected"),
            Self::MissingSeparator => write!(f, "missing separator"),
            Self::TrailingInput => write!(f, "unexpected trailing input"),
        }
    }
}

/// Error raised by a transport while exchanging a message.
#[derive(Debug, thiserror::Error)]
pub struct TransportError {
    kind: TransportErrorKind,
    context: String,
    backtrace: Option<Box<Backtrace>>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind) -> Self {
        Self {
            kind,
            context: String::new(),
            backtrace: Some(Box::new(Backtrace::capture())),
            source: None,
        }
    }

    pub fn other(error: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Self::new(TransportErrorKind::Other).with_source(error)
    }

    pub fn with_context<S: AsRef<str>>(mut self, value: S) -> Self {
        self.context = value.as_ref().to_string();
        self
    }

    pub fn with_backtrace(mut self, backtrace: Backtrace) -> Self {
        self.backtrace = Some(Box::new(backtrace));
        self
    }

    pub fn with_source<T: Into<Box<dyn std::error::Error + Send + Sync>>>(
        mut self,
        source: T,
    ) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    pub fn context(&self) -> &str {
        &self.context
    }
}

impl Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "transport error: {}", self.kind)?;

        if !self.context.is_empty() {
            write!(f, ": {}", self.context)?;
        }

        if let Some(source) = &self.source {
            write!(f, " ({})", source)?;
        }

        Ok(())
    }
}

impl From<TransportErrorKind> for TransportError {
    fn from(value: TransportErrorKind) -> Self {
        Self::new(value)
    }
}

impl From<std::io::Error> for TransportError {
    fn from(value: std::io::Error) -> Self {
        Self::new(TransportErrorKind::Other).with_source(value)
    }
}

impl From<GrammarError> for TransportError {
    fn from(value: GrammarError) -> Self {
        Self::new(TransportErrorKind::Other).with_source(value)
    }
}

impl From<url::ParseError> for TransportError {
    fn from(value: url::ParseError) -> Self {
        Self::new(TransportErrorKind::Other).with_source(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum TransportErrorKind {
    UnknownHost,
    UnableToConnect,
    Other,
}

impl Display for TransportErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            Self::UnknownHost => "unknown host",
            Self::UnableToConnect => "unable to connect",
            Self::Other => "other",
        };

        f.write_str(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grammar_error_display() {
        let error = GrammarError::new(GrammarErrorKind::ExpectedToken)
            .with_consumed("text/html; ")
            .with_remaining("=bad");

        assert_eq!(error.kind(), GrammarErrorKind::ExpectedToken);
        assert_eq!(error.remaining(), "=bad");
        assert_eq!(error.consumed(), "text/html; ");
        assert_eq!(
            error.to_string(),
            "grammar error: token expected after 'text/html; ' near '=bad'"
        );
    }

    #[test]
    fn test_transport_error_kind() {
        let error: GeneralError = TransportError::new(TransportErrorKind::UnknownHost)
            .with_context("no.such.host")
            .into();

        assert!(error.is_transport());
        assert_eq!(
            error.as_transport().map(TransportError::kind),
            Some(TransportErrorKind::UnknownHost)
        );
        assert_eq!(
            error.to_string(),
            "transport error: unknown host: no.such.host"
        );
    }
}
