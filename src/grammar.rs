//! Recursive descent parser for header value grammar
//!
//! The parser is a cursor over a header value. Each `parse_` method
//! consumes a grammar production and, for tokens, separators and quality
//! values, any linear white space that follows it. On failure the cursor
//! is left where the production started failing and the returned error
//! records the remaining and consumed text.
pub mod lexical;

use nom::IResult;

use crate::{
    error::{GrammarError, GrammarErrorKind},
    media::{AcceptEntry, AcceptParams, MediaRange, QValue},
    params::Parameters,
};

#[derive(Debug, Clone)]
pub struct GrammarParser<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> GrammarParser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    /// Replaces the input and rewinds the cursor.
    pub fn set_text(&mut self, input: &'a str) {
        self.input = input;
        self.position = 0;
    }

    pub fn remaining(&self) -> &'a str {
        &self.input[self.position..]
    }

    pub fn consumed(&self) -> &'a str {
        &self.input[..self.position]
    }

    pub fn next_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn error(&self, kind: GrammarErrorKind) -> GrammarError {
        GrammarError::new(kind)
            .with_remaining(self.remaining())
            .with_consumed(self.consumed())
    }

    fn apply<F>(&mut self, mut parser: F, kind: GrammarErrorKind) -> Result<&'a str, GrammarError>
    where
        F: FnMut(&'a str) -> IResult<&'a str, &'a str>,
    {
        match parser(self.remaining()) {
            Ok((remaining, output)) => {
                self.position = self.input.len() - remaining.len();
                Ok(output)
            }
            Err(_) => Err(self.error(kind)),
        }
    }

    pub fn parse_linear_white_space(&mut self) -> Result<&'a str, GrammarError> {
        self.apply(
            lexical::linear_white_space,
            GrammarErrorKind::ExpectedLinearWhiteSpace,
        )
    }

    /// Consumes linear white space if present.
    pub fn consume_linear_white_space(&mut self) -> Option<&'a str> {
        let mut start = None;

        while let Ok(text) = self.parse_linear_white_space() {
            start.get_or_insert(self.position - text.len());
        }

        start.map(|start| &self.input[start..self.position])
    }

    pub fn parse_token(&mut self) -> Result<&'a str, GrammarError> {
        let token = self.apply(lexical::token, GrammarErrorKind::ExpectedToken)?;
        self.consume_linear_white_space();
        Ok(token)
    }

    /// Consumes exactly the given character.
    pub fn parse_char(&mut self, expected: char) -> Result<char, GrammarError> {
        if self.next_char() == Some(expected) {
            self.position += expected.len_utf8();
            Ok(expected)
        } else {
            Err(self.error(GrammarErrorKind::ExpectedChar(expected)))
        }
    }

    /// Consumes the character and any linear white space following it.
    pub fn parse_separator(&mut self, expected: char) -> Result<char, GrammarError> {
        self.parse_char(expected)?;
        self.consume_linear_white_space();
        Ok(expected)
    }

    /// Parses `"..."` and returns the unescaped content.
    ///
    /// A backslash escapes the following character. A line break inside
    /// the string must be folded with white space and becomes a single space.
    pub fn parse_quoted_string(&mut self) -> Result<String, GrammarError> {
        self.parse_char('"')?;

        let mut output = String::new();
        let mut escaping = false;

        while let Some(c) = self.next_char() {
            if escaping {
                escaping = false;
                output.push(c);
                self.position += c.len_utf8();
                continue;
            }

            match c {
                '\\' => {
                    escaping = true;
                    self.position += 1;
                }
                '"' => {
                    self.position += 1;
                    self.consume_linear_white_space();
                    return Ok(output);
                }
                '\r' => {
                    self.parse_linear_white_space()?;
                    output.push(' ');
                }
                _ => {
                    output.push(c);
                    self.position += c.len_utf8();
                }
            }
        }

        Err(self.error(GrammarErrorKind::UnterminatedQuotedString))
    }

    pub fn parse_attribute(&mut self) -> Result<&'a str, GrammarError> {
        self.parse_token()
    }

    /// Parses a token or quoted string.
    pub fn parse_value(&mut self) -> Result<String, GrammarError> {
        if self.next_char() == Some('"') {
            self.parse_quoted_string()
        } else {
            Ok(self.parse_token()?.to_string())
        }
    }

    /// Parses `attribute "=" value`.
    pub fn parse_parameter(&mut self) -> Result<(String, String), GrammarError> {
        let attribute = self.parse_attribute()?;
        self.parse_separator('=')?;
        let value = self.parse_value()?;

        Ok((attribute.to_string(), value))
    }

    /// Parses one or more elements separated by commas.
    pub fn parse_comma_separated_list<T, F>(&mut self, mut element: F) -> Result<Vec<T>, GrammarError>
    where
        F: FnMut(&mut Self) -> Result<T, GrammarError>,
    {
        let mut items = vec![element(self)?];

        while self.next_char() == Some(',') {
            self.parse_separator(',')?;
            items.push(element(self)?);
        }

        Ok(items)
    }

    /// Parses `type "/" subtype *( ";" parameter )`.
    ///
    /// Parameters stop before a `;` that introduces a quality value.
    pub fn parse_media_range(&mut self) -> Result<MediaRange, GrammarError> {
        let type_ = self.parse_token()?;
        self.parse_separator('/')?;
        let subtype = self.parse_token()?;

        let mut parameters = Parameters::new();

        while self.next_char() == Some(';') {
            if lexical::quality_marker(self.remaining()).is_ok() {
                break;
            }

            self.parse_separator(';')?;
            let (name, value) = self.parse_parameter()?;
            parameters.insert(name, value);
        }

        Ok(MediaRange {
            type_: type_.to_string(),
            subtype: subtype.to_string(),
            parameters,
        })
    }

    pub fn parse_qvalue(&mut self) -> Result<QValue, GrammarError> {
        let text = self.apply(lexical::qvalue, GrammarErrorKind::ExpectedQValue)?;
        self.consume_linear_white_space();
        Ok(QValue::from_lexeme(text))
    }

    /// Parses `";" "q" "=" qvalue *( accept-extension )`.
    pub fn parse_accept_params(&mut self) -> Result<AcceptParams, GrammarError> {
        self.parse_separator(';')?;

        if self.next_char() != Some('q') {
            return Err(self.error(GrammarErrorKind::ExpectedQuality));
        }

        self.parse_separator('q')?;
        self.parse_separator('=')?;
        let quality = self.parse_qvalue()?;

        let mut extensions = Vec::new();

        while self.next_char() == Some(';') {
            extensions.push(self.parse_accept_extension()?);
        }

        Ok(AcceptParams {
            quality: Some(quality),
            extensions,
        })
    }

    /// Parses `";" token [ "=" ( token | quoted-string ) ]`.
    fn parse_accept_extension(&mut self) -> Result<(String, Option<String>), GrammarError> {
        self.parse_separator(';')?;
        let name = self.parse_token()?.to_string();

        if self.next_char() == Some('=') {
            self.parse_separator('=')?;
            Ok((name, Some(self.parse_value()?)))
        } else {
            Ok((name, None))
        }
    }

    /// Parses a media range followed by optional accept params.
    pub fn parse_accept_entry(&mut self) -> Result<AcceptEntry, GrammarError> {
        let range = self.parse_media_range()?;

        let params = if self.next_char() == Some(';') {
            self.parse_accept_params()?
        } else {
            AcceptParams::default()
        };

        Ok(AcceptEntry { range, params })
    }

    /// Parses the comma separated list of an `Accept` value.
    pub fn parse_accept_value(&mut self) -> Result<Vec<AcceptEntry>, GrammarError> {
        self.parse_comma_separated_list(Self::parse_accept_entry)
    }

    pub fn expect_end(&self) -> Result<(), GrammarError> {
        if self.is_at_end() {
            Ok(())
        } else {
            Err(self.error(GrammarErrorKind::TrailingInput))
        }
    }
}

fn parse_complete<'a, T, F>(input: &'a str, mut production: F) -> Result<T, GrammarError>
where
    F: FnMut(&mut GrammarParser<'a>) -> Result<T, GrammarError>,
{
    let mut parser = GrammarParser::new(input);
    parser.consume_linear_white_space();
    let output = production(&mut parser)?;
    parser.expect_end()?;

    Ok(output)
}

/// Parses a complete media range such as a `Content-Type` value.
pub fn parse_media_range(input: &str) -> Result<MediaRange, GrammarError> {
    parse_complete(input, GrammarParser::parse_media_range)
}

/// Parses a complete `Accept` value.
pub fn parse_accept_value(input: &str) -> Result<Vec<AcceptEntry>, GrammarError> {
    parse_complete(input, GrammarParser::parse_accept_value)
}
