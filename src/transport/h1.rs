//! HTTP/1.1 wire format for the TCP transport
pub mod chunked;
pub mod compress;

use std::{borrow::Cow, sync::LazyLock};

use regex::Regex;

use crate::{
    error::{TransportError, TransportErrorKind},
    header::{CONTENT_LENGTH, HeaderField},
    message::{Request, status},
};

use self::{
    chunked::ChunkedDecoder,
    compress::{ContentCoding, ContentDecoder},
};

/// Status line and fields of a response.
#[derive(Debug, Clone)]
pub struct ResponseHead {
    pub http_version: String,
    pub status_code: u16,
    pub reason_phrase: String,
    pub fields: Vec<(String, String)>,
}

impl ResponseHead {
    /// Parses a response head ending with an empty line.
    pub fn parse(input: &[u8]) -> Result<Self, TransportError> {
        let (remaining, line) = parse::status_line(input).map_err(|_| malformed("status line"))?;
        let (_remaining, lines) = parse::field_lines(remaining).map_err(|_| malformed("fields"))?;

        let fields = lines
            .into_iter()
            .filter_map(|line| match line {
                parse::FieldLine::Pair(name, value) => Some((
                    String::from_utf8_lossy(name).into_owned(),
                    remove_line_folding(&String::from_utf8_lossy(value)).into_owned(),
                )),
                parse::FieldLine::Malformed(line) => {
                    let line = String::from_utf8_lossy(line);
                    tracing::debug!(%line, "skipping malformed field line");
                    None
                }
            })
            .collect();

        Ok(Self {
            http_version: String::from_utf8_lossy(line.http_version).into_owned(),
            status_code: std::str::from_utf8(line.status_code)
                .ok()
                .and_then(|code| code.parse().ok())
                .ok_or_else(|| malformed("status code"))?,
            reason_phrase: String::from_utf8_lossy(line.reason_phrase).into_owned(),
            fields,
        })
    }

    /// Returns the first field value with the name, ignoring case.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _v)| n.eq_ignore_ascii_case(name))
            .map(|(_n, v)| v.as_str())
    }

    /// Returns the lowercase items of all comma separated fields with the name.
    pub fn field_items<'a>(&'a self, name: &'a str) -> impl Iterator<Item = String> + 'a {
        self.fields
            .iter()
            .filter(move |(n, _v)| n.eq_ignore_ascii_case(name))
            .flat_map(|(_n, v)| v.split(','))
            .map(|item| item.trim().to_ascii_lowercase())
            .filter(|item| !item.is_empty())
    }
}

fn malformed(part: &str) -> TransportError {
    TransportError::new(TransportErrorKind::Other).with_context(format!("malformed response {}", part))
}

/// Returns the length of the head including the terminating empty line.
pub fn scan_head_end(data: &[u8]) -> Option<usize> {
    match parse::head_lines(data) {
        Ok((_remaining, head)) => Some(head.len()),
        Err(_) => None,
    }
}

/// Joins folded field value lines with a single space.
pub fn remove_line_folding(value: &str) -> Cow<'_, str> {
    static FOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:\r\n|\n)[ \t]+").unwrap());

    FOLD.replace_all(value, " ")
}

/// Formats the request for sending with the request target.
///
/// `Content-Length` is added for a non-empty body and `Connection: close`
/// is added unless the request has a `Connection` header.
pub fn encode_request(request: &Request, target: &str) -> Vec<u8> {
    let mut buf = format!("{} {} {}\r\n", request.method(), target, request.http_version());

    for header in &request.headers {
        buf.push_str(&header.to_line());
        buf.push_str("\r\n");
    }

    if !request.body().is_empty() && !request.headers.contains(CONTENT_LENGTH) {
        buf.push_str(&format!("{}: {}\r\n", CONTENT_LENGTH, request.body().len()));
    }

    if !request.headers.contains("Connection") {
        buf.push_str("Connection: close\r\n");
    }

    buf.push_str("\r\n");

    let mut data = buf.into_bytes();
    data.extend_from_slice(request.body());
    data
}

#[derive(Debug)]
enum Framing {
    Empty,
    Length(u64),
    Chunked(ChunkedDecoder),
    UntilClose,
}

/// Removes transfer and content codings from a response body.
#[derive(Debug)]
pub struct BodyDecoder {
    framing: Framing,
    codings: Vec<ContentDecoder>,
    buf: Vec<u8>,
}

impl BodyDecoder {
    pub fn new(head: &ResponseHead, request_method: &str) -> Result<Self, TransportError> {
        let framing = if request_method.eq_ignore_ascii_case(Request::METHOD_HEAD)
            || status::is_informational(head.status_code)
            || head.status_code == 204
            || head.status_code == 304
        {
            Framing::Empty
        } else if head.field_items("Transfer-Encoding").any(|item| item == "chunked") {
            Framing::Chunked(ChunkedDecoder::new())
        } else if let Some(length) = head.field(CONTENT_LENGTH) {
            let length = length
                .trim()
                .parse()
                .map_err(|error| malformed("content length").with_source(error))?;
            Framing::Length(length)
        } else {
            Framing::UntilClose
        };

        let mut codings = Vec::new();

        // Codings are listed in the order they were applied
        for name in head.field_items("Content-Encoding") {
            let coding = name
                .parse::<ContentCoding>()
                .map_err(|error| TransportError::new(TransportErrorKind::Other).with_source(error))?;

            if coding != ContentCoding::Identity {
                codings.insert(0, ContentDecoder::new(coding));
            }
        }

        tracing::trace!(?framing, ?codings, "response body decoder");

        Ok(Self {
            framing,
            codings,
            buf: Vec::new(),
        })
    }

    /// Returns whether the end of the body is known to be reached.
    pub fn is_done(&self) -> bool {
        match &self.framing {
            Framing::Empty => true,
            Framing::Length(remaining) => *remaining == 0,
            Framing::Chunked(decoder) => decoder.is_done(),
            Framing::UntilClose => false,
        }
    }

    pub fn transform(&mut self, input: &[u8], output: &mut Vec<u8>) -> Result<(), TransportError> {
        match &mut self.framing {
            Framing::Empty => {}
            Framing::Length(remaining) => {
                let len = input.len().min(usize::try_from(*remaining).unwrap_or(usize::MAX));
                self.buf.extend_from_slice(&input[..len]);
                *remaining -= len as u64;
            }
            Framing::Chunked(decoder) => decoder.transform(input, &mut self.buf)?,
            Framing::UntilClose => self.buf.extend_from_slice(input),
        }

        self.decode_codings(output, false)
    }

    /// Flushes the content decoders at the end of the input.
    pub fn finish(mut self, output: &mut Vec<u8>) -> Result<(), TransportError> {
        match &self.framing {
            Framing::Length(remaining) if *remaining > 0 => {
                return Err(TransportError::new(TransportErrorKind::Other)
                    .with_context(format!("connection closed with {} body bytes missing", remaining)));
            }
            Framing::Chunked(decoder) if !decoder.is_done() => {
                return Err(TransportError::new(TransportErrorKind::Other)
                    .with_context("connection closed before last chunk"));
            }
            _ => {}
        }

        self.decode_codings(output, true)
    }

    fn decode_codings(&mut self, output: &mut Vec<u8>, finish: bool) -> Result<(), TransportError> {
        let mut data = std::mem::take(&mut self.buf);

        if finish {
            for mut decoder in std::mem::take(&mut self.codings) {
                let mut decoded = Vec::new();
                decoder.transform(&data, &mut decoded)?;
                decoder.finish(&mut decoded)?;
                data = decoded;
            }
        } else {
            for decoder in &mut self.codings {
                let mut decoded = Vec::new();
                decoder.transform(&data, &mut decoded)?;
                data = decoded;
            }
        }

        output.append(&mut data);
        Ok(())
    }
}

mod parse {
    use nom::{
        IResult, Parser,
        branch::alt,
        bytes::complete::{tag, tag_no_case, take_till1, take_while, take_while_m_n, take_while1},
        character::complete::{line_ending, space0, space1},
        combinator::{opt, recognize},
        multi::{many0, many0_count},
        sequence::{pair, preceded, separated_pair, terminated},
    };

    pub struct StatusLine<'a> {
        pub http_version: &'a [u8],
        pub status_code: &'a [u8],
        pub reason_phrase: &'a [u8],
    }

    pub fn head_lines(input: &[u8]) -> IResult<&[u8], &[u8]> {
        let line = terminated(take_till1(|b: u8| b == b'\r' || b == b'\n'), line_ending);
        recognize(terminated(many0_count(line), line_ending)).parse(input)
    }

    pub fn status_line(input: &[u8]) -> IResult<&[u8], StatusLine<'_>> {
        let reason = opt(preceded(tag(" "), reason_phrase));

        terminated((http_version, tag(" "), status_code, reason), line_ending)
            .map(|(http_version, _sp, status_code, reason)| StatusLine {
                http_version,
                status_code,
                reason_phrase: reason.unwrap_or_default(),
            })
            .parse(input)
    }

    fn http_version(input: &[u8]) -> IResult<&[u8], &[u8]> {
        let digit = || take_while_m_n(1, 1, |b: u8| b.is_ascii_digit());
        recognize((tag_no_case("HTTP/"), digit(), tag("."), digit())).parse(input)
    }

    fn status_code(input: &[u8]) -> IResult<&[u8], &[u8]> {
        take_while_m_n(3, 3, |b: u8| b.is_ascii_digit()).parse(input)
    }

    fn reason_phrase(input: &[u8]) -> IResult<&[u8], &[u8]> {
        take_while(|b: u8| b.is_ascii_graphic() || b == b' ' || b == b'\t' || b >= 0x80).parse(input)
    }

    pub enum FieldLine<'a> {
        Pair(&'a [u8], &'a [u8]),
        Malformed(&'a [u8]),
    }

    /// Field lines up to the empty line. A line that is not a valid field
    /// is returned as `Malformed`.
    pub fn field_lines(input: &[u8]) -> IResult<&[u8], Vec<FieldLine<'_>>> {
        let field = terminated(field_pair, line_ending)
            .map(|(name, value)| FieldLine::Pair(name, value));
        let other = terminated(take_till1(|b: u8| b == b'\r' || b == b'\n'), line_ending)
            .map(FieldLine::Malformed);

        many0(alt((field, other))).parse(input)
    }

    fn field_pair(input: &[u8]) -> IResult<&[u8], (&[u8], &[u8])> {
        separated_pair(field_name, pair(tag(":"), space0), field_value).parse(input)
    }

    fn field_name(input: &[u8]) -> IResult<&[u8], &[u8]> {
        take_while1(|b: u8| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)).parse(input)
    }

    fn field_value(input: &[u8]) -> IResult<&[u8], &[u8]> {
        let content = take_while1(|b: u8| b.is_ascii_graphic() || b == b' ' || b == b'\t' || b >= 0x80);
        let fold = recognize(pair(line_ending, space1));

        recognize(many0_count(alt((content, fold)))).parse(input)
    }
}
