//! HTTP request and response messages
//!
//! A message is a start line, an ordered list of headers and a body. The
//! wire form is the start line and each header line in order, then a blank
//! line and the body, joined with CRLF. The blank line is written even
//! when the body is empty, so `GET / HTTP/1.1\r\nHost: a.test\r\n\r\n`
//! is the form of a request without a body.
//!
//! Parsing the outer envelope is permissive: input that does not have a
//! well formed start line produces a message with empty or default parts
//! instead of an error. Header values with a malformed structured value are
//! kept as basic headers.
mod headers;
mod request;
mod response;
pub mod status;

use std::io::Write;

use crate::header::Header;

pub use headers::Headers;
pub use request::Request;
pub use response::Response;

pub const HTTP_1_1: &str = "HTTP/1.1";

/// Message split into its start line, headers and body.
struct Envelope<'a> {
    start_line: String,
    headers: Headers,
    body: &'a [u8],
}

impl<'a> Envelope<'a> {
    fn split(input: &'a [u8]) -> Self {
        let (head, body) = match find_subslice(input, b"\r\n\r\n") {
            Some(index) => (&input[..index], &input[index + 4..]),
            None => (input, &input[input.len()..]),
        };

        let head = String::from_utf8_lossy(head);
        let mut lines = head.split("\r\n");
        let start_line = lines.next().unwrap_or_default().to_string();

        let headers = lines
            .filter(|line| !line.is_empty())
            .filter_map(|line| {
                let header = Header::parse_line_lenient(line);

                if header.is_none() {
                    tracing::debug!(line, "skipping line without header separator");
                }

                header
            })
            .collect();

        Self {
            start_line,
            headers,
            body,
        }
    }

    /// Splits the start line into at most three space separated parts.
    fn start_line_parts(&self) -> [&str; 3] {
        let mut parts = self.start_line.splitn(3, ' ');

        [
            parts.next().unwrap_or_default(),
            parts.next().unwrap_or_default(),
            parts.next().unwrap_or_default(),
        ]
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn serialize_message<W: Write>(
    mut buf: W,
    start_line: &str,
    headers: &Headers,
    body: &[u8],
) -> std::io::Result<()> {
    buf.write_all(start_line.as_bytes())?;
    buf.write_all(b"\r\n")?;
    headers.serialize(&mut buf)?;
    buf.write_all(b"\r\n")?;
    buf.write_all(body)?;

    Ok(())
}
