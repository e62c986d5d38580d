use std::{collections::VecDeque, io::Read};

use crate::error::{TransportError, TransportErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    SizeLine,
    Data,
    DataEnd,
    Trailer,
    Done,
}

/// Push decoder for `Transfer-Encoding: chunked` bodies.
///
/// Input may be split anywhere. Bytes after the last chunk and trailer
/// are kept and not decoded.
#[derive(Debug)]
pub struct ChunkedDecoder {
    state: State,
    buf: VecDeque<u8>,
    chunk_remaining: u64,
}

impl ChunkedDecoder {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            state: State::SizeLine,
            buf: VecDeque::new(),
            chunk_remaining: 0,
        }
    }

    /// Returns whether the last chunk and its trailer were decoded.
    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// Returns the number of bytes received after the end of the body.
    pub fn excess_len(&self) -> usize {
        if self.is_done() { self.buf.len() } else { 0 }
    }

    pub fn transform(&mut self, input: &[u8], output: &mut Vec<u8>) -> Result<(), TransportError> {
        self.buf.extend(input);

        while !self.buf.is_empty() && self.state != State::Done {
            let progressed = match self.state {
                State::SizeLine => self.read_size_line()?,
                State::Data => self.read_data(output)?,
                State::DataEnd => self.read_line_ending()?,
                State::Trailer => self.read_trailer_line()?,
                State::Done => false,
            };

            if !progressed {
                break;
            }
        }

        Ok(())
    }

    fn read_size_line(&mut self) -> Result<bool, TransportError> {
        let buf_len = self.buf.len();

        match parse::chunk_size_line(self.buf.make_contiguous()) {
            Ok((remaining, size)) => {
                let consumed = buf_len - remaining.len();
                self.buf.drain(..consumed);
                tracing::trace!(size, "chunk size line");

                self.chunk_remaining = size;
                self.state = if size == 0 { State::Trailer } else { State::Data };

                Ok(true)
            }
            Err(nom::Err::Incomplete(_)) => Ok(false),
            Err(_) => Err(invalid_chunk("bad chunk size line")),
        }
    }

    fn read_data(&mut self, output: &mut Vec<u8>) -> Result<bool, TransportError> {
        let mut reader = (&mut self.buf).take(self.chunk_remaining);
        let len = reader.read_to_end(output)?;

        self.chunk_remaining -= len as u64;

        if self.chunk_remaining == 0 {
            self.state = State::DataEnd;
        }

        Ok(len > 0)
    }

    fn read_line_ending(&mut self) -> Result<bool, TransportError> {
        match parse::line_ending(self.buf.make_contiguous()) {
            Ok((_remaining, consumed)) => {
                let len = consumed.len();
                self.buf.drain(..len);
                self.state = State::SizeLine;
                Ok(true)
            }
            Err(nom::Err::Incomplete(_)) => Ok(false),
            Err(_) => Err(invalid_chunk("missing line ending after chunk data")),
        }
    }

    fn read_trailer_line(&mut self) -> Result<bool, TransportError> {
        match parse::trailer_line(self.buf.make_contiguous()) {
            Ok((_remaining, line)) => {
                let len = line.len();
                self.buf.drain(..len);

                if len <= 2 {
                    tracing::trace!("end of chunked body");
                    self.state = State::Done;
                } else {
                    tracing::trace!(len, "skipping trailer field");
                }

                Ok(true)
            }
            Err(nom::Err::Incomplete(_)) => Ok(false),
            Err(_) => Err(invalid_chunk("bad trailer")),
        }
    }
}

fn invalid_chunk(context: &str) -> TransportError {
    TransportError::new(TransportErrorKind::Other).with_context(context)
}

mod parse {
    use nom::{
        IResult, Parser,
        bytes::streaming::{tag, take_till, take_while},
        character::streaming::{hex_digit1, line_ending as crlf},
        combinator::{map_res, recognize},
        sequence::{pair, terminated},
    };

    pub fn chunk_size_line(input: &[u8]) -> IResult<&[u8], u64> {
        terminated(pair(chunk_size, chunk_ext), tag("\r\n"))
            .map(|(size, _ext)| size)
            .parse(input)
    }

    fn chunk_size(input: &[u8]) -> IResult<&[u8], u64> {
        map_res(hex_digit1, |digits: &[u8]| {
            let digits = std::str::from_utf8(digits).unwrap_or_default();
            u64::from_str_radix(digits, 16)
        })
        .parse(input)
    }

    fn chunk_ext(input: &[u8]) -> IResult<&[u8], &[u8]> {
        take_while(|b: u8| b.is_ascii_graphic() || b == b' ' || b == b'\t').parse(input)
    }

    pub fn line_ending(input: &[u8]) -> IResult<&[u8], &[u8]> {
        crlf(input)
    }

    pub fn trailer_line(input: &[u8]) -> IResult<&[u8], &[u8]> {
        recognize(pair(take_till(|b: u8| b == b'\r' || b == b'\n'), crlf)).parse(input)
    }
}
