//! Lexical rules of the HTTP/1.1 header value grammar
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while_m_n, take_while1},
    character::complete::char,
    combinator::{opt, recognize},
    sequence::pair,
};

pub const SEPARATORS: &str = "()<>@,;:\\\"/[]?={} \t";

pub fn is_separator(c: char) -> bool {
    SEPARATORS.contains(c)
}

/// Any character except controls and separators.
///
/// Characters outside of ASCII are accepted.
pub fn is_token_char(c: char) -> bool {
    !c.is_ascii_control() && !is_separator(c)
}

fn is_space_or_tab(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// `[CRLF] 1*( SP | HT )`
pub fn linear_white_space(input: &str) -> IResult<&str, &str> {
    recognize(pair(opt(tag("\r\n")), take_while1(is_space_or_tab))).parse(input)
}

pub fn token(input: &str) -> IResult<&str, &str> {
    take_while1(is_token_char).parse(input)
}

/// `( "0" [ "." 0*3DIGIT ] ) | ( "1" [ "." 0*3("0") ] )`
///
/// A decimal point must be followed by at least one digit to be consumed.
pub fn qvalue(input: &str) -> IResult<&str, &str> {
    let zero = recognize(pair(
        char('0'),
        opt(pair(
            char('.'),
            take_while_m_n(1, 3, |c: char| c.is_ascii_digit()),
        )),
    ));
    let one = recognize(pair(
        char('1'),
        opt(pair(char('.'), take_while_m_n(1, 3, |c: char| c == '0'))),
    ));

    alt((zero, one)).parse(input)
}

/// Lookahead for `;` `q` `=` that starts the accept-params of a media range.
pub fn quality_marker(input: &str) -> IResult<&str, &str> {
    recognize((
        char(';'),
        opt(linear_white_space),
        char('q'),
        opt(linear_white_space),
        char('='),
    ))
    .parse(input)
}
