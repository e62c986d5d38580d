//! Body codecs
//!
//! A body codec converts between a request or response body and a set of
//! parameters. Codecs are looked up by the name that appears as the
//! subtype of a `Content-Type` such as `x-www-form-urlencoded`.
mod form;

use crate::{header::ContentType, params::Parameters};

pub use form::FormUrlEncoded;

pub trait BodyCodec: std::fmt::Debug {
    /// Returns the name matching a `Content-Type` subtype.
    fn name(&self) -> &str;

    fn encode(&self, params: &Parameters, content_type: Option<&ContentType>) -> Vec<u8>;

    fn decode(&self, data: &[u8], content_type: Option<&ContentType>) -> Parameters;
}

/// Returns the codec with the name, ignoring case.
pub fn codec_for_name(name: &str) -> Option<Box<dyn BodyCodec>> {
    if name.eq_ignore_ascii_case(FormUrlEncoded::NAME) {
        Some(Box::new(FormUrlEncoded))
    } else {
        tracing::trace!(name, "no body codec");
        None
    }
}

pub fn codec_for_content_type(content_type: &ContentType) -> Option<Box<dyn BodyCodec>> {
    codec_for_name(&content_type.subtype)
}
