//! HTTP message model, header value grammar, content negotiation and
//! cookie handling with a pluggable transport.
pub mod client;
pub mod codec;
pub mod cookie_jar;
pub mod error;
pub mod grammar;
pub mod header;
pub mod media;
pub mod message;
pub mod negotiate;
pub mod params;
pub mod transport;

#[cfg(feature = "bin")]
#[doc(hidden)]
pub mod app;
