use std::{fmt::Display, io::Write, str::FromStr};

use brotli::writer::DecompressorWriter as BrotliDecoder;
use flate2::write::{GzDecoder, ZlibDecoder};

/// Content coding named in `Content-Encoding`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ContentCoding {
    #[default]
    Identity,
    /// Zlib wrapped deflate stream.
    Deflate,
    Gzip,
    Brotli,
}

impl FromStr for ContentCoding {
    type Err = UnsupportedCoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "identity" => Ok(Self::Identity),
            "deflate" => Ok(Self::Deflate),
            "gzip" | "x-gzip" => Ok(Self::Gzip),
            "br" => Ok(Self::Brotli),
            _ => Err(UnsupportedCoding(s.to_string())),
        }
    }
}

impl Display for ContentCoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identity => write!(f, "identity"),
            Self::Deflate => write!(f, "deflate"),
            Self::Gzip => write!(f, "gzip"),
            Self::Brotli => write!(f, "br"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported content coding '{0}'")]
pub struct UnsupportedCoding(pub String);

enum Inner {
    Identity,
    Deflate(ZlibDecoder<Vec<u8>>),
    Gzip(GzDecoder<Vec<u8>>),
    Brotli(Box<BrotliDecoder<Vec<u8>>>),
}

/// Push decoder that removes one content coding.
pub struct ContentDecoder {
    coding: ContentCoding,
    inner: Inner,
}

impl ContentDecoder {
    pub fn new(coding: ContentCoding) -> Self {
        let inner = match coding {
            ContentCoding::Identity => Inner::Identity,
            ContentCoding::Deflate => Inner::Deflate(ZlibDecoder::new(Vec::new())),
            ContentCoding::Gzip => Inner::Gzip(GzDecoder::new(Vec::new())),
            ContentCoding::Brotli => Inner::Brotli(Box::new(BrotliDecoder::new(Vec::new(), 4096))),
        };

        Self { coding, inner }
    }

    pub fn coding(&self) -> ContentCoding {
        self.coding
    }

    pub fn transform(&mut self, input: &[u8], output: &mut Vec<u8>) -> std::io::Result<()> {
        let decoded = match &mut self.inner {
            Inner::Identity => {
                output.extend_from_slice(input);
                return Ok(());
            }
            Inner::Deflate(codec) => {
                codec.write_all(input)?;
                codec.flush()?;
                codec.get_mut()
            }
            Inner::Gzip(codec) => {
                codec.write_all(input)?;
                codec.flush()?;
                codec.get_mut()
            }
            Inner::Brotli(codec) => {
                codec.write_all(input)?;
                codec.flush()?;
                codec.get_mut()
            }
        };

        output.append(decoded);
        Ok(())
    }

    /// Writes any buffered output and checks the stream ended properly.
    pub fn finish(self, output: &mut Vec<u8>) -> std::io::Result<()> {
        let mut decoded = match self.inner {
            Inner::Identity => return Ok(()),
            Inner::Deflate(codec) => codec.finish()?,
            Inner::Gzip(codec) => codec.finish()?,
            Inner::Brotli(mut codec) => {
                codec.close()?;
                match codec.into_inner() {
                    Ok(buf) => buf,
                    Err(buf) => buf,
                }
            }
        };

        output.append(&mut decoded);
        Ok(())
    }
}

impl std::fmt::Debug for ContentDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentDecoder")
            .field("coding", &self.coding)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(coding: ContentCoding, data: &[u8]) -> Vec<u8> {
        let mut decoder = ContentDecoder::new(coding);
        let mut output = Vec::new();

        for piece in data.chunks(7) {
            decoder.transform(piece, &mut output).unwrap();
        }
        decoder.finish(&mut output).unwrap();

        output
    }

    #[test]
    fn test_coding_names() {
        assert_eq!("GZIP".parse::<ContentCoding>().unwrap(), ContentCoding::Gzip);
        assert_eq!("br".parse::<ContentCoding>().unwrap(), ContentCoding::Brotli);
        assert!("compress".parse::<ContentCoding>().is_err());
        assert_eq!(ContentCoding::Deflate.to_string(), "deflate");
    }

    #[test]
    fn test_gzip() {
        let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(b"Hello world! Hello world!").unwrap();
        let data = encoder.finish().unwrap();

        assert_eq!(decode_all(ContentCoding::Gzip, &data), b"Hello world! Hello world!");
    }

    #[test]
    fn test_deflate() {
        let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(b"deflated body").unwrap();
        let data = encoder.finish().unwrap();

        assert_eq!(decode_all(ContentCoding::Deflate, &data), b"deflated body");
    }

    #[test]
    fn test_brotli() {
        let mut data = Vec::new();
        {
            let mut encoder = brotli::CompressorWriter::new(&mut data, 4096, 5, 22);
            encoder.write_all(b"brotli body").unwrap();
        }

        assert_eq!(decode_all(ContentCoding::Brotli, &data), b"brotli body");
    }

    #[test]
    fn test_identity() {
        assert_eq!(decode_all(ContentCoding::Identity, b"plain"), b"plain");
    }
}
