use url::form_urlencoded;

use crate::{header::ContentType, params::Parameters};

use super::BodyCodec;

/// `application/x-www-form-urlencoded` codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormUrlEncoded;

impl FormUrlEncoded {
    pub const NAME: &'static str = "x-www-form-urlencoded";
    pub const CONTENT_TYPE: &'static str = "application/x-www-form-urlencoded";

    pub fn content_type() -> ContentType {
        ContentType::new("application", Self::NAME)
    }
}

impl BodyCodec for FormUrlEncoded {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn encode(&self, params: &Parameters, _content_type: Option<&ContentType>) -> Vec<u8> {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params.iter())
            .finish()
            .into_bytes()
    }

    fn decode(&self, data: &[u8], _content_type: Option<&ContentType>) -> Parameters {
        form_urlencoded::parse(data).collect()
    }
}
