//! Request payloads and their wire encoding.
//!
//! A [`RequestPayload`] is a value tree describing an outgoing body. The
//! [`encode`] function turns it into either flat [`Parameters`] or a
//! [`MultipartMap`]; callers never pick the wire encoding themselves.
//!
//! # Key naming
//!
//! - nested keys compose as `outer.inner`
//! - array items compose as `outer[index]`
//! - attachments are stored under `outer.key`

mod encoder;
mod request;
mod value;

pub use encoder::{
    encode, flatten_parameters, EncodedPayload, MultipartMap, MultipartPart, Parameters,
};
pub use request::{FormData, MimeType, RequestPayload};
pub use value::{JsonDict, PayloadValue};

use thiserror::Error;

/// Errors that can occur while building a payload from a typed object.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// The object could not be serialized.
    #[error("Failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The object serialized to something other than a JSON object.
    #[error("Payload must serialize to a JSON object, found {found}")]
    NotAnObject {
        /// The JSON kind that was produced instead.
        found: &'static str,
    },
}
