//! Binary codec for protocol message serialization.
//!
//! Encapsulates the bincode configuration so every message on the wire uses
//! the same deterministic layout. Fixed-width integers keep message sizes
//! stable across peers regardless of value magnitude.

use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

use crate::error::ArenaError;

fn config() -> impl bincode::config::Config {
    bincode::config::standard().with_fixed_int_encoding()
}

/// Errors that can occur during encoding or decoding.
///
/// Bincode's own error types are opaque, so the underlying failure is carried
/// as its `Display` output. Codec failures are exceptional (corrupted data or
/// a protocol-version mismatch), not a hot path.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CodecError {
    /// The encoding operation failed.
    Encode {
        /// The underlying bincode error message.
        message: String,
    },
    /// The decoding operation failed.
    Decode {
        /// The underlying bincode error message.
        message: String,
    },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encode { message } => write!(f, "encoding failed: {message}"),
            Self::Decode { message } => write!(f, "decoding failed: {message}"),
        }
    }
}

impl std::error::Error for CodecError {}

impl From<CodecError> for ArenaError {
    fn from(err: CodecError) -> Self {
        ArenaError::SerializationError {
            context: err.to_string(),
        }
    }
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Encodes a value into a new `Vec<u8>`.
///
/// # Examples
///
/// ```
/// use emotion_arena::network::codec::encode;
///
/// let bytes = encode(&42u32).expect("encoding should succeed");
/// assert!(!bytes.is_empty());
/// ```
pub fn encode<T: Serialize>(value: &T) -> CodecResult<Vec<u8>> {
    bincode::serde::encode_to_vec(value, config()).map_err(|e| CodecError::Encode {
        message: e.to_string(),
    })
}

/// Decodes a value from a byte slice.
///
/// Trailing bytes after the decoded value are ignored; each channel payload
/// carries exactly one message.
///
/// # Examples
///
/// ```
/// use emotion_arena::network::codec::{decode, encode};
///
/// let bytes = encode(&42u32).expect("encoding should succeed");
/// let decoded: u32 = decode(&bytes).expect("decoding should succeed");
/// assert_eq!(decoded, 42);
/// ```
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> CodecResult<T> {
    bincode::serde::decode_from_slice(bytes, config())
        .map(|(value, _)| value)
        .map_err(|e| CodecError::Decode {
            message: e.to_string(),
        })
}
