//! Error types for the assert-sign library.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// The main error type for assert-sign operations.
#[derive(Error, Debug)]
pub enum SignError {
    /// The entropy source or the RSA key generator failed.
    #[error("key generation failed: {0}")]
    KeyGeneration(#[source] pgp::errors::Error),

    /// The signing primitive or packet serialization failed.
    #[error("signing failed: {0}")]
    Signing(#[source] pgp::errors::Error),

    /// A creation time that does not fit the 32-bit OpenPGP timestamp.
    #[error("creation time {0} is outside the OpenPGP timestamp range")]
    InvalidCreationTime(DateTime<Utc>),

    /// Zero-length wire signature.
    #[error("unexpected empty signature")]
    EmptySignature,

    /// Wire input is not `<format> <base64>`.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// The payload is not valid base64.
    #[error("could not decode base64 data: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The format tag is not registered.
    #[error("unsupported wire format: {0:?}")]
    UnsupportedFormat(String),

    /// The decoded bytes are not a well-formed packet of the expected kind.
    #[error("invalid packet: {0}")]
    InvalidPacket(String),

    /// A key and a signature that cannot be used together.
    #[error("capability mismatch: {0}")]
    CapabilityMismatch(String),

    /// The cryptographic check did not confirm the signature.
    #[error("signature verification failed")]
    VerificationFailed,
}

impl SignError {
    /// Whether this error reports malformed wire input.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            SignError::EmptySignature
                | SignError::InvalidFormat(_)
                | SignError::Base64(_)
                | SignError::UnsupportedFormat(_)
                | SignError::InvalidPacket(_)
        )
    }

    pub(crate) fn packet(msg: impl Into<String>) -> Self {
        SignError::InvalidPacket(msg.into())
    }
}

/// Result type alias for assert-sign operations.
pub type Result<T> = std::result::Result<T, SignError>;
