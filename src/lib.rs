//! # assert-sign
//!
//! Detached signatures over opaque content, and the keys that make them.
//!
//! ## Features
//!
//! - **RSA-2048** signing keys generated from the OS entropy source
//! - **OpenPGP v4** signature packets over a **SHA-256** content digest, built
//!   and checked with the `pgp` crate
//! - **Self-describing wire format**: `<format-tag> <base64>`, e.g. `openpgp wsB...`
//! - **Trusted keys** exposing a stable fingerprint and a verify capability
//!
//! ## Quick Start
//!
//! ### Sign and Verify
//!
//! ```rust
//! use assert_sign::{parse_signature, PrivateKey, PublicKey, Signer, TrustedKey};
//!
//! let key = PrivateKey::generate().unwrap();
//! let wire = Signer::new(&key).sign_bytes(b"hello world").unwrap();
//! assert!(wire.starts_with(b"openpgp "));
//!
//! // On the receiving side the trust store supplies the public key.
//! let trusted = TrustedKey::from(key.public_key().clone());
//! let signature = parse_signature(&wire).unwrap();
//! assert_eq!(signature.key_id().len(), 16);
//! assert!(trusted.verify(b"hello world", &signature).is_ok());
//! assert!(trusted.verify(b"hello World", &signature).is_err());
//! ```
//!
//! ### Exchange Public Keys
//!
//! ```rust
//! use assert_sign::{decode_public_key, encode_public_key, PrivateKey, PublicKey, TrustedKey};
//!
//! let key = PrivateKey::generate().unwrap();
//! let wire = encode_public_key(key.public_key());
//!
//! let trusted = TrustedKey::from(decode_public_key(&wire).unwrap());
//! assert_eq!(trusted.fingerprint(), key.fingerprint());
//! ```
//!
//! All operations are synchronous and hold no shared mutable state. Errors
//! are returned to the caller and never logged here.

pub mod codec;
pub mod error;
pub mod keys;
pub mod signature;
pub mod signer;
pub mod trusted;
pub mod verifier;

// Re-export main types for convenience
pub use codec::{decode_public_key, encode_public_key, encode_signature, parse_signature};
pub use error::{Result, SignError};
pub use keys::{KeyFormat, OpenPgpPublicKey, PrivateKey, PublicKeyAlgorithm, RSA_KEY_BITS};
pub use signature::{HashAlgorithm, Signature, SignatureFormat, DIGEST_ALGORITHM, OPENPGP_TAG};
pub use signer::{sign_content, Signer};
pub use trusted::{PublicKey, TrustedKey};
pub use verifier::{verify_content_signature, Verifier};
