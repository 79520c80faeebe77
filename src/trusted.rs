//! The public-key capability handed to and from the trust store.

use crate::error::Result;
use crate::keys::{format_key_id, OpenPgpPublicKey};
use crate::signature::Signature;
use crate::verifier::Verifier;
use chrono::{DateTime, Utc};
use std::fmt;

/// A key the caller has decided to trust.
pub trait PublicKey: fmt::Debug + Send + Sync {
    /// Lowercase hex of the full key fingerprint.
    fn fingerprint(&self) -> &str;

    /// Check that `signature` over `content` was made with this key.
    fn verify(&self, content: &[u8], signature: &Signature) -> Result<()>;

    /// Whether the key may be used at `time`.
    fn is_valid_at(&self, time: DateTime<Utc>) -> bool;
}

/// A trust-store admitted OpenPGP key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedKey {
    key: OpenPgpPublicKey,
    fingerprint: String,
}

impl TrustedKey {
    pub fn new(key: OpenPgpPublicKey) -> Self {
        let fingerprint = hex::encode(key.fingerprint());
        Self { key, fingerprint }
    }

    pub fn key(&self) -> &OpenPgpPublicKey {
        &self.key
    }

    /// Short key id, for matching against [`Signature::key_id`].
    pub fn key_id(&self) -> String {
        format_key_id(self.key.key_id())
    }
}

impl From<OpenPgpPublicKey> for TrustedKey {
    fn from(key: OpenPgpPublicKey) -> Self {
        Self::new(key)
    }
}

impl PublicKey for TrustedKey {
    fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    fn verify(&self, content: &[u8], signature: &Signature) -> Result<()> {
        Verifier::verify(content, signature, &self.key)
    }

    fn is_valid_at(&self, _time: DateTime<Utc>) -> bool {
        // No validity window is tracked; this is not a revocation check.
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_public_key, encode_public_key};
    use crate::keys::tests::test_key;
    use crate::signer::Signer;
    use crate::SignError;

    #[test]
    fn test_fingerprint_is_cached_hex() {
        let key = test_key();
        let trusted = TrustedKey::from(key.public_key().clone());
        assert_eq!(trusted.fingerprint(), key.fingerprint());
        assert_eq!(trusted.fingerprint().len(), 40);
        assert!(trusted
            .fingerprint()
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(trusted.fingerprint(), trusted.fingerprint());
    }

    #[test]
    fn test_independent_wrappers_agree() {
        let public = test_key().public_key();
        let decoded = decode_public_key(&encode_public_key(public)).unwrap();
        let a = TrustedKey::new(public.clone());
        let b = TrustedKey::new(decoded);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.key_id(), b.key_id());
    }

    #[test]
    fn test_verify_delegates() {
        let key = test_key();
        let trusted: Box<dyn PublicKey> = Box::new(TrustedKey::from(key.public_key().clone()));
        let sig = Signer::new(key).sign(b"payload").unwrap();
        assert!(trusted.verify(b"payload", &sig).is_ok());
        assert!(matches!(
            trusted.verify(b"Payload", &sig),
            Err(SignError::VerificationFailed)
        ));
        assert_eq!(TrustedKey::from(key.public_key().clone()).key_id(), sig.key_id());
    }

    #[test]
    fn test_is_valid_at_is_permissive() {
        let trusted = TrustedKey::from(test_key().public_key().clone());
        assert!(trusted.is_valid_at(Utc::now()));
        assert!(trusted.is_valid_at(DateTime::<Utc>::MIN_UTC));
    }
}
