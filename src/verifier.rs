//! Signature verification.

use crate::codec::parse_signature;
use crate::error::{Result, SignError};
use crate::keys::{is_rsa, OpenPgpPublicKey};
use crate::signature::{OpenPgpSignature, Signature, DIGEST_ALGORITHM};
use crate::trusted::PublicKey;

/// Verifier for detached signatures.
pub struct Verifier;

impl Verifier {
    /// Check `signature` over `content` against a raw public key.
    ///
    /// Wrong keys, altered content and altered signatures all produce the
    /// same [`SignError::VerificationFailed`].
    pub fn verify(content: &[u8], signature: &Signature, key: &OpenPgpPublicKey) -> Result<()> {
        match signature {
            Signature::OpenPgp(sig) => verify_openpgp(content, sig, key),
        }
    }

    /// Parse a wire signature and check it against a trusted key.
    pub fn verify_wire(content: &[u8], wire: &[u8], key: &dyn PublicKey) -> Result<()> {
        let signature = parse_signature(wire)?;
        key.verify(content, &signature)
    }

    /// Quick check that `signature` is valid for `content`.
    pub fn is_valid(content: &[u8], signature: &Signature, key: &OpenPgpPublicKey) -> bool {
        Self::verify(content, signature, key).is_ok()
    }
}

fn verify_openpgp(content: &[u8], sig: &OpenPgpSignature, key: &OpenPgpPublicKey) -> Result<()> {
    if !is_rsa(sig.pub_key_algorithm()) {
        return Err(SignError::CapabilityMismatch(format!(
            "{:?} signature cannot be checked with an RSA key",
            sig.pub_key_algorithm()
        )));
    }
    if sig.hash_algorithm() != DIGEST_ALGORITHM {
        return Err(SignError::VerificationFailed);
    }

    // Covers the issuer match, the left-16 quick check and the RSA check.
    sig.packet()
        .verify(key.packet(), content)
        .map_err(|_| SignError::VerificationFailed)
}

/// Convenience function to verify content against a signature and key.
pub fn verify_content_signature(
    content: &[u8],
    signature: &Signature,
    key: &OpenPgpPublicKey,
) -> Result<()> {
    Verifier::verify(content, signature, key)
}
