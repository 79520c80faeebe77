//! Signature records and the registry of wire formats.

use crate::error::{Result, SignError};
use crate::keys::{format_key_id, key_id_bits, PublicKeyAlgorithm};
use chrono::{DateTime, Utc};
use pgp::packet::{self, SignatureVersion, SubpacketData};
use pgp::types::KeyId;

pub use pgp::crypto::hash::HashAlgorithm;

/// Format tag of OpenPGP signatures and keys.
pub const OPENPGP_TAG: &str = "openpgp";

/// The digest algorithm every signature is made and checked with.
pub const DIGEST_ALGORITHM: HashAlgorithm = HashAlgorithm::SHA2_256;

/// Registered wire formats, keyed by their format tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureFormat {
    OpenPgp,
}

impl SignatureFormat {
    pub fn tag(self) -> &'static str {
        match self {
            SignatureFormat::OpenPgp => OPENPGP_TAG,
        }
    }

    /// Look up a format by tag. Unknown tags are not accepted.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            OPENPGP_TAG => Some(SignatureFormat::OpenPgp),
            _ => None,
        }
    }
}

/// A parsed signature.
///
/// Values only come from [`crate::parse_signature`] or [`crate::Signer`];
/// there is no way to build one from outside the crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signature {
    OpenPgp(OpenPgpSignature),
}

impl Signature {
    /// The issuer key id as 16 lowercase hex digits.
    pub fn key_id(&self) -> String {
        format_key_id(self.issuer())
    }

    /// The 64-bit issuer key id.
    pub fn issuer(&self) -> u64 {
        match self {
            Signature::OpenPgp(sig) => key_id_bits(&sig.issuer),
        }
    }

    pub fn format(&self) -> SignatureFormat {
        match self {
            Signature::OpenPgp(_) => SignatureFormat::OpenPgp,
        }
    }

    pub fn created(&self) -> DateTime<Utc> {
        match self {
            Signature::OpenPgp(sig) => sig.created,
        }
    }
}

/// An OpenPGP v4 signature packet together with its encoded form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenPgpSignature {
    packet: packet::Signature,
    issuer: KeyId,
    created: DateTime<Utc>,
    encoded: Vec<u8>,
}

impl OpenPgpSignature {
    /// Check the fields this crate relies on and keep `encoded` for re-encoding.
    ///
    /// Requires a v4 packet from a known signing algorithm, a creation time
    /// in the hashed area, an issuer key id, and no unknown critical
    /// subpackets.
    pub(crate) fn from_packet(packet: packet::Signature, encoded: Vec<u8>) -> Result<Self> {
        if packet.config.version() != SignatureVersion::V4 {
            return Err(SignError::packet(format!(
                "unsupported signature version {:?}",
                packet.config.version()
            )));
        }
        if !is_signing_algorithm(packet.config.pub_alg) {
            return Err(SignError::packet(format!(
                "unsupported public key algorithm {:?}",
                packet.config.pub_alg
            )));
        }
        if let Some(sub) = packet.config.subpackets().find(|sub| {
            sub.is_critical
                && matches!(sub.data, SubpacketData::Other(..) | SubpacketData::Experimental(..))
        }) {
            return Err(SignError::packet(format!(
                "unknown critical subpacket {:?}",
                sub.data
            )));
        }

        let created = *packet
            .created()
            .ok_or_else(|| SignError::packet("no creation time in hashed area"))?;
        let issuer = packet
            .issuer()
            .first()
            .map(|id| (*id).clone())
            .ok_or_else(|| SignError::packet("expected issuer key id in signature"))?;

        Ok(Self {
            packet,
            issuer,
            created,
            encoded,
        })
    }

    pub fn pub_key_algorithm(&self) -> PublicKeyAlgorithm {
        self.packet.config.pub_alg
    }

    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.packet.hash_alg()
    }

    /// The signature packet, header included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.encoded
    }

    pub(crate) fn packet(&self) -> &packet::Signature {
        &self.packet
    }
}

fn is_signing_algorithm(algorithm: PublicKeyAlgorithm) -> bool {
    matches!(
        algorithm,
        PublicKeyAlgorithm::RSA
            | PublicKeyAlgorithm::RSASign
            | PublicKeyAlgorithm::DSA
            | PublicKeyAlgorithm::ECDSA
            | PublicKeyAlgorithm::EdDSALegacy
            | PublicKeyAlgorithm::Ed25519
    )
}
