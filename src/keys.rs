//! Key generation and OpenPGP v4 RSA key material.

use crate::codec::{ensure_canonical, packet_bytes, read_packet};
use crate::error::{Result, SignError};
use crate::signature::OPENPGP_TAG;
use chrono::{DateTime, SubsecRound, Utc};
use pgp::packet::{self, Packet};
use pgp::types::{Fingerprint, KeyId, KeyVersion, PublicKeyTrait, Version};
use pgp::KeyType;
use rand::rngs::OsRng;
use std::fmt;
use std::time::Instant;
use tracing::debug;

pub use pgp::crypto::public_key::PublicKeyAlgorithm;

/// Modulus size of generated signing keys.
pub const RSA_KEY_BITS: u32 = 2048;

/// Size of a v4 key fingerprint in bytes.
pub const FINGERPRINT_SIZE: usize = 20;

/// Registered wire formats for public keys, keyed by their format tag.
///
/// Tags are shared with [`crate::SignatureFormat`]: an `openpgp` key and an
/// `openpgp` signature are both OpenPGP packets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFormat {
    OpenPgp,
}

impl KeyFormat {
    pub fn tag(self) -> &'static str {
        match self {
            KeyFormat::OpenPgp => OPENPGP_TAG,
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            OPENPGP_TAG => Some(KeyFormat::OpenPgp),
            _ => None,
        }
    }
}

pub(crate) fn is_rsa(algorithm: PublicKeyAlgorithm) -> bool {
    matches!(algorithm, PublicKeyAlgorithm::RSA | PublicKeyAlgorithm::RSASign)
}

/// Render a key id as 16 lowercase hex digits.
pub fn format_key_id(key_id: u64) -> String {
    format!("{:016x}", key_id)
}

pub(crate) fn key_id_bits(key_id: &KeyId) -> u64 {
    key_id
        .as_ref()
        .iter()
        .fold(0, |acc, b| (acc << 8) | u64::from(*b))
}

/// Truncate `time` to whole seconds, rejecting times a v4 packet cannot carry.
pub(crate) fn packet_time(time: DateTime<Utc>) -> Result<DateTime<Utc>> {
    if (0..=i64::from(u32::MAX)).contains(&time.timestamp()) {
        Ok(time.trunc_subsecs(0))
    } else {
        Err(SignError::InvalidCreationTime(time))
    }
}

/// An OpenPGP v4 RSA public key, as exchanged with the trust store.
///
/// Two keys are equal when their fingerprints are.
#[derive(Clone)]
pub struct OpenPgpPublicKey {
    packet: packet::PublicKey,
    fingerprint: Fingerprint,
    encoded: Vec<u8>,
}

impl OpenPgpPublicKey {
    fn from_packet(packet: packet::PublicKey, encoded: Vec<u8>) -> Self {
        let fingerprint = packet.fingerprint();
        Self {
            packet,
            fingerprint,
            encoded,
        }
    }

    /// Parse a serialized public-key packet.
    ///
    /// Only canonically encoded v4 RSA keys are accepted.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let packet = match read_packet(data)? {
            Packet::PublicKey(packet) => packet,
            other => {
                return Err(SignError::packet(format!(
                    "expected public key, got {:?} packet",
                    other.tag()
                )));
            }
        };
        if packet.version() != KeyVersion::V4 {
            return Err(SignError::packet(format!(
                "unsupported public key version {:?}",
                packet.version()
            )));
        }
        if !is_rsa(packet.algorithm()) {
            return Err(SignError::packet(format!(
                "unsupported public key algorithm {:?}",
                packet.algorithm()
            )));
        }
        ensure_canonical(&packet, data)?;
        Ok(Self::from_packet(packet, data.to_vec()))
    }

    /// The serialized public-key packet.
    pub fn serialize(&self) -> Vec<u8> {
        self.encoded.clone()
    }

    /// The full SHA-1 v4 fingerprint.
    pub fn fingerprint(&self) -> &[u8] {
        self.fingerprint.as_bytes()
    }

    /// The low 64 bits of the fingerprint.
    pub fn key_id(&self) -> u64 {
        key_id_bits(&self.packet.key_id())
    }

    pub fn created(&self) -> DateTime<Utc> {
        *self.packet.created_at()
    }

    pub fn algorithm(&self) -> PublicKeyAlgorithm {
        self.packet.algorithm()
    }

    pub(crate) fn packet(&self) -> &packet::PublicKey {
        &self.packet
    }
}

impl PartialEq for OpenPgpPublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint
    }
}

impl Eq for OpenPgpPublicKey {}

impl fmt::Debug for OpenPgpPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenPgpPublicKey")
            .field("key_id", &format_key_id(self.key_id()))
            .field("algorithm", &self.algorithm())
            .field("created", &self.created())
            .finish()
    }
}

/// An RSA signing key together with its public half.
pub struct PrivateKey {
    secret: packet::SecretKey,
    public: OpenPgpPublicKey,
}

impl PrivateKey {
    /// Generate a fresh key from the system entropy source.
    ///
    /// This may block briefly on systems with little entropy. Failures are
    /// returned as-is; nothing is retried.
    pub fn generate() -> Result<Self> {
        let started = Instant::now();
        let (public_params, secret_params) = KeyType::Rsa(RSA_KEY_BITS)
            .generate(OsRng)
            .map_err(SignError::KeyGeneration)?;
        let public = packet::PublicKey::new(
            Version::New,
            KeyVersion::V4,
            PublicKeyAlgorithm::RSA,
            packet_time(Utc::now())?,
            None,
            public_params,
        )
        .map_err(SignError::KeyGeneration)?;
        let encoded = packet_bytes(&public).map_err(SignError::KeyGeneration)?;

        let private = Self {
            secret: packet::SecretKey::new(public.clone(), secret_params),
            public: OpenPgpPublicKey::from_packet(public, encoded),
        };
        debug!(
            bits = RSA_KEY_BITS,
            key_id = %format_key_id(private.key_id()),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "generated signing key"
        );
        Ok(private)
    }

    pub fn public_key(&self) -> &OpenPgpPublicKey {
        &self.public
    }

    pub fn key_id(&self) -> u64 {
        self.public.key_id()
    }

    /// Hex encoding of the full fingerprint.
    pub fn fingerprint(&self) -> String {
        hex::encode(self.public.fingerprint())
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.public.created()
    }

    pub(crate) fn algorithm(&self) -> PublicKeyAlgorithm {
        self.public.algorithm()
    }

    pub(crate) fn secret(&self) -> &packet::SecretKey {
        &self.secret
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("key_id", &format_key_id(self.key_id()))
            .finish_non_exhaustive()
    }
}
