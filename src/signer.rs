//! Content signing.

use crate::codec::{encode_signature, packet_bytes};
use crate::error::{Result, SignError};
use crate::keys::{format_key_id, packet_time, PrivateKey};
use crate::signature::{OpenPgpSignature, Signature, DIGEST_ALGORITHM};
use chrono::{DateTime, Utc};
use pgp::packet::{SignatureConfig, SignatureType, Subpacket, SubpacketData};
use pgp::types::PublicKeyTrait;
use tracing::debug;

/// A builder for creating detached signatures.
#[derive(Debug)]
pub struct Signer<'a> {
    key: &'a PrivateKey,
    created: Option<DateTime<Utc>>,
}

impl<'a> Signer<'a> {
    /// Create a new signer with the given key.
    pub fn new(key: &'a PrivateKey) -> Self {
        Self { key, created: None }
    }

    /// Stamp signatures with `created` instead of the current time.
    ///
    /// Sub-second precision is dropped. Times before 1970 or after 2106
    /// make [`Signer::sign`] fail with [`SignError::InvalidCreationTime`].
    pub fn with_creation_time(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }

    /// Sign `content`, returning the signature record.
    pub fn sign(&self, content: &[u8]) -> Result<Signature> {
        let created = packet_time(self.created.unwrap_or_else(Utc::now))?;
        let mut config =
            SignatureConfig::v4(SignatureType::Binary, self.key.algorithm(), DIGEST_ALGORITHM);
        config.hashed_subpackets = vec![
            Subpacket::regular(SubpacketData::SignatureCreationTime(created)),
            Subpacket::regular(SubpacketData::Issuer(self.key.secret().key_id())),
        ];

        let packet = config
            .sign(self.key.secret(), String::new, content)
            .map_err(SignError::Signing)?;
        let encoded = packet_bytes(&packet).map_err(SignError::Signing)?;
        let sig = OpenPgpSignature::from_packet(packet, encoded)?;

        debug!(
            key_id = %format_key_id(self.key.key_id()),
            content_len = content.len(),
            "signed content"
        );
        Ok(Signature::OpenPgp(sig))
    }

    /// Sign `content`, returning the wire signature.
    pub fn sign_bytes(&self, content: &[u8]) -> Result<Vec<u8>> {
        Ok(encode_signature(&self.sign(content)?))
    }
}

/// Convenience function to sign content with a key, returning wire bytes.
pub fn sign_content(content: &[u8], key: &PrivateKey) -> Result<Vec<u8>> {
    Signer::new(key).sign_bytes(content)
}
