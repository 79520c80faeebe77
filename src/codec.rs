//! The `<format-tag> <base64>` wire encoding of signatures and public keys.

use crate::error::{Result, SignError};
use crate::keys::{format_key_id, KeyFormat, OpenPgpPublicKey};
use crate::signature::{OpenPgpSignature, Signature, SignatureFormat};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use pgp::packet::{write_packet, Packet, PacketParser, PacketTrait};
use tracing::trace;

/// A registry of format tags for one kind of wire payload.
trait WireFormat: Copy {
    fn tag(self) -> &'static str;
    fn from_tag(tag: &str) -> Option<Self>;
}

impl WireFormat for SignatureFormat {
    fn tag(self) -> &'static str {
        SignatureFormat::tag(self)
    }

    fn from_tag(tag: &str) -> Option<Self> {
        SignatureFormat::from_tag(tag)
    }
}

impl WireFormat for KeyFormat {
    fn tag(self) -> &'static str {
        KeyFormat::tag(self)
    }

    fn from_tag(tag: &str) -> Option<Self> {
        KeyFormat::from_tag(tag)
    }
}

/// Prefix `packet` with the format tag and a single space, base64-encoding it.
fn encode<F: WireFormat>(format: F, packet: &[u8]) -> Vec<u8> {
    let mut out = format!("{} ", format.tag()).into_bytes();
    out.extend_from_slice(STANDARD.encode(packet).as_bytes());
    out
}

/// Split at the first space and decode the base64 payload.
fn split_format_and_decode<F: WireFormat>(data: &[u8]) -> Result<(F, Vec<u8>)> {
    let space = data.iter().position(|b| *b == b' ').ok_or_else(|| {
        SignError::InvalidFormat("expected format and base64 data separated by space".to_string())
    })?;
    let (tag, payload) = (&data[..space], &data[space + 1..]);
    let decoded = STANDARD.decode(payload)?;
    let tag = String::from_utf8_lossy(tag);
    let format = F::from_tag(&tag).ok_or_else(|| SignError::UnsupportedFormat(tag.into_owned()))?;
    Ok((format, decoded))
}

/// Serialize `packet` with a packet header.
pub(crate) fn packet_bytes(packet: &impl PacketTrait) -> pgp::errors::Result<Vec<u8>> {
    let mut out = Vec::new();
    write_packet(&mut out, packet)?;
    Ok(out)
}

/// Read exactly one packet from `data`.
pub(crate) fn read_packet(data: &[u8]) -> Result<Packet> {
    let mut packets = PacketParser::new(data);
    let packet = packets
        .next()
        .ok_or_else(|| SignError::packet("no packet in payload"))?
        .map_err(|e| SignError::packet(e.to_string()))?;
    if packets.next().is_some() {
        return Err(SignError::packet("trailing data after packet"));
    }
    Ok(packet)
}

/// Reject packets whose re-encoding differs from the bytes they were read from.
///
/// Padded MPIs, oversized length headers and unread trailing body bytes all
/// fail here, so every accepted payload has exactly one byte form.
pub(crate) fn ensure_canonical(packet: &impl PacketTrait, data: &[u8]) -> Result<()> {
    let encoded = packet_bytes(packet).map_err(|e| SignError::packet(e.to_string()))?;
    if encoded != data {
        return Err(SignError::packet("non-canonical packet encoding"));
    }
    Ok(())
}

/// Encode a signature in wire form.
pub fn encode_signature(signature: &Signature) -> Vec<u8> {
    match signature {
        Signature::OpenPgp(sig) => encode(SignatureFormat::OpenPgp, sig.as_bytes()),
    }
}

/// Parse a wire signature.
///
/// Every rejection is a format error; nothing cryptographic happens here.
pub fn parse_signature(data: &[u8]) -> Result<Signature> {
    if data.is_empty() {
        return Err(SignError::EmptySignature);
    }
    let (format, packet) = split_format_and_decode(data)?;
    let signature = match format {
        SignatureFormat::OpenPgp => match read_packet(&packet)? {
            Packet::Signature(sig) => {
                ensure_canonical(&sig, &packet)?;
                Signature::OpenPgp(OpenPgpSignature::from_packet(sig, packet)?)
            }
            other => {
                return Err(SignError::packet(format!(
                    "expected signature, got {:?} packet",
                    other.tag()
                )));
            }
        },
    };
    trace!(
        format = format.tag(),
        key_id = %signature.key_id(),
        "parsed signature"
    );
    Ok(signature)
}

/// Encode a public key in wire form, for handing to a trust store.
pub fn encode_public_key(key: &OpenPgpPublicKey) -> Vec<u8> {
    encode(KeyFormat::OpenPgp, &key.serialize())
}

/// Parse a public key in wire form.
pub fn decode_public_key(data: &[u8]) -> Result<OpenPgpPublicKey> {
    if data.is_empty() {
        return Err(SignError::InvalidFormat("unexpected empty public key".to_string()));
    }
    let key = match split_format_and_decode(data)? {
        (KeyFormat::OpenPgp, packet) => OpenPgpPublicKey::parse(&packet)?,
    };
    trace!(key_id = %format_key_id(key.key_id()), "decoded public key");
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::tests::test_key;
    use crate::keys::PublicKeyAlgorithm;
    use crate::signature::tests::{creation_time, issuer, unsigned};
    use crate::signature::DIGEST_ALGORITHM;

    fn sample() -> Signature {
        let packet = unsigned(
            PublicKeyAlgorithm::RSA,
            DIGEST_ALGORITHM,
            vec![creation_time(), issuer()],
            vec![],
        );
        let encoded = packet_bytes(&packet).unwrap();
        Signature::OpenPgp(OpenPgpSignature::from_packet(packet, encoded).unwrap())
    }

    #[test]
    fn test_encode_shape() {
        let wire = encode_signature(&sample());
        assert!(wire.starts_with(b"openpgp "));
        assert_eq!(wire.iter().filter(|b| **b == b' ').count(), 1);
        assert!(!wire.ends_with(b"\n"));
    }

    #[test]
    fn test_parse_encoded() {
        let sig = sample();
        let parsed = parse_signature(&encode_signature(&sig)).unwrap();
        assert_eq!(parsed, sig);
        assert_eq!(parsed.key_id(), "0123456789abcdef");
        assert_eq!(parsed.format(), SignatureFormat::OpenPgp);
    }

    #[test]
    fn test_empty_signature() {
        assert!(matches!(parse_signature(b""), Err(SignError::EmptySignature)));
    }

    #[test]
    fn test_missing_separator() {
        assert!(matches!(parse_signature(b"nospacehere"), Err(SignError::InvalidFormat(_))));
    }

    #[test]
    fn test_unsupported_format() {
        match parse_signature(b"unknownfmt AAAA") {
            Err(SignError::UnsupportedFormat(tag)) => assert_eq!(tag, "unknownfmt"),
            other => panic!("expected unsupported format, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_base64() {
        assert!(matches!(
            parse_signature(b"openpgp !!!notbase64!!!"),
            Err(SignError::Base64(_))
        ));
    }

    #[test]
    fn test_no_extra_whitespace_tolerated() {
        let mut wire = encode_signature(&sample());
        wire.push(b'\n');
        assert!(parse_signature(&wire).is_err());

        let wire = encode_signature(&sample());
        let mut leading = b" ".to_vec();
        leading.extend_from_slice(&wire);
        assert!(matches!(parse_signature(&leading), Err(SignError::Base64(_))));
    }

    #[test]
    fn test_key_packet_is_not_a_signature() {
        let wire = encode_public_key(test_key().public_key());
        let err = parse_signature(&wire).unwrap_err();
        assert!(err.is_format_error());
        assert!(err.to_string().contains("expected signature"));
    }

    #[test]
    fn test_trailing_packet_rejected() {
        let Signature::OpenPgp(sig) = sample();
        let mut packets = sig.as_bytes().to_vec();
        packets.extend_from_slice(sig.as_bytes());
        let wire = encode(SignatureFormat::OpenPgp, &packets);
        assert!(matches!(parse_signature(&wire), Err(SignError::InvalidPacket(_))));
    }

    #[test]
    fn test_padded_mpi_rejected() {
        // The sample's MPI is the single byte 0x01: bit count 1.
        let Signature::OpenPgp(sig) = sample();
        let mut packet = sig.as_bytes().to_vec();
        let end = packet.len();
        assert_eq!(&packet[end - 3..], &[0x00, 0x01, 0x01]);
        packet[end - 2] = 0x02;
        let wire = encode(SignatureFormat::OpenPgp, &packet);
        assert!(matches!(parse_signature(&wire), Err(SignError::InvalidPacket(_))));
    }

    #[test]
    fn test_old_format_header_accepted_when_canonical() {
        let Signature::OpenPgp(sig) = sample();
        let body = &sig.as_bytes()[2..];
        assert!(body.len() < 192);
        // Old-format header: tag 2, one-octet length.
        let mut packet = vec![0x88, body.len() as u8];
        packet.extend_from_slice(body);
        let parsed = parse_signature(&encode(SignatureFormat::OpenPgp, &packet)).unwrap();
        assert_eq!(parsed.key_id(), "0123456789abcdef");
    }

    #[test]
    fn test_public_key_wire_roundtrip() {
        let public = test_key().public_key();
        let wire = encode_public_key(public);
        assert!(wire.starts_with(b"openpgp "));
        let decoded = decode_public_key(&wire).unwrap();
        assert_eq!(&decoded, public);
    }

    #[test]
    fn test_public_keys_use_key_registry() {
        let wire = encode_public_key(test_key().public_key());
        let (format, _) = split_format_and_decode::<KeyFormat>(&wire).unwrap();
        assert_eq!(format, KeyFormat::OpenPgp);
        assert!(matches!(
            decode_public_key(b"ssh-rsa AAAA"),
            Err(SignError::UnsupportedFormat(tag)) if tag == "ssh-rsa"
        ));
    }

    #[test]
    fn test_signature_is_not_a_public_key() {
        let wire = encode_signature(&sample());
        assert!(matches!(decode_public_key(&wire), Err(SignError::InvalidPacket(_))));
        assert!(decode_public_key(b"").unwrap_err().is_format_error());
    }
}
