//! Confidential query responses
//!
//! The response payload is sealed for the requestor together with a random
//! key; an HMAC of the payload under that key travels in the clear so the
//! requestor's network can later bind a decrypted view to its proof.

use prost::Message;
use rand::rngs::OsRng;
use rand::RngCore;
use ring::hmac;
use tether_core::proto::common::confidential_payload::HashType;
use tether_core::proto::common::{ConfidentialPayload, ConfidentialPayloadContents};
use zeroize::Zeroizing;

use crate::certificate::parse_certificate;
use crate::envelope::{decrypt_with_private_key, encrypt_for_certificate};
use crate::error::{CryptoError, Result};

/// Default length of the random HMAC key
pub const DEFAULT_RANDOM_KEY_LEN: usize = 16;

/// Seal `message` for the holder of `recipient_cert_pem`
pub fn build_confidential_payload(
    message: &[u8],
    recipient_cert_pem: &str,
) -> Result<ConfidentialPayload> {
    build_confidential_payload_with_key_len(message, recipient_cert_pem, DEFAULT_RANDOM_KEY_LEN)
}

pub fn build_confidential_payload_with_key_len(
    message: &[u8],
    recipient_cert_pem: &str,
    key_len: usize,
) -> Result<ConfidentialPayload> {
    let cert = parse_certificate(recipient_cert_pem)?;

    let mut random = Zeroizing::new(vec![0u8; key_len]);
    OsRng.fill_bytes(random.as_mut_slice());

    let contents = Zeroizing::new(
        ConfidentialPayloadContents {
            payload: message.to_vec(),
            random: random.to_vec(),
        }
        .encode_to_vec(),
    );
    let encrypted_payload = encrypt_for_certificate(&contents, &cert)?;
    let tag = hmac::sign(&hmac::Key::new(hmac::HMAC_SHA256, &random), message);

    Ok(ConfidentialPayload {
        encrypted_payload,
        hash_type: HashType::Hmac as i32,
        hash: tag.as_ref().to_vec(),
    })
}

/// Check that decrypted `contents` match the HMAC carried by `payload`
pub fn verify_confidential_contents(
    payload: &ConfidentialPayload,
    contents: &ConfidentialPayloadContents,
) -> Result<()> {
    match HashType::try_from(payload.hash_type) {
        Ok(HashType::Hmac) => {
            let key = hmac::Key::new(hmac::HMAC_SHA256, &contents.random);
            hmac::verify(&key, &contents.payload, &payload.hash)
                .map_err(|_| CryptoError::HashMismatch)
        }
        Err(_) => Err(CryptoError::UnsupportedHashType(payload.hash_type)),
    }
}

/// Decrypt and authenticate a confidential payload
pub fn open_confidential_payload(
    payload: &ConfidentialPayload,
    pkcs8_der: &[u8],
) -> Result<ConfidentialPayloadContents> {
    let plaintext = Zeroizing::new(decrypt_with_private_key(&payload.encrypted_payload, pkcs8_der)?);
    let contents = ConfidentialPayloadContents::decode(plaintext.as_slice())
        .map_err(|e| CryptoError::MalformedContents(e.to_string()))?;
    verify_confidential_contents(payload, &contents)?;
    Ok(contents)
}
