//! # Certificate Envelope Encryption
//!
//! ECIES over P-256 in the framing used by go-ethereum's `ecies` package:
//! an ephemeral ECDH exchange with the certificate's key, the SEC1
//! concatenation KDF over SHA-256, AES-128-CTR and HMAC-SHA256.
//!
//! ```text
//! ┌──────────────────────┬─────────┬────────────┬──────────────┐
//! │ ephemeral point (65) │ IV (16) │ ciphertext │ HMAC tag (32)│
//! └──────────────────────┴─────────┴────────────┴──────────────┘
//! ```
//!
//! The tag covers `IV ‖ ciphertext`. Neither shared-info parameter is used.

use aes::cipher::{KeyIvInit, StreamCipher};
use p256::ecdh::diffie_hellman;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::pkcs8::DecodePrivateKey;
use p256::{PublicKey, SecretKey};
use rand::rngs::OsRng;
use rand::RngCore;
use ring::{digest, hmac};
use zeroize::Zeroizing;

use crate::certificate::{Certificate, CertificateKey};
use crate::error::{CryptoError, Result};

type Aes128Ctr = ctr::Ctr128BE<aes::Aes128>;

/// Length of an uncompressed P-256 point
pub const EPHEMERAL_POINT_LEN: usize = 65;

/// AES block size, and so the CTR IV length
pub const IV_LEN: usize = 16;

/// HMAC-SHA256 output length
pub const TAG_LEN: usize = 32;

const KEY_LEN: usize = 16;

/// Encrypt `message` so that only the holder of `cert`'s private key can read it
pub fn encrypt_for_certificate(message: &[u8], cert: &Certificate) -> Result<Vec<u8>> {
    match cert.key() {
        CertificateKey::Ecdsa {
            curve_bits: 256,
            point,
        } => {
            let recipient = PublicKey::from_sec1_bytes(point)
                .map_err(|e| CryptoError::Encryption(format!("invalid recipient key: {}", e)))?;
            let ephemeral = SecretKey::random(&mut OsRng);
            let mut iv = [0u8; IV_LEN];
            OsRng.fill_bytes(&mut iv);
            seal(message, &recipient, &ephemeral, &iv)
        }
        other => Err(CryptoError::UnsupportedKeyType(format!(
            "{} cannot receive encrypted payloads",
            other.algorithm_name()
        ))),
    }
}

fn seal(
    message: &[u8],
    recipient: &PublicKey,
    ephemeral: &SecretKey,
    iv: &[u8; IV_LEN],
) -> Result<Vec<u8>> {
    let shared = diffie_hellman(ephemeral.to_nonzero_scalar(), recipient.as_affine());
    let (enc_key, mac_key) = derive_keys(shared.raw_secret_bytes().as_slice());

    let mut body = Vec::with_capacity(IV_LEN + message.len());
    body.extend_from_slice(iv);
    body.extend_from_slice(message);
    Aes128Ctr::new_from_slices(&enc_key[..], iv)
        .map_err(|_| CryptoError::Encryption("invalid cipher parameters".to_string()))?
        .apply_keystream(&mut body[IV_LEN..]);
    let tag = hmac::sign(&mac_key, &body);

    let point = ephemeral.public_key().to_encoded_point(false);
    let mut out = Vec::with_capacity(EPHEMERAL_POINT_LEN + body.len() + TAG_LEN);
    out.extend_from_slice(point.as_bytes());
    out.extend_from_slice(&body);
    out.extend_from_slice(tag.as_ref());
    Ok(out)
}

/// Decrypt an envelope with a PKCS#8 DER P-256 private key
pub fn decrypt_with_private_key(ciphertext: &[u8], pkcs8_der: &[u8]) -> Result<Vec<u8>> {
    let secret = SecretKey::from_pkcs8_der(pkcs8_der)
        .map_err(|e| CryptoError::Decryption(format!("invalid private key: {}", e)))?;
    open(ciphertext, &secret)
}

fn open(ciphertext: &[u8], secret: &SecretKey) -> Result<Vec<u8>> {
    if ciphertext.len() < EPHEMERAL_POINT_LEN + IV_LEN + TAG_LEN {
        return Err(CryptoError::Decryption(format!(
            "envelope too short: {} bytes",
            ciphertext.len()
        )));
    }
    if ciphertext[0] != 0x04 {
        return Err(CryptoError::Decryption(
            "ephemeral key is not an uncompressed point".to_string(),
        ));
    }
    let (point, rest) = ciphertext.split_at(EPHEMERAL_POINT_LEN);
    let (body, tag) = rest.split_at(rest.len() - TAG_LEN);

    let ephemeral = PublicKey::from_sec1_bytes(point)
        .map_err(|e| CryptoError::Decryption(format!("invalid ephemeral key: {}", e)))?;
    let shared = diffie_hellman(secret.to_nonzero_scalar(), ephemeral.as_affine());
    let (enc_key, mac_key) = derive_keys(shared.raw_secret_bytes().as_slice());

    hmac::verify(&mac_key, body, tag)
        .map_err(|_| CryptoError::Decryption("authentication failed".to_string()))?;

    let (iv, sealed) = body.split_at(IV_LEN);
    let mut plaintext = sealed.to_vec();
    Aes128Ctr::new_from_slices(&enc_key[..], iv)
        .map_err(|_| CryptoError::Decryption("invalid cipher parameters".to_string()))?
        .apply_keystream(&mut plaintext);
    Ok(plaintext)
}

/// Split the KDF output into the AES key and the HMAC key.
///
/// The HMAC key is the SHA-256 digest of the second half.
fn derive_keys(shared_secret: &[u8]) -> (Zeroizing<[u8; KEY_LEN]>, hmac::Key) {
    let material = concat_kdf(shared_secret, 2 * KEY_LEN);
    let mut enc_key = Zeroizing::new([0u8; KEY_LEN]);
    enc_key.copy_from_slice(&material[..KEY_LEN]);
    let mac_key = digest::digest(&digest::SHA256, &material[KEY_LEN..]);
    (enc_key, hmac::Key::new(hmac::HMAC_SHA256, mac_key.as_ref()))
}

/// NIST SP 800-56A concatenation KDF with SHA-256 and empty shared info
fn concat_kdf(z: &[u8], len: usize) -> Zeroizing<Vec<u8>> {
    let mut out = Zeroizing::new(Vec::with_capacity(len + digest::SHA256_OUTPUT_LEN));
    let mut counter: u32 = 1;
    while out.len() < len {
        let mut ctx = digest::Context::new(&digest::SHA256);
        ctx.update(&counter.to_be_bytes());
        ctx.update(z);
        out.extend_from_slice(ctx.finish().as_ref());
        counter += 1;
    }
    out.truncate(len);
    out
}
