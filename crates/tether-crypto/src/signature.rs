//! Signature verification under a certificate's public key

use ed25519_dalek::{Signature as Ed25519Signature, Verifier, VerifyingKey};
use ring::signature::{
    UnparsedPublicKey, VerificationAlgorithm, ECDSA_P256_SHA256_ASN1, ECDSA_P384_SHA384_ASN1,
};

use crate::certificate::{Certificate, CertificateKey};
use crate::error::{CryptoError, Result};

/// Verify `signature` over `message` with the key in `cert`.
///
/// ECDSA signatures are ASN.1 DER over SHA-256 (P-256) or SHA-384
/// (P-384). P-521 keys are rejected. Ed25519 signatures are the raw 64
/// bytes over the message.
pub fn verify_signature(message: &[u8], cert: &Certificate, signature: &[u8]) -> Result<()> {
    if signature.is_empty() {
        return Err(CryptoError::EmptySignature);
    }

    match cert.key() {
        CertificateKey::Ecdsa { curve_bits, point } => {
            let algorithm = ecdsa_algorithm(*curve_bits)?;
            UnparsedPublicKey::new(algorithm, point)
                .verify(message, signature)
                .map_err(|_| CryptoError::SignatureVerificationFailed)
        }
        CertificateKey::Ed25519(key) => {
            let key = VerifyingKey::from_bytes(key)
                .map_err(|e| CryptoError::UnsupportedKeyType(format!("Ed25519: {}", e)))?;
            let signature = Ed25519Signature::from_slice(signature)
                .map_err(|_| CryptoError::SignatureVerificationFailed)?;
            key.verify(message, &signature)
                .map_err(|_| CryptoError::SignatureVerificationFailed)
        }
        CertificateKey::Unsupported(oid) => Err(CryptoError::UnsupportedKeyType(oid.clone())),
    }
}

fn ecdsa_algorithm(curve_bits: usize) -> Result<&'static dyn VerificationAlgorithm> {
    match curve_bits {
        256 => Ok(&ECDSA_P256_SHA256_ASN1),
        384 => Ok(&ECDSA_P384_SHA384_ASN1),
        521 => Err(CryptoError::UnsupportedKeyType(
            "ECDSA P-521 signatures are not supported".to_string(),
        )),
        other => Err(CryptoError::UnsupportedKeyType(format!("ECDSA P-{}", other))),
    }
}
