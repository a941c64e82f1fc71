//! Caller and requester identity helpers

use tether_core::codec::{decode_proto, encode_base64};
use tether_core::proto::msp::SerializedIdentity;
use tether_core::CallerIdentity;
use tether_crypto::{parse_certificate, Certificate, CryptoError};

use crate::error::{BridgeError, Result};

/// Decode an MSP-serialized identity into its org and certificate
pub fn decode_serialized_identity(bytes: &[u8]) -> Result<(String, Certificate)> {
    let identity: SerializedIdentity = decode_proto("serialized identity", bytes)?;
    let pem = std::str::from_utf8(&identity.id_bytes).map_err(|e| {
        BridgeError::CertParse(CryptoError::CertParse(format!("identity is not UTF-8 PEM: {}", e)))
    })?;
    let cert = parse_certificate(pem).map_err(BridgeError::CertParse)?;
    Ok((identity.mspid, cert))
}

/// Base64 of the transaction creator's enrollment certificate PEM
pub fn caller_ecert_base64<C: CallerIdentity + ?Sized>(caller: &C) -> Result<String> {
    let creator = caller.creator().map_err(BridgeError::Host)?;
    let identity: SerializedIdentity = decode_proto("creator identity", &creator)?;
    if identity.id_bytes.is_empty() {
        return Err(BridgeError::MissingField("creator certificate"));
    }
    Ok(encode_base64(&identity.id_bytes))
}

/// The explicit org when given, otherwise the organization of the
/// certificate's issuer. Membership verification then validates the pair.
pub fn resolve_requesting_org(explicit: &str, cert: &Certificate) -> Result<String> {
    if !explicit.is_empty() {
        return Ok(explicit.to_string());
    }
    cert.issuer_org()
        .map(str::to_string)
        .ok_or(BridgeError::MissingRequestingOrg)
}
