//! # Tether Cryptography
//!
//! Cryptographic checks behind cross-network trust:
//! - X.509 parsing, issuer and chain validation
//! - Signature verification under a certificate's key
//! - Envelope encryption to a certificate holder
//! - Confidential query payloads (sealed contents plus HMAC)
//!
//! ## Supported Keys
//!
//! | Key | Signatures | Envelope encryption |
//! |-----|------------|---------------------|
//! | ECDSA P-256 | SHA-256, ASN.1 DER | ECIES (concat-KDF, AES-128-CTR, HMAC-SHA256) |
//! | ECDSA P-384 | SHA-384, ASN.1 DER | no |
//! | Ed25519 | raw 64 bytes | no |

pub mod certificate;
pub mod confidential;
pub mod envelope;
pub mod error;
pub mod signature;

#[cfg(any(test, feature = "testing"))]
pub mod testutil;

pub use certificate::*;
pub use confidential::*;
pub use envelope::*;
pub use error::*;
pub use signature::*;

/// Cryptographic prelude
pub mod prelude {
    pub use crate::certificate::{
        parse_certificate, validate_against_issuer, validate_chain, Certificate, CertificateKey,
    };
    pub use crate::confidential::{build_confidential_payload, verify_confidential_contents};
    pub use crate::error::{CryptoError, Result};
    pub use crate::signature::verify_signature;
}
