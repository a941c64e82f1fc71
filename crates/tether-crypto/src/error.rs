//! Cryptographic error types

use thiserror::Error;

/// Result type for cryptographic operations
pub type Result<T> = std::result::Result<T, CryptoError>;

/// Errors in certificate handling and signature verification
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// PEM or DER could not be parsed as an X.509 certificate
    #[error("Unable to parse certificate: {0}")]
    CertParse(String),

    /// Certificate is outside its validity window
    #[error("Certificate {subject} is not within its validity period ({not_before} to {not_after})")]
    Expired {
        subject: String,
        not_before: i64,
        not_after: i64,
    },

    /// Certificate signature was not produced by the claimed issuer
    #[error("Signature on certificate {subject} is invalid: {reason}")]
    SignatureInvalid { subject: String, reason: String },

    /// Issuer DN of a certificate differs from the signer's subject DN
    #[error("Issuer mismatch: certificate names issuer '{issuer}' but signer is '{signer}'")]
    IssuerMismatch { issuer: String, signer: String },

    /// A link of a certificate chain failed validation
    #[error("Broken certificate chain at {subject}: {source}")]
    BrokenChain {
        subject: String,
        #[source]
        source: Box<CryptoError>,
    },

    /// Chain validation was asked to walk an empty chain
    #[error("Certificate chain is empty")]
    EmptyChain,

    /// Certificate is not issued by any configured trust anchor
    #[error("Certificate {0} does not chain to a trusted root")]
    Untrusted(String),

    /// Public key algorithm not handled
    #[error("Unsupported key type: {0}")]
    UnsupportedKeyType(String),

    /// Signature did not verify under the certificate's key
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// Zero-length signature
    #[error("Signature is empty")]
    EmptySignature,

    /// Envelope encryption failed
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Envelope decryption failed
    #[error("Decryption failed: {0}")]
    Decryption(String),

    /// Confidential payload declares an unknown digest type
    #[error("Unsupported hash type in confidential payload: {0}")]
    UnsupportedHashType(i32),

    /// Keyed digest of the plaintext does not match
    #[error("Payload hash does not match hash of data submitted by client")]
    HashMismatch,

    /// Decoded contents could not be unmarshalled
    #[error("Malformed confidential contents: {0}")]
    MalformedContents(String),
}

impl CryptoError {
    /// Innermost error of a chain failure
    pub fn root_cause(&self) -> &CryptoError {
        match self {
            Self::BrokenChain { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
