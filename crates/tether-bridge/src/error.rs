//! Bridge error types
//!
//! Each variant names the pipeline stage that failed and carries the lower
//! layer's error as its source.

use tether_core::{AddressError, TetherError};
use tether_crypto::CryptoError;
use tether_federation::RegistryError;
use thiserror::Error;

/// Result type for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

#[derive(Error, Debug)]
pub enum BridgeError {
    // === Decoding ===
    #[error("Decode error: {0}")]
    Decode(#[source] TetherError),

    #[error("Missing {0}")]
    MissingField(&'static str),

    #[error("Unable to parse certificate: {0}")]
    CertParse(#[source] CryptoError),

    #[error("Invalid address: {0}")]
    InvalidAddress(#[from] AddressError),

    // === Authentication / authorization ===
    #[error("Unable to validate signature: {0}")]
    SignatureInvalid(#[source] CryptoError),

    #[error("No requesting org given and certificate issuer carries no organization")]
    MissingRequestingOrg,

    #[error("Verify membership failed: {0}")]
    MembershipInvalid(#[source] RegistryError),

    #[error("Access denied: {0}")]
    AccessDenied(#[source] RegistryError),

    // === Proof verification ===
    #[error("Unable to resolve verification policy: {0}")]
    PolicyResolution(#[source] RegistryError),

    #[error("Address in response does not match original address: original {expected}, response {found}")]
    AddressMismatch { expected: String, found: String },

    #[error("Proof type not supported: {proof_type} for protocol {protocol}")]
    UnsupportedProofType { protocol: String, proof_type: String },

    #[error("Proof carries no endorsements or notarizations")]
    EmptyProof,

    #[error("Endorsed response {index} reports failure status {status}: {message}")]
    FailedResponse {
        index: usize,
        status: i32,
        message: String,
    },

    #[error("Notarizations missing signer: {missing}")]
    QuorumNotMet { missing: String },

    // === Payload extraction ===
    #[error("Unsupported hash type in view payload: {0}")]
    UnsupportedHashType(i32),

    #[error("View payload hash does not match hash of data submitted by client")]
    HashMismatch,

    #[error("Number of decrypted view contents ({found}) does not match number of proposal responses ({expected})")]
    ContentCountMismatch { expected: usize, found: usize },

    #[error("Proposal response {index} is inconsistent with the first response")]
    InconsistentProposalResponses { index: usize },

    #[error("Confidential payload error: {0}")]
    Confidential(#[source] CryptoError),

    // === Application invocation ===
    #[error("Number of {what} ({found}) does not match number of addresses ({expected})")]
    ArityMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Index {index} out of bounds of array (length {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Application chaincode invoke error (status {status}): {message}")]
    ApplicationInvoke { status: i32, message: String },

    // === Registries and host ===
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Host error: {0}")]
    Host(#[source] TetherError),
}

impl BridgeError {
    /// Stable numeric code reported to the host
    pub fn code(&self) -> u32 {
        match self {
            Self::Decode(_) | Self::MissingField(_) => 2001,
            Self::CertParse(_) => 2002,
            Self::InvalidAddress(_) => 2003,
            Self::SignatureInvalid(_) => 2101,
            Self::MissingRequestingOrg | Self::MembershipInvalid(_) => 2102,
            Self::AccessDenied(_) => 2103,
            Self::PolicyResolution(_) => 2201,
            Self::AddressMismatch { .. } => 2202,
            Self::UnsupportedProofType { .. } => 2203,
            Self::EmptyProof | Self::FailedResponse { .. } => 2204,
            Self::QuorumNotMet { .. } => 2205,
            Self::UnsupportedHashType(_) | Self::HashMismatch | Self::Confidential(_) => 2301,
            Self::ContentCountMismatch { .. } | Self::InconsistentProposalResponses { .. } => 2302,
            Self::ArityMismatch { .. } | Self::IndexOutOfBounds { .. } => 2401,
            Self::ApplicationInvoke { .. } => 2402,
            Self::Registry(_) => 2501,
            Self::Host(_) => 9999,
        }
    }

    /// Whether the failure rejects a foreign principal or proof
    pub fn is_trust_failure(&self) -> bool {
        matches!(
            self,
            Self::SignatureInvalid(_)
                | Self::MembershipInvalid(_)
                | Self::AccessDenied(_)
                | Self::AddressMismatch { .. }
                | Self::QuorumNotMet { .. }
                | Self::HashMismatch
        )
    }
}

impl From<TetherError> for BridgeError {
    fn from(err: TetherError) -> Self {
        match err {
            TetherError::Address(e) => Self::InvalidAddress(e),
            e if e.is_decode() => Self::Decode(e),
            e => Self::Host(e),
        }
    }
}
