//! Registry error types

use tether_core::TetherError;
use tether_crypto::CryptoError;
use thiserror::Error;

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors from the membership, access control and verification policy registries
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("{kind} already exists for security domain {domain}")]
    AlreadyExists { kind: &'static str, domain: String },

    #[error("{kind} for security domain {domain} does not exist")]
    NotFound { kind: &'static str, domain: String },

    #[error("Caller not a network admin; access denied")]
    Unauthorized,

    /// JSON record could not be decoded or encoded
    #[error("Invalid {kind} record: {reason}")]
    InvalidRecord { kind: &'static str, reason: String },

    #[error("Certificate chain of member {member} in security domain {domain} is invalid: {source}")]
    InvalidMemberChain {
        member: String,
        domain: String,
        #[source]
        source: CryptoError,
    },

    // Membership verification
    #[error("Certificate expired: {0}")]
    CertExpired(#[source] CryptoError),

    #[error("Membership for security domain {0} does not exist")]
    MembershipNotFound(String),

    #[error("Member does not exist for org {org} in security domain {domain}")]
    MemberNotFound { org: String, domain: String },

    #[error("Member type not supported: {0}")]
    UnsupportedMemberType(String),

    #[error("Certificate could not be validated for member {org}: {source}")]
    MemberVerification {
        org: String,
        #[source]
        source: CryptoError,
    },

    // Access control
    #[error("No access control policy for security domain {0}")]
    NoPolicyForNetwork(String),

    #[error("Access control policy of {domain} does not permit {principal} to access {resource}")]
    AccessDenied {
        domain: String,
        resource: String,
        principal: String,
    },

    // Verification policy
    #[error("Verification policy for security domain {0} does not exist")]
    PolicyNotFound(String),

    #[error("No verification policy identifier of {domain} matches {resource}")]
    NoMatchingPolicy { domain: String, resource: String },

    #[error(transparent)]
    Host(#[from] TetherError),
}
