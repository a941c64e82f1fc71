//! Error types for Tether core operations

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, TetherError>;

/// Errors raised while splitting a relay address into its segments
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// Wire address did not have exactly three `/`-separated segments
    #[error("Malformed address '{address}': expected 3 segments separated by '/', found {found}")]
    MalformedAddress { address: String, found: usize },

    /// View segment carries a `/`, which is reserved for the outer address
    #[error("View segment '{0}' must not contain '/'")]
    EmbeddedSeparator(String),

    /// View segment had fewer than `channel:contract:function`
    #[error("Malformed view '{view}': expected at least 3 ':'-separated tokens, found {found}")]
    MalformedView { view: String, found: usize },
}

/// Errors that can occur in Tether core operations
#[derive(Error, Debug, Clone)]
pub enum TetherError {
    // === Addressing ===
    /// Address parsing failed
    #[error(transparent)]
    Address(#[from] AddressError),

    // === Wire Decoding ===
    /// Base64 payload could not be decoded
    #[error("Unable to base64 decode {what}: {reason}")]
    Base64 { what: &'static str, reason: String },

    /// Protobuf payload could not be decoded
    #[error("Unable to unmarshal {what}: {reason}")]
    Protobuf { what: &'static str, reason: String },

    // === Host ===
    /// The hosting ledger rejected a state operation
    #[error("Host state error: {0}")]
    State(String),

    /// A composite-key attribute contained a reserved code point
    #[error("Composite key attribute '{0}' contains a reserved character")]
    InvalidKeyAttribute(String),

    /// Caller identity could not be read from the host
    #[error("Caller identity unavailable: {0}")]
    Identity(String),

    // === Configuration ===
    /// Configuration file could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Logging could not be initialised
    #[error("Logging initialisation failed: {0}")]
    Logging(String),
}

impl TetherError {
    /// True when the failure came from malformed caller input rather than the host
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Base64 { .. } | Self::Protobuf { .. })
    }
}
