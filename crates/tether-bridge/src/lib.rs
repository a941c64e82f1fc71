//! # Tether Bridge
//!
//! The trust layer's transaction entry points, exposed on [`InteropContract`]:
//!
//! - [`InteropContract::handle_external_request`] - serve a remote relay's
//!   signed query against a local contract
//! - [`InteropContract::verify_view`] / [`InteropContract::parse_and_validate_view`] -
//!   check a foreign view's notarization proof and extract its payload
//! - [`InteropContract::write_external_state`] - feed verified views into a
//!   local contract invocation
//! - membership, access control and verification policy administration
//!
//! ## Usage
//!
//! ```ignore
//! use tether_bridge::InteropContract;
//!
//! let contract = InteropContract::with_config(&host, config);
//! let payload_bytes = contract.handle_external_request(&b64_query)?;
//! ```

pub mod contract;
pub mod error;
pub mod identity;
pub mod proof;
pub mod request;
pub mod write_state;

pub use contract::InteropContract;
pub use error::{BridgeError, Result};
pub use identity::{caller_ecert_base64, decode_serialized_identity, resolve_requesting_org};
pub use proof::{extract_and_validate_data, Notarization, NOTARIZATION_PROOF_TYPE};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::contract::InteropContract;
    pub use crate::error::{BridgeError, Result};
    pub use tether_core::prelude::*;
}
