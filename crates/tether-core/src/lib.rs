//! # Tether Core
//!
//! Shared building blocks of the Tether cross-network trust layer.
//!
//! This crate provides:
//! - `Address` / `FabricViewAddress` - relay address parsing
//! - `proto` - protobuf envelopes (`Query`, `View`, `InteropPayload`, Fabric and Corda proofs)
//! - `host` - the hosting ledger's collaborator traits and an in-memory host
//! - `TrustConfig` and tracing bootstrap
//!
//! ## Architecture
//!
//! ```text
//!    foreign network                     local network
//!   ┌──────────────┐     Query      ┌──────────────────────────┐
//!   │    relay     │ ─────────────► │ handle_external_request  │──► app contract
//!   │              │ ◄───────────── │   (authn + authz)        │
//!   └──────────────┘  View + proof  │ write_external_state     │──► app contract
//!                                   │   (proof + quorum)       │
//!                                   └──────────────────────────┘
//! ```

pub mod address;
pub mod codec;
pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod proto;

pub use address::*;
pub use config::*;
pub use error::*;
pub use host::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::address::{parse_address, parse_view_address, Address, FabricViewAddress};
    pub use crate::config::TrustConfig;
    pub use crate::error::{AddressError, Result, TetherError};
    pub use crate::host::{CallerIdentity, ChaincodeInvoker, Host, InvokeResponse, StateStore};
}
