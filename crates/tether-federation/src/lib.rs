//! # Tether Federation
//!
//! Per-security-domain registries that decide which foreign principals are
//! trusted, what they may read, and who must sign what they send back.
//!
//! | Registry | Object type | Question answered |
//! |----------|-------------|-------------------|
//! | [`MembershipRegistry`] | `membership` | Is this certificate a member of org X of network N? |
//! | [`AccessControlRegistry`] | `accesscontrol` | May this requester read view V? |
//! | [`VerificationPolicyRegistry`] | `verificationpolicy` | Whose signatures must a view V carry? |
//!
//! Records live in host world state under composite keys
//! `(objectType, securityDomain)` and are written only by network admins.

pub mod access_control;
pub mod error;
pub mod membership;
pub mod pattern;
pub mod records;
pub mod store;
pub mod verification_policy;

pub use access_control::AccessControlRegistry;
pub use error::{RegistryError, Result};
pub use membership::{MembershipRegistry, DEFAULT_LOCAL_SECURITY_DOMAIN};
pub use pattern::{is_match, is_pattern_valid};
pub use records::*;
pub use store::ensure_network_admin;
pub use verification_policy::{select_policy, VerificationPolicyRegistry};
