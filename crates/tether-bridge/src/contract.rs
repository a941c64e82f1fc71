//! # Interop Contract
//!
//! String-typed surface the hosting ledger exposes to clients and relays.
//! Registry records travel as JSON, protocol messages as base64 protobuf.

use tether_core::logging::init_logging;
use tether_core::{Host, TrustConfig};
use tether_federation::{AccessControlRegistry, MembershipRegistry, VerificationPolicyRegistry};

use crate::error::{BridgeError, Result};
use crate::identity::caller_ecert_base64;

/// The trust layer bound to one host transaction context
pub struct InteropContract<'h, H: ?Sized> {
    pub(crate) host: &'h H,
    pub(crate) config: TrustConfig,
}

impl<'h, H: Host + ?Sized> InteropContract<'h, H> {
    pub fn new(host: &'h H) -> Self {
        Self::with_config(host, TrustConfig::default())
    }

    pub fn with_config(host: &'h H, config: TrustConfig) -> Self {
        Self { host, config }
    }

    pub fn config(&self) -> &TrustConfig {
        &self.config
    }

    /// Install the global tracing subscriber from `[logging]`
    pub fn init_logging(&self) -> Result<()> {
        init_logging(&self.config.logging).map_err(BridgeError::Host)
    }

    pub(crate) fn memberships(&self) -> MembershipRegistry<'h, H> {
        MembershipRegistry::new(self.host)
            .with_local_security_domain(self.config.local_security_domain.clone())
    }

    pub(crate) fn access_control(&self) -> AccessControlRegistry<'h, H> {
        AccessControlRegistry::new(self.host)
    }

    pub(crate) fn verification_policies(&self) -> VerificationPolicyRegistry<'h, H> {
        VerificationPolicyRegistry::new(self.host)
    }

    // Membership

    pub fn create_membership(&self, membership_json: &str) -> Result<()> {
        Ok(self.memberships().create(membership_json)?)
    }

    pub fn update_membership(&self, membership_json: &str) -> Result<()> {
        Ok(self.memberships().update(membership_json)?)
    }

    pub fn delete_membership(&self, security_domain: &str) -> Result<()> {
        Ok(self.memberships().delete(security_domain)?)
    }

    pub fn get_membership_by_security_domain(&self, security_domain: &str) -> Result<String> {
        Ok(self.memberships().get(security_domain)?)
    }

    pub fn create_local_membership(&self, membership_json: &str) -> Result<()> {
        Ok(self.memberships().create_local(membership_json)?)
    }

    pub fn update_local_membership(&self, membership_json: &str) -> Result<()> {
        Ok(self.memberships().update_local(membership_json)?)
    }

    pub fn delete_local_membership(&self) -> Result<()> {
        Ok(self.memberships().delete_local()?)
    }

    pub fn get_local_membership(&self) -> Result<String> {
        Ok(self.memberships().get_local()?)
    }

    // Access control

    pub fn create_access_control_policy(&self, policy_json: &str) -> Result<()> {
        Ok(self.access_control().create(policy_json)?)
    }

    pub fn update_access_control_policy(&self, policy_json: &str) -> Result<()> {
        Ok(self.access_control().update(policy_json)?)
    }

    pub fn delete_access_control_policy(&self, security_domain: &str) -> Result<()> {
        Ok(self.access_control().delete(security_domain)?)
    }

    pub fn get_access_control_policy_by_security_domain(
        &self,
        security_domain: &str,
    ) -> Result<String> {
        Ok(self.access_control().get(security_domain)?)
    }

    // Verification policy

    pub fn create_verification_policy(&self, policy_json: &str) -> Result<()> {
        Ok(self.verification_policies().create(policy_json)?)
    }

    pub fn update_verification_policy(&self, policy_json: &str) -> Result<()> {
        Ok(self.verification_policies().update(policy_json)?)
    }

    pub fn delete_verification_policy(&self, security_domain: &str) -> Result<()> {
        Ok(self.verification_policies().delete(security_domain)?)
    }

    pub fn get_verification_policy_by_security_domain(
        &self,
        security_domain: &str,
    ) -> Result<String> {
        Ok(self.verification_policies().get(security_domain)?)
    }

    // Identity

    /// Base64 enrollment certificate of the transaction creator
    pub fn get_ecert_of_tx_creator_base64(&self) -> Result<String> {
        caller_ecert_base64(self.host)
    }
}
