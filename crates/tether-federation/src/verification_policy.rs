//! Verification policies: who must sign a view before it is trusted

use tether_core::{CallerIdentity, StateStore};

use crate::error::{RegistryError, Result};
use crate::pattern::{is_match, is_pattern_valid};
use crate::records::{decode_record, Identifier, Policy, VerificationPolicy};
use crate::store::{ensure_network_admin, RecordStore, VERIFICATION_POLICY_OBJECT_TYPE};

const KIND: &str = "verification policy";

/// Verification policy CRUD and resolution
pub struct VerificationPolicyRegistry<'a, H: ?Sized> {
    host: &'a H,
    records: RecordStore<'a, H>,
}

impl<'a, H: StateStore + CallerIdentity + ?Sized> VerificationPolicyRegistry<'a, H> {
    pub fn new(host: &'a H) -> Self {
        Self {
            host,
            records: RecordStore::new(host, VERIFICATION_POLICY_OBJECT_TYPE, KIND),
        }
    }

    pub fn create(&self, policy_json: &str) -> Result<()> {
        ensure_network_admin(self.host)?;
        let policy = decode_policy(policy_json)?;
        self.records.create(&policy.security_domain, &policy)
    }

    pub fn update(&self, policy_json: &str) -> Result<()> {
        ensure_network_admin(self.host)?;
        let policy = decode_policy(policy_json)?;
        self.records.update(&policy.security_domain, &policy)
    }

    pub fn delete(&self, security_domain: &str) -> Result<()> {
        ensure_network_admin(self.host)?;
        self.records.delete(security_domain)
    }

    pub fn get(&self, security_domain: &str) -> Result<String> {
        self.records.get_json(security_domain)
    }

    /// Policy governing `resource` of `security_domain`
    pub fn resolve_policy(&self, security_domain: &str, resource: &str) -> Result<Policy> {
        let verification_policy: VerificationPolicy = self
            .records
            .read(security_domain)?
            .ok_or_else(|| RegistryError::PolicyNotFound(security_domain.to_string()))?;

        select_policy(&verification_policy, resource)
            .cloned()
            .ok_or_else(|| RegistryError::NoMatchingPolicy {
                domain: security_domain.to_string(),
                resource: resource.to_string(),
            })
    }
}

/// An identifier equal to `resource` wins outright; otherwise the longest
/// matching valid pattern, earliest on ties.
pub fn select_policy<'p>(policy: &'p VerificationPolicy, resource: &str) -> Option<&'p Policy> {
    if let Some(exact) = policy
        .identifiers
        .iter()
        .find(|identifier| identifier.pattern == resource)
    {
        return Some(&exact.policy);
    }

    let mut best: Option<&Identifier> = None;
    for identifier in &policy.identifiers {
        if !is_pattern_valid(&identifier.pattern) || !is_match(&identifier.pattern, resource) {
            continue;
        }
        if best.map_or(true, |b| identifier.pattern.len() > b.pattern.len()) {
            best = Some(identifier);
        }
    }
    best.map(|identifier| &identifier.policy)
}

fn decode_policy(json: &str) -> Result<VerificationPolicy> {
    decode_record(KIND, json.as_bytes())
}
