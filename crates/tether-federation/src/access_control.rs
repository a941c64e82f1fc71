//! Access control for requests arriving from foreign networks

use tether_core::proto::common::Query;
use tether_core::{CallerIdentity, StateStore};
use tether_crypto::parse_certificate;

use crate::error::{RegistryError, Result};
use crate::pattern::is_match;
use crate::records::{decode_record, AccessControlPolicy, MemberKind, Rule};
use crate::store::{ensure_network_admin, RecordStore, ACCESS_CONTROL_OBJECT_TYPE};

const KIND: &str = "access control policy";

/// Access control policy CRUD and request authorization
pub struct AccessControlRegistry<'a, H: ?Sized> {
    host: &'a H,
    records: RecordStore<'a, H>,
}

impl<'a, H: StateStore + CallerIdentity + ?Sized> AccessControlRegistry<'a, H> {
    pub fn new(host: &'a H) -> Self {
        Self {
            host,
            records: RecordStore::new(host, ACCESS_CONTROL_OBJECT_TYPE, KIND),
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

    /// Authorize `query` to read `resource` (a view address) of this network.
    ///
    /// Rules are scanned in order; the first rule covering `resource` whose
    /// principal matches the query's certificate or requesting org grants
    /// access.
    pub fn check_access(&self, security_domain: &str, resource: &str, query: &Query) -> Result<()> {
        let policy: AccessControlPolicy = self
            .records
            .read(security_domain)?
            .ok_or_else(|| RegistryError::NoPolicyForNetwork(security_domain.to_string()))?;

        if let Some(rule) = policy
            .rules
            .iter()
            .find(|rule| covers(rule, resource) && grants(rule, query))
        {
            tracing::info!(
                domain = security_domain,
                resource,
                principal_type = %rule.principal_type,
                "Access granted"
            );
            return Ok(());
        }

        let principal = describe_requester(query);
        tracing::warn!(domain = security_domain, resource, %principal, "Access denied");
        Err(RegistryError::AccessDenied {
            domain: security_domain.to_string(),
            resource: resource.to_string(),
            principal,
        })
    }
}

fn covers(rule: &Rule, resource: &str) -> bool {
    rule.resource == resource || is_match(&rule.resource, resource)
}

fn grants(rule: &Rule, query: &Query) -> bool {
    match rule.principal_type.parse::<MemberKind>() {
        Ok(MemberKind::Certificate) => query.certificate == rule.principal,
        Ok(MemberKind::Ca) => query.requesting_org == rule.principal,
        Err(_) => false,
    }
}

/// Requesting org (if any) and certificate subject with SHA-256 fingerprint
fn describe_requester(query: &Query) -> String {
    let cert = match parse_certificate(&query.certificate) {
        Ok(cert) => format!("certificate {} [sha256:{}]", cert.subject(), cert.fingerprint()),
        Err(_) => "an unparseable certificate".to_string(),
    };
    if query.requesting_org.is_empty() {
        cert
    } else {
        format!("org {} with {}", query.requesting_org, cert)
    }
}

fn decode_policy(json: &str) -> Result<AccessControlPolicy> {
    decode_record(KIND, json.as_bytes())
}
