//! # Membership Registry
//!
//! One [`Membership`] per foreign security domain, plus the local
//! network's own membership under a configurable local domain.
//!
//! ```text
//!   verify_member(cert, domain, org)
//!        │
//!        ├─ cert within validity?          ── CertExpired
//!        ├─ membership(domain) stored?     ── MembershipNotFound
//!        ├─ members[org] present?          ── MemberNotFound
//!        └─ member.type
//!             ├─ "ca"          → cert == CA, or issued by CA (CA must be a valid root)
//!             ├─ "certificate" → chain (or [value]) must lead to cert
//!             └─ other         ── UnsupportedMemberType
//! ```

use tether_core::{CallerIdentity, StateStore};
use tether_crypto::{
    parse_certificate, validate_against_issuer_at, validate_chain, validate_chain_at, Certificate,
    CryptoError,
};

use crate::error::{RegistryError, Result};
use crate::records::{decode_record, Member, MemberKind, Membership};
use crate::store::{ensure_network_admin, RecordStore, MEMBERSHIP_OBJECT_TYPE};

const KIND: &str = "membership";

/// Security domain under which the local membership is kept by default
pub const DEFAULT_LOCAL_SECURITY_DOMAIN: &str = "local-security-domain";

/// Membership CRUD and member verification over a host's world state
pub struct MembershipRegistry<'a, H: ?Sized> {
    host: &'a H,
    records: RecordStore<'a, H>,
    local_security_domain: String,
}

impl<'a, H: StateStore + CallerIdentity + ?Sized> MembershipRegistry<'a, H> {
    pub fn new(host: &'a H) -> Self {
        Self {
            host,
            records: RecordStore::new(host, MEMBERSHIP_OBJECT_TYPE, KIND),
            local_security_domain: DEFAULT_LOCAL_SECURITY_DOMAIN.to_string(),
        }
    }

    pub fn with_local_security_domain(mut self, domain: impl Into<String>) -> Self {
        self.local_security_domain = domain.into();
        self
    }

    pub fn local_security_domain(&self) -> &str {
        &self.local_security_domain
    }

    /// Store a foreign membership under its own security domain
    pub fn create(&self, membership_json: &str) -> Result<()> {
        ensure_network_admin(self.host)?;
        let membership = decode_membership(membership_json)?;
        validate_member_chains(&membership)?;
        self.records
            .create(&membership.security_domain, &membership)
    }

    pub fn update(&self, membership_json: &str) -> Result<()> {
        ensure_network_admin(self.host)?;
        let membership = decode_membership(membership_json)?;
        validate_member_chains(&membership)?;
        self.records
            .update(&membership.security_domain, &membership)
    }

    pub fn delete(&self, security_domain: &str) -> Result<()> {
        ensure_network_admin(self.host)?;
        self.records.delete(security_domain)
    }

    /// Stored membership JSON
    pub fn get(&self, security_domain: &str) -> Result<String> {
        self.records.get_json(security_domain)
    }

    pub fn load(&self, security_domain: &str) -> Result<Option<Membership>> {
        self.records.read(security_domain)
    }

    pub fn create_local(&self, membership_json: &str) -> Result<()> {
        ensure_network_admin(self.host)?;
        let membership = decode_membership(membership_json)?;
        validate_member_chains(&membership)?;
        self.records
            .create(&self.local_security_domain, &membership)
    }

    pub fn update_local(&self, membership_json: &str) -> Result<()> {
        ensure_network_admin(self.host)?;
        let membership = decode_membership(membership_json)?;
        validate_member_chains(&membership)?;
        self.records
            .update(&self.local_security_domain, &membership)
    }

    pub fn delete_local(&self) -> Result<()> {
        ensure_network_admin(self.host)?;
        self.records.delete(&self.local_security_domain)
    }

    pub fn get_local(&self) -> Result<String> {
        self.records.get_json(&self.local_security_domain)
    }

    /// Check that `cert` belongs to organization `org` of `security_domain`
    pub fn verify_member(&self, cert: &Certificate, security_domain: &str, org: &str) -> Result<()> {
        self.verify_member_at(cert, security_domain, org, now())
    }

    pub fn verify_member_at(
        &self,
        cert: &Certificate,
        security_domain: &str,
        org: &str,
        now: i64,
    ) -> Result<()> {
        cert.check_validity_at(now)
            .map_err(RegistryError::CertExpired)?;

        let membership: Membership = self
            .records
            .read(security_domain)?
            .ok_or_else(|| RegistryError::MembershipNotFound(security_domain.to_string()))?;
        let member = membership
            .members
            .get(org)
            .ok_or_else(|| RegistryError::MemberNotFound {
                org: org.to_string(),
                domain: security_domain.to_string(),
            })?;

        verify_against_member(cert, member, org, now)?;
        tracing::debug!(
            domain = security_domain,
            org,
            cert = %cert.fingerprint(),
            "Member verified"
        );
        Ok(())
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

fn verify_against_member(cert: &Certificate, member: &Member, org: &str, now: i64) -> Result<()> {
    let failed = |source: CryptoError| RegistryError::MemberVerification {
        org: org.to_string(),
        source,
    };

    match member.kind.parse::<MemberKind>()? {
        MemberKind::Ca => {
            let ca = parse_certificate(&member.value).map_err(failed)?;
            // The CA is itself a member of its domain
            if cert.der() == ca.der() {
                return Ok(());
            }
            validate_against_issuer_at(cert, &ca, true, now).map_err(failed)
        }
        MemberKind::Certificate => {
            if member.chain.is_empty() {
                validate_chain_at(Some(cert), &[member.value.as_str()], now).map_err(failed)
            } else {
                validate_chain_at(Some(cert), &member.chain, now).map_err(failed)
            }
        }
    }
}

fn decode_membership(json: &str) -> Result<Membership> {
    decode_record(KIND, json.as_bytes())
}

/// Members with an explicit multi-link chain must carry a valid chain
fn validate_member_chains(membership: &Membership) -> Result<()> {
    for (org, member) in &membership.members {
        if member.chain.len() > 1 {
            validate_chain(None, &member.chain).map_err(|source| {
                RegistryError::InvalidMemberChain {
                    member: org.clone(),
                    domain: membership.security_domain.clone(),
                    source,
                }
            })?;
        }
    }
    Ok(())
}
