//! Registry records and their canonical JSON form
//!
//! Field names follow the relay's JSON convention (`securityDomain`,
//! `principalType`, ...). Unknown fields are rejected so that an update
//! written against a newer schema fails instead of dropping data.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};

/// Trusted members of one security domain
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Membership {
    pub security_domain: String,
    #[serde(default)]
    pub members: BTreeMap<String, Member>,
}

/// Trust material of one organization
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Member {
    /// PEM of the CA (kind `ca`) or of the member certificate
    #[serde(default)]
    pub value: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// PEM chain, root first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chain: Vec<String>,
}

/// How a member's trust material is interpreted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberKind {
    Ca,
    Certificate,
}

impl MemberKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ca => "ca",
            Self::Certificate => "certificate",
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberKind {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ca" => Ok(Self::Ca),
            "certificate" => Ok(Self::Certificate),
            other => Err(RegistryError::UnsupportedMemberType(other.to_string())),
        }
    }
}

/// Access rules for requests arriving from one security domain
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AccessControlPolicy {
    pub security_domain: String,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Rule {
    /// Certificate PEM or organization id, per `principal_type`
    pub principal: String,
    pub principal_type: String,
    /// View address or pattern
    pub resource: String,
    #[serde(default)]
    pub read: bool,
}

/// Required signers for views served by one security domain
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VerificationPolicy {
    pub security_domain: String,
    #[serde(default)]
    pub identifiers: Vec<Identifier>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Identifier {
    pub pattern: String,
    pub policy: Policy,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Policy {
    #[serde(rename = "type")]
    pub kind: String,
    /// Organizations that must all appear among a proof's signers
    #[serde(rename = "criteria", alias = "requiredSigners", default)]
    pub required_signers: Vec<String>,
}

impl Policy {
    /// First required signer absent from `signers`
    pub fn missing_signer<'a, S: AsRef<str>>(&'a self, signers: &[S]) -> Option<&'a str> {
        self.required_signers
            .iter()
            .find(|required| !signers.iter().any(|s| s.as_ref() == required.as_str()))
            .map(String::as_str)
    }
}

pub(crate) fn decode_record<T: DeserializeOwned>(kind: &'static str, json: &[u8]) -> Result<T> {
    serde_json::from_slice(json).map_err(|e| RegistryError::InvalidRecord {
        kind,
        reason: e.to_string(),
    })
}

pub(crate) fn encode_record<T: Serialize>(kind: &'static str, record: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(record).map_err(|e| RegistryError::InvalidRecord {
        kind,
        reason: e.to_string(),
    })
}
