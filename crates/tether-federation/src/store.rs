//! Records kept in host world state under `(objectType, securityDomain)`

use serde::de::DeserializeOwned;
use serde::Serialize;
use tether_core::{CallerIdentity, StateStore};

use crate::error::{RegistryError, Result};
use crate::records::{decode_record, encode_record};

pub const MEMBERSHIP_OBJECT_TYPE: &str = "membership";
pub const ACCESS_CONTROL_OBJECT_TYPE: &str = "accesscontrol";
pub const VERIFICATION_POLICY_OBJECT_TYPE: &str = "verificationpolicy";

/// Typed CRUD over one object type
pub(crate) struct RecordStore<'a, S: ?Sized> {
    store: &'a S,
    object_type: &'static str,
    kind: &'static str,
}

impl<'a, S: StateStore + ?Sized> RecordStore<'a, S> {
    pub(crate) fn new(store: &'a S, object_type: &'static str, kind: &'static str) -> Self {
        Self {
            store,
            object_type,
            kind,
        }
    }

    fn key(&self, domain: &str) -> Result<String> {
        Ok(self.store.create_composite_key(self.object_type, &[domain])?)
    }

    pub(crate) fn read_raw(&self, domain: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.store.get_state(&self.key(domain)?)?)
    }

    pub(crate) fn read<T: DeserializeOwned>(&self, domain: &str) -> Result<Option<T>> {
        self.read_raw(domain)?
            .map(|bytes| decode_record(self.kind, &bytes))
            .transpose()
    }

    pub(crate) fn create<T: Serialize>(&self, domain: &str, record: &T) -> Result<()> {
        let key = self.key(domain)?;
        if self.store.get_state(&key)?.is_some() {
            return Err(RegistryError::AlreadyExists {
                kind: self.kind,
                domain: domain.to_string(),
            });
        }
        self.store.put_state(&key, encode_record(self.kind, record)?)?;
        tracing::info!(kind = self.kind, domain, "Record created");
        Ok(())
    }

    pub(crate) fn update<T: Serialize>(&self, domain: &str, record: &T) -> Result<()> {
        let key = self.key(domain)?;
        self.require(&key, domain)?;
        self.store.put_state(&key, encode_record(self.kind, record)?)?;
        tracing::info!(kind = self.kind, domain, "Record updated");
        Ok(())
    }

    pub(crate) fn delete(&self, domain: &str) -> Result<()> {
        let key = self.key(domain)?;
        self.require(&key, domain)?;
        self.store.delete_state(&key)?;
        tracing::info!(kind = self.kind, domain, "Record deleted");
        Ok(())
    }

    /// Stored JSON, `NotFound` when absent
    pub(crate) fn get_json(&self, domain: &str) -> Result<String> {
        let bytes = self
            .read_raw(domain)?
            .ok_or_else(|| self.not_found(domain))?;
        String::from_utf8(bytes).map_err(|e| RegistryError::InvalidRecord {
            kind: self.kind,
            reason: e.to_string(),
        })
    }

    fn require(&self, key: &str, domain: &str) -> Result<()> {
        match self.store.get_state(key)? {
            Some(_) => Ok(()),
            None => Err(self.not_found(domain)),
        }
    }

    fn not_found(&self, domain: &str) -> RegistryError {
        RegistryError::NotFound {
            kind: self.kind,
            domain: domain.to_string(),
        }
    }
}

/// Fail with `Unauthorized` unless the caller is a network admin
pub fn ensure_network_admin<C: CallerIdentity + ?Sized>(caller: &C) -> Result<()> {
    if caller.is_network_admin()? {
        Ok(())
    } else {
        tracing::warn!("Registry write rejected: caller is not a network admin");
        Err(RegistryError::Unauthorized)
    }
}
