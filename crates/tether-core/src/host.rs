//! # Host Collaborator
//!
//! The trust layer runs inside a ledger's transaction-execution environment.
//! Everything it needs from that environment is expressed by three traits:
//!
//! - [`StateStore`] - key/value world state with composite keys
//! - [`ChaincodeInvoker`] - calls into local application contracts
//! - [`CallerIdentity`] - the transaction creator and its admin privilege
//!
//! [`memory::MemoryHost`] implements all three in memory.

use crate::error::{Result, TetherError};

/// Namespace prefix Fabric uses for composite keys
pub const COMPOSITE_KEY_NAMESPACE: char = '\u{0}';

/// Upper bound code point reserved by Fabric's composite key encoding
const MAX_UNICODE_RUNE: char = '\u{10FFFF}';

/// Status code of a successful chaincode response
pub const STATUS_OK: i32 = 200;

/// Status codes at or above this value are errors
pub const STATUS_ERROR_THRESHOLD: i32 = 400;

/// Key/value world state of the hosting ledger
pub trait StateStore {
    /// Read a key; `None` when absent
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write a key
    fn put_state(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Remove a key
    fn delete_state(&self, key: &str) -> Result<()>;

    /// Build a composite key `(objectType, attributes...)`
    fn create_composite_key(&self, object_type: &str, attributes: &[&str]) -> Result<String> {
        create_composite_key(object_type, attributes)
    }
}

/// Response returned by an invoked chaincode
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvokeResponse {
    pub status: i32,
    pub message: String,
    pub payload: Vec<u8>,
}

impl InvokeResponse {
    /// Successful response carrying a payload
    pub fn success(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            status: STATUS_OK,
            message: String::new(),
            payload: payload.into(),
        }
    }

    /// Error response carrying a message
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: 500,
            message: message.into(),
            payload: Vec::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Invocation of local application contracts
pub trait ChaincodeInvoker {
    fn invoke_chaincode(&self, name: &str, args: &[Vec<u8>], channel: &str) -> InvokeResponse;
}

/// Identity of the transaction creator
pub trait CallerIdentity {
    /// MSP-serialized identity of the creator
    fn creator(&self) -> Result<Vec<u8>>;

    /// Whether the creator carries the network-admin attribute
    fn is_network_admin(&self) -> Result<bool>;
}

/// Everything the trust layer consumes from its host
pub trait Host: StateStore + ChaincodeInvoker + CallerIdentity {}

impl<T: StateStore + ChaincodeInvoker + CallerIdentity> Host for T {}

/// Fabric's composite key encoding: `\0objectType\0attr1\0attr2\0`
pub fn create_composite_key(object_type: &str, attributes: &[&str]) -> Result<String> {
    validate_key_attribute(object_type)?;
    let mut key = String::with_capacity(
        object_type.len() + attributes.iter().map(|a| a.len() + 1).sum::<usize>() + 2,
    );
    key.push(COMPOSITE_KEY_NAMESPACE);
    key.push_str(object_type);
    key.push(COMPOSITE_KEY_NAMESPACE);
    for attribute in attributes {
        validate_key_attribute(attribute)?;
        key.push_str(attribute);
        key.push(COMPOSITE_KEY_NAMESPACE);
    }
    Ok(key)
}

fn validate_key_attribute(attribute: &str) -> Result<()> {
    if attribute
        .chars()
        .any(|c| c == COMPOSITE_KEY_NAMESPACE || c == MAX_UNICODE_RUNE)
    {
        return Err(TetherError::InvalidKeyAttribute(attribute.to_string()));
    }
    Ok(())
}

pub mod memory {
    //! In-memory host (tests and local harnesses)

    use std::collections::HashMap;

    use parking_lot::RwLock;

    use super::*;

    type Handler = Box<dyn Fn(&[Vec<u8>]) -> InvokeResponse + Send + Sync>;

    /// Record of one chaincode invocation
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct Invocation {
        pub channel: String,
        pub name: String,
        pub args: Vec<Vec<u8>>,
    }

    /// In-memory world state, chaincode registry and caller identity
    pub struct MemoryHost {
        state: RwLock<HashMap<String, Vec<u8>>>,
        chaincodes: RwLock<HashMap<(String, String), Handler>>,
        invocations: RwLock<Vec<Invocation>>,
        creator: RwLock<Vec<u8>>,
        network_admin: RwLock<bool>,
    }

    impl MemoryHost {
        pub fn new() -> Self {
            Self {
                state: RwLock::new(HashMap::new()),
                chaincodes: RwLock::new(HashMap::new()),
                invocations: RwLock::new(Vec::new()),
                creator: RwLock::new(Vec::new()),
                network_admin: RwLock::new(false),
            }
        }

        /// Host whose caller is a network admin
        pub fn with_admin() -> Self {
            let host = Self::new();
            host.set_network_admin(true);
            host
        }

        pub fn set_network_admin(&self, admin: bool) {
            *self.network_admin.write() = admin;
        }

        /// Set the MSP-serialized identity returned by `creator()`
        pub fn set_creator(&self, creator: Vec<u8>) {
            *self.creator.write() = creator;
        }

        /// Register a chaincode handler on a channel
        pub fn register_chaincode<F>(&self, channel: &str, name: &str, handler: F)
        where
            F: Fn(&[Vec<u8>]) -> InvokeResponse + Send + Sync + 'static,
        {
            self.chaincodes
                .write()
                .insert((channel.to_string(), name.to_string()), Box::new(handler));
        }

        /// Invocations performed so far, in order
        pub fn invocations(&self) -> Vec<Invocation> {
            self.invocations.read().clone()
        }

        pub fn len(&self) -> usize {
            self.state.read().len()
        }

        pub fn is_empty(&self) -> bool {
            self.state.read().is_empty()
        }
    }

    impl Default for MemoryHost {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StateStore for MemoryHost {
        fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
            Ok(self.state.read().get(key).cloned())
        }

        fn put_state(&self, key: &str, value: Vec<u8>) -> Result<()> {
            self.state.write().insert(key.to_string(), value);
            Ok(())
        }

        fn delete_state(&self, key: &str) -> Result<()> {
            self.state.write().remove(key);
            Ok(())
        }
    }

    impl ChaincodeInvoker for MemoryHost {
        fn invoke_chaincode(&self, name: &str, args: &[Vec<u8>], channel: &str) -> InvokeResponse {
            self.invocations.write().push(Invocation {
                channel: channel.to_string(),
                name: name.to_string(),
                args: args.to_vec(),
            });
            match self
                .chaincodes
                .read()
                .get(&(channel.to_string(), name.to_string()))
            {
                Some(handler) => handler(args),
                None => InvokeResponse::error(format!(
                    "chaincode {} not found on channel {}",
                    name, channel
                )),
            }
        }
    }

    impl CallerIdentity for MemoryHost {
        fn creator(&self) -> Result<Vec<u8>> {
            let creator = self.creator.read().clone();
            if creator.is_empty() {
                return Err(TetherError::Identity("no creator set".to_string()));
            }
            Ok(creator)
        }

        fn is_network_admin(&self) -> Result<bool> {
            Ok(*self.network_admin.read())
        }
    }
}
