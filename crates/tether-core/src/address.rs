//! # Relay Addresses
//!
//! A cross-network address has the wire form
//!
//! ```text
//! <location>/<network-id>/<view>
//! relay:9080/network1/mychannel:interop:Read:a
//! ```
//!
//! The location segment may list several relay endpoints separated by `;`.
//! The view segment is ledger-specific; for Fabric-style ledgers it decomposes
//! into `channel:contract:function[:arg...]`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AddressError;

/// Separator between the three address segments
pub const SEGMENT_SEPARATOR: char = '/';

/// Separator between relay endpoints inside the location segment
pub const LOCATION_SEPARATOR: char = ';';

/// Separator between tokens of a Fabric-style view segment
pub const VIEW_SEPARATOR: char = ':';

/// Parsed cross-network address
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    /// Relay endpoints, in the order they were listed
    pub location_segments: Vec<String>,

    /// Identifier of the foreign network (its security domain)
    pub network_id: String,

    /// Ledger-specific view segment
    pub view_segment: String,
}

impl Address {
    /// The location segment as it appears on the wire
    pub fn location(&self) -> String {
        self.location_segments.join(&LOCATION_SEPARATOR.to_string())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{}",
            self.location(),
            SEGMENT_SEPARATOR,
            self.network_id,
            SEGMENT_SEPARATOR,
            self.view_segment
        )
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_address(s)
    }
}

/// Fabric-style decomposition of a view segment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FabricViewAddress {
    pub channel: String,
    pub contract: String,
    pub function: String,
    pub args: Vec<String>,
}

impl FabricViewAddress {
    /// Argument list for invoking the contract: the function name followed by its args
    pub fn invocation_args(&self) -> Vec<Vec<u8>> {
        std::iter::once(self.function.as_bytes().to_vec())
            .chain(self.args.iter().map(|a| a.as_bytes().to_vec()))
            .collect()
    }
}

/// Split a wire address into location, network and view segments
pub fn parse_address(s: &str) -> Result<Address, AddressError> {
    let segments: Vec<&str> = s.split(SEGMENT_SEPARATOR).collect();
    if segments.len() != 3 {
        return Err(AddressError::MalformedAddress {
            address: s.to_string(),
            found: segments.len(),
        });
    }

    Ok(Address {
        location_segments: segments[0]
            .split(LOCATION_SEPARATOR)
            .map(str::to_string)
            .collect(),
        network_id: segments[1].to_string(),
        view_segment: segments[2].to_string(),
    })
}

/// Decompose a Fabric-style view segment into channel, contract, function and args
pub fn parse_view_address(view_segment: &str) -> Result<FabricViewAddress, AddressError> {
    if view_segment.contains(SEGMENT_SEPARATOR) {
        return Err(AddressError::EmbeddedSeparator(view_segment.to_string()));
    }

    let tokens: Vec<&str> = view_segment.split(VIEW_SEPARATOR).collect();
    if tokens.len() < 3 {
        return Err(AddressError::MalformedView {
            view: view_segment.to_string(),
            found: tokens.len(),
        });
    }

    Ok(FabricViewAddress {
        channel: tokens[0].to_string(),
        contract: tokens[1].to_string(),
        function: tokens[2].to_string(),
        args: tokens[3..].iter().map(|t| t.to_string()).collect(),
    })
}
