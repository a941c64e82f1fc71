//! # Inbound Request Handling
//!
//! Serves a remote relay's query against a local application contract:
//!
//! ```text
//!   b64 Query
//!      │ decode
//!      ▼
//!   certificate ──► signature(address ++ nonce) ──► membership(network, org)
//!                                                        │
//!      ┌─────────────────────────────────────────────────┘
//!      ▼
//!   address ──► access control(network, view) ──► invoke contract
//!                                                        │
//!                                     InteropPayload ◄───┘ (sealed if confidential)
//! ```
//!
//! Nothing is written to world state along the way.

use prost::Message;
use tether_core::codec::{decode_base64, decode_b64_proto};
use tether_core::proto::common::{InteropPayload, Query};
use tether_core::{parse_address, parse_view_address, Host};
use tether_crypto::{build_confidential_payload_with_key_len, parse_certificate, verify_signature};
use tracing::{debug, info, warn};

use crate::contract::InteropContract;
use crate::error::{BridgeError, Result};
use crate::identity::resolve_requesting_org;

impl<'h, H: Host + ?Sized> InteropContract<'h, H> {
    /// Authenticate, authorize and serve a base64 `Query`.
    ///
    /// Returns the protobuf-encoded `InteropPayload` carrying the
    /// application's result.
    pub fn handle_external_request(&self, b64_query: &str) -> Result<Vec<u8>> {
        let mut query: Query = decode_b64_proto("query", b64_query)?;

        let cert = parse_certificate(&query.certificate).map_err(BridgeError::CertParse)?;
        let signature = decode_base64("requestor signature", &query.requestor_signature)?;
        let signed = [query.address.as_bytes(), query.nonce.as_bytes()].concat();
        if let Err(e) = verify_signature(&signed, &cert, &signature) {
            warn!(
                "Rejected query for {}: signature by {} invalid",
                query.address,
                cert.fingerprint()
            );
            return Err(BridgeError::SignatureInvalid(e));
        }

        query.requesting_org = resolve_requesting_org(&query.requesting_org, &cert)?;
        self.memberships()
            .verify_member(&cert, &query.requesting_network, &query.requesting_org)
            .map_err(BridgeError::MembershipInvalid)?;

        let address = parse_address(&query.address)?;
        let view = parse_view_address(&address.view_segment)?;

        self.access_control()
            .check_access(&query.requesting_network, &address.view_segment, &query)
            .map_err(BridgeError::AccessDenied)?;

        debug!(
            "Invoking {}:{} on channel {} for {}/{}",
            view.contract, view.function, view.channel, query.requesting_network, query.requesting_org
        );
        let response = self
            .host
            .invoke_chaincode(&view.contract, &view.invocation_args(), &view.channel);
        if !response.is_ok() {
            return Err(BridgeError::ApplicationInvoke {
                status: response.status,
                message: response.message,
            });
        }

        let payload = if query.confidential {
            build_confidential_payload_with_key_len(
                &response.payload,
                &query.certificate,
                self.config.confidentiality.random_key_len,
            )
            .map_err(BridgeError::Confidential)?
            .encode_to_vec()
        } else {
            response.payload
        };

        info!(
            "Served {} to {}/{} (confidential: {})",
            query.address, query.requesting_network, query.requesting_org, query.confidential
        );
        Ok(InteropPayload {
            payload,
            address: query.address,
            confidential: query.confidential,
            requestor_certificate: query.certificate,
            nonce: query.nonce,
        }
        .encode_to_vec())
    }
}
