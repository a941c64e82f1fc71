//! # Proof Verification
//!
//! Checks a view returned by a foreign network before its payload is handed
//! to a local contract.
//!
//! ## Pipeline
//!
//! ```text
//! b64 View ──► decode ──► verification policy (network, view segment)
//!                │
//!                ▼
//!        ┌───────────────┬──────────────────┐
//!        │ FABRIC        │ CORDA            │
//!        │ endorsements  │ notarizations    │
//!        └───────┬───────┴────────┬─────────┘
//!                ▼                ▼
//!     address + signature + membership per signer
//!                │
//!                ▼
//!     required signers ⊆ collected signers
//!                │
//!                ▼
//!     payload extraction (HMAC check when confidential)
//! ```
//!
//! Every Fabric endorsed response carries its own copy of the payload; they
//! must agree. A Corda view carries one payload signed by all notaries.

use prost::Message;
use tether_core::codec::{decode_b64_proto, decode_base64, decode_proto};
use tether_core::proto::common::meta::Protocol;
use tether_core::proto::common::{
    ConfidentialPayload, ConfidentialPayloadContents, InteropPayload, View,
};
use tether_core::proto::corda::ViewData;
use tether_core::proto::fabric::fabric_view::EndorsedProposalResponse;
use tether_core::proto::fabric::FabricView;
use tether_core::proto::peer::{ChaincodeAction, Endorsement, ProposalResponsePayload};
use tether_core::{parse_address, Host, STATUS_ERROR_THRESHOLD};
use tether_crypto::{
    parse_certificate, verify_confidential_contents, verify_signature, CryptoError,
};
use tracing::{debug, info, warn};

use crate::contract::InteropContract;
use crate::error::{BridgeError, Result};
use crate::identity::decode_serialized_identity;

/// Proof type carried in `Meta.proof_type` for signature-based proofs
pub const NOTARIZATION_PROOF_TYPE: &str = "Notarization";

/// Protocol-specific proof carried in a view's data
#[derive(Clone, Debug, PartialEq)]
pub enum Notarization {
    Fabric(FabricView),
    Corda(ViewData),
}

impl Notarization {
    /// Decode the proof of `view` according to its metadata
    pub fn from_view(view: &View) -> Result<Self> {
        let meta = view.meta.as_ref().ok_or(BridgeError::MissingField("view meta"))?;
        let protocol = Protocol::try_from(meta.protocol).ok();

        match (protocol, meta.proof_type.as_str()) {
            (Some(Protocol::Fabric), NOTARIZATION_PROOF_TYPE) => {
                Ok(Self::Fabric(decode_proto("fabric view", &view.data)?))
            }
            (Some(Protocol::Corda), NOTARIZATION_PROOF_TYPE) => {
                Ok(Self::Corda(decode_proto("corda view", &view.data)?))
            }
            (protocol, proof_type) => Err(BridgeError::UnsupportedProofType {
                protocol: protocol
                    .map(|p| p.as_str_name().to_string())
                    .unwrap_or_else(|| meta.protocol.to_string()),
                proof_type: proof_type.to_string(),
            }),
        }
    }

    /// The interop payloads the proof attests to, in proof order
    pub fn interop_payloads(&self) -> Result<Vec<InteropPayload>> {
        match self {
            Self::Fabric(view) => view
                .endorsed_proposal_responses
                .iter()
                .enumerate()
                .map(|(index, response)| {
                    let (payload, _) = endorsed_parts(response)?;
                    fabric_interop_payload(index, payload)
                })
                .collect(),
            Self::Corda(view) => Ok(vec![decode_proto("corda interop payload", &view.payload)?]),
        }
    }
}

impl<'h, H: Host + ?Sized> InteropContract<'h, H> {
    /// Verify the proof of a base64 view against the verification policy
    /// registered for `address`.
    pub fn verify_view(&self, b64_view: &str, address: &str) -> Result<()> {
        let view: View = decode_b64_proto("view", b64_view)?;
        self.verify_decoded_view(&view, address)
    }

    /// Verify a view and return the payload it carries.
    ///
    /// `decrypted_contents` holds one base64 `ConfidentialPayloadContents` per
    /// proposal response when the view is confidential; it is ignored otherwise.
    pub fn parse_and_validate_view(
        &self,
        address: &str,
        b64_view: &str,
        decrypted_contents: &[String],
    ) -> Result<Vec<u8>> {
        let view: View = decode_b64_proto("view", b64_view)?;
        self.verify_decoded_view(&view, address)?;
        extract_and_validate_data(&view, decrypted_contents)
    }

    fn verify_decoded_view(&self, view: &View, address: &str) -> Result<()> {
        let parsed = parse_address(address)?;
        let policy = self
            .verification_policies()
            .resolve_policy(&parsed.network_id, &parsed.view_segment)
            .map_err(BridgeError::PolicyResolution)?;

        let signers = match Notarization::from_view(view)? {
            Notarization::Fabric(fabric) => {
                self.verify_fabric_view(&fabric, address, &parsed.network_id)?
            }
            Notarization::Corda(corda) => {
                self.verify_corda_view(&corda, address, &parsed.network_id)?
            }
        };

        if let Some(missing) = policy.missing_signer(&signers) {
            warn!(
                "Proof for {} lacks required signer {} (signers: {:?})",
                address, missing, signers
            );
            return Err(BridgeError::QuorumNotMet {
                missing: missing.to_string(),
            });
        }

        info!("Proof for {} valid, signed by {:?}", address, signers);
        Ok(())
    }

    fn verify_fabric_view(
        &self,
        view: &FabricView,
        address: &str,
        security_domain: &str,
    ) -> Result<Vec<String>> {
        if view.endorsed_proposal_responses.is_empty() {
            return Err(BridgeError::EmptyProof);
        }

        let memberships = self.memberships();
        let mut signers = Vec::with_capacity(view.endorsed_proposal_responses.len());
        for (index, response) in view.endorsed_proposal_responses.iter().enumerate() {
            let (payload, endorsement) = endorsed_parts(response)?;
            check_address(&fabric_interop_payload(index, payload)?, address)?;

            let (mspid, cert) = decode_serialized_identity(&endorsement.endorser)?;
            let signed = [payload.encode_to_vec(), endorsement.endorser.clone()].concat();
            verify_signature(&signed, &cert, &endorsement.signature)
                .map_err(BridgeError::SignatureInvalid)?;
            memberships
                .verify_member(&cert, security_domain, &mspid)
                .map_err(BridgeError::MembershipInvalid)?;

            debug!("Endorsement {} by {} verified", index, mspid);
            signers.push(mspid);
        }
        Ok(signers)
    }

    fn verify_corda_view(
        &self,
        view: &ViewData,
        address: &str,
        security_domain: &str,
    ) -> Result<Vec<String>> {
        if view.notarizations.is_empty() {
            return Err(BridgeError::EmptyProof);
        }
        let payload: InteropPayload = decode_proto("corda interop payload", &view.payload)?;
        check_address(&payload, address)?;

        let memberships = self.memberships();
        let mut signers = Vec::with_capacity(view.notarizations.len());
        for notarization in &view.notarizations {
            let cert = parse_certificate(&notarization.certificate).map_err(BridgeError::CertParse)?;
            let signature = decode_base64("notary signature", &notarization.signature)?;
            verify_signature(&view.payload, &cert, &signature)
                .map_err(BridgeError::SignatureInvalid)?;
            signers.push(notarization.id.clone());
            memberships
                .verify_member(&cert, security_domain, &notarization.id)
                .map_err(BridgeError::MembershipInvalid)?;
        }
        Ok(signers)
    }
}

/// Extract the payload of a view whose proof has been verified.
///
/// All interop payloads in the proof must yield the same bytes and share one
/// confidentiality flag. Confidential payloads are checked against the HMAC
/// they carry using the matching entry of `decrypted_contents`.
pub fn extract_and_validate_data(view: &View, decrypted_contents: &[String]) -> Result<Vec<u8>> {
    let payloads = Notarization::from_view(view)?.interop_payloads()?;

    let mut canonical: Option<(Vec<u8>, bool)> = None;
    for (index, interop) in payloads.iter().enumerate() {
        let data = if interop.confidential {
            if decrypted_contents.len() != payloads.len() {
                return Err(BridgeError::ContentCountMismatch {
                    expected: payloads.len(),
                    found: decrypted_contents.len(),
                });
            }
            open_confidential(interop, &decrypted_contents[index])?
        } else {
            interop.payload.clone()
        };

        match &canonical {
            None => canonical = Some((data, interop.confidential)),
            Some((first, confidential)) => {
                if *first != data || *confidential != interop.confidential {
                    return Err(BridgeError::InconsistentProposalResponses { index });
                }
            }
        }
    }

    canonical
        .map(|(payload, _)| payload)
        .ok_or(BridgeError::EmptyProof)
}

fn open_confidential(interop: &InteropPayload, b64_contents: &str) -> Result<Vec<u8>> {
    let contents: ConfidentialPayloadContents =
        decode_b64_proto("decrypted view contents", b64_contents)?;
    let sealed: ConfidentialPayload = decode_proto("confidential payload", &interop.payload)?;
    verify_confidential_contents(&sealed, &contents).map_err(|e| match e {
        CryptoError::UnsupportedHashType(hash_type) => BridgeError::UnsupportedHashType(hash_type),
        CryptoError::HashMismatch => BridgeError::HashMismatch,
        e => BridgeError::Confidential(e),
    })?;
    Ok(contents.payload)
}

fn endorsed_parts(
    response: &EndorsedProposalResponse,
) -> Result<(&ProposalResponsePayload, &Endorsement)> {
    let payload = response
        .payload
        .as_ref()
        .ok_or(BridgeError::MissingField("proposal response payload"))?;
    let endorsement = response
        .endorsement
        .as_ref()
        .ok_or(BridgeError::MissingField("endorsement"))?;
    Ok((payload, endorsement))
}

fn fabric_interop_payload(index: usize, payload: &ProposalResponsePayload) -> Result<InteropPayload> {
    let action: ChaincodeAction = decode_proto("chaincode action", &payload.extension)?;
    let response = action
        .response
        .ok_or(BridgeError::MissingField("chaincode response"))?;
    if response.status >= STATUS_ERROR_THRESHOLD {
        return Err(BridgeError::FailedResponse {
            index,
            status: response.status,
            message: response.message,
        });
    }
    Ok(decode_proto("interop payload", &response.payload)?)
}

fn check_address(payload: &InteropPayload, address: &str) -> Result<()> {
    if payload.address != address {
        return Err(BridgeError::AddressMismatch {
            expected: address.to_string(),
            found: payload.address.clone(),
        });
    }
    Ok(())
}
