//! End-to-end flows through the interop contract on an in-memory host
//!
//! Local network `net1` serves queries from foreign relays; foreign network
//! `net2` returns views whose proofs are checked before use.

use prost::Message;
use tether_bridge::{BridgeError, InteropContract};
use tether_core::codec::{decode_proto, encode_b64_proto, encode_base64};
use tether_core::memory::MemoryHost;
use tether_core::proto::common::meta::Protocol;
use tether_core::proto::common::{ConfidentialPayload, InteropPayload, Meta, Query, View};
use tether_core::proto::corda::view_data::Notarization as CordaNotarization;
use tether_core::proto::corda::ViewData;
use tether_core::proto::fabric::fabric_view::EndorsedProposalResponse;
use tether_core::proto::fabric::FabricView;
use tether_core::proto::msp::SerializedIdentity;
use tether_core::proto::peer::{ChaincodeAction, Endorsement, ProposalResponsePayload, Response};
use tether_core::InvokeResponse;
use tether_crypto::testutil::{Authority, Identity};
use tether_crypto::{build_confidential_payload, open_confidential_payload};

const QUERY_ADDRESS: &str = "relay:9080/net1/ch:cc:Read:a";
const VIEW_ADDRESS: &str = "relay:9081/net2/ch:cc:Read:a";

// === Fixtures ===

fn membership_json(domain: &str, org: &str, ca: &Authority) -> String {
    serde_json::json!({
        "securityDomain": domain,
        "members": { org: { "value": ca.pem, "type": "ca" } }
    })
    .to_string()
}

fn access_policy_json(domain: &str, principal: &str, resource: &str) -> String {
    serde_json::json!({
        "securityDomain": domain,
        "rules": [
            { "principal": principal, "principalType": "ca", "resource": resource, "read": true }
        ]
    })
    .to_string()
}

fn verification_policy_json(domain: &str, signers: &[&str]) -> String {
    serde_json::json!({
        "securityDomain": domain,
        "identifiers": [
            { "pattern": "ch:cc:*", "policy": { "type": "Signature", "criteria": signers } }
        ]
    })
    .to_string()
}

/// Host serving `cc.Read(a) = 17.12` on channel `ch`
fn serving_host() -> MemoryHost {
    let host = MemoryHost::with_admin();
    host.register_chaincode("ch", "cc", |args| match args {
        [function, key] if function.as_slice() == b"Read" && key.as_slice() == b"a" => {
            InvokeResponse::success(b"17.12".to_vec())
        }
        _ => InvokeResponse::error("unknown key"),
    });
    host
}

fn signed_query(client: &Identity, org: &str, confidential: bool) -> String {
    let nonce = "nonce-1";
    let signature = client.sign(format!("{}{}", QUERY_ADDRESS, nonce).as_bytes());
    encode_b64_proto(&Query {
        address: QUERY_ADDRESS.to_string(),
        requesting_relay: "relay2".to_string(),
        requesting_network: "net1".to_string(),
        certificate: client.pem.clone(),
        requestor_signature: encode_base64(signature),
        nonce: nonce.to_string(),
        request_id: "req-1".to_string(),
        requesting_org: org.to_string(),
        confidential,
        ..Default::default()
    })
}

fn endorsed(peer: &Identity, mspid: &str, interop: &InteropPayload) -> EndorsedProposalResponse {
    let action = ChaincodeAction {
        response: Some(Response {
            status: 200,
            message: String::new(),
            payload: interop.encode_to_vec(),
        }),
        ..Default::default()
    };
    let payload = ProposalResponsePayload {
        proposal_hash: vec![0xab; 32],
        extension: action.encode_to_vec(),
    };
    let endorser = SerializedIdentity {
        mspid: mspid.to_string(),
        id_bytes: peer.pem.as_bytes().to_vec(),
    }
    .encode_to_vec();
    let signature = peer.sign(&[payload.encode_to_vec(), endorser.clone()].concat());

    EndorsedProposalResponse {
        payload: Some(payload),
        endorsement: Some(Endorsement {
            endorser,
            signature,
        }),
    }
}

fn b64_view(protocol: Protocol, data: Vec<u8>) -> String {
    encode_b64_proto(&View {
        meta: Some(Meta {
            protocol: protocol as i32,
            timestamp: "2026-10-15T00:00:00Z".to_string(),
            proof_type: "Notarization".to_string(),
            serialization_format: "STRING".to_string(),
        }),
        data,
    })
}

fn fabric_view(responses: Vec<EndorsedProposalResponse>) -> String {
    b64_view(
        Protocol::Fabric,
        FabricView {
            endorsed_proposal_responses: responses,
        }
        .encode_to_vec(),
    )
}

fn plain_payload(data: &[u8]) -> InteropPayload {
    InteropPayload {
        payload: data.to_vec(),
        address: VIEW_ADDRESS.to_string(),
        ..Default::default()
    }
}

/// Host whose local network trusts `net2`'s `Org1` and requires its signature
fn verifying_host(org1: &Authority) -> MemoryHost {
    let host = MemoryHost::with_admin();
    let contract = InteropContract::new(&host);
    contract
        .create_membership(&membership_json("net2", "Org1", org1))
        .unwrap();
    contract
        .create_verification_policy(&verification_policy_json("net2", &["Org1"]))
        .unwrap();
    host
}

// === Inbound requests ===

#[test]
fn test_inbound_request_happy_path() {
    let ca = Authority::new("Org1", "ca.org1");
    let client = ca.issue("relay-client.org1");
    let host = serving_host();
    let contract = InteropContract::new(&host);
    contract
        .create_membership(&membership_json("net1", "Org1", &ca))
        .unwrap();
    contract
        .create_access_control_policy(&access_policy_json("net1", "Org1", "ch:cc:Read:*"))
        .unwrap();

    let result = contract
        .handle_external_request(&signed_query(&client, "Org1", false))
        .unwrap();
    let payload = InteropPayload::decode(&result[..]).unwrap();

    // Raw protobuf, not a base64 rendition of it
    assert_eq!(result, payload.encode_to_vec());
    assert_eq!(payload.address, QUERY_ADDRESS);
    assert_eq!(payload.payload, b"17.12");
    assert!(!payload.confidential);
    assert_eq!(payload.nonce, "nonce-1");
    assert_eq!(host.invocations().len(), 1);
}

#[test]
fn test_inbound_request_defaults_org_to_issuer() {
    let ca = Authority::new("Org1", "ca.org1");
    let client = ca.issue("relay-client.org1");
    let host = serving_host();
    let contract = InteropContract::new(&host);
    contract
        .create_membership(&membership_json("net1", "Org1", &ca))
        .unwrap();
    contract
        .create_access_control_policy(&access_policy_json("net1", "Org1", "ch:cc:Read:*"))
        .unwrap();

    assert!(contract
        .handle_external_request(&signed_query(&client, "", false))
        .is_ok());
}

#[test]
fn test_inbound_request_confidential() {
    let ca = Authority::new("Org1", "ca.org1");
    let client = ca.issue("relay-client.org1");
    let host = serving_host();
    let contract = InteropContract::new(&host);
    contract
        .create_membership(&membership_json("net1", "Org1", &ca))
        .unwrap();
    contract
        .create_access_control_policy(&access_policy_json("net1", "Org1", "ch:cc:Read:*"))
        .unwrap();

    let result = contract
        .handle_external_request(&signed_query(&client, "Org1", true))
        .unwrap();
    let payload = InteropPayload::decode(&result[..]).unwrap();
    assert!(payload.confidential);
    assert_ne!(payload.payload, b"17.12");
    assert_eq!(payload.requestor_certificate, client.pem);

    let sealed: ConfidentialPayload = decode_proto("sealed", &payload.payload).unwrap();
    let contents = open_confidential_payload(&sealed, &client.pkcs8).unwrap();
    assert_eq!(contents.payload, b"17.12");
}

#[test]
fn test_inbound_request_member_of_other_org_rejected() {
    let org1 = Authority::new("Org1", "ca.org1");
    let org2 = Authority::new("Org2", "ca.org2");
    let client = org2.issue("relay-client.org2");
    let host = serving_host();
    let contract = InteropContract::new(&host);
    contract
        .create_membership(&membership_json("net1", "Org1", &org1))
        .unwrap();

    // Claims Org1 but holds an Org2 certificate
    let err = contract
        .handle_external_request(&signed_query(&client, "Org1", false))
        .unwrap_err();
    assert!(matches!(err, BridgeError::MembershipInvalid(_)));
    assert!(err.is_trust_failure());
    assert!(host.invocations().is_empty());
}

#[test]
fn test_inbound_request_access_denied() {
    let ca = Authority::new("Org1", "ca.org1");
    let client = ca.issue("relay-client.org1");
    let host = serving_host();
    let contract = InteropContract::new(&host);
    contract
        .create_membership(&membership_json("net1", "Org1", &ca))
        .unwrap();
    contract
        .create_access_control_policy(&access_policy_json("net1", "Org1", "ch:cc:Write:*"))
        .unwrap();

    let err = contract
        .handle_external_request(&signed_query(&client, "Org1", false))
        .unwrap_err();
    assert!(matches!(err, BridgeError::AccessDenied(_)));
    assert!(host.invocations().is_empty());
}

#[test]
fn test_inbound_request_application_failure() {
    let ca = Authority::new("Org1", "ca.org1");
    let client = ca.issue("relay-client.org1");
    let host = MemoryHost::with_admin();
    let contract = InteropContract::new(&host);
    contract
        .create_membership(&membership_json("net1", "Org1", &ca))
        .unwrap();
    contract
        .create_access_control_policy(&access_policy_json("net1", "Org1", "*"))
        .unwrap();

    // No chaincode registered on the channel
    let err = contract
        .handle_external_request(&signed_query(&client, "Org1", false))
        .unwrap_err();
    assert!(matches!(err, BridgeError::ApplicationInvoke { status: 500, .. }));
}

// === Fabric proofs ===

#[test]
fn test_fabric_view_verified() {
    let org1 = Authority::new("Org1", "ca.org1");
    let peer = org1.issue("peer0.org1");
    let host = verifying_host(&org1);
    let contract = InteropContract::new(&host);

    let view = fabric_view(vec![endorsed(&peer, "Org1", &plain_payload(b"17.12"))]);
    contract.verify_view(&view, VIEW_ADDRESS).unwrap();
    assert_eq!(
        contract.parse_and_validate_view(VIEW_ADDRESS, &view, &[]).unwrap(),
        b"17.12"
    );
}

#[test]
fn test_fabric_quorum_not_met() {
    let org1 = Authority::new("Org1", "ca.org1");
    let org2 = Authority::new("Org2", "ca.org2");
    let peer = org2.issue("peer0.org2");
    let host = verifying_host(&org1);
    let contract = InteropContract::new(&host);
    contract
        .update_membership(
            &serde_json::json!({
                "securityDomain": "net2",
                "members": {
                    "Org1": { "value": org1.pem, "type": "ca" },
                    "Org2": { "value": org2.pem, "type": "ca" }
                }
            })
            .to_string(),
        )
        .unwrap();

    // Org2's endorsement verifies, but the policy wants Org1
    let view = fabric_view(vec![endorsed(&peer, "Org2", &plain_payload(b"17.12"))]);
    let err = contract.verify_view(&view, VIEW_ADDRESS).unwrap_err();
    assert!(matches!(err, BridgeError::QuorumNotMet { ref missing } if missing == "Org1"));
}

#[test]
fn test_fabric_address_mismatch() {
    let org1 = Authority::new("Org1", "ca.org1");
    let peer = org1.issue("peer0.org1");
    let host = verifying_host(&org1);
    let contract = InteropContract::new(&host);

    let mut payload = plain_payload(b"17.12");
    payload.address = "relay:9081/net2/ch:cc:Read:b".to_string();
    let view = fabric_view(vec![endorsed(&peer, "Org1", &payload)]);
    let err = contract.verify_view(&view, VIEW_ADDRESS).unwrap_err();
    assert!(matches!(err, BridgeError::AddressMismatch { .. }));
}

#[test]
fn test_fabric_tampered_endorsement() {
    let org1 = Authority::new("Org1", "ca.org1");
    let peer = org1.issue("peer0.org1");
    let host = verifying_host(&org1);
    let contract = InteropContract::new(&host);

    let mut response = endorsed(&peer, "Org1", &plain_payload(b"17.12"));
    if let Some(payload) = response.payload.as_mut() {
        payload.proposal_hash = vec![0xcd; 32];
    }
    let err = contract
        .verify_view(&fabric_view(vec![response]), VIEW_ADDRESS)
        .unwrap_err();
    assert!(matches!(err, BridgeError::SignatureInvalid(_)));
}

#[test]
fn test_fabric_empty_proof_rejected() {
    let org1 = Authority::new("Org1", "ca.org1");
    let host = verifying_host(&org1);
    let contract = InteropContract::new(&host);
    let err = contract
        .verify_view(&fabric_view(Vec::new()), VIEW_ADDRESS)
        .unwrap_err();
    assert!(matches!(err, BridgeError::EmptyProof));
}

#[test]
fn test_fabric_inconsistent_responses() {
    let org1 = Authority::new("Org1", "ca.org1");
    let peer0 = org1.issue("peer0.org1");
    let peer1 = org1.issue("peer1.org1");
    let host = verifying_host(&org1);
    let contract = InteropContract::new(&host);

    let view = fabric_view(vec![
        endorsed(&peer0, "Org1", &plain_payload(b"17.12")),
        endorsed(&peer1, "Org1", &plain_payload(b"99.99")),
    ]);
    contract.verify_view(&view, VIEW_ADDRESS).unwrap();
    let err = contract
        .parse_and_validate_view(VIEW_ADDRESS, &view, &[])
        .unwrap_err();
    assert!(matches!(err, BridgeError::InconsistentProposalResponses { index: 1 }));
}

#[test]
fn test_fabric_confidential_view() {
    let org1 = Authority::new("Org1", "ca.org1");
    let peer = org1.issue("peer0.org1");
    let client = org1.issue("client.org1");
    let host = verifying_host(&org1);
    let contract = InteropContract::new(&host);

    let sealed = build_confidential_payload(b"17.12", &client.pem).unwrap();
    let interop = InteropPayload {
        payload: sealed.encode_to_vec(),
        address: VIEW_ADDRESS.to_string(),
        confidential: true,
        ..Default::default()
    };
    let view = fabric_view(vec![endorsed(&peer, "Org1", &interop)]);

    let err = contract
        .parse_and_validate_view(VIEW_ADDRESS, &view, &[])
        .unwrap_err();
    assert!(matches!(
        err,
        BridgeError::ContentCountMismatch {
            expected: 1,
            found: 0
        }
    ));

    let contents = open_confidential_payload(&sealed, &client.pkcs8).unwrap();
    let decrypted = vec![encode_b64_proto(&contents)];
    assert_eq!(
        contract
            .parse_and_validate_view(VIEW_ADDRESS, &view, &decrypted)
            .unwrap(),
        b"17.12"
    );

    let mut forged = contents;
    forged.payload = b"1000.00".to_vec();
    let err = contract
        .parse_and_validate_view(VIEW_ADDRESS, &view, &[encode_b64_proto(&forged)])
        .unwrap_err();
    assert!(matches!(err, BridgeError::HashMismatch));
}

#[test]
fn test_unknown_network_has_no_policy() {
    let org1 = Authority::new("Org1", "ca.org1");
    let peer = org1.issue("peer0.org1");
    let host = verifying_host(&org1);
    let contract = InteropContract::new(&host);

    let view = fabric_view(vec![endorsed(&peer, "Org1", &plain_payload(b"17.12"))]);
    let err = contract
        .verify_view(&view, "relay:9081/net3/ch:cc:Read:a")
        .unwrap_err();
    assert!(matches!(err, BridgeError::PolicyResolution(_)));
}

// === Corda proofs ===

fn corda_view(notaries: &[(&Identity, &str)], payload: &InteropPayload) -> String {
    let payload = payload.encode_to_vec();
    let notarizations = notaries
        .iter()
        .map(|(notary, id)| CordaNotarization {
            signature: encode_base64(notary.sign(&payload)),
            certificate: notary.pem.clone(),
            id: id.to_string(),
        })
        .collect();
    b64_view(
        Protocol::Corda,
        ViewData {
            notarizations,
            payload,
        }
        .encode_to_vec(),
    )
}

#[test]
fn test_corda_view_verified() {
    let org1 = Authority::new("Org1", "ca.org1");
    let notary = org1.issue("notary.org1");
    let host = verifying_host(&org1);
    let contract = InteropContract::new(&host);

    let view = corda_view(&[(&notary, "Org1")], &plain_payload(b"state"));
    assert_eq!(
        contract.parse_and_validate_view(VIEW_ADDRESS, &view, &[]).unwrap(),
        b"state"
    );
}

#[test]
fn test_corda_claimed_identity_must_match_membership() {
    let org1 = Authority::new("Org1", "ca.org1");
    let org2 = Authority::new("Org2", "ca.org2");
    let notary = org2.issue("notary.org2");
    let host = verifying_host(&org1);
    let contract = InteropContract::new(&host);

    let view = corda_view(&[(&notary, "Org1")], &plain_payload(b"state"));
    let err = contract.verify_view(&view, VIEW_ADDRESS).unwrap_err();
    assert!(matches!(err, BridgeError::MembershipInvalid(_)));
}

// === Writing external state ===

#[test]
fn test_write_external_state_splices_payloads() {
    let org1 = Authority::new("Org1", "ca.org1");
    let peer = org1.issue("peer0.org1");
    let host = verifying_host(&org1);
    host.register_chaincode("appch", "app", |args| {
        InvokeResponse::success(args.concat())
    });
    let contract = InteropContract::new(&host);

    let view = fabric_view(vec![endorsed(&peer, "Org1", &plain_payload(b"17.12"))]);
    let result = contract
        .write_external_state(
            "app",
            "appch",
            "Store",
            &["key".to_string(), String::new()],
            &[1],
            &[VIEW_ADDRESS.to_string()],
            &[view],
            &[Vec::new()],
        )
        .unwrap();
    assert_eq!(result, b"Storekey17.12");

    let invocation = host.invocations().pop().unwrap();
    assert_eq!(invocation.name, "app");
    assert_eq!(invocation.channel, "appch");
    assert_eq!(
        invocation.args,
        vec![b"Store".to_vec(), b"key".to_vec(), b"17.12".to_vec()]
    );
}

#[test]
fn test_write_external_state_rejects_bad_view() {
    let org1 = Authority::new("Org1", "ca.org1");
    let org2 = Authority::new("Org2", "ca.org2");
    let outsider = org2.issue("peer0.org2");
    let host = verifying_host(&org1);
    host.register_chaincode("appch", "app", |_| InvokeResponse::success(Vec::new()));
    let contract = InteropContract::new(&host);

    let view = fabric_view(vec![endorsed(&outsider, "Org1", &plain_payload(b"17.12"))]);
    let err = contract
        .write_external_state(
            "app",
            "appch",
            "Store",
            &["key".to_string(), String::new()],
            &[1],
            &[VIEW_ADDRESS.to_string()],
            &[view],
            &[Vec::new()],
        )
        .unwrap_err();
    assert!(matches!(err, BridgeError::MembershipInvalid(_)));
    assert!(host.invocations().is_empty());
}

#[test]
fn test_ecert_of_creator() {
    let ca = Authority::new("Org1", "ca.org1");
    let client = ca.issue("client.org1");
    let host = MemoryHost::new();
    host.set_creator(
        SerializedIdentity {
            mspid: "Org1MSP".to_string(),
            id_bytes: client.pem.as_bytes().to_vec(),
        }
        .encode_to_vec(),
    );
    let contract = InteropContract::new(&host);
    assert_eq!(
        contract.get_ecert_of_tx_creator_base64().unwrap(),
        encode_base64(client.pem.as_bytes())
    );
}
