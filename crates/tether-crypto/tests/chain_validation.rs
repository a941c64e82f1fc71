//! Integration tests for certificate chains and proof signatures
//!
//! These tests drive the public API with freshly minted CAs, covering the
//! chain shapes found in membership records.

use proptest::prelude::*;
use tether_crypto::testutil::{Authority, KeyAlg};
use tether_crypto::{
    parse_certificate, validate_against_issuer, validate_chain, verify_signature, CryptoError,
};

mod chain_tests {
    use super::*;

    #[test]
    fn test_root_only_chain_with_leaf() {
        let ca = Authority::new("Org1", "ca.org1");
        let leaf = parse_certificate(&ca.issue("peer0.org1").pem).unwrap();

        validate_chain(Some(&leaf), &[ca.pem.clone()]).unwrap();
    }

    #[test]
    fn test_three_link_chain() {
        let root = Authority::new("Org1", "root.org1");
        let ica = root.intermediate("Org1", "ica.org1");
        let ica2 = ica.intermediate("Org1", "ica2.org1");
        let leaf = parse_certificate(&ica2.issue("peer0.org1").pem).unwrap();

        let chain = vec![root.pem.clone(), ica.pem.clone(), ica2.pem.clone()];
        validate_chain(None, &chain).unwrap();
        validate_chain(Some(&leaf), &chain).unwrap();
    }

    #[test]
    fn test_missing_intermediate_breaks_chain() {
        let root = Authority::new("Org1", "root.org1");
        let ica = root.intermediate("Org1", "ica.org1");
        let ica2 = ica.intermediate("Org1", "ica2.org1");
        let leaf = parse_certificate(&ica2.issue("peer0.org1").pem).unwrap();

        let err = validate_chain(Some(&leaf), &[root.pem.clone(), ica2.pem.clone()]).unwrap_err();
        match &err {
            CryptoError::BrokenChain { subject, .. } => assert!(subject.contains("ica2.org1")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(err.root_cause(), CryptoError::SignatureInvalid { .. }));
    }

    #[test]
    fn test_root_only_chain_rejects_intermediate_leaf() {
        let root = Authority::new("Org1", "root.org1");
        let ica = root.intermediate("Org1", "ica.org1");
        let leaf = parse_certificate(&ica.issue("peer0.org1").pem).unwrap();

        let err = validate_chain(Some(&leaf), &[root.pem.clone()]).unwrap_err();
        match &err {
            CryptoError::BrokenChain { subject, .. } => assert!(subject.contains("peer0.org1")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(err.root_cause(), CryptoError::SignatureInvalid { .. }));

        validate_chain(Some(&leaf), &[root.pem.clone(), ica.pem.clone()]).unwrap();
    }

    #[test]
    fn test_leaf_from_other_authority() {
        let root = Authority::new("Org1", "root.org1");
        let ica = root.intermediate("Org1", "ica.org1");
        let stranger = Authority::new("Org2", "ca.org2");
        let leaf = parse_certificate(&stranger.issue("peer0.org2").pem).unwrap();

        let err = validate_chain(Some(&leaf), &[root.pem.clone(), ica.pem.clone()]).unwrap_err();
        match err {
            CryptoError::BrokenChain { subject, source } => {
                assert!(subject.contains("peer0.org2"));
                assert!(matches!(*source, CryptoError::SignatureInvalid { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_out_of_order_chain() {
        let root = Authority::new("Org1", "root.org1");
        let ica = root.intermediate("Org1", "ica.org1");

        let err = validate_chain(None, &[ica.pem.clone(), root.pem.clone()]).unwrap_err();
        assert!(matches!(err, CryptoError::BrokenChain { .. }));
    }

    #[test]
    fn test_expired_leaf() {
        let ca = Authority::new("Org1", "ca.org1");
        let leaf = parse_certificate(&ca.issue_expired("old.org1").pem).unwrap();

        let err = validate_chain(Some(&leaf), &[ca.pem.clone()]).unwrap_err();
        assert!(matches!(err.root_cause(), CryptoError::Expired { .. }));
    }

    #[test]
    fn test_issuer_name_mismatch() {
        let ca = Authority::new("Org1", "ca.org1");
        let renamed = ca.with_same_key("Org1", "renamed.org1");
        let leaf = parse_certificate(&ca.issue("peer0.org1").pem).unwrap();
        let issuer = parse_certificate(&renamed.pem).unwrap();

        let err = validate_against_issuer(&leaf, &issuer, true).unwrap_err();
        assert!(matches!(err, CryptoError::IssuerMismatch { .. }));
    }

    #[test]
    fn test_bad_pem_in_chain() {
        let ca = Authority::new("Org1", "ca.org1");
        let err = validate_chain(None, &[ca.pem.clone(), "garbage".to_string()]).unwrap_err();
        assert!(matches!(err, CryptoError::CertParse(_)));
    }

    #[test]
    fn test_ed25519_leaf_under_ecdsa_root() {
        let ca = Authority::new("Org1", "ca.org1");
        let identity = ca.issue_with_alg("notary.org1", KeyAlg::Ed25519);
        let leaf = parse_certificate(&identity.pem).unwrap();

        validate_chain(Some(&leaf), &[ca.pem.clone()]).unwrap();
        verify_signature(b"tx", &leaf, &identity.sign(b"tx")).unwrap();
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_single_bit_mutation_rejected(bit in 0usize..512, p256 in any::<bool>()) {
        let ca = Authority::new("Org1", "ca.org1");
        let alg = if p256 { KeyAlg::P256 } else { KeyAlg::Ed25519 };
        let identity = ca.issue_with_alg("peer0.org1", alg);
        let cert = parse_certificate(&identity.pem).unwrap();

        let mut sig = identity.sign(b"endorsed response");
        let bit = bit % (sig.len() * 8);
        sig[bit / 8] ^= 1 << (bit % 8);

        prop_assert!(verify_signature(b"endorsed response", &cert, &sig).is_err());
    }
}
