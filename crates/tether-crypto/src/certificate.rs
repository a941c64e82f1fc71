//! # X.509 Certificates
//!
//! Certificates arrive as PEM text inside proofs, membership records and
//! caller identities. They are parsed once into an owned [`Certificate`]
//! holding the fields the trust layer inspects; signature checks re-read
//! the retained DER.
//!
//! ## Chain Layout
//!
//! ```text
//!   chain[0]        chain[1]             chain[n-1]         leaf
//!  ┌────────┐     ┌────────────┐       ┌────────────┐     ┌──────┐
//!  │  root  │ ◄── │intermediate│ ◄ ... │intermediate│ ◄── │ cert │
//!  │ (self) │     └────────────┘       └────────────┘     └──────┘
//!  └────────┘
//! ```
//!
//! Each link must be signed by its predecessor, name it as issuer and be
//! inside its validity window. The root must verify under its own key.

use std::fmt;

use x509_parser::certificate::X509Certificate;
use x509_parser::pem::parse_x509_pem;
use x509_parser::prelude::FromDer;
use x509_parser::public_key::PublicKey;

use crate::error::{CryptoError, Result};

/// DER length of an Ed25519 SubjectPublicKeyInfo
pub const ED25519_SPKI_LEN: usize = 44;

const PEM_LABEL: &str = "CERTIFICATE";

/// Public key carried by a certificate
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CertificateKey {
    /// Uncompressed SEC1 point on a NIST curve
    Ecdsa { curve_bits: usize, point: Vec<u8> },
    /// Raw Ed25519 verifying key
    Ed25519([u8; 32]),
    /// Anything else, described by algorithm OID
    Unsupported(String),
}

impl CertificateKey {
    pub fn algorithm_name(&self) -> String {
        match self {
            Self::Ecdsa { curve_bits, .. } => format!("ECDSA P-{}", curve_bits),
            Self::Ed25519(_) => "Ed25519".to_string(),
            Self::Unsupported(oid) => oid.clone(),
        }
    }
}

/// Parsed X.509 certificate
#[derive(Clone, PartialEq, Eq)]
pub struct Certificate {
    der: Vec<u8>,
    subject: String,
    issuer: String,
    subject_org: Option<String>,
    issuer_org: Option<String>,
    not_before: i64,
    not_after: i64,
    key: CertificateKey,
}

impl Certificate {
    /// Parse a DER-encoded certificate
    pub fn from_der(der: Vec<u8>) -> Result<Self> {
        let (subject, issuer, subject_org, issuer_org, not_before, not_after, key) = {
            let x509 = parse_x509(&der)?;
            let validity = x509.validity();
            (
                x509.subject().to_string(),
                x509.issuer().to_string(),
                first_organization(x509.subject()),
                first_organization(x509.issuer()),
                validity.not_before.timestamp(),
                validity.not_after.timestamp(),
                classify_key(&x509),
            )
        };

        Ok(Self {
            der,
            subject,
            issuer,
            subject_org,
            issuer_org,
            not_before,
            not_after,
            key,
        })
    }

    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// Subject distinguished name
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Issuer distinguished name
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// First organization (O) of the subject
    pub fn subject_org(&self) -> Option<&str> {
        self.subject_org.as_deref()
    }

    /// First organization (O) of the issuer
    pub fn issuer_org(&self) -> Option<&str> {
        self.issuer_org.as_deref()
    }

    pub fn not_before(&self) -> i64 {
        self.not_before
    }

    pub fn not_after(&self) -> i64 {
        self.not_after
    }

    pub fn key(&self) -> &CertificateKey {
        &self.key
    }

    /// SHA-256 of the DER encoding, hex
    pub fn fingerprint(&self) -> String {
        hex::encode(ring::digest::digest(&ring::digest::SHA256, &self.der))
    }

    /// Whether `now` (unix seconds) lies in `[not_before, not_after]`
    pub fn is_valid_at(&self, now: i64) -> bool {
        self.not_before <= now && now <= self.not_after
    }

    /// Validity check against the wall clock
    pub fn check_validity(&self) -> Result<()> {
        self.check_validity_at(chrono::Utc::now().timestamp())
    }

    pub fn check_validity_at(&self, now: i64) -> Result<()> {
        if self.is_valid_at(now) {
            return Ok(());
        }
        Err(CryptoError::Expired {
            subject: self.subject.clone(),
            not_before: self.not_before,
            not_after: self.not_after,
        })
    }

    /// Verify this certificate's signature under `issuer`'s public key
    pub fn verify_issued_by(&self, issuer: &Certificate) -> Result<()> {
        let cert = parse_x509(&self.der)?;
        let signer = parse_x509(&issuer.der)?;
        cert.verify_signature(Some(signer.public_key()))
            .map_err(|e| CryptoError::SignatureInvalid {
                subject: self.subject.clone(),
                reason: e.to_string(),
            })
    }

    /// Verify this certificate's signature under its own key
    pub fn verify_self_signed(&self) -> Result<()> {
        let cert = parse_x509(&self.der)?;
        cert.verify_signature(None)
            .map_err(|e| CryptoError::SignatureInvalid {
                subject: self.subject.clone(),
                reason: format!("not a valid self-signed root: {}", e),
            })
    }
}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Certificate")
            .field("subject", &self.subject)
            .field("issuer", &self.issuer)
            .field("key", &self.key.algorithm_name())
            .field("not_after", &self.not_after)
            .finish()
    }
}

fn parse_x509(der: &[u8]) -> Result<X509Certificate<'_>> {
    let (_, x509) =
        X509Certificate::from_der(der).map_err(|e| CryptoError::CertParse(e.to_string()))?;
    Ok(x509)
}

fn first_organization(name: &x509_parser::x509::X509Name<'_>) -> Option<String> {
    name.iter_organization()
        .next()
        .and_then(|attr| attr.as_str().ok())
        .map(str::to_string)
}

fn classify_key(x509: &X509Certificate<'_>) -> CertificateKey {
    let spki = x509.public_key();
    if let Ok(PublicKey::EC(ec)) = spki.parsed() {
        // x509-parser rounds P-521 up to whole bytes
        let curve_bits = match ec.key_size() {
            528 => 521,
            bits => bits,
        };
        return CertificateKey::Ecdsa {
            curve_bits,
            point: ec.data().to_vec(),
        };
    }
    if spki.raw.len() == ED25519_SPKI_LEN {
        if let Ok(key) = <[u8; 32]>::try_from(spki.subject_public_key.data.as_ref()) {
            return CertificateKey::Ed25519(key);
        }
    }
    CertificateKey::Unsupported(spki.algorithm.algorithm.to_id_string())
}

/// Decode a PEM certificate
pub fn parse_certificate(pem: &str) -> Result<Certificate> {
    let (_, block) = parse_x509_pem(pem.as_bytes())
        .map_err(|_| CryptoError::CertParse("not a known PEM format".to_string()))?;
    if block.label != PEM_LABEL {
        return Err(CryptoError::CertParse(format!(
            "unexpected PEM block '{}'",
            block.label
        )));
    }
    Certificate::from_der(block.contents)
}

/// Parse a list of PEM certificates, failing on the first bad entry
pub fn parse_certificates<S: AsRef<str>>(pems: &[S]) -> Result<Vec<Certificate>> {
    pems.iter().map(|pem| parse_certificate(pem.as_ref())).collect()
}

/// Trust anchors and intermediates for path verification
#[derive(Clone, Debug, Default)]
pub struct TrustOptions {
    pub roots: Vec<Certificate>,
    pub intermediates: Vec<Certificate>,
}

impl TrustOptions {
    /// Verify that `cert` chains to one of the roots, directly or via one
    /// intermediate
    pub fn verify(&self, cert: &Certificate) -> Result<()> {
        self.verify_at(cert, chrono::Utc::now().timestamp())
    }

    pub fn verify_at(&self, cert: &Certificate, now: i64) -> Result<()> {
        for root in &self.roots {
            if validate_against_issuer_at(cert, root, true, now).is_ok() {
                return Ok(());
            }
        }
        for intermediate in &self.intermediates {
            let anchored = self
                .roots
                .iter()
                .any(|root| validate_against_issuer_at(intermediate, root, true, now).is_ok());
            if anchored && validate_against_issuer_at(cert, intermediate, false, now).is_ok() {
                return Ok(());
            }
        }
        Err(CryptoError::Untrusted(cert.subject().to_string()))
    }
}

/// Build a trust pool from PEM roots and intermediates
pub fn build_trust_options<R, I>(roots: &[R], intermediates: &[I]) -> Result<TrustOptions>
where
    R: AsRef<str>,
    I: AsRef<str>,
{
    Ok(TrustOptions {
        roots: parse_certificates(roots)?,
        intermediates: parse_certificates(intermediates)?,
    })
}

/// Check that `cert` was issued by `issuer`.
///
/// When `issuer_is_root` the issuer must also verify under its own key.
/// Checks run in order: root self-signature, certificate signature,
/// validity window, issuer name.
pub fn validate_against_issuer(
    cert: &Certificate,
    issuer: &Certificate,
    issuer_is_root: bool,
) -> Result<()> {
    validate_against_issuer_at(cert, issuer, issuer_is_root, chrono::Utc::now().timestamp())
}

pub fn validate_against_issuer_at(
    cert: &Certificate,
    issuer: &Certificate,
    issuer_is_root: bool,
    now: i64,
) -> Result<()> {
    if issuer_is_root {
        issuer.verify_self_signed()?;
    }
    cert.verify_issued_by(issuer)?;
    cert.check_validity_at(now)?;
    if cert.issuer() != issuer.subject() {
        return Err(CryptoError::IssuerMismatch {
            issuer: cert.issuer().to_string(),
            signer: issuer.subject().to_string(),
        });
    }
    Ok(())
}

/// Validate a PEM chain (root first) and optionally a leaf issued by its
/// last element
pub fn validate_chain<S: AsRef<str>>(leaf: Option<&Certificate>, chain: &[S]) -> Result<()> {
    validate_chain_at(leaf, chain, chrono::Utc::now().timestamp())
}

pub fn validate_chain_at<S: AsRef<str>>(
    leaf: Option<&Certificate>,
    chain: &[S],
    now: i64,
) -> Result<()> {
    if chain.is_empty() {
        return Err(CryptoError::EmptyChain);
    }
    let chain = parse_certificates(chain)?;

    for (i, pair) in chain.windows(2).enumerate() {
        let (issuer, cert) = (&pair[0], &pair[1]);
        validate_against_issuer_at(cert, issuer, i == 0, now).map_err(|e| broken(cert, e))?;
    }

    if let (Some(leaf), Some(last)) = (leaf, chain.last()) {
        validate_against_issuer_at(leaf, last, chain.len() == 1, now)
            .map_err(|e| broken(leaf, e))?;
    }

    tracing::debug!(links = chain.len(), leaf = leaf.is_some(), "Certificate chain validated");
    Ok(())
}

fn broken(cert: &Certificate, source: CryptoError) -> CryptoError {
    CryptoError::BrokenChain {
        subject: cert.subject().to_string(),
        source: Box::new(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::*;

    #[test]
    fn test_parse_certificate_fields() {
        let ca = Authority::new("Org1", "ca.org1");
        let cert = parse_certificate(&ca.pem).unwrap();

        assert_eq!(cert.subject_org(), Some("Org1"));
        assert_eq!(cert.issuer_org(), Some("Org1"));
        assert!(cert.subject().contains("CN=ca.org1"));
        assert_eq!(cert.subject(), cert.issuer());
        assert!(matches!(cert.key(), CertificateKey::Ecdsa { curve_bits: 256, .. }));
        assert_eq!(cert.fingerprint().len(), 64);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_certificate("hello").unwrap_err();
        assert_eq!(err, CryptoError::CertParse("not a known PEM format".to_string()));
    }

    #[test]
    fn test_parse_ed25519_key() {
        let ca = Authority::new_with_alg("Org1", "ed.org1", KeyAlg::Ed25519);
        let cert = parse_certificate(&ca.pem).unwrap();
        assert!(matches!(cert.key(), CertificateKey::Ed25519(_)));
    }

    #[test]
    fn test_validate_against_issuer() {
        let ca = Authority::new("Org1", "ca.org1");
        let leaf = ca.issue("peer0.org1");
        let issuer = parse_certificate(&ca.pem).unwrap();
        let cert = parse_certificate(&leaf.pem).unwrap();

        validate_against_issuer(&cert, &issuer, true).unwrap();
    }

    #[test]
    fn test_validate_against_wrong_issuer() {
        let ca = Authority::new("Org1", "ca.org1");
        let other = Authority::new("Org2", "ca.org2");
        let cert = parse_certificate(&ca.issue("peer0.org1").pem).unwrap();
        let issuer = parse_certificate(&other.pem).unwrap();

        let err = validate_against_issuer(&cert, &issuer, true).unwrap_err();
        assert!(matches!(err, CryptoError::SignatureInvalid { .. }));
    }

    #[test]
    fn test_expiry_window() {
        let ca = Authority::new("Org1", "ca.org1");
        let cert = parse_certificate(&ca.pem).unwrap();

        assert!(cert.check_validity().is_ok());
        assert!(matches!(
            cert.check_validity_at(cert.not_after() + 1),
            Err(CryptoError::Expired { .. })
        ));
        assert!(cert.check_validity_at(cert.not_before() - 1).is_err());
    }

    #[test]
    fn test_empty_chain() {
        let chain: Vec<String> = Vec::new();
        assert_eq!(validate_chain(None, &chain), Err(CryptoError::EmptyChain));
    }

    #[test]
    fn test_trust_options_fail_fast() {
        let ca = Authority::new("Org1", "ca.org1");
        let err = build_trust_options(&[ca.pem.clone(), "junk".to_string()], &[] as &[String])
            .unwrap_err();
        assert!(matches!(err, CryptoError::CertParse(_)));
    }

    #[test]
    fn test_trust_options_verify() {
        let ca = Authority::new("Org1", "ca.org1");
        let inter = ca.intermediate("Org1", "ica.org1");
        let direct = parse_certificate(&ca.issue("peer0.org1").pem).unwrap();
        let via_inter = parse_certificate(&inter.issue("peer1.org1").pem).unwrap();

        let roots_only = build_trust_options(&[ca.pem.clone()], &[] as &[String]).unwrap();
        roots_only.verify(&direct).unwrap();
        assert!(matches!(
            roots_only.verify(&via_inter),
            Err(CryptoError::Untrusted(_))
        ));

        let full = build_trust_options(&[ca.pem.clone()], &[inter.pem.clone()]).unwrap();
        full.verify(&via_inter).unwrap();
    }
}
