//! Throwaway certificate authorities for tests

use rcgen::{
    BasicConstraints, CertificateParams, DistinguishedName, DnType, IsCa, KeyPair,
    SignatureAlgorithm,
};
use ring::rand::SystemRandom;
use ring::signature::{EcdsaKeyPair, Ed25519KeyPair};

/// Key algorithm of a generated identity
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAlg {
    P256,
    P384,
    Ed25519,
}

impl KeyAlg {
    fn rcgen(self) -> &'static SignatureAlgorithm {
        match self {
            Self::P256 => &rcgen::PKCS_ECDSA_P256_SHA256,
            Self::P384 => &rcgen::PKCS_ECDSA_P384_SHA384,
            Self::Ed25519 => &rcgen::PKCS_ED25519,
        }
    }
}

/// Self-signed or intermediate CA
pub struct Authority {
    pub org: String,
    pub pem: String,
    cert: rcgen::Certificate,
    key: KeyPair,
}

/// End-entity certificate with its PKCS#8 private key
#[derive(Clone, Debug)]
pub struct Identity {
    pub pem: String,
    pub pkcs8: Vec<u8>,
    pub alg: KeyAlg,
}

fn ca_params(org: &str, cn: &str) -> CertificateParams {
    let mut params = CertificateParams::new(Vec::<String>::new()).expect("params");
    params.distinguished_name = name(org, cn);
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params
}

fn name(org: &str, cn: &str) -> DistinguishedName {
    let mut dn = DistinguishedName::new();
    dn.push(DnType::OrganizationName, org);
    dn.push(DnType::CommonName, cn);
    dn
}

impl Authority {
    pub fn new(org: &str, cn: &str) -> Self {
        Self::new_with_alg(org, cn, KeyAlg::P256)
    }

    pub fn new_with_alg(org: &str, cn: &str, alg: KeyAlg) -> Self {
        let key = KeyPair::generate_for(alg.rcgen()).expect("generate CA key");
        Self::self_signed(org, cn, key)
    }

    /// Another root with a different name over this root's key
    pub fn with_same_key(&self, org: &str, cn: &str) -> Self {
        let key = KeyPair::from_pem(&self.key.serialize_pem()).expect("reload CA key");
        Self::self_signed(org, cn, key)
    }

    fn self_signed(org: &str, cn: &str, key: KeyPair) -> Self {
        let cert = ca_params(org, cn).self_signed(&key).expect("self-sign");
        Self {
            org: org.to_string(),
            pem: cert.pem(),
            cert,
            key,
        }
    }

    /// Intermediate CA signed by this authority
    pub fn intermediate(&self, org: &str, cn: &str) -> Self {
        let key = KeyPair::generate().expect("generate intermediate key");
        let cert = ca_params(org, cn)
            .signed_by(&key, &self.cert, &self.key)
            .expect("sign intermediate");
        Self {
            org: org.to_string(),
            pem: cert.pem(),
            cert,
            key,
        }
    }

    pub fn issue(&self, cn: &str) -> Identity {
        self.issue_with(cn, KeyAlg::P256, false)
    }

    pub fn issue_with_alg(&self, cn: &str, alg: KeyAlg) -> Identity {
        self.issue_with(cn, alg, false)
    }

    /// Leaf whose validity window ended in 2001
    pub fn issue_expired(&self, cn: &str) -> Identity {
        self.issue_with(cn, KeyAlg::P256, true)
    }

    fn issue_with(&self, cn: &str, alg: KeyAlg, expired: bool) -> Identity {
        let key = KeyPair::generate_for(alg.rcgen()).expect("generate leaf key");
        let mut params = CertificateParams::new(vec![cn.to_string()]).expect("params");
        params.distinguished_name = name(&self.org, cn);
        if expired {
            params.not_before = rcgen::date_time_ymd(2000, 1, 1);
            params.not_after = rcgen::date_time_ymd(2001, 1, 1);
        }
        let cert = params
            .signed_by(&key, &self.cert, &self.key)
            .expect("sign leaf");
        Identity {
            pem: cert.pem(),
            pkcs8: key.serialize_der(),
            alg,
        }
    }
}

impl Identity {
    /// Sign `message` the way a peer or notary would
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        let rng = SystemRandom::new();
        match self.alg {
            KeyAlg::P256 | KeyAlg::P384 => {
                let alg = if self.alg == KeyAlg::P256 {
                    &ring::signature::ECDSA_P256_SHA256_ASN1_SIGNING
                } else {
                    &ring::signature::ECDSA_P384_SHA384_ASN1_SIGNING
                };
                let pair = EcdsaKeyPair::from_pkcs8(alg, &self.pkcs8, &rng).expect("load key");
                pair.sign(&rng, message).expect("sign").as_ref().to_vec()
            }
            KeyAlg::Ed25519 => {
                let pair =
                    Ed25519KeyPair::from_pkcs8_maybe_unchecked(&self.pkcs8).expect("load key");
                pair.sign(message).as_ref().to_vec()
            }
        }
    }
}
