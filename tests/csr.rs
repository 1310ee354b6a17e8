//! Certificate-signing-request generation against the installed identity.

use uawire::security::load_private_key;
use uawire::trust::{create_csr, create_self_signed, SelfSignedParams};
use x509_parser::certification_request::X509CertificationRequest;
use x509_parser::extensions::{GeneralName, ParsedExtension};
use x509_parser::parse_x509_certificate;
use x509_parser::prelude::FromDer;

fn identity() -> (Vec<u8>, Vec<u8>) {
    let params = SelfSignedParams {
        common_name: "csr test".into(),
        application_uri: "urn:uawire:csr-test".into(),
        dns_names: vec!["opc.example".into()],
        ..SelfSignedParams::default()
    };
    let (certificate, key) = create_self_signed(&params).unwrap();
    (certificate, key.to_vec())
}

#[test]
fn csr_copies_subject_san_and_public_key_from_the_certificate() {
    let (certificate_der, key_der) = identity();
    let private_key = load_private_key(&key_der, None).unwrap();

    let csr_der = create_csr(&certificate_der, &private_key, None, None).unwrap();
    let (_, csr) = X509CertificationRequest::from_der(&csr_der).unwrap();
    let (_, certificate) = parse_x509_certificate(&certificate_der).unwrap();

    // Subject copied from the installed certificate.
    assert_eq!(
        csr.certification_request_info.subject.to_string(),
        certificate.subject().to_string()
    );

    // Public key is the certificate's.
    assert_eq!(
        csr.certification_request_info.subject_pki.raw,
        certificate.public_key().raw
    );

    // SAN copied verbatim: the URI and the DNS name both survive.
    let extensions = csr.requested_extensions().unwrap().collect::<Vec<_>>();
    let san = extensions
        .iter()
        .find_map(|extension| match extension {
            ParsedExtension::SubjectAlternativeName(san) => Some(san),
            _ => None,
        })
        .expect("CSR carries a SAN extension");
    assert!(san.general_names.iter().any(
        |name| matches!(name, GeneralName::URI(uri) if **uri == *"urn:uawire:csr-test")
    ));
    assert!(san.general_names.iter().any(
        |name| matches!(name, GeneralName::DNSName(dns) if **dns == *"opc.example")
    ));

    // Key usage as mandated.
    let key_usage = extensions
        .iter()
        .find_map(|extension| match extension {
            ParsedExtension::KeyUsage(usage) => Some(usage),
            _ => None,
        })
        .expect("CSR carries a key-usage extension");
    assert!(key_usage.digital_signature());
    assert!(key_usage.non_repudiation());
    assert!(key_usage.key_encipherment());
    assert!(key_usage.data_encipherment());
}

#[test]
fn csr_subject_can_be_overridden_by_a_request_string() {
    let (certificate_der, key_der) = identity();
    let private_key = load_private_key(&key_der, None).unwrap();

    let csr_der = create_csr(
        &certificate_der,
        &private_key,
        Some("CN=renamed/O=Plant 7,C=DE"),
        None,
    )
    .unwrap();
    let (_, csr) = X509CertificationRequest::from_der(&csr_der).unwrap();
    let subject = csr.certification_request_info.subject.to_string();
    assert!(subject.contains("renamed"), "{subject}");
    assert!(subject.contains("Plant 7"), "{subject}");
    assert!(subject.contains("DE"), "{subject}");
}

#[test]
fn malformed_subject_strings_are_refused() {
    let (certificate_der, key_der) = identity();
    let private_key = load_private_key(&key_der, None).unwrap();
    assert!(create_csr(&certificate_der, &private_key, Some("no pairs here"), None).is_err());
}

#[test]
fn csr_signature_verifies_with_the_key() {
    let (certificate_der, key_der) = identity();
    let private_key = load_private_key(&key_der, None).unwrap();
    let csr_der = create_csr(&certificate_der, &private_key, None, None).unwrap();
    let (_, csr) = X509CertificationRequest::from_der(&csr_der).unwrap();
    // x509-parser checks the self-signature over the request info with the
    // embedded public key, which is the installed key's public half.
    csr.verify_signature().unwrap();
}
