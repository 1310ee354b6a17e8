//! Certificate-group behaviour: the empty-trust-list compatibility default,
//! trust-list mutation and lazy reload, the rejected list, and the
//! application-URI check.

use uawire::trust::{
    create_self_signed, CertificateGroup, CertificateGroupConfig, SelfSignedParams, TrustList,
    TrustListCategory,
};
use uawire::types::StatusCode;

fn certificate(common_name: &str, application_uri: &str) -> Vec<u8> {
    let params = SelfSignedParams {
        common_name: common_name.into(),
        application_uri: application_uri.into(),
        ..SelfSignedParams::default()
    };
    create_self_signed(&params).unwrap().0
}

#[test]
fn empty_trust_list_accepts_with_a_warning() {
    let group = CertificateGroup::default();
    let peer = certificate("peer", "urn:example:peer");
    group.verify_certificate(&peer).unwrap();
    // Accepted certificates are never added to the rejected list.
    assert!(group.get_rejected_list().is_empty());
}

#[test]
fn empty_trust_list_still_requires_a_parseable_certificate() {
    let group = CertificateGroup::default();
    assert_eq!(
        group.verify_certificate(b"not a certificate"),
        Err(StatusCode::BAD_CERTIFICATE_INVALID)
    );
    assert_eq!(group.get_rejected_list().len(), 1);
}

#[test]
fn require_trust_list_flips_the_compatibility_default() {
    let group = CertificateGroup::new(CertificateGroupConfig {
        require_trust_list: true,
        ..CertificateGroupConfig::default()
    });
    let peer = certificate("peer", "urn:example:peer");
    assert!(group.verify_certificate(&peer).is_err());
}

#[test]
fn trusted_self_signed_peer_is_accepted() {
    let peer = certificate("peer", "urn:example:peer");
    let group = CertificateGroup::with_trust_list(
        CertificateGroupConfig::default(),
        TrustList {
            trusted_certificates: vec![peer.clone()],
            ..TrustList::default()
        },
    )
    .unwrap();
    group.verify_certificate(&peer).unwrap();
    assert!(group.get_rejected_list().is_empty());
}

#[test]
fn untrusted_peer_is_rejected_and_recorded_once() {
    let trusted = certificate("anchor", "urn:example:anchor");
    let stranger = certificate("stranger", "urn:example:stranger");
    let group = CertificateGroup::with_trust_list(
        CertificateGroupConfig::default(),
        TrustList {
            trusted_certificates: vec![trusted],
            ..TrustList::default()
        },
    )
    .unwrap();

    assert_eq!(
        group.verify_certificate(&stranger),
        Err(StatusCode::BAD_CERTIFICATE_UNTRUSTED)
    );
    // A second rejection of the same bytes is deduplicated.
    let _ = group.verify_certificate(&stranger);
    assert_eq!(group.get_rejected_list(), vec![stranger]);
}

#[test]
fn mutations_are_visible_to_the_next_verification() {
    let peer = certificate("late", "urn:example:late");
    let anchor = certificate("anchor", "urn:example:anchor");
    let group = CertificateGroup::with_trust_list(
        CertificateGroupConfig::default(),
        TrustList {
            trusted_certificates: vec![anchor],
            ..TrustList::default()
        },
    )
    .unwrap();

    assert!(group.verify_certificate(&peer).is_err());

    group
        .add_to_trust_list(TrustListCategory::TrustedCertificates, &[peer.clone()])
        .unwrap();
    group.verify_certificate(&peer).unwrap();

    group.remove_from_trust_list(TrustListCategory::TrustedCertificates, &[peer.clone()]);
    assert_eq!(
        group.verify_certificate(&peer),
        Err(StatusCode::BAD_CERTIFICATE_UNTRUSTED)
    );
}

#[test]
fn adding_is_idempotent_and_size_bounded() {
    let peer = certificate("peer", "urn:example:peer");
    let group = CertificateGroup::new(CertificateGroupConfig {
        max_trust_list_size: 1,
        ..CertificateGroupConfig::default()
    });
    group
        .add_to_trust_list(TrustListCategory::TrustedCertificates, &[peer.clone()])
        .unwrap();
    // Byte-identical entries do not grow the list.
    group
        .add_to_trust_list(TrustListCategory::TrustedCertificates, &[peer.clone()])
        .unwrap();
    assert_eq!(group.get_trust_list().trusted_certificates.len(), 1);

    let other = certificate("other", "urn:example:other");
    assert_eq!(
        group.add_to_trust_list(TrustListCategory::TrustedCertificates, &[other]),
        Err(StatusCode::BAD_INVALID_ARGUMENT)
    );
}

#[test]
fn rejected_list_is_fifo_bounded() {
    let group = CertificateGroup::new(CertificateGroupConfig {
        require_trust_list: true,
        max_rejected_list_size: 2,
        ..CertificateGroupConfig::default()
    });
    let first = certificate("first", "urn:example:1");
    let second = certificate("second", "urn:example:2");
    let third = certificate("third", "urn:example:3");
    let _ = group.verify_certificate(&first);
    let _ = group.verify_certificate(&second);
    let _ = group.verify_certificate(&third);
    assert_eq!(group.get_rejected_list(), vec![second, third]);
}

#[test]
fn application_uri_is_matched_as_a_substring_of_a_san_uri() {
    let peer = certificate("peer", "urn:example:Foo");
    let group = CertificateGroup::default();

    group.verify_application_uri(&peer, "urn:example:Foo").unwrap();
    // Substring containment is the rule.
    group.verify_application_uri(&peer, "example:Foo").unwrap();
    assert_eq!(
        group.verify_application_uri(&peer, "urn:example:Bar"),
        Err(StatusCode::BAD_CERTIFICATE_URI_INVALID)
    );
}

#[test]
fn uri_mismatch_can_be_downgraded_to_a_warning() {
    let peer = certificate("peer", "urn:example:Foo");
    let group = CertificateGroup::new(CertificateGroupConfig {
        uri_check_is_warning: true,
        ..CertificateGroupConfig::default()
    });
    group.verify_application_uri(&peer, "urn:example:Bar").unwrap();
}
