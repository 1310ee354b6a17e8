//! # Certificate trust management
//!
//! A [`CertificateGroup`] holds a byte-level trust list, verifies peer
//! certificates against it, tracks the certificates it rejected, and
//! generates certificate-signing requests.
//!
//! The trust list is mutated only through the group; every mutation marks
//! the parsed verifier state stale, and the next verification rebuilds it
//! under the same lock before looking at the peer.

mod csr;
mod verify;

pub use csr::{create_csr, create_self_signed, SelfSignedParams};

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::types::StatusCode;
use verify::VerifierIndex;

/// The four byte-level stores of a trust list. Entries are DER blobs,
/// deduplicated by byte identity.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TrustList {
    pub trusted_certificates: Vec<Vec<u8>>,
    pub trusted_crls: Vec<Vec<u8>>,
    pub issuer_certificates: Vec<Vec<u8>>,
    pub issuer_crls: Vec<Vec<u8>>,
}

impl TrustList {
    /// Total number of entries across the four stores.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trusted_certificates.len()
            + self.trusted_crls.len()
            + self.issuer_certificates.len()
            + self.issuer_crls.len()
    }

    /// True when no store has any entry. An empty trust list accepts every
    /// peer (with a warning) unless the group is configured otherwise.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Which store of the trust list an add/remove targets.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TrustListCategory {
    TrustedCertificates,
    TrustedCrls,
    IssuerCertificates,
    IssuerCrls,
}

/// Configuration of an in-memory certificate group.
#[derive(Copy, Clone, Debug)]
pub struct CertificateGroupConfig {
    /// Upper bound on the total trust-list entry count.
    pub max_trust_list_size: usize,
    /// Upper bound on the rejected list; the oldest entry is evicted.
    pub max_rejected_list_size: usize,
    /// When set, an empty trust list rejects peers instead of accepting
    /// them with a warning.
    pub require_trust_list: bool,
    /// When set, an application-URI mismatch logs a warning instead of
    /// failing.
    pub uri_check_is_warning: bool,
}

impl Default for CertificateGroupConfig {
    fn default() -> Self {
        Self {
            max_trust_list_size: 65535,
            max_rejected_list_size: 100,
            require_trust_list: false,
            uri_check_is_warning: false,
        }
    }
}

struct GroupState {
    trust_list: TrustList,
    reload_required: bool,
    index: VerifierIndex,
    rejected: VecDeque<Vec<u8>>,
}

/// An in-memory certificate group: trust list, verifier and rejected list.
///
/// All operations serialise on one internal lock, so verifications always
/// observe a fully applied trust-list mutation.
pub struct CertificateGroup {
    config: CertificateGroupConfig,
    state: Mutex<GroupState>,
}

impl CertificateGroup {
    #[must_use]
    pub fn new(config: CertificateGroupConfig) -> Self {
        Self {
            config,
            state: Mutex::new(GroupState {
                trust_list: TrustList::default(),
                reload_required: false,
                index: VerifierIndex::default(),
                rejected: VecDeque::new(),
            }),
        }
    }

    /// Creates a group with an initial trust list.
    ///
    /// # Errors
    /// `BadInvalidArgument` when the list exceeds the configured maximum.
    pub fn with_trust_list(
        config: CertificateGroupConfig,
        trust_list: TrustList,
    ) -> Result<Self, StatusCode> {
        let group = Self::new(config);
        group.set_trust_list(trust_list)?;
        Ok(group)
    }

    #[must_use]
    pub fn config(&self) -> &CertificateGroupConfig {
        &self.config
    }

    /// A copy of the current trust list.
    #[must_use]
    pub fn get_trust_list(&self) -> TrustList {
        self.lock().trust_list.clone()
    }

    /// Replaces the whole trust list.
    ///
    /// # Errors
    /// `BadInvalidArgument` when the list exceeds the configured maximum.
    pub fn set_trust_list(&self, trust_list: TrustList) -> Result<(), StatusCode> {
        if trust_list.len() > self.config.max_trust_list_size {
            return Err(StatusCode::BAD_INVALID_ARGUMENT);
        }
        let mut state = self.lock();
        state.trust_list = trust_list;
        state.reload_required = true;
        Ok(())
    }

    /// Adds DER blobs to one store, skipping byte-identical duplicates.
    ///
    /// # Errors
    /// `BadInvalidArgument` when the addition would exceed the configured
    /// maximum; nothing is added in that case.
    pub fn add_to_trust_list(
        &self,
        category: TrustListCategory,
        items: &[Vec<u8>],
    ) -> Result<(), StatusCode> {
        let mut state = self.lock();
        let fresh: Vec<&Vec<u8>> = items
            .iter()
            .filter(|item| !store(&state.trust_list, category).contains(item))
            .collect();
        if state.trust_list.len() + fresh.len() > self.config.max_trust_list_size {
            return Err(StatusCode::BAD_INVALID_ARGUMENT);
        }
        let fresh: Vec<Vec<u8>> = fresh.into_iter().cloned().collect();
        store_mut(&mut state.trust_list, category).extend(fresh);
        state.reload_required = true;
        Ok(())
    }

    /// Removes byte-identical entries from one store. Removing a trusted
    /// certificate also drops the CRLs it issued.
    pub fn remove_from_trust_list(&self, category: TrustListCategory, items: &[Vec<u8>]) {
        let mut state = self.lock();
        store_mut(&mut state.trust_list, category).retain(|entry| !items.contains(entry));
        if matches!(
            category,
            TrustListCategory::TrustedCertificates | TrustListCategory::IssuerCertificates
        ) {
            for certificate in items {
                verify::drop_crls_issued_by(&mut state.trust_list, certificate);
            }
        }
        state.reload_required = true;
    }

    /// A copy of the rejected-certificate list, oldest first.
    #[must_use]
    pub fn get_rejected_list(&self) -> Vec<Vec<u8>> {
        self.lock().rejected.iter().cloned().collect()
    }

    /// Verifies a peer certificate against the trust list.
    ///
    /// An empty trust list accepts any syntactically valid certificate with
    /// a warning, unless [`CertificateGroupConfig::require_trust_list`] is
    /// set. Every rejection appends the certificate to the rejected list
    /// (deduplicated, FIFO-bounded).
    ///
    /// # Errors
    /// The most specific of the `BadCertificate*` codes, or
    /// `BadSecurityChecksFailed` for signature failures.
    pub fn verify_certificate(&self, certificate_der: &[u8]) -> Result<(), StatusCode> {
        let mut state = self.lock();
        if state.reload_required {
            state.index = VerifierIndex::build(&state.trust_list);
            state.reload_required = false;
            tracing::debug!(
                certificates = state.index.certificate_count(),
                crls = state.index.crl_count(),
                "reloaded trust list"
            );
        }

        let result = if state.trust_list.is_empty() && !self.config.require_trust_list {
            match x509_parser::parse_x509_certificate(certificate_der) {
                Ok(_) => {
                    tracing::warn!(
                        "certificate accepted: the trust list is empty and the group is \
                         configured to accept in that case"
                    );
                    Ok(())
                }
                Err(_) => Err(StatusCode::BAD_CERTIFICATE_INVALID),
            }
        } else {
            verify::verify_peer(&state.index, certificate_der)
        };

        if let Err(status) = result {
            self.reject(&mut state, certificate_der);
            return Err(status);
        }
        Ok(())
    }

    /// Checks that one of the certificate's subject-alternative-name URIs
    /// contains `expected_uri`.
    ///
    /// # Errors
    /// `BadCertificateUriInvalid` on mismatch (downgraded to a warning when
    /// so configured), `BadCertificateInvalid` when the certificate does
    /// not parse.
    pub fn verify_application_uri(
        &self,
        certificate_der: &[u8],
        expected_uri: &str,
    ) -> Result<(), StatusCode> {
        match verify::application_uri_matches(certificate_der, expected_uri) {
            Ok(true) => Ok(()),
            Ok(false) if self.config.uri_check_is_warning => {
                tracing::warn!(expected_uri, "application URI not found in certificate SAN");
                Ok(())
            }
            Ok(false) => Err(StatusCode::BAD_CERTIFICATE_URI_INVALID),
            Err(status) => Err(status),
        }
    }

    fn reject(&self, state: &mut GroupState, certificate_der: &[u8]) {
        if self.config.max_rejected_list_size == 0 {
            return;
        }
        if state.rejected.iter().any(|entry| entry == certificate_der) {
            return;
        }
        while state.rejected.len() >= self.config.max_rejected_list_size {
            state.rejected.pop_front();
        }
        state.rejected.push_back(certificate_der.to_vec());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, GroupState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for CertificateGroup {
    fn default() -> Self {
        Self::new(CertificateGroupConfig::default())
    }
}

fn store(trust_list: &TrustList, category: TrustListCategory) -> &Vec<Vec<u8>> {
    match category {
        TrustListCategory::TrustedCertificates => &trust_list.trusted_certificates,
        TrustListCategory::TrustedCrls => &trust_list.trusted_crls,
        TrustListCategory::IssuerCertificates => &trust_list.issuer_certificates,
        TrustListCategory::IssuerCrls => &trust_list.issuer_crls,
    }
}

fn store_mut(trust_list: &mut TrustList, category: TrustListCategory) -> &mut Vec<Vec<u8>> {
    match category {
        TrustListCategory::TrustedCertificates => &mut trust_list.trusted_certificates,
        TrustListCategory::TrustedCrls => &mut trust_list.trusted_crls,
        TrustListCategory::IssuerCertificates => &mut trust_list.issuer_certificates,
        TrustListCategory::IssuerCrls => &mut trust_list.issuer_crls,
    }
}
