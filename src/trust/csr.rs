//! PKCS#10 certificate-signing-request generation, plus self-signed
//! certificate minting for bootstrapping and tests.

use rcgen::{
    CertificateParams, DistinguishedName, DnType, Ia5String, KeyPair, KeyUsagePurpose, SanType,
};
use rsa::pkcs8::EncodePrivateKey;
use rsa::RsaPrivateKey;
use x509_parser::certificate::X509Certificate;
use x509_parser::extensions::GeneralName;
use x509_parser::oid_registry as oids;
use x509_parser::parse_x509_certificate;
use zeroize::Zeroizing;

use crate::types::StatusCode;

const KEY_USAGES: [KeyUsagePurpose; 4] = [
    KeyUsagePurpose::DigitalSignature,
    KeyUsagePurpose::ContentCommitment,
    KeyUsagePurpose::KeyEncipherment,
    KeyUsagePurpose::DataEncipherment,
];

/// Creates a DER PKCS#10 CSR for the installed certificate/key pair,
/// signed with SHA-256.
///
/// The subject is parsed from `subject` when given (a comma- or
/// slash-separated list of `attr=value` pairs, e.g. `CN=server/O=plant`),
/// otherwise copied from the installed certificate. The
/// subject-alternative-name entries are copied from the certificate either
/// way, and the key usage is fixed to digitalSignature, nonRepudiation,
/// keyEncipherment and dataEncipherment. Because the CSR is built over the
/// installed private key, its public key equals the certificate's.
///
/// `additional_entropy` is accepted for API compatibility; randomness
/// comes from the operating system and the parameter is not consumed.
///
/// # Errors
/// `BadInvalidArgument` for an unparseable subject string,
/// `BadCertificateInvalid` for an unparseable certificate,
/// `BadSecurityChecksFailed` when the private key cannot sign.
pub fn create_csr(
    certificate_der: &[u8],
    private_key: &RsaPrivateKey,
    subject: Option<&str>,
    additional_entropy: Option<&[u8]>,
) -> Result<Vec<u8>, StatusCode> {
    if additional_entropy.is_some() {
        tracing::debug!("ignoring caller-provided entropy; the OS RNG is used");
    }
    let (_, certificate) = parse_x509_certificate(certificate_der)
        .map_err(|_| StatusCode::BAD_CERTIFICATE_INVALID)?;

    let mut params = CertificateParams::default();
    params.distinguished_name = match subject {
        Some(subject) => parse_subject(subject)?,
        None => copy_subject(&certificate),
    };
    params.subject_alt_names = copy_subject_alt_names(&certificate)?;
    params.key_usages = KEY_USAGES.to_vec();

    let key_pair = signing_key_pair(private_key)?;
    let request = params
        .serialize_request(&key_pair)
        .map_err(|_| StatusCode::BAD_SECURITY_CHECKS_FAILED)?;
    Ok(request.der().to_vec())
}

/// Parameters for a freshly minted self-signed application certificate.
#[derive(Clone, Debug)]
pub struct SelfSignedParams {
    /// Subject common name.
    pub common_name: String,
    /// The application URI placed in the SAN; what
    /// `verify_application_uri` later checks.
    pub application_uri: String,
    /// SAN DNS names.
    pub dns_names: Vec<String>,
    /// RSA modulus length in bits; 2048 or 4096 for the policies here.
    pub key_bits: usize,
}

impl Default for SelfSignedParams {
    fn default() -> Self {
        Self {
            common_name: "uawire application".into(),
            application_uri: "urn:uawire:application".into(),
            dns_names: Vec::new(),
            key_bits: 2048,
        }
    }
}

/// Mints a self-signed certificate and its private key (PKCS#8 DER,
/// zeroed on drop). SHA-256 signature, key usage as for
/// [`create_csr`].
///
/// # Errors
/// `BadInvalidArgument` for parameters rcgen refuses (e.g. a malformed
/// URI), `BadSecurityChecksFailed` when key generation fails.
pub fn create_self_signed(
    params: &SelfSignedParams,
) -> Result<(Vec<u8>, Zeroizing<Vec<u8>>), StatusCode> {
    let private_key = RsaPrivateKey::new(&mut rand::rngs::OsRng, params.key_bits)
        .map_err(|_| StatusCode::BAD_SECURITY_CHECKS_FAILED)?;

    let mut certificate_params = CertificateParams::default();
    let mut distinguished_name = DistinguishedName::new();
    distinguished_name.push(DnType::CommonName, params.common_name.clone());
    certificate_params.distinguished_name = distinguished_name;
    certificate_params.key_usages = KEY_USAGES.to_vec();
    certificate_params.subject_alt_names.push(SanType::URI(
        Ia5String::try_from(params.application_uri.clone())
            .map_err(|_| StatusCode::BAD_INVALID_ARGUMENT)?,
    ));
    for dns_name in &params.dns_names {
        certificate_params.subject_alt_names.push(SanType::DnsName(
            Ia5String::try_from(dns_name.clone()).map_err(|_| StatusCode::BAD_INVALID_ARGUMENT)?,
        ));
    }

    let key_pair = signing_key_pair(&private_key)?;
    let certificate = certificate_params
        .self_signed(&key_pair)
        .map_err(|_| StatusCode::BAD_SECURITY_CHECKS_FAILED)?;

    let key_der = private_key
        .to_pkcs8_der()
        .map_err(|_| StatusCode::BAD_SECURITY_CHECKS_FAILED)?;
    Ok((
        certificate.der().to_vec(),
        Zeroizing::new(key_der.as_bytes().to_vec()),
    ))
}

fn signing_key_pair(private_key: &RsaPrivateKey) -> Result<KeyPair, StatusCode> {
    let pkcs8 = private_key
        .to_pkcs8_der()
        .map_err(|_| StatusCode::BAD_SECURITY_CHECKS_FAILED)?;
    KeyPair::try_from(pkcs8.as_bytes()).map_err(|_| StatusCode::BAD_SECURITY_CHECKS_FAILED)
}

/// Parses `CN=name/O=org`-style subject strings. Pairs split on `,` or
/// `/`; unknown attribute names are skipped.
fn parse_subject(subject: &str) -> Result<DistinguishedName, StatusCode> {
    let mut distinguished_name = DistinguishedName::new();
    let mut any = false;
    for pair in subject.split([',', '/']) {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }
        let Some((attribute, value)) = pair.split_once('=') else {
            return Err(StatusCode::BAD_INVALID_ARGUMENT);
        };
        let Some(dn_type) = dn_type_for(attribute.trim()) else {
            tracing::warn!(attribute, "skipping unknown subject attribute");
            continue;
        };
        distinguished_name.push(dn_type, value.trim().to_string());
        any = true;
    }
    if !any {
        return Err(StatusCode::BAD_INVALID_ARGUMENT);
    }
    Ok(distinguished_name)
}

fn dn_type_for(attribute: &str) -> Option<DnType> {
    Some(match attribute.to_ascii_uppercase().as_str() {
        "CN" => DnType::CommonName,
        "O" => DnType::OrganizationName,
        "OU" => DnType::OrganizationalUnitName,
        "L" => DnType::LocalityName,
        "ST" => DnType::StateOrProvinceName,
        "C" => DnType::CountryName,
        _ => return None,
    })
}

fn copy_subject(certificate: &X509Certificate<'_>) -> DistinguishedName {
    let mut distinguished_name = DistinguishedName::new();
    for attribute in certificate.subject().iter_attributes() {
        let Ok(value) = attribute.as_str() else {
            continue;
        };
        let oid = attribute.attr_type();
        let dn_type = if *oid == oids::OID_X509_COMMON_NAME {
            DnType::CommonName
        } else if *oid == oids::OID_X509_ORGANIZATION_NAME {
            DnType::OrganizationName
        } else if *oid == oids::OID_X509_ORGANIZATIONAL_UNIT {
            DnType::OrganizationalUnitName
        } else if *oid == oids::OID_X509_LOCALITY_NAME {
            DnType::LocalityName
        } else if *oid == oids::OID_X509_STATE_OR_PROVINCE_NAME {
            DnType::StateOrProvinceName
        } else if *oid == oids::OID_X509_COUNTRY_NAME {
            DnType::CountryName
        } else {
            continue;
        };
        distinguished_name.push(dn_type, value.to_string());
    }
    distinguished_name
}

fn copy_subject_alt_names(
    certificate: &X509Certificate<'_>,
) -> Result<Vec<SanType>, StatusCode> {
    let Ok(Some(san)) = certificate.subject_alternative_name() else {
        return Ok(Vec::new());
    };
    let mut names = Vec::new();
    for name in &san.value.general_names {
        match name {
            GeneralName::URI(uri) => names.push(SanType::URI(
                Ia5String::try_from(*uri).map_err(|_| StatusCode::BAD_CERTIFICATE_INVALID)?,
            )),
            GeneralName::DNSName(dns) => names.push(SanType::DnsName(
                Ia5String::try_from(*dns).map_err(|_| StatusCode::BAD_CERTIFICATE_INVALID)?,
            )),
            GeneralName::RFC822Name(email) => names.push(SanType::Rfc822Name(
                Ia5String::try_from(*email).map_err(|_| StatusCode::BAD_CERTIFICATE_INVALID)?,
            )),
            _ => {}
        }
    }
    Ok(names)
}
