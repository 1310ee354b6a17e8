//! # The security-policy engine
//!
//! Six named security policies share one capability set: asymmetric and
//! symmetric sign/verify/encrypt/decrypt, `P_SHA1`/`P_SHA256` key
//! derivation, nonce generation and certificate thumbprinting. Each policy
//! is one [`SecurityPolicy`] implementation parameterised by its algorithm
//! and key-length constants; the arithmetic lives once in [`crypto`].
//!
//! A [`PolicyContext`] owns the local certificate and private key. A
//! [`SecureChannelContext`](channel::SecureChannelContext) holds the
//! per-channel symmetric key material derived from the nonce exchange.

pub mod channel;
pub(crate) mod crypto;
pub mod derive;
mod key;
mod policy;

pub use channel::SecureChannelContext;
pub use derive::DerivedKeys;
pub use key::load_private_key;
pub use policy::{
    Aes128Sha256RsaOaep, Aes256Sha256RsaPss, Basic128Rsa15, Basic256, Basic256Sha256, PolicyNone,
};

use rsa::{RsaPrivateKey, RsaPublicKey};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::types::StatusCode;

/// SHA-1 certificate thumbprints are 20 bytes.
pub const THUMBPRINT_LENGTH: usize = 20;

/// The policies this crate implements, by well-known URI.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum PolicyId {
    None,
    Basic128Rsa15,
    Basic256,
    Basic256Sha256,
    Aes128Sha256RsaOaep,
    Aes256Sha256RsaPss,
}

impl PolicyId {
    /// The policy URI as announced in endpoint descriptions.
    #[must_use]
    pub fn uri(&self) -> &'static str {
        match self {
            Self::None => "http://opcfoundation.org/UA/SecurityPolicy#None",
            Self::Basic128Rsa15 => "http://opcfoundation.org/UA/SecurityPolicy#Basic128Rsa15",
            Self::Basic256 => "http://opcfoundation.org/UA/SecurityPolicy#Basic256",
            Self::Basic256Sha256 => "http://opcfoundation.org/UA/SecurityPolicy#Basic256Sha256",
            Self::Aes128Sha256RsaOaep => {
                "http://opcfoundation.org/UA/SecurityPolicy#Aes128_Sha256_RsaOaep"
            }
            Self::Aes256Sha256RsaPss => {
                "http://opcfoundation.org/UA/SecurityPolicy#Aes256_Sha256_RsaPss"
            }
        }
    }

    /// Resolves a policy URI.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        Some(match uri {
            "http://opcfoundation.org/UA/SecurityPolicy#None" => Self::None,
            "http://opcfoundation.org/UA/SecurityPolicy#Basic128Rsa15" => Self::Basic128Rsa15,
            "http://opcfoundation.org/UA/SecurityPolicy#Basic256" => Self::Basic256,
            "http://opcfoundation.org/UA/SecurityPolicy#Basic256Sha256" => Self::Basic256Sha256,
            "http://opcfoundation.org/UA/SecurityPolicy#Aes128_Sha256_RsaOaep" => {
                Self::Aes128Sha256RsaOaep
            }
            "http://opcfoundation.org/UA/SecurityPolicy#Aes256_Sha256_RsaPss" => {
                Self::Aes256Sha256RsaPss
            }
            _ => return None,
        })
    }
}

/// Resolves the implementation for a policy URI.
#[must_use]
pub fn policy_for_uri(uri: &str) -> Option<&'static dyn SecurityPolicy> {
    Some(policy_for_id(PolicyId::from_uri(uri)?))
}

/// The implementation for a [`PolicyId`].
#[must_use]
pub fn policy_for_id(id: PolicyId) -> &'static dyn SecurityPolicy {
    match id {
        PolicyId::None => &PolicyNone,
        PolicyId::Basic128Rsa15 => &Basic128Rsa15,
        PolicyId::Basic256 => &Basic256,
        PolicyId::Basic256Sha256 => &Basic256Sha256,
        PolicyId::Aes128Sha256RsaOaep => &Aes128Sha256RsaOaep,
        PolicyId::Aes256Sha256RsaPss => &Aes256Sha256RsaPss,
    }
}

/// The capability set every security policy provides.
///
/// Policies are stateless; key material is passed in from the
/// [`PolicyContext`] and [`SecureChannelContext`](channel::SecureChannelContext)
/// that own it.
pub trait SecurityPolicy: Send + Sync {
    fn id(&self) -> PolicyId;

    fn uri(&self) -> &'static str {
        self.id().uri()
    }

    /// Length of the nonces exchanged in OpenSecureChannel.
    fn secure_channel_nonce_length(&self) -> usize;

    /// Length of a symmetric (HMAC) signature.
    fn symmetric_signature_size(&self) -> usize;

    fn symmetric_signing_key_length(&self) -> usize;
    fn symmetric_encryption_key_length(&self) -> usize;

    /// AES block size; also the symmetric plaintext block size.
    fn symmetric_block_size(&self) -> usize;

    /// Smallest acceptable RSA modulus of a peer certificate, in bits.
    fn min_asymmetric_key_bits(&self) -> u32;
    /// Largest acceptable RSA modulus of a peer certificate, in bits.
    fn max_asymmetric_key_bits(&self) -> u32;

    /// Per-block overhead of the asymmetric encryption padding, in bytes.
    fn asymmetric_padding_size(&self) -> usize;

    /// Signs `message` with the local private key. The signature length is
    /// the key's modulus length.
    fn asym_sign(&self, key: &RsaPrivateKey, message: &[u8]) -> Result<Vec<u8>, StatusCode>;

    /// Verifies an asymmetric signature made by the peer.
    fn asym_verify(
        &self,
        key: &RsaPublicKey,
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), StatusCode>;

    /// Encrypts `plaintext` block by block to the peer's public key; the
    /// output length is a multiple of the key's modulus length.
    fn asym_encrypt(&self, key: &RsaPublicKey, plaintext: &[u8]) -> Result<Vec<u8>, StatusCode>;

    /// Decrypts a multi-block asymmetric ciphertext with the local private
    /// key. Bad padding fails with `BadSecurityChecksFailed`.
    fn asym_decrypt(
        &self,
        key: &RsaPrivateKey,
        ciphertext: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>, StatusCode>;

    /// HMAC over `message`; the signature has the policy-defined length.
    fn sym_sign(&self, key: &[u8], message: &[u8]) -> Result<Vec<u8>, StatusCode>;

    /// Constant-time verification of a symmetric signature.
    fn sym_verify(&self, key: &[u8], message: &[u8], signature: &[u8]) -> Result<(), StatusCode>;

    /// In-place CBC encryption; `data` must be a multiple of the block
    /// size.
    fn sym_encrypt(&self, key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<(), StatusCode>;

    /// In-place CBC decryption; `data` must be a multiple of the block
    /// size.
    fn sym_decrypt(&self, key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<(), StatusCode>;

    /// The policy's `P_SHA1`/`P_SHA256` expansion of `secret` and `seed`
    /// to exactly `length` bytes.
    fn derive_keys(&self, secret: &[u8], seed: &[u8], length: usize) -> Zeroizing<Vec<u8>>;

    /// A cryptographically random nonce of the policy's nonce length.
    fn generate_nonce(&self) -> Vec<u8> {
        crypto::random_nonce(self.secure_channel_nonce_length())
    }

    /// The SHA-1 thumbprint of a DER certificate.
    fn make_thumbprint(&self, certificate_der: &[u8]) -> [u8; THUMBPRINT_LENGTH] {
        crypto::sha1_thumbprint(certificate_der)
    }
}

/// The long-lived half of the engine's key material: the local certificate,
/// its thumbprint, and the private key used for signing and decryption.
///
/// The private key lives in a zero-on-drop container; it is wiped when the
/// context is dropped, replaced through
/// [`PolicyContext::update_certificate_and_private_key`], or evicted with
/// [`PolicyContext::clear`].
pub struct PolicyContext {
    certificate: Vec<u8>,
    thumbprint: [u8; THUMBPRINT_LENGTH],
    private_key: Option<RsaPrivateKey>,
}

impl PolicyContext {
    /// Creates a context from a DER certificate and a private key in any of
    /// the accepted encodings (PKCS#8/PKCS#1, DER or PEM, optionally
    /// password-encrypted PEM).
    ///
    /// # Errors
    /// `BadSecurityChecksFailed` when the private key does not parse,
    /// `BadCertificateInvalid` when the certificate does not.
    pub fn new(
        certificate_der: &[u8],
        private_key: &[u8],
        password: Option<&[u8]>,
    ) -> Result<Self, StatusCode> {
        let private_key = key::load_private_key(private_key, password)?;
        if x509_parser::parse_x509_certificate(certificate_der).is_err() {
            return Err(StatusCode::BAD_CERTIFICATE_INVALID);
        }
        Ok(Self {
            certificate: certificate_der.to_vec(),
            thumbprint: crypto::sha1_thumbprint(certificate_der),
            private_key: Some(private_key),
        })
    }

    /// The installed DER certificate.
    #[must_use]
    pub fn certificate(&self) -> &[u8] {
        &self.certificate
    }

    /// The cached SHA-1 thumbprint of the installed certificate.
    #[must_use]
    pub fn thumbprint(&self) -> &[u8; THUMBPRINT_LENGTH] {
        &self.thumbprint
    }

    /// Checks a received thumbprint against the local one, in constant
    /// time.
    ///
    /// # Errors
    /// `BadCertificateInvalid` on mismatch.
    pub fn compare_thumbprint(&self, thumbprint: &[u8]) -> Result<(), StatusCode> {
        if thumbprint.ct_eq(&self.thumbprint).into() {
            Ok(())
        } else {
            Err(StatusCode::BAD_CERTIFICATE_INVALID)
        }
    }

    /// The installed private key.
    ///
    /// # Errors
    /// `BadSecurityChecksFailed` after [`PolicyContext::clear`] has evicted
    /// the key.
    pub fn private_key(&self) -> Result<&RsaPrivateKey, StatusCode> {
        self.private_key
            .as_ref()
            .ok_or(StatusCode::BAD_SECURITY_CHECKS_FAILED)
    }

    /// Atomically replaces the certificate and private key; the thumbprint
    /// is recomputed. Channels keep their previously installed symmetric
    /// keys until they rekey.
    ///
    /// # Errors
    /// On failure the existing pair stays installed.
    pub fn update_certificate_and_private_key(
        &mut self,
        certificate_der: &[u8],
        private_key: &[u8],
        password: Option<&[u8]>,
    ) -> Result<(), StatusCode> {
        let replacement = Self::new(certificate_der, private_key, password)?;
        *self = replacement;
        Ok(())
    }

    /// Zeros and releases the private key, e.g. on credential revocation.
    ///
    /// Signing and decryption fail with `BadSecurityChecksFailed` until
    /// [`PolicyContext::update_certificate_and_private_key`] installs a new
    /// pair; the certificate and thumbprint stay available for comparison.
    pub fn clear(&mut self) {
        self.private_key = None;
    }
}

impl core::fmt::Debug for PolicyContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PolicyContext")
            .field("certificate_len", &self.certificate.len())
            .field("thumbprint", &self.thumbprint)
            .finish_non_exhaustive()
    }
}
