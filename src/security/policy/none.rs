//! The None security policy: no protection at all. Every cryptographic
//! operation is refused so a misconfigured caller cannot mistake it for a
//! working one.

use rsa::{RsaPrivateKey, RsaPublicKey};
use zeroize::Zeroizing;

use crate::security::{PolicyId, SecurityPolicy};
use crate::types::StatusCode;

/// See the module documentation. Named to avoid shadowing `Option::None`
/// in imports.
#[derive(Copy, Clone, Debug, Default)]
pub struct PolicyNone;

impl SecurityPolicy for PolicyNone {
    fn id(&self) -> PolicyId {
        PolicyId::None
    }

    fn secure_channel_nonce_length(&self) -> usize {
        0
    }

    fn symmetric_signature_size(&self) -> usize {
        0
    }

    fn symmetric_signing_key_length(&self) -> usize {
        0
    }

    fn symmetric_encryption_key_length(&self) -> usize {
        0
    }

    fn symmetric_block_size(&self) -> usize {
        0
    }

    fn min_asymmetric_key_bits(&self) -> u32 {
        0
    }

    fn max_asymmetric_key_bits(&self) -> u32 {
        0
    }

    fn asymmetric_padding_size(&self) -> usize {
        0
    }

    fn asym_sign(&self, _key: &RsaPrivateKey, _message: &[u8]) -> Result<Vec<u8>, StatusCode> {
        Err(StatusCode::BAD_SECURITY_CHECKS_FAILED)
    }

    fn asym_verify(
        &self,
        _key: &RsaPublicKey,
        _message: &[u8],
        _signature: &[u8],
    ) -> Result<(), StatusCode> {
        Err(StatusCode::BAD_SECURITY_CHECKS_FAILED)
    }

    fn asym_encrypt(&self, _key: &RsaPublicKey, _plaintext: &[u8]) -> Result<Vec<u8>, StatusCode> {
        Err(StatusCode::BAD_SECURITY_CHECKS_FAILED)
    }

    fn asym_decrypt(
        &self,
        _key: &RsaPrivateKey,
        _ciphertext: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>, StatusCode> {
        Err(StatusCode::BAD_SECURITY_CHECKS_FAILED)
    }

    fn sym_sign(&self, _key: &[u8], _message: &[u8]) -> Result<Vec<u8>, StatusCode> {
        Err(StatusCode::BAD_SECURITY_CHECKS_FAILED)
    }

    fn sym_verify(&self, _key: &[u8], _message: &[u8], _signature: &[u8]) -> Result<(), StatusCode> {
        Err(StatusCode::BAD_SECURITY_CHECKS_FAILED)
    }

    fn sym_encrypt(&self, _key: &[u8], _iv: &[u8], _data: &mut [u8]) -> Result<(), StatusCode> {
        Err(StatusCode::BAD_SECURITY_CHECKS_FAILED)
    }

    fn sym_decrypt(&self, _key: &[u8], _iv: &[u8], _data: &mut [u8]) -> Result<(), StatusCode> {
        Err(StatusCode::BAD_SECURITY_CHECKS_FAILED)
    }

    fn derive_keys(&self, _secret: &[u8], _seed: &[u8], _length: usize) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(Vec::new())
    }
}
