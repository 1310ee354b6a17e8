//! Shared cryptographic primitives behind the policy implementations: the
//! RSA schemes, AES-CBC, HMAC and thumbprints. Policies differ only in
//! which scheme and key lengths they select.

use aes::cipher::block_padding::NoPadding;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use rsa::signature::{RandomizedSigner, SignatureEncoding, Signer, Verifier};
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
use sha1::Sha1;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::security::THUMBPRINT_LENGTH;
use crate::types::StatusCode;

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;
type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// The asymmetric signature schemes the policy catalogue uses.
#[derive(Copy, Clone, Debug)]
pub(crate) enum AsymmetricSignature {
    Pkcs1v15Sha1,
    Pkcs1v15Sha256,
    /// Salt length equals the digest length.
    PssSha256,
}

/// The asymmetric encryption paddings the policy catalogue uses.
#[derive(Copy, Clone, Debug)]
pub(crate) enum AsymmetricEncryption {
    Pkcs1v15,
    OaepSha1,
    OaepSha256,
}

impl AsymmetricEncryption {
    /// Per-block padding overhead in bytes.
    pub(crate) fn padding_size(self) -> usize {
        match self {
            Self::Pkcs1v15 => 11,
            Self::OaepSha1 => 42,
            Self::OaepSha256 => 66,
        }
    }

    fn padding(self) -> RsaPadding {
        match self {
            Self::Pkcs1v15 => RsaPadding::Pkcs1v15(Pkcs1v15Encrypt),
            Self::OaepSha1 => RsaPadding::Oaep(Oaep::new::<Sha1>()),
            Self::OaepSha256 => RsaPadding::Oaep(Oaep::new::<Sha256>()),
        }
    }
}

enum RsaPadding {
    Pkcs1v15(Pkcs1v15Encrypt),
    Oaep(Oaep),
}

/// The symmetric ciphers the policy catalogue uses.
#[derive(Copy, Clone, Debug)]
pub(crate) enum SymmetricCipher {
    Aes128Cbc,
    Aes256Cbc,
}

/// The HMAC digests the policy catalogue uses.
#[derive(Copy, Clone, Debug)]
pub(crate) enum SymmetricSignature {
    HmacSha1,
    HmacSha256,
}

impl SymmetricSignature {
    pub(crate) fn output_size(self) -> usize {
        match self {
            Self::HmacSha1 => 20,
            Self::HmacSha256 => 32,
        }
    }
}

pub(crate) fn random_nonce(length: usize) -> Vec<u8> {
    let mut nonce = vec![0u8; length];
    OsRng.fill_bytes(&mut nonce);
    nonce
}

pub(crate) fn sha1_thumbprint(data: &[u8]) -> [u8; THUMBPRINT_LENGTH] {
    use sha1::Digest;
    Sha1::digest(data).into()
}

pub(crate) fn rsa_sign(
    scheme: AsymmetricSignature,
    key: &RsaPrivateKey,
    message: &[u8],
) -> Result<Vec<u8>, StatusCode> {
    let signature = match scheme {
        AsymmetricSignature::Pkcs1v15Sha1 => {
            let signing_key = rsa::pkcs1v15::SigningKey::<Sha1>::new(key.clone());
            signing_key.sign(message).to_vec()
        }
        AsymmetricSignature::Pkcs1v15Sha256 => {
            let signing_key = rsa::pkcs1v15::SigningKey::<Sha256>::new(key.clone());
            signing_key.sign(message).to_vec()
        }
        AsymmetricSignature::PssSha256 => {
            let signing_key = rsa::pss::SigningKey::<Sha256>::new(key.clone());
            signing_key.sign_with_rng(&mut OsRng, message).to_vec()
        }
    };
    Ok(signature)
}

pub(crate) fn rsa_verify(
    scheme: AsymmetricSignature,
    key: &RsaPublicKey,
    message: &[u8],
    signature: &[u8],
) -> Result<(), StatusCode> {
    let verified = match scheme {
        AsymmetricSignature::Pkcs1v15Sha1 => {
            let verifying_key = rsa::pkcs1v15::VerifyingKey::<Sha1>::new(key.clone());
            rsa::pkcs1v15::Signature::try_from(signature)
                .and_then(|signature| verifying_key.verify(message, &signature))
        }
        AsymmetricSignature::Pkcs1v15Sha256 => {
            let verifying_key = rsa::pkcs1v15::VerifyingKey::<Sha256>::new(key.clone());
            rsa::pkcs1v15::Signature::try_from(signature)
                .and_then(|signature| verifying_key.verify(message, &signature))
        }
        AsymmetricSignature::PssSha256 => {
            let verifying_key = rsa::pss::VerifyingKey::<Sha256>::new(key.clone());
            rsa::pss::Signature::try_from(signature)
                .and_then(|signature| verifying_key.verify(message, &signature))
        }
    };
    verified.map_err(|_| StatusCode::BAD_SECURITY_CHECKS_FAILED)
}

/// Encrypts `plaintext` in place inside `buffer`, block by block.
///
/// `buffer[..plaintext_len]` holds the plaintext on entry; on return the
/// buffer holds the concatenated ciphertext blocks. The blocks are
/// processed from the end backwards: every ciphertext block is at least as
/// long as its plaintext chunk, so writing forwards would clobber plaintext
/// that is still to be read.
pub(crate) fn rsa_encrypt_in_place(
    scheme: AsymmetricEncryption,
    key: &RsaPublicKey,
    buffer: &mut Vec<u8>,
    plaintext_len: usize,
) -> Result<(), StatusCode> {
    let cipher_block = key.size();
    let plain_block = cipher_block
        .checked_sub(scheme.padding_size())
        .ok_or(StatusCode::BAD_SECURITY_CHECKS_FAILED)?;
    let blocks = plaintext_len.div_ceil(plain_block);
    buffer.resize(blocks * cipher_block, 0);

    for index in (0..blocks).rev() {
        let start = index * plain_block;
        let end = plaintext_len.min(start + plain_block);
        let chunk = Zeroizing::new(buffer[start..end].to_vec());
        let encrypted = match scheme.padding() {
            RsaPadding::Pkcs1v15(padding) => key.encrypt(&mut OsRng, padding, &chunk),
            RsaPadding::Oaep(padding) => key.encrypt(&mut OsRng, padding, &chunk),
        }
        .map_err(|_| StatusCode::BAD_SECURITY_CHECKS_FAILED)?;
        buffer[index * cipher_block..(index + 1) * cipher_block].copy_from_slice(&encrypted);
    }
    Ok(())
}

pub(crate) fn rsa_encrypt(
    scheme: AsymmetricEncryption,
    key: &RsaPublicKey,
    plaintext: &[u8],
) -> Result<Vec<u8>, StatusCode> {
    let mut buffer = plaintext.to_vec();
    rsa_encrypt_in_place(scheme, key, &mut buffer, plaintext.len())?;
    Ok(buffer)
}

pub(crate) fn rsa_decrypt(
    scheme: AsymmetricEncryption,
    key: &RsaPrivateKey,
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, StatusCode> {
    let cipher_block = key.size();
    if cipher_block == 0 || ciphertext.len() % cipher_block != 0 {
        return Err(StatusCode::BAD_SECURITY_CHECKS_FAILED);
    }
    let mut plaintext = Zeroizing::new(Vec::with_capacity(ciphertext.len()));
    for block in ciphertext.chunks_exact(cipher_block) {
        let decrypted = match scheme.padding() {
            RsaPadding::Pkcs1v15(padding) => key.decrypt(padding, block),
            RsaPadding::Oaep(padding) => key.decrypt(padding, block),
        }
        .map_err(|_| StatusCode::BAD_SECURITY_CHECKS_FAILED)?;
        plaintext.extend_from_slice(&decrypted);
    }
    Ok(plaintext)
}

fn hmac_bytes(
    digest: SymmetricSignature,
    key: &[u8],
    message: &[u8],
) -> Result<Vec<u8>, StatusCode> {
    match digest {
        SymmetricSignature::HmacSha1 => {
            let mut mac = Hmac::<Sha1>::new_from_slice(key)
                .map_err(|_| StatusCode::BAD_SECURITY_CHECKS_FAILED)?;
            mac.update(message);
            Ok(mac.finalize().into_bytes().to_vec())
        }
        SymmetricSignature::HmacSha256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(key)
                .map_err(|_| StatusCode::BAD_SECURITY_CHECKS_FAILED)?;
            mac.update(message);
            Ok(mac.finalize().into_bytes().to_vec())
        }
    }
}

pub(crate) fn hmac_sign(
    digest: SymmetricSignature,
    key: &[u8],
    message: &[u8],
) -> Result<Vec<u8>, StatusCode> {
    if key.is_empty() {
        return Err(StatusCode::BAD_SECURITY_CHECKS_FAILED);
    }
    hmac_bytes(digest, key, message)
}

pub(crate) fn hmac_verify(
    digest: SymmetricSignature,
    key: &[u8],
    message: &[u8],
    signature: &[u8],
) -> Result<(), StatusCode> {
    let computed = Zeroizing::new(hmac_sign(digest, key, message)?);
    if signature.len() == computed.len() && bool::from(computed.ct_eq(signature)) {
        Ok(())
    } else {
        Err(StatusCode::BAD_SECURITY_CHECKS_FAILED)
    }
}

fn check_cbc_args(key: &[u8], expected_key: usize, iv: &[u8], data: &[u8]) -> Result<(), StatusCode> {
    if key.len() != expected_key || iv.len() != 16 {
        return Err(StatusCode::BAD_SECURITY_CHECKS_FAILED);
    }
    if data.len() % 16 != 0 {
        return Err(StatusCode::BAD_INVALID_ARGUMENT);
    }
    Ok(())
}

pub(crate) fn cbc_encrypt(
    cipher: SymmetricCipher,
    key: &[u8],
    iv: &[u8],
    data: &mut [u8],
) -> Result<(), StatusCode> {
    let length = data.len();
    match cipher {
        SymmetricCipher::Aes128Cbc => {
            check_cbc_args(key, 16, iv, data)?;
            Aes128CbcEnc::new_from_slices(key, iv)
                .map_err(|_| StatusCode::BAD_SECURITY_CHECKS_FAILED)?
                .encrypt_padded_mut::<NoPadding>(data, length)
                .map_err(|_| StatusCode::BAD_SECURITY_CHECKS_FAILED)?;
        }
        SymmetricCipher::Aes256Cbc => {
            check_cbc_args(key, 32, iv, data)?;
            Aes256CbcEnc::new_from_slices(key, iv)
                .map_err(|_| StatusCode::BAD_SECURITY_CHECKS_FAILED)?
                .encrypt_padded_mut::<NoPadding>(data, length)
                .map_err(|_| StatusCode::BAD_SECURITY_CHECKS_FAILED)?;
        }
    }
    Ok(())
}

pub(crate) fn cbc_decrypt(
    cipher: SymmetricCipher,
    key: &[u8],
    iv: &[u8],
    data: &mut [u8],
) -> Result<(), StatusCode> {
    match cipher {
        SymmetricCipher::Aes128Cbc => {
            check_cbc_args(key, 16, iv, data)?;
            Aes128CbcDec::new_from_slices(key, iv)
                .map_err(|_| StatusCode::BAD_SECURITY_CHECKS_FAILED)?
                .decrypt_padded_mut::<NoPadding>(data)
                .map_err(|_| StatusCode::BAD_SECURITY_CHECKS_FAILED)?;
        }
        SymmetricCipher::Aes256Cbc => {
            check_cbc_args(key, 32, iv, data)?;
            Aes256CbcDec::new_from_slices(key, iv)
                .map_err(|_| StatusCode::BAD_SECURITY_CHECKS_FAILED)?
                .decrypt_padded_mut::<NoPadding>(data)
                .map_err(|_| StatusCode::BAD_SECURITY_CHECKS_FAILED)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> RsaPrivateKey {
        RsaPrivateKey::new(&mut OsRng, 2048).unwrap()
    }

    #[test]
    fn rsa_multi_block_round_trips() {
        let key = test_key();
        let public = RsaPublicKey::from(&key);
        // Three full plaintext blocks plus a short tail.
        let plaintext: Vec<u8> = (0..700u32).map(|i| i as u8).collect();
        for scheme in [
            AsymmetricEncryption::Pkcs1v15,
            AsymmetricEncryption::OaepSha1,
            AsymmetricEncryption::OaepSha256,
        ] {
            let ciphertext = rsa_encrypt(scheme, &public, &plaintext).unwrap();
            assert_eq!(ciphertext.len() % key.size(), 0);
            let decrypted = rsa_decrypt(scheme, &key, &ciphertext).unwrap();
            assert_eq!(&*decrypted, &plaintext);
        }
    }

    #[test]
    fn rsa_decrypt_rejects_ragged_input() {
        let key = test_key();
        let err = rsa_decrypt(AsymmetricEncryption::OaepSha1, &key, &[0u8; 100]).unwrap_err();
        assert_eq!(err, StatusCode::BAD_SECURITY_CHECKS_FAILED);
    }

    #[test]
    fn signatures_verify_and_reject_tampering() {
        let key = test_key();
        let public = RsaPublicKey::from(&key);
        for scheme in [
            AsymmetricSignature::Pkcs1v15Sha1,
            AsymmetricSignature::Pkcs1v15Sha256,
            AsymmetricSignature::PssSha256,
        ] {
            let signature = rsa_sign(scheme, &key, b"message").unwrap();
            assert_eq!(signature.len(), key.size());
            rsa_verify(scheme, &public, b"message", &signature).unwrap();
            let err = rsa_verify(scheme, &public, b"tampered", &signature).unwrap_err();
            assert_eq!(err, StatusCode::BAD_SECURITY_CHECKS_FAILED);
        }
    }

    #[test]
    fn cbc_round_trips_in_place() {
        let key = [7u8; 32];
        let iv = [9u8; 16];
        let original = [0x5Au8; 48];
        let mut data = original;
        cbc_encrypt(SymmetricCipher::Aes256Cbc, &key, &iv, &mut data).unwrap();
        assert_ne!(data, original);
        cbc_decrypt(SymmetricCipher::Aes256Cbc, &key, &iv, &mut data).unwrap();
        assert_eq!(data, original);
    }

    #[test]
    fn cbc_requires_whole_blocks() {
        let mut data = [0u8; 17];
        let err = cbc_encrypt(SymmetricCipher::Aes128Cbc, &[0; 16], &[0; 16], &mut data)
            .unwrap_err();
        assert_eq!(err, StatusCode::BAD_INVALID_ARGUMENT);
    }

    #[test]
    fn hmac_verify_is_exact() {
        let tag = hmac_sign(SymmetricSignature::HmacSha256, b"key", b"msg").unwrap();
        assert_eq!(tag.len(), 32);
        hmac_verify(SymmetricSignature::HmacSha256, b"key", b"msg", &tag).unwrap();
        assert!(hmac_verify(SymmetricSignature::HmacSha256, b"key", b"msg!", &tag).is_err());
        assert!(hmac_verify(SymmetricSignature::HmacSha256, b"key", b"msg", &tag[..31]).is_err());
    }
}
