//! The policy catalogue. One implementation per named policy; the five
//! RSA-based policies share their plumbing through `rsa_policy!` and differ
//! only in the constants the catalogue table prescribes.

/// Implements [`SecurityPolicy`](crate::security::SecurityPolicy) for a
/// policy that follows the common RSA + AES-CBC shape.
macro_rules! rsa_policy {
    (
        $(#[$meta:meta])*
        $name:ident {
            id: $id:ident,
            asym_signature: $asym_signature:ident,
            asym_encryption: $asym_encryption:ident,
            sym_signature: $sym_signature:ident,
            sym_cipher: $sym_cipher:ident,
            key_derivation: $key_derivation:ident,
            sym_signing_key_length: $signing_key_length:expr,
            sym_encryption_key_length: $encryption_key_length:expr,
            nonce_length: $nonce_length:expr,
            asym_key_bits: $min_key_bits:literal..=$max_key_bits:literal,
        }
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Default)]
        pub struct $name;

        impl $crate::security::SecurityPolicy for $name {
            fn id(&self) -> $crate::security::PolicyId {
                $crate::security::PolicyId::$id
            }

            fn secure_channel_nonce_length(&self) -> usize {
                $nonce_length
            }

            fn symmetric_signature_size(&self) -> usize {
                $crate::security::crypto::SymmetricSignature::$sym_signature.output_size()
            }

            fn symmetric_signing_key_length(&self) -> usize {
                $signing_key_length
            }

            fn symmetric_encryption_key_length(&self) -> usize {
                $encryption_key_length
            }

            fn symmetric_block_size(&self) -> usize {
                16
            }

            fn min_asymmetric_key_bits(&self) -> u32 {
                $min_key_bits
            }

            fn max_asymmetric_key_bits(&self) -> u32 {
                $max_key_bits
            }

            fn asymmetric_padding_size(&self) -> usize {
                $crate::security::crypto::AsymmetricEncryption::$asym_encryption.padding_size()
            }

            fn asym_sign(
                &self,
                key: &rsa::RsaPrivateKey,
                message: &[u8],
            ) -> Result<Vec<u8>, $crate::types::StatusCode> {
                $crate::security::crypto::rsa_sign(
                    $crate::security::crypto::AsymmetricSignature::$asym_signature,
                    key,
                    message,
                )
            }

            fn asym_verify(
                &self,
                key: &rsa::RsaPublicKey,
                message: &[u8],
                signature: &[u8],
            ) -> Result<(), $crate::types::StatusCode> {
                $crate::security::crypto::rsa_verify(
                    $crate::security::crypto::AsymmetricSignature::$asym_signature,
                    key,
                    message,
                    signature,
                )
            }

            fn asym_encrypt(
                &self,
                key: &rsa::RsaPublicKey,
                plaintext: &[u8],
            ) -> Result<Vec<u8>, $crate::types::StatusCode> {
                $crate::security::crypto::rsa_encrypt(
                    $crate::security::crypto::AsymmetricEncryption::$asym_encryption,
                    key,
                    plaintext,
                )
            }

            fn asym_decrypt(
                &self,
                key: &rsa::RsaPrivateKey,
                ciphertext: &[u8],
            ) -> Result<zeroize::Zeroizing<Vec<u8>>, $crate::types::StatusCode> {
                $crate::security::crypto::rsa_decrypt(
                    $crate::security::crypto::AsymmetricEncryption::$asym_encryption,
                    key,
                    ciphertext,
                )
            }

            fn sym_sign(
                &self,
                key: &[u8],
                message: &[u8],
            ) -> Result<Vec<u8>, $crate::types::StatusCode> {
                $crate::security::crypto::hmac_sign(
                    $crate::security::crypto::SymmetricSignature::$sym_signature,
                    key,
                    message,
                )
            }

            fn sym_verify(
                &self,
                key: &[u8],
                message: &[u8],
                signature: &[u8],
            ) -> Result<(), $crate::types::StatusCode> {
                $crate::security::crypto::hmac_verify(
                    $crate::security::crypto::SymmetricSignature::$sym_signature,
                    key,
                    message,
                    signature,
                )
            }

            fn sym_encrypt(
                &self,
                key: &[u8],
                iv: &[u8],
                data: &mut [u8],
            ) -> Result<(), $crate::types::StatusCode> {
                $crate::security::crypto::cbc_encrypt(
                    $crate::security::crypto::SymmetricCipher::$sym_cipher,
                    key,
                    iv,
                    data,
                )
            }

            fn sym_decrypt(
                &self,
                key: &[u8],
                iv: &[u8],
                data: &mut [u8],
            ) -> Result<(), $crate::types::StatusCode> {
                $crate::security::crypto::cbc_decrypt(
                    $crate::security::crypto::SymmetricCipher::$sym_cipher,
                    key,
                    iv,
                    data,
                )
            }

            fn derive_keys(
                &self,
                secret: &[u8],
                seed: &[u8],
                length: usize,
            ) -> zeroize::Zeroizing<Vec<u8>> {
                $crate::security::derive::$key_derivation(secret, seed, length)
            }
        }
    };
}

mod aes128_sha256_rsa_oaep;
mod aes256_sha256_rsa_pss;
mod basic128rsa15;
mod basic256;
mod basic256sha256;
mod none;

pub use aes128_sha256_rsa_oaep::Aes128Sha256RsaOaep;
pub use aes256_sha256_rsa_pss::Aes256Sha256RsaPss;
pub use basic128rsa15::Basic128Rsa15;
pub use basic256::Basic256;
pub use basic256sha256::Basic256Sha256;
pub use none::PolicyNone;
