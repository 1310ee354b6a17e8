//! Per-channel security contexts and their key state machine.

use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::RsaPublicKey;
use std::sync::Arc;
use zeroize::Zeroizing;

use crate::security::{PolicyContext, PolicyId, SecurityPolicy, THUMBPRINT_LENGTH};
use crate::security::derive::DerivedKeys;
use crate::types::StatusCode;

/// Where a channel stands with respect to its symmetric keys:
/// `Fresh → KeysInstalled → (rekey → KeysInstalled)* → Closed`.
///
/// Symmetric operations outside `KeysInstalled`, and any operation on a
/// closed channel, fail with `BadSecurityChecksFailed`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ChannelState {
    Fresh,
    KeysInstalled,
    Closed,
}

#[derive(Default)]
struct ChannelKeys {
    local_signing: Zeroizing<Vec<u8>>,
    local_encryption: Zeroizing<Vec<u8>>,
    local_iv: Zeroizing<Vec<u8>>,
    remote_signing: Zeroizing<Vec<u8>>,
    remote_encryption: Zeroizing<Vec<u8>>,
    remote_iv: Zeroizing<Vec<u8>>,
}

/// The security context of one secure channel: the policy, the shared
/// policy context with the local key pair, the remote certificate, and the
/// installed symmetric key material.
///
/// A channel is single-threaded; processing different channels on
/// different threads needs no synchronisation here.
pub struct SecureChannelContext {
    policy: &'static dyn SecurityPolicy,
    policy_context: Arc<PolicyContext>,
    remote_certificate: Vec<u8>,
    remote_public_key: Option<RsaPublicKey>,
    remote_thumbprint: [u8; THUMBPRINT_LENGTH],
    remote_nonce: Vec<u8>,
    state: ChannelState,
    keys: ChannelKeys,
}

impl SecureChannelContext {
    /// Opens a channel context for a peer certificate.
    ///
    /// For every policy except None the certificate must parse and carry an
    /// RSA key whose modulus lies in the policy's accepted range.
    ///
    /// # Errors
    /// `BadSecurityChecksFailed` on a malformed certificate or an
    /// out-of-range key.
    pub fn open(
        policy: &'static dyn SecurityPolicy,
        policy_context: Arc<PolicyContext>,
        remote_certificate: &[u8],
    ) -> Result<Self, StatusCode> {
        let remote_public_key = if policy.id() == PolicyId::None {
            None
        } else {
            let (_, certificate) = x509_parser::parse_x509_certificate(remote_certificate)
                .map_err(|_| StatusCode::BAD_SECURITY_CHECKS_FAILED)?;
            let public_key = RsaPublicKey::from_public_key_der(certificate.public_key().raw)
                .map_err(|_| StatusCode::BAD_SECURITY_CHECKS_FAILED)?;
            let bits = (public_key.size() * 8) as u32;
            if bits < policy.min_asymmetric_key_bits() || bits > policy.max_asymmetric_key_bits() {
                return Err(StatusCode::BAD_SECURITY_CHECKS_FAILED);
            }
            Some(public_key)
        };
        Ok(Self {
            policy,
            policy_context,
            remote_certificate: remote_certificate.to_vec(),
            remote_public_key,
            remote_thumbprint: policy.make_thumbprint(remote_certificate),
            remote_nonce: Vec::new(),
            state: ChannelState::Fresh,
            keys: ChannelKeys::default(),
        })
    }

    #[must_use]
    pub fn policy(&self) -> &'static dyn SecurityPolicy {
        self.policy
    }

    #[must_use]
    pub fn state(&self) -> ChannelState {
        self.state
    }

    #[must_use]
    pub fn remote_certificate(&self) -> &[u8] {
        &self.remote_certificate
    }

    #[must_use]
    pub fn remote_thumbprint(&self) -> &[u8; THUMBPRINT_LENGTH] {
        &self.remote_thumbprint
    }

    /// Checks that a presented certificate is byte-identical to the one
    /// this channel was opened with.
    ///
    /// # Errors
    /// `BadSecurityChecksFailed` on mismatch.
    pub fn compare_certificate(&self, certificate_der: &[u8]) -> Result<(), StatusCode> {
        if certificate_der == self.remote_certificate {
            Ok(())
        } else {
            Err(StatusCode::BAD_SECURITY_CHECKS_FAILED)
        }
    }

    /// Stores the peer's channel nonce after validating its length against
    /// the policy.
    ///
    /// # Errors
    /// `BadNonceInvalid` when the nonce is shorter than the policy demands.
    pub fn set_remote_nonce(&mut self, nonce: &[u8]) -> Result<(), StatusCode> {
        if nonce.len() < self.policy.secure_channel_nonce_length() {
            return Err(StatusCode::BAD_NONCE_INVALID);
        }
        self.remote_nonce = nonce.to_vec();
        Ok(())
    }

    #[must_use]
    pub fn remote_nonce(&self) -> &[u8] {
        &self.remote_nonce
    }

    // -- size getters, all deterministic from the policy and the keys --

    /// Length of signatures this side produces (the local modulus length),
    /// or 0 when the policy context has been cleared.
    #[must_use]
    pub fn local_asymmetric_signature_size(&self) -> usize {
        self.policy_context
            .private_key()
            .map_or(0, |key| key.size())
    }

    /// Length of signatures the peer produces (the remote modulus length).
    #[must_use]
    pub fn remote_asymmetric_signature_size(&self) -> usize {
        self.remote_public_key.as_ref().map_or(0, RsaPublicKey::size)
    }

    /// Ciphertext block size when encrypting to the peer.
    #[must_use]
    pub fn remote_block_size(&self) -> usize {
        self.remote_asymmetric_signature_size()
    }

    /// Plaintext chunk size when encrypting to the peer.
    #[must_use]
    pub fn remote_plaintext_block_size(&self) -> usize {
        self.remote_block_size()
            .saturating_sub(self.policy.asymmetric_padding_size())
    }

    /// Ciphertext block size of data the peer encrypted to us.
    #[must_use]
    pub fn local_block_size(&self) -> usize {
        self.policy_context
            .private_key()
            .map_or(0, |key| key.size())
    }

    /// Plaintext chunk size of data the peer encrypted to us.
    #[must_use]
    pub fn local_plaintext_block_size(&self) -> usize {
        self.local_block_size()
            .saturating_sub(self.policy.asymmetric_padding_size())
    }

    // -- key installation --

    fn expected_lengths_installed(&self) -> bool {
        let signing = self.policy.symmetric_signing_key_length();
        let encryption = self.policy.symmetric_encryption_key_length();
        let block = self.policy.symmetric_block_size();
        signing > 0
            && self.keys.local_signing.len() == signing
            && self.keys.remote_signing.len() == signing
            && self.keys.local_encryption.len() == encryption
            && self.keys.remote_encryption.len() == encryption
            && self.keys.local_iv.len() == block
            && self.keys.remote_iv.len() == block
    }

    fn set_key_buffer(&mut self, which: KeyBuffer, value: &[u8]) -> Result<(), StatusCode> {
        if self.state == ChannelState::Closed {
            return Err(StatusCode::BAD_SECURITY_CHECKS_FAILED);
        }
        let expected = match which {
            KeyBuffer::LocalSigning | KeyBuffer::RemoteSigning => {
                self.policy.symmetric_signing_key_length()
            }
            KeyBuffer::LocalEncryption | KeyBuffer::RemoteEncryption => {
                self.policy.symmetric_encryption_key_length()
            }
            KeyBuffer::LocalIv | KeyBuffer::RemoteIv => self.policy.symmetric_block_size(),
        };
        if value.len() != expected {
            return Err(StatusCode::BAD_NONCE_INVALID);
        }
        let slot = match which {
            KeyBuffer::LocalSigning => &mut self.keys.local_signing,
            KeyBuffer::LocalEncryption => &mut self.keys.local_encryption,
            KeyBuffer::LocalIv => &mut self.keys.local_iv,
            KeyBuffer::RemoteSigning => &mut self.keys.remote_signing,
            KeyBuffer::RemoteEncryption => &mut self.keys.remote_encryption,
            KeyBuffer::RemoteIv => &mut self.keys.remote_iv,
        };
        *slot = Zeroizing::new(value.to_vec());
        if self.expected_lengths_installed() {
            self.state = ChannelState::KeysInstalled;
        }
        Ok(())
    }

    pub fn set_local_sym_signing_key(&mut self, key: &[u8]) -> Result<(), StatusCode> {
        self.set_key_buffer(KeyBuffer::LocalSigning, key)
    }

    pub fn set_local_sym_encrypting_key(&mut self, key: &[u8]) -> Result<(), StatusCode> {
        self.set_key_buffer(KeyBuffer::LocalEncryption, key)
    }

    pub fn set_local_sym_iv(&mut self, iv: &[u8]) -> Result<(), StatusCode> {
        self.set_key_buffer(KeyBuffer::LocalIv, iv)
    }

    pub fn set_remote_sym_signing_key(&mut self, key: &[u8]) -> Result<(), StatusCode> {
        self.set_key_buffer(KeyBuffer::RemoteSigning, key)
    }

    pub fn set_remote_sym_encrypting_key(&mut self, key: &[u8]) -> Result<(), StatusCode> {
        self.set_key_buffer(KeyBuffer::RemoteEncryption, key)
    }

    pub fn set_remote_sym_iv(&mut self, iv: &[u8]) -> Result<(), StatusCode> {
        self.set_key_buffer(KeyBuffer::RemoteIv, iv)
    }

    /// Installs (or, on rekey, atomically replaces) both sides' derived
    /// key material.
    ///
    /// # Errors
    /// `BadSecurityChecksFailed` on a closed channel, `BadNonceInvalid`
    /// when a buffer has the wrong length for the policy.
    pub fn install_keys(
        &mut self,
        local: &DerivedKeys,
        remote: &DerivedKeys,
    ) -> Result<(), StatusCode> {
        if self.state == ChannelState::Closed {
            return Err(StatusCode::BAD_SECURITY_CHECKS_FAILED);
        }
        let previous_state = self.state;
        let previous = core::mem::take(&mut self.keys);
        let install = (|| {
            self.set_local_sym_signing_key(&local.signing_key)?;
            self.set_local_sym_encrypting_key(&local.encryption_key)?;
            self.set_local_sym_iv(&local.iv)?;
            self.set_remote_sym_signing_key(&remote.signing_key)?;
            self.set_remote_sym_encrypting_key(&remote.encryption_key)?;
            self.set_remote_sym_iv(&remote.iv)
        })();
        if install.is_err() {
            self.keys = previous;
            self.state = previous_state;
        }
        install
    }

    /// Closes the channel; the key material is zeroed and every further
    /// operation fails.
    pub fn close(&mut self) {
        self.keys = ChannelKeys::default();
        self.remote_nonce.clear();
        self.state = ChannelState::Closed;
    }

    // -- asymmetric operations (the OpenSecureChannel handshake) --

    fn remote_key(&self) -> Result<&RsaPublicKey, StatusCode> {
        if self.state == ChannelState::Closed {
            return Err(StatusCode::BAD_SECURITY_CHECKS_FAILED);
        }
        self.remote_public_key
            .as_ref()
            .ok_or(StatusCode::BAD_SECURITY_CHECKS_FAILED)
    }

    /// Signs with the local private key.
    pub fn asym_sign(&self, message: &[u8]) -> Result<Vec<u8>, StatusCode> {
        if self.state == ChannelState::Closed {
            return Err(StatusCode::BAD_SECURITY_CHECKS_FAILED);
        }
        self.policy
            .asym_sign(self.policy_context.private_key()?, message)
    }

    /// Verifies a signature made by the peer.
    pub fn asym_verify(&self, message: &[u8], signature: &[u8]) -> Result<(), StatusCode> {
        self.policy.asym_verify(self.remote_key()?, message, signature)
    }

    /// Encrypts to the peer's public key.
    pub fn asym_encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, StatusCode> {
        self.policy.asym_encrypt(self.remote_key()?, plaintext)
    }

    /// Decrypts with the local private key.
    pub fn asym_decrypt(&self, ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>, StatusCode> {
        if self.state == ChannelState::Closed {
            return Err(StatusCode::BAD_SECURITY_CHECKS_FAILED);
        }
        self.policy
            .asym_decrypt(self.policy_context.private_key()?, ciphertext)
    }

    // -- symmetric operations (everything after the handshake) --

    fn installed_keys(&self) -> Result<&ChannelKeys, StatusCode> {
        if self.state != ChannelState::KeysInstalled {
            return Err(StatusCode::BAD_SECURITY_CHECKS_FAILED);
        }
        Ok(&self.keys)
    }

    /// Signs with the local symmetric signing key.
    pub fn sym_sign(&self, message: &[u8]) -> Result<Vec<u8>, StatusCode> {
        let keys = self.installed_keys()?;
        self.policy.sym_sign(&keys.local_signing, message)
    }

    /// Verifies a signature made with the peer's symmetric signing key.
    pub fn sym_verify(&self, message: &[u8], signature: &[u8]) -> Result<(), StatusCode> {
        let keys = self.installed_keys()?;
        self.policy
            .sym_verify(&keys.remote_signing, message, signature)
    }

    /// Encrypts in place with the local symmetric key and IV.
    pub fn sym_encrypt(&self, data: &mut [u8]) -> Result<(), StatusCode> {
        let keys = self.installed_keys()?;
        self.policy
            .sym_encrypt(&keys.local_encryption, &keys.local_iv, data)
    }

    /// Decrypts in place with the peer's symmetric key and IV.
    pub fn sym_decrypt(&self, data: &mut [u8]) -> Result<(), StatusCode> {
        let keys = self.installed_keys()?;
        self.policy
            .sym_decrypt(&keys.remote_encryption, &keys.remote_iv, data)
    }
}

#[derive(Copy, Clone)]
enum KeyBuffer {
    LocalSigning,
    LocalEncryption,
    LocalIv,
    RemoteSigning,
    RemoteEncryption,
    RemoteIv,
}

impl core::fmt::Debug for SecureChannelContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SecureChannelContext")
            .field("policy", &self.policy.uri())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
