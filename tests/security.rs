//! Security-policy behaviour over real key material: signatures, multi-block
//! asymmetric encryption, key derivation, thumbprints and the channel key
//! state machine.

use std::sync::{Arc, OnceLock};

use hmac::{Hmac, Mac};
use sha2::Sha256;
use uawire::security::{
    self, policy_for_id, DerivedKeys, PolicyContext, PolicyId, SecureChannelContext,
    SecurityPolicy,
};
use uawire::security::channel::ChannelState;
use uawire::trust::{create_self_signed, SelfSignedParams};
use uawire::types::StatusCode;

/// One 2048-bit certificate/key pair shared by all tests; RSA generation
/// is slow enough to be worth caching.
fn identity() -> &'static (Vec<u8>, Vec<u8>) {
    static IDENTITY: OnceLock<(Vec<u8>, Vec<u8>)> = OnceLock::new();
    IDENTITY.get_or_init(|| {
        let (certificate, key) = create_self_signed(&SelfSignedParams::default()).unwrap();
        (certificate, key.to_vec())
    })
}

fn policy_context() -> Arc<PolicyContext> {
    let (certificate, key) = identity();
    Arc::new(PolicyContext::new(certificate, key, None).unwrap())
}

fn crypto_policies() -> [&'static dyn SecurityPolicy; 5] {
    [
        policy_for_id(PolicyId::Basic128Rsa15),
        policy_for_id(PolicyId::Basic256),
        policy_for_id(PolicyId::Basic256Sha256),
        policy_for_id(PolicyId::Aes128Sha256RsaOaep),
        policy_for_id(PolicyId::Aes256Sha256RsaPss),
    ]
}

/// Opens a loopback channel: the "remote" certificate is our own, so the
/// local private key matches the remote public key and both directions of
/// the asymmetric operations can be exercised.
fn loopback(policy: &'static dyn SecurityPolicy) -> SecureChannelContext {
    let (certificate, _) = identity();
    SecureChannelContext::open(policy, policy_context(), certificate).unwrap()
}

#[test]
fn p_sha256_equals_the_reference_expansion() {
    let secret = [0u8; 32];
    let seed = [0u8; 32];
    let hmac = |message: &[u8]| -> Vec<u8> {
        let mut mac = Hmac::<Sha256>::new_from_slice(&secret).unwrap();
        mac.update(message);
        mac.finalize().into_bytes().to_vec()
    };
    let a1 = hmac(&seed);
    let a2 = hmac(&a1);
    let mut expected = hmac(&[a1.as_slice(), &seed].concat());
    expected.extend_from_slice(&hmac(&[a2.as_slice(), &seed].concat()));

    let policy = policy_for_id(PolicyId::Basic256Sha256);
    let output = policy.derive_keys(&secret, &seed, 64);
    assert_eq!(&*output, &expected[..]);
}

#[test]
fn thumbprints_are_sha1_of_the_der() {
    use sha1::{Digest, Sha1};
    let (certificate, _) = identity();
    let policy = policy_for_id(PolicyId::Basic256Sha256);
    let thumbprint = policy.make_thumbprint(certificate);
    assert_eq!(thumbprint.len(), 20);
    assert_eq!(thumbprint.as_slice(), Sha1::digest(certificate).as_slice());

    let context = policy_context();
    context.compare_thumbprint(&thumbprint).unwrap();
    assert!(context.compare_thumbprint(&[0u8; 20]).is_err());
}

#[test]
fn asymmetric_signatures_verify_and_reject_tampering() {
    for policy in crypto_policies() {
        let channel = loopback(policy);
        let signature = channel.asym_sign(b"open secure channel").unwrap();
        assert_eq!(
            signature.len(),
            channel.local_asymmetric_signature_size(),
            "{}",
            policy.uri()
        );
        channel.asym_verify(b"open secure channel", &signature).unwrap();
        assert_eq!(
            channel.asym_verify(b"tampered message", &signature),
            Err(StatusCode::BAD_SECURITY_CHECKS_FAILED),
            "{}",
            policy.uri()
        );
    }
}

#[test]
fn asymmetric_encryption_round_trips_across_blocks() {
    for policy in crypto_policies() {
        let channel = loopback(policy);
        // Longer than one plaintext block for every policy and key size.
        let plaintext: Vec<u8> = (0..600u32).map(|i| (i % 251) as u8).collect();
        let ciphertext = channel.asym_encrypt(&plaintext).unwrap();
        assert_eq!(ciphertext.len() % channel.remote_block_size(), 0);
        assert!(ciphertext.len() > plaintext.len());
        let decrypted = channel.asym_decrypt(&ciphertext).unwrap();
        assert_eq!(&*decrypted, &plaintext[..], "{}", policy.uri());
    }
}

#[test]
fn plaintext_block_sizes_reflect_the_padding() {
    let channel = loopback(policy_for_id(PolicyId::Basic256Sha256));
    // 2048-bit key, OAEP-SHA1 padding.
    assert_eq!(channel.remote_block_size(), 256);
    assert_eq!(channel.remote_plaintext_block_size(), 256 - 42);
    assert_eq!(channel.local_plaintext_block_size(), 256 - 42);
}

#[test]
fn channel_keys_follow_the_state_machine() {
    let policy = policy_for_id(PolicyId::Basic256Sha256);
    let mut channel = loopback(policy);
    assert_eq!(channel.state(), ChannelState::Fresh);

    // Symmetric operations are refused until keys are installed.
    let mut block = [0u8; 16];
    assert_eq!(
        channel.sym_sign(b"x"),
        Err(StatusCode::BAD_SECURITY_CHECKS_FAILED)
    );
    assert_eq!(
        channel.sym_encrypt(&mut block),
        Err(StatusCode::BAD_SECURITY_CHECKS_FAILED)
    );

    let client_nonce = policy.generate_nonce();
    let server_nonce = policy.generate_nonce();
    let local = DerivedKeys::derive(policy, &server_nonce, &client_nonce);
    let remote = DerivedKeys::derive(policy, &client_nonce, &server_nonce);
    channel.install_keys(&local, &remote).unwrap();
    assert_eq!(channel.state(), ChannelState::KeysInstalled);

    let signature = channel.sym_sign(b"payload").unwrap();
    assert_eq!(signature.len(), policy.symmetric_signature_size());

    // Loopback decrypt needs the roles swapped: what we encrypt with the
    // local keys, a peer holding them as remote keys can decrypt.
    let mut peer = loopback(policy);
    peer.install_keys(&remote, &local).unwrap();
    let plaintext = [0x42u8; 32];
    let mut data = plaintext;
    channel.sym_encrypt(&mut data).unwrap();
    assert_ne!(data, plaintext);
    peer.sym_decrypt(&mut data).unwrap();
    assert_eq!(data, plaintext);
    peer.sym_verify(b"payload", &signature).unwrap();
    assert!(peer.sym_verify(b"other", &signature).is_err());

    // Rekeying replaces the material atomically; the channel stays usable.
    let fresh_local = DerivedKeys::derive(policy, &server_nonce, &server_nonce);
    let fresh_remote = DerivedKeys::derive(policy, &client_nonce, &client_nonce);
    channel.install_keys(&fresh_local, &fresh_remote).unwrap();
    assert_eq!(channel.state(), ChannelState::KeysInstalled);
    channel.sym_sign(b"still works").unwrap();

    channel.close();
    assert_eq!(channel.state(), ChannelState::Closed);
    assert_eq!(
        channel.sym_sign(b"x"),
        Err(StatusCode::BAD_SECURITY_CHECKS_FAILED)
    );
    assert_eq!(
        channel.asym_sign(b"x"),
        Err(StatusCode::BAD_SECURITY_CHECKS_FAILED)
    );
}

#[test]
fn nonces_are_validated_against_the_policy() {
    let policy = policy_for_id(PolicyId::Basic256);
    let mut channel = loopback(policy);
    assert_eq!(
        channel.set_remote_nonce(&[0u8; 16]),
        Err(StatusCode::BAD_NONCE_INVALID)
    );
    channel.set_remote_nonce(&[0u8; 32]).unwrap();
    assert_eq!(channel.remote_nonce().len(), 32);

    let a = policy.generate_nonce();
    let b = policy.generate_nonce();
    assert_eq!(a.len(), 32);
    assert_ne!(a, b);
}

#[test]
fn certificate_comparison_is_byte_exact() {
    let channel = loopback(policy_for_id(PolicyId::Basic256Sha256));
    let (certificate, _) = identity();
    channel.compare_certificate(certificate).unwrap();
    let mut tampered = certificate.clone();
    tampered[10] ^= 1;
    assert!(channel.compare_certificate(&tampered).is_err());
}

#[test]
fn updating_the_policy_context_recomputes_the_thumbprint() {
    let (certificate, key) = identity();
    let mut context = PolicyContext::new(certificate, key, None).unwrap();
    let original = *context.thumbprint();

    let (next_certificate, next_key) =
        create_self_signed(&SelfSignedParams::default()).unwrap();
    context
        .update_certificate_and_private_key(&next_certificate, &next_key, None)
        .unwrap();
    assert_ne!(*context.thumbprint(), original);
    assert_eq!(context.certificate(), &next_certificate[..]);

    // A failed update leaves the installed pair untouched.
    let thumbprint = *context.thumbprint();
    assert!(context
        .update_certificate_and_private_key(b"junk", b"junk", None)
        .is_err());
    assert_eq!(*context.thumbprint(), thumbprint);
}

#[test]
fn clearing_the_context_evicts_the_private_key() {
    let (certificate, key) = identity();
    let mut context = PolicyContext::new(certificate, key, None).unwrap();
    assert!(context.private_key().is_ok());

    context.clear();
    assert_eq!(
        context.private_key().unwrap_err(),
        StatusCode::BAD_SECURITY_CHECKS_FAILED
    );
    // The certificate identity stays available for comparison.
    let thumbprint = *context.thumbprint();
    context.compare_thumbprint(&thumbprint).unwrap();

    // Installing a fresh pair brings the context back into service.
    context
        .update_certificate_and_private_key(certificate, key, None)
        .unwrap();
    assert!(context.private_key().is_ok());
}

#[test]
fn key_size_limits_are_enforced_on_open() {
    // A 2048-bit key is acceptable everywhere, so this uses the loopback
    // helper; the None policy ignores the certificate entirely.
    let policy = policy_for_id(PolicyId::None);
    let channel = SecureChannelContext::open(policy, policy_context(), b"").unwrap();
    assert_eq!(channel.remote_asymmetric_signature_size(), 0);
    assert_eq!(
        channel.asym_encrypt(b"x"),
        Err(StatusCode::BAD_SECURITY_CHECKS_FAILED)
    );
    assert!(security::policy_for_uri(policy.uri()).is_some());
}
