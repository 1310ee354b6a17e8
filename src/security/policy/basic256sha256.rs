//! The Basic256Sha256 security policy.

rsa_policy! {
    /// RSA-PKCS#1 v1.5 signatures over SHA-256, RSA-OAEP(SHA-1)
    /// encryption, HMAC-SHA256 and AES-256-CBC symmetric protection,
    /// P_SHA256 key derivation.
    Basic256Sha256 {
        id: Basic256Sha256,
        asym_signature: Pkcs1v15Sha256,
        asym_encryption: OaepSha1,
        sym_signature: HmacSha256,
        sym_cipher: Aes256Cbc,
        key_derivation: p_sha256,
        sym_signing_key_length: 32,
        sym_encryption_key_length: 32,
        nonce_length: 32,
        asym_key_bits: 2048..=4096,
    }
}
