//! The Aes256_Sha256_RsaPss security policy.

rsa_policy! {
    /// RSA-PSS signatures over SHA-256 (salt length 32), RSA-OAEP(SHA-256)
    /// encryption, HMAC-SHA256 and AES-256-CBC symmetric protection,
    /// P_SHA256 key derivation.
    Aes256Sha256RsaPss {
        id: Aes256Sha256RsaPss,
        asym_signature: PssSha256,
        asym_encryption: OaepSha256,
        sym_signature: HmacSha256,
        sym_cipher: Aes256Cbc,
        key_derivation: p_sha256,
        sym_signing_key_length: 32,
        sym_encryption_key_length: 32,
        nonce_length: 32,
        asym_key_bits: 2048..=4096,
    }
}
