//! The Aes128_Sha256_RsaOaep security policy.

rsa_policy! {
    /// RSA-PKCS#1 v1.5 signatures over SHA-256, RSA-OAEP(SHA-1)
    /// encryption, HMAC-SHA256 and AES-128-CBC symmetric protection,
    /// P_SHA256 key derivation.
    Aes128Sha256RsaOaep {
        id: Aes128Sha256RsaOaep,
        asym_signature: Pkcs1v15Sha256,
        asym_encryption: OaepSha1,
        sym_signature: HmacSha256,
        sym_cipher: Aes128Cbc,
        key_derivation: p_sha256,
        sym_signing_key_length: 32,
        sym_encryption_key_length: 16,
        nonce_length: 32,
        asym_key_bits: 2048..=4096,
    }
}
