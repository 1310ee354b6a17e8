//! The Basic256 security policy. Deprecated by the OPC Foundation but
//! still fielded widely; kept for interoperability.

rsa_policy! {
    /// RSA-PKCS#1 v1.5 signatures over SHA-1, RSA-OAEP(SHA-1) encryption,
    /// HMAC-SHA1 and AES-256-CBC symmetric protection, P_SHA1 key
    /// derivation.
    Basic256 {
        id: Basic256,
        asym_signature: Pkcs1v15Sha1,
        asym_encryption: OaepSha1,
        sym_signature: HmacSha1,
        sym_cipher: Aes256Cbc,
        key_derivation: p_sha1,
        sym_signing_key_length: 24,
        sym_encryption_key_length: 32,
        nonce_length: 32,
        asym_key_bits: 1024..=2048,
    }
}
