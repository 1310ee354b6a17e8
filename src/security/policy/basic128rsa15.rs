//! The Basic128Rsa15 security policy. Deprecated by the OPC Foundation but
//! still fielded widely; kept for interoperability.

rsa_policy! {
    /// RSA-PKCS#1 v1.5 signatures over SHA-1, RSA-PKCS#1 v1.5 encryption,
    /// HMAC-SHA1 and AES-128-CBC symmetric protection, P_SHA1 key
    /// derivation.
    Basic128Rsa15 {
        id: Basic128Rsa15,
        asym_signature: Pkcs1v15Sha1,
        asym_encryption: Pkcs1v15,
        sym_signature: HmacSha1,
        sym_cipher: Aes128Cbc,
        key_derivation: p_sha1,
        sym_signing_key_length: 16,
        sym_encryption_key_length: 16,
        nonce_length: 16,
        asym_key_bits: 1024..=2048,
    }
}
