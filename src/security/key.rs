//! Private-key loading.
//!
//! Accepts PKCS#8 or PKCS#1, as DER or PEM. A blob is treated as DER iff it
//! begins with the long-form SEQUENCE magic `0x30 0x82`; anything else must
//! carry the ASCII `-----BEGIN` marker. A DER key short enough to use a
//! short-form length is therefore retried as PEM and then rejected; such
//! keys do not occur at the RSA sizes the policies accept.

use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::RsaPrivateKey;

use crate::types::StatusCode;

const PEM_MARKER: &[u8] = b"-----BEGIN";
const DER_MAGIC: [u8; 2] = [0x30, 0x82];

/// Loads an RSA private key from `data`.
///
/// `password` decrypts an encrypted PKCS#8 PEM key ("ENCRYPTED PRIVATE
/// KEY"); it is ignored for unencrypted keys.
///
/// # Errors
/// `BadSecurityChecksFailed` when no supported encoding parses.
pub fn load_private_key(data: &[u8], password: Option<&[u8]>) -> Result<RsaPrivateKey, StatusCode> {
    if data.len() >= 2 && data[..2] == DER_MAGIC {
        if let Ok(key) = RsaPrivateKey::from_pkcs8_der(data) {
            return Ok(key);
        }
        return RsaPrivateKey::from_pkcs1_der(data)
            .map_err(|_| StatusCode::BAD_SECURITY_CHECKS_FAILED);
    }

    if !data.starts_with(PEM_MARKER) {
        return Err(StatusCode::BAD_SECURITY_CHECKS_FAILED);
    }
    let pem = core::str::from_utf8(data).map_err(|_| StatusCode::BAD_SECURITY_CHECKS_FAILED)?;

    if pem.contains("ENCRYPTED PRIVATE KEY") {
        let password = password.ok_or(StatusCode::BAD_SECURITY_CHECKS_FAILED)?;
        return RsaPrivateKey::from_pkcs8_encrypted_pem(pem, password)
            .map_err(|_| StatusCode::BAD_SECURITY_CHECKS_FAILED);
    }
    if let Ok(key) = RsaPrivateKey::from_pkcs8_pem(pem) {
        return Ok(key);
    }
    RsaPrivateKey::from_pkcs1_pem(pem).map_err(|_| StatusCode::BAD_SECURITY_CHECKS_FAILED)
}
