//! Test key material for signing mock ID tokens.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::EncodingKey;
use rsa::pkcs1::EncodeRsaPrivateKey;
use rsa::pkcs8::LineEnding;
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use serde_json::json;

/// Generated RSA key pair with its JWK representation.
#[derive(Clone)]
pub struct TestKeyPair {
    pub kid: String,
    pub encoding_key: EncodingKey,
    pub n_b64: String,
    pub e_b64: String,
}

impl TestKeyPair {
    /// Generate a fresh 2048-bit RSA key pair.
    #[must_use]
    pub fn generate(kid: &str) -> Self {
        use rsa::rand_core::OsRng;
        let bits = 2048;
        let private_key = RsaPrivateKey::new(&mut OsRng, bits).expect("failed to generate RSA key");

        let pem = private_key
            .to_pkcs1_pem(LineEnding::LF)
            .expect("failed to encode private key");
        let encoding_key =
            EncodingKey::from_rsa_pem(pem.as_bytes()).expect("failed to create encoding key");

        let public_key = private_key.to_public_key();
        let n_b64 = URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be());
        let e_b64 = URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be());

        TestKeyPair {
            kid: kid.to_string(),
            encoding_key,
            n_b64,
            e_b64,
        }
    }

    /// JWKS document exposing this key's public half.
    #[must_use]
    pub fn jwks(&self) -> serde_json::Value {
        json!({
            "keys": [
                {
                    "kty": "RSA",
                    "kid": self.kid,
                    "use": "sig",
                    "alg": "RS256",
                    "n": self.n_b64,
                    "e": self.e_b64,
                }
            ]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_key_exposes_jwk_components() {
        let key = TestKeyPair::generate("test-kid");

        assert_eq!(key.kid, "test-kid");
        assert!(!key.n_b64.is_empty());
        // Standard RSA public exponent 65537.
        assert_eq!(key.e_b64, "AQAB");

        let jwks = key.jwks();
        assert_eq!(jwks["keys"][0]["kid"], "test-kid");
        assert_eq!(jwks["keys"][0]["alg"], "RS256");
    }
}
