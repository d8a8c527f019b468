use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::rngs::OsRng;
use rsa::{
    traits::{PrivateKeyParts, PublicKeyParts},
    BigUint, Oaep, RsaPrivateKey, RsaPublicKey,
};
use serde::Serialize;
use sha2::Sha256;
use thiserror::Error;

/// Default RSA modulus length in bits.
pub const DEFAULT_KEY_BITS: usize = 4096;

// ---------------------------------------------------------------------------
// CryptoError
// ---------------------------------------------------------------------------

/// Any crypto failure is fatal for the whole run; callers propagate it
/// before writing any output.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("RSA key generation failed: {0}")]
    Generate(#[source] rsa::Error),
    #[error("RSA-OAEP encryption failed: {0}")]
    Encrypt(#[source] rsa::Error),
}

// ---------------------------------------------------------------------------
// Jwk
// ---------------------------------------------------------------------------

/// A private RSA key in JSON Web Key form, the shape WebCrypto's
/// `importKey('jwk', ...)` expects at runtime inside the artifact.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Jwk {
    pub kty: &'static str,
    pub n: String,
    pub e: String,
    pub d: String,
    pub p: String,
    pub q: String,
    pub dp: String,
    pub dq: String,
    pub qi: String,
    pub alg: &'static str,
    pub ext: bool,
    pub key_ops: [&'static str; 1],
}

impl Jwk {
    fn from_private_key(key: &RsaPrivateKey) -> Self {
        fn b64(value: &BigUint) -> String {
            URL_SAFE_NO_PAD.encode(value.to_bytes_be())
        }

        let primes = key.primes();
        let (p, q) = (&primes[0], &primes[1]);
        let one = BigUint::from(1u32);
        let two = BigUint::from(2u32);
        let dp = key.d() % (p - &one);
        let dq = key.d() % (q - &one);
        // p is prime, so q^(p-2) is the inverse of q modulo p.
        let qi = q.modpow(&(p - &two), p);

        Self {
            kty: "RSA",
            n: b64(key.n()),
            e: b64(key.e()),
            d: b64(key.d()),
            p: b64(p),
            q: b64(q),
            dp: b64(&dp),
            dq: b64(&dq),
            qi: b64(&qi),
            alg: "RSA-OAEP-256",
            ext: true,
            key_ops: ["decrypt"],
        }
    }
}

// ---------------------------------------------------------------------------
// EncodedSecret
// ---------------------------------------------------------------------------

/// A literal's encrypted-at-rest form plus the key material the runtime
/// bootstrap needs to decode it. The public key is gone by the time this
/// value exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedSecret {
    pub jwk: Jwk,
    pub cipher: Vec<u8>,
}

// ---------------------------------------------------------------------------
// SecretFactory
// ---------------------------------------------------------------------------

/// Yields one fresh keypair per encoded literal. No pooling, no reuse:
/// bulk pattern-matching across substitutes gains nothing.
#[derive(Debug, Clone, Copy)]
pub struct SecretFactory {
    modulus_bits: usize,
}

impl Default for SecretFactory {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_BITS)
    }
}

impl SecretFactory {
    pub fn new(modulus_bits: usize) -> Self {
        Self { modulus_bits }
    }

    /// Encrypts the UTF-8 bytes of `value` under a fresh keypair and
    /// exports the private half as a JWK.
    pub fn encode(&self, value: &str) -> Result<EncodedSecret, CryptoError> {
        self.encode_inner(value).map(|(secret, _)| secret)
    }

    fn encode_inner(&self, value: &str) -> Result<(EncodedSecret, RsaPrivateKey), CryptoError> {
        let mut rng = OsRng;
        let private = RsaPrivateKey::new(&mut rng, self.modulus_bits).map_err(CryptoError::Generate)?;
        let public = RsaPublicKey::from(&private);
        let cipher = public
            .encrypt(&mut rng, Oaep::new::<Sha256>(), value.as_bytes())
            .map_err(CryptoError::Encrypt)?;
        let jwk = Jwk::from_private_key(&private);
        Ok((EncodedSecret { jwk, cipher }, private))
    }
}
