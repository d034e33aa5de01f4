use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;

use super::errors::PasswordError;

/// Iteration count applied to newly created hashes.
///
/// Raising this strengthens future registrations only; existing records keep
/// verifying with the count recorded at hash time.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Minimum accepted password length in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Salt entropy in bytes. Stored hex-encoded (32 characters).
const SALT_SIZE: usize = 16;

/// Derived key size in bytes (SHA-256 output width). Stored hex-encoded.
const KEY_SIZE: usize = 32;

/// Password hashing implementation.
///
/// Derives a 256-bit key with PBKDF2-HMAC-SHA256 over a fresh random salt.
/// The salt and iteration count travel with the hash so verification can
/// reproduce the exact derivation later.
pub struct PasswordHasher;

/// Output of a hash operation. All three fields must be persisted together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    /// Hex-encoded random salt, unique to this hash.
    pub salt: String,
    /// Hex-encoded derived key.
    pub hash: String,
    /// Iteration count used for this derivation.
    pub iterations: u32,
}

impl PasswordHasher {
    /// Create a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password with a fresh salt.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// Salt, derived key, and iteration count (all to be stored)
    ///
    /// # Errors
    /// * `TooShort` - Password is shorter than 6 characters
    pub fn hash(&self, password: &str) -> Result<PasswordHash, PasswordError> {
        let length = password.chars().count();
        if length < MIN_PASSWORD_LENGTH {
            return Err(PasswordError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: length,
            });
        }

        let mut salt_bytes = [0u8; SALT_SIZE];
        OsRng.fill_bytes(&mut salt_bytes);
        let salt = hex::encode(salt_bytes);

        let key = derive_key(password, &salt, DEFAULT_ITERATIONS);

        Ok(PasswordHash {
            salt,
            hash: hex::encode(key),
            iterations: DEFAULT_ITERATIONS,
        })
    }

    /// Verify a password against a stored salt, hash, and iteration count.
    ///
    /// The stored iteration count drives the derivation, not the current
    /// default, so records hashed under an older work factor keep verifying.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to check
    /// * `salt` - Hex salt recorded at hash time
    /// * `expected_hash` - Hex derived key recorded at hash time
    /// * `iterations` - Iteration count recorded at hash time
    ///
    /// # Returns
    /// True if the password matches, false otherwise
    ///
    /// # Errors
    /// * `InvalidEncoding` - Stored hash is not valid hex
    pub fn verify(
        &self,
        password: &str,
        salt: &str,
        expected_hash: &str,
        iterations: u32,
    ) -> Result<bool, PasswordError> {
        let expected =
            hex::decode(expected_hash).map_err(|e| PasswordError::InvalidEncoding(e.to_string()))?;

        let derived = derive_key(password, salt, iterations);

        Ok(constant_time_eq(&derived, &expected))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive a 256-bit key with PBKDF2-HMAC-SHA256.
///
/// The salt is fed to the KDF as the bytes of its hex string, matching the
/// stored representation.
fn derive_key(password: &str, salt: &str, iterations: u32) -> [u8; KEY_SIZE] {
    let mut key = [0u8; KEY_SIZE];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), iterations, &mut key);
    key
}

/// Constant-time byte comparison to prevent timing attacks.
///
/// A length mismatch returns false immediately; length is not secret.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
