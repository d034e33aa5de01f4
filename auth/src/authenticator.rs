use crate::password::PasswordError;
use crate::password::PasswordHash;
use crate::password::PasswordHasher;
use crate::token::Claims;
use crate::token::TokenCodec;
use crate::token::TokenError;

/// Authentication coordinator combining password verification and token
/// minting.
///
/// Holds the credential hasher and the token codec; callers supply the
/// stored credential material and the claims to embed.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_codec: TokenCodec,
}

/// Result of successful authentication.
pub struct AuthenticationResult {
    /// Signed access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `signing_secret` - Secret key for token signing. Must come from
    ///   configuration; startup is expected to reject an empty one before
    ///   constructing this.
    pub fn new(signing_secret: &[u8]) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_codec: TokenCodec::new(signing_secret),
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `TooShort` - Password is below the minimum length
    pub fn hash_password(&self, password: &str) -> Result<PasswordHash, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials against a stored hash and mint a token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored` - Salt, hash, and iteration count recorded at registration
    /// * `claims` - Claims to embed in the token
    /// * `ttl_seconds` - Token lifetime
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `Password` - Stored hash is unreadable
    /// * `Token` - Token encoding failed
    pub fn authenticate(
        &self,
        password: &str,
        stored: &PasswordHash,
        claims: &Claims,
        ttl_seconds: i64,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let is_valid =
            self.password_hasher
                .verify(password, &stored.salt, &stored.hash, stored.iterations)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.token_codec.encode_with_ttl(claims, ttl_seconds)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Mint a token without password verification.
    ///
    /// Used by registration, where the caller has just created the record.
    ///
    /// # Errors
    /// * `Token` - Token encoding failed
    pub fn issue_token(&self, claims: &Claims, ttl_seconds: i64) -> Result<String, TokenError> {
        self.token_codec.encode_with_ttl(claims, ttl_seconds)
    }

    /// Validate and decode a token.
    ///
    /// # Errors
    /// * `Malformed` / `InvalidSignature` / `Expired` - see [`TokenCodec::decode`]
    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.token_codec.decode(token)
    }
}
