//! Authentication utilities library
//!
//! Provides the credential core for the user service:
//! - Password hashing (PBKDF2-HMAC-SHA256, per-record salt and work factor)
//! - Signed token encoding and validation (HMAC-SHA256)
//! - Authentication coordination
//!
//! The two leaf modules are pure computations with no I/O; persistence of
//! credential records belongs to the calling service.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let stored = hasher.hash("my_password").unwrap();
//! let is_valid = hasher
//!     .verify("my_password", &stored.salt, &stored.hash, stored.iterations)
//!     .unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{Claims, TokenCodec};
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!");
//! let claims = Claims::new().with_subject("user123");
//! let token = codec.encode(&claims).unwrap();
//! let decoded = codec.decode(&token).unwrap();
//! assert_eq!(decoded.sub, Some("user123".to_string()));
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, Claims};
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! // Register: hash password
//! let stored = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and mint token
//! let claims = Claims::for_user("user123", "alice@example.com".to_string());
//! let result = auth.authenticate("password123", &stored, &claims, 3600).unwrap();
//!
//! // Validate token
//! let decoded = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(decoded.sub, Some("user123".to_string()));
//! ```

pub mod authenticator;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use password::PasswordError;
pub use password::PasswordHash;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::TokenCodec;
pub use token::TokenError;
