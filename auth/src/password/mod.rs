pub mod errors;
pub mod pbkdf2;

pub use errors::PasswordError;
pub use pbkdf2::PasswordHash;
pub use pbkdf2::PasswordHasher;
pub use pbkdf2::MIN_PASSWORD_LENGTH;
