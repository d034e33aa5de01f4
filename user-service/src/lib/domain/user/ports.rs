use async_trait::async_trait;

use crate::domain::user::models::AuthenticatedUser;
use crate::domain::user::models::LoginUserCommand;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for the authentication flow operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user: hash the password, persist the credential
    /// record, and mint an access token.
    ///
    /// The repository's uniqueness constraint is the authoritative duplicate
    /// guard; the service's existence pre-check is optimistic only, so a
    /// concurrent registration for the same email surfaces
    /// `EmailAlreadyExists` from the insert.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Password` - Password fails the hasher's precondition
    /// * `DatabaseError` - Store operation failed
    async fn register(&self, command: RegisterUserCommand)
        -> Result<AuthenticatedUser, UserError>;

    /// Log an existing user in: verify the password against the stored
    /// credential record and mint an access token.
    ///
    /// An unknown email and a wrong password produce the same
    /// `InvalidCredentials` error, so callers cannot probe which identities
    /// exist.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `DatabaseError` - Store operation failed
    async fn login(&self, command: LoginUserCommand) -> Result<AuthenticatedUser, UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Store operation failed
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;
}

/// Persistence operations for the user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user.
    ///
    /// Must enforce a uniqueness constraint on the normalized email
    /// server-side; a violation maps to `EmailAlreadyExists`.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Store operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by normalized email.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
}
