use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::Claims;
use auth::PasswordHash;
use chrono::Utc;

use crate::domain::user::models::AuthenticatedUser;
use crate::domain::user::models::LoginUserCommand;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementing the authentication flow.
///
/// Stateless between calls; the repository handle and authenticator are
/// injected at construction and shared across requests.
pub struct UserService<R>
where
    R: UserRepository,
{
    repository: Arc<R>,
    authenticator: Arc<Authenticator>,
    token_ttl_seconds: i64,
}

impl<R> UserService<R>
where
    R: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Credential hasher + token codec coordinator
    /// * `token_ttl_seconds` - Lifetime of minted tokens
    pub fn new(repository: Arc<R>, authenticator: Arc<Authenticator>, token_ttl_seconds: i64) -> Self {
        Self {
            repository,
            authenticator,
            token_ttl_seconds,
        }
    }

    fn claims_for(user: &User) -> Claims {
        Claims::for_user(user.id, user.email.as_str().to_string())
    }
}

#[async_trait]
impl<R> UserServicePort for UserService<R>
where
    R: UserRepository,
{
    async fn register(
        &self,
        command: RegisterUserCommand,
    ) -> Result<AuthenticatedUser, UserError> {
        // Optimistic existence check; the store's unique constraint settles
        // concurrent registrations for the same email.
        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(UserError::EmailAlreadyExists(
                command.email.as_str().to_string(),
            ));
        }

        let hashed = self.authenticator.hash_password(&command.password)?;

        let user = User {
            id: UserId::new(),
            email: command.email,
            display_name: command.display_name,
            password_hash: hashed.hash,
            salt: hashed.salt,
            iterations: hashed.iterations,
            created_at: Utc::now(),
        };

        let created_user = self.repository.create(user).await?;

        let token = self
            .authenticator
            .issue_token(&Self::claims_for(&created_user), self.token_ttl_seconds)?;

        Ok(AuthenticatedUser {
            user: created_user,
            token,
        })
    }

    async fn login(&self, command: LoginUserCommand) -> Result<AuthenticatedUser, UserError> {
        let user = self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        let stored = PasswordHash {
            salt: user.salt.clone(),
            hash: user.password_hash.clone(),
            iterations: user.iterations,
        };

        let result = self
            .authenticator
            .authenticate(
                &command.password,
                &stored,
                &Self::claims_for(&user),
                self.token_ttl_seconds,
            )
            .map_err(|e| match e {
                auth::AuthenticationError::InvalidCredentials => UserError::InvalidCredentials,
                auth::AuthenticationError::Password(err) => UserError::Password(err),
                auth::AuthenticationError::Token(err) => UserError::Token(err),
            })?;

        Ok(AuthenticatedUser {
            user,
            token: result.access_token,
        })
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use auth::PasswordHasher;
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::EmailAddress;

    const SECRET: &[u8] = b"test-secret-key-for-token-signing-32b";
    const TTL: i64 = 3600;

    // Define mocks in the test module using mockall
    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
        }
    }

    fn service(repository: MockTestUserRepository) -> UserService<MockTestUserRepository> {
        UserService::new(
            Arc::new(repository),
            Arc::new(Authenticator::new(SECRET)),
            TTL,
        )
    }

    fn stored_user(email: &str, password: &str) -> User {
        let hashed = PasswordHasher::new().hash(password).unwrap();
        User {
            id: UserId::new(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            display_name: None,
            password_hash: hashed.hash,
            salt: hashed.salt,
            iterations: hashed.iterations,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .withf(|email| email == "test@example.com")
            .times(1)
            .returning(|_| Ok(None));

        repository
            .expect_create()
            .withf(|user| {
                user.email.as_str() == "test@example.com"
                    && user.password_hash.len() == 64
                    && user.salt.len() == 32
                    && user.iterations == 100_000
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = service(repository);

        let command = RegisterUserCommand {
            email: EmailAddress::new("test@example.com".to_string()).unwrap(),
            password: "password123".to_string(),
            display_name: Some("Test".to_string()),
        };

        let result = service.register(command).await.unwrap();

        assert_eq!(result.user.email.as_str(), "test@example.com");
        assert!(!result.token.is_empty());

        // The minted token identifies the newly created record
        let claims = Authenticator::new(SECRET)
            .validate_token(&result.token)
            .unwrap();
        assert_eq!(claims.sub, Some(result.user.id.to_string()));
        assert_eq!(claims.email(), Some("test@example.com".to_string()));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_precheck() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(stored_user("test@example.com", "password123"))));

        repository.expect_create().times(0);

        let service = service(repository);

        let command = RegisterUserCommand {
            email: EmailAddress::new("test@example.com".to_string()).unwrap(),
            password: "password456".to_string(),
            display_name: None,
        };

        let result = service.register(command).await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::EmailAlreadyExists(_)
        ));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_insert_race() {
        let mut repository = MockTestUserRepository::new();

        // Pre-check passes; a concurrent registration wins the insert.
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        repository.expect_create().times(1).returning(|user| {
            Err(UserError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ))
        });

        let service = service(repository);

        let command = RegisterUserCommand {
            email: EmailAddress::new("test@example.com".to_string()).unwrap(),
            password: "password123".to_string(),
            display_name: None,
        };

        let result = service.register(command).await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::EmailAlreadyExists(_)
        ));
    }

    #[tokio::test]
    async fn test_register_password_too_short() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        repository.expect_create().times(0);

        let service = service(repository);

        let command = RegisterUserCommand {
            email: EmailAddress::new("test@example.com".to_string()).unwrap(),
            password: "short".to_string(),
            display_name: None,
        };

        let result = service.register(command).await;
        assert!(matches!(result.unwrap_err(), UserError::Password(_)));
    }

    #[tokio::test]
    async fn test_login_success() {
        let user = stored_user("test@example.com", "password123");
        let user_id = user.id;

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .withf(|email| email == "test@example.com")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = service(repository);

        let command = LoginUserCommand {
            email: EmailAddress::new("test@example.com".to_string()).unwrap(),
            password: "password123".to_string(),
        };

        let result = service.login(command).await.unwrap();
        assert_eq!(result.user.id, user_id);

        let claims = Authenticator::new(SECRET)
            .validate_token(&result.token)
            .unwrap();
        assert_eq!(claims.sub, Some(user_id.to_string()));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let user = stored_user("test@example.com", "password123");

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = service(repository);

        let command = LoginUserCommand {
            email: EmailAddress::new("test@example.com".to_string()).unwrap(),
            password: "wrong_password".to_string(),
        };

        let result = service.login(command).await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::InvalidCredentials
        ));
    }

    #[tokio::test]
    async fn test_login_unknown_email_same_error_as_wrong_password() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(repository);

        let command = LoginUserCommand {
            email: EmailAddress::new("unknown@example.com".to_string()).unwrap(),
            password: "anything_at_all".to_string(),
        };

        let result = service.login(command).await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::InvalidCredentials
        ));
    }

    #[tokio::test]
    async fn test_get_user_success() {
        let user = stored_user("test@example.com", "password123");
        let user_id = user.id;

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_id()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = service(repository);

        let found = service.get_user(&user_id).await.unwrap();
        assert_eq!(found.id, user_id);
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(repository);

        let result = service.get_user(&UserId::new()).await;
        assert!(matches!(result.unwrap_err(), UserError::NotFound(_)));
    }
}
