use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_row(row: &PgRow) -> Result<User, UserError> {
        let id: Uuid = row
            .try_get("id")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;
        let email: String = row
            .try_get("email")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;
        let display_name: Option<String> = row
            .try_get("display_name")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;
        let password_hash: String = row
            .try_get("password_hash")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;
        let salt: String = row
            .try_get("salt")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;
        let iterations: i32 = row
            .try_get("iterations")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;
        let created_at = row
            .try_get("created_at")
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(User {
            id: UserId(id),
            email: EmailAddress::new(email)?,
            display_name,
            password_hash,
            salt,
            iterations: iterations as u32,
            created_at,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, display_name, password_hash, salt, iterations, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id.0)
        .bind(user.email.as_str())
        .bind(user.display_name.as_deref())
        .bind(&user.password_hash)
        .bind(&user.salt)
        .bind(user.iterations as i32)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() && db_err.constraint() == Some("users_email_key") {
                    return UserError::EmailAlreadyExists(user.email.as_str().to_string());
                }
            }
            UserError::DatabaseError(e.to_string())
        })?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, display_name, password_hash, salt, iterations, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, display_name, password_hash, salt, iterations, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.as_ref().map(Self::map_row).transpose()
    }
}
