use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::AuthenticatedUser;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginUserCommand;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    if body.email.is_empty() || body.password.is_empty() {
        return Err(ApiError::UnprocessableEntity(
            "Email and password are required".to_string(),
        ));
    }

    // A syntactically invalid email cannot name a record; report it the same
    // way as an unknown one so callers cannot probe identities.
    let email = EmailAddress::new(body.email)
        .map_err(|_| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    state
        .user_service
        .login(LoginUserCommand::new(email, body.password))
        .await
        .map_err(ApiError::from)
        .map(|ref authenticated| ApiSuccess::new(StatusCode::OK, authenticated.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
    pub user: UserData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&AuthenticatedUser> for LoginResponseData {
    fn from(authenticated: &AuthenticatedUser) -> Self {
        Self {
            token: authenticated.token.clone(),
            user: UserData {
                id: authenticated.user.id.to_string(),
                email: authenticated.user.email.as_str().to_string(),
                display_name: authenticated.user.display_name.clone(),
                created_at: authenticated.user.created_at,
            },
        }
    }
}
