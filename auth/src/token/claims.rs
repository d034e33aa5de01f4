use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

/// Token claim set.
///
/// Standard fields plus custom claims via the flattened `extra` map. The
/// codec stamps `iat` and `exp` at encode time; values a caller places there
/// are overwritten.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (user/entity identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Additional custom fields (flattened into the token)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create claims identifying an authenticated user.
    ///
    /// # Arguments
    /// * `user_id` - Unique user identifier (becomes `sub`)
    /// * `email` - User email (stored in `extra.email`)
    pub fn for_user(user_id: impl ToString, email: String) -> Self {
        let mut extra = HashMap::new();
        extra.insert("email".to_string(), serde_json::json!(email));

        Self {
            sub: Some(user_id.to_string()),
            exp: None,
            iat: None,
            extra,
        }
    }

    /// Set subject.
    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    /// Add a custom field.
    pub fn with_extra(mut self, key: impl ToString, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extra.insert(key.to_string(), json_value);
        }
        self
    }

    /// Get email from extra fields (convenience method).
    pub fn email(&self) -> Option<String> {
        self.extra
            .get("email")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_claims() {
        let claims = Claims::new().with_subject("user123");
        assert_eq!(claims.sub, Some("user123".to_string()));
        assert!(claims.exp.is_none());
    }

    #[test]
    fn test_for_user() {
        let claims = Claims::for_user("user123", "alice@example.com".to_string());

        assert_eq!(claims.sub, Some("user123".to_string()));
        assert_eq!(claims.email(), Some("alice@example.com".to_string()));
        assert!(claims.exp.is_none());
        assert!(claims.iat.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let claims = Claims::new()
            .with_subject("user123")
            .with_extra("role", "admin");

        assert_eq!(claims.sub, Some("user123".to_string()));
        assert_eq!(claims.extra.get("role").unwrap().as_str(), Some("admin"));
    }

    #[test]
    fn test_serde_round_trip_keeps_extra() {
        let claims = Claims::for_user("user123", "alice@example.com".to_string());

        let json = serde_json::to_string(&claims).unwrap();
        let parsed: Claims = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, claims);
        assert_eq!(parsed.email(), Some("alice@example.com".to_string()));
    }
}
