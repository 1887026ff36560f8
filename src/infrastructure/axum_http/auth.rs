use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::config_loader;

#[derive(Debug, Serialize, Deserialize)]
pub struct SupabaseClaims {
    pub sub: String,
    pub role: String,
    pub email: Option<String>,
    pub exp: usize,
}

/// Authenticated caller resolved from a Supabase-issued JWT. Role and tier
/// are intentionally absent; authorization decisions read the users table.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: Option<String>,
}

pub fn validate_supabase_jwt(token: &str, secret: &str) -> anyhow::Result<SupabaseClaims> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.set_audience(&["authenticated", "service_role"]);

    let token_data = decode::<SupabaseClaims>(token, &decoding_key, &validation)
        .map_err(|err| anyhow::anyhow!("JWT validation failed: {}", err))?;

    Ok(token_data.claims)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .ok_or((
                StatusCode::UNAUTHORIZED,
                "Missing Authorization header".to_string(),
            ))?;

        let auth_str = auth_header.to_str().map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header".to_string(),
            )
        })?;

        if !auth_str.starts_with("Bearer ") {
            return Err((
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header format".to_string(),
            ));
        }

        let token = &auth_str[7..];

        let config = config_loader::load().map_err(|err| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to load config: {}", err),
            )
        })?;

        let claims = validate_supabase_jwt(token, &config.supabase.jwt_secret)
            .map_err(|err| (StatusCode::UNAUTHORIZED, err.to_string()))?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                "JWT subject is not a valid user id".to_string(),
            )
        })?;

        Ok(AuthUser {
            user_id,
            email: claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    #[derive(Serialize)]
    struct TestClaims<'a> {
        sub: &'a str,
        role: &'a str,
        aud: &'a str,
        exp: usize,
    }

    fn issue_token(secret: &str, sub: &str, aud: &str) -> String {
        encode(
            &Header::default(),
            &TestClaims {
                sub,
                role: "authenticated",
                aud,
                exp: 4102444800, // 2100-01-01
            },
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn accepts_token_signed_with_shared_secret() {
        let sub = Uuid::new_v4().to_string();
        let token = issue_token("test-secret", &sub, "authenticated");

        let claims = validate_supabase_jwt(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, sub);
        assert_eq!(claims.role, "authenticated");
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = issue_token("wrong-secret", &Uuid::new_v4().to_string(), "authenticated");

        assert!(validate_supabase_jwt(&token, "test-secret").is_err());
    }

    #[test]
    fn rejects_token_with_unexpected_audience() {
        let token = issue_token("test-secret", &Uuid::new_v4().to_string(), "anon");

        assert!(validate_supabase_jwt(&token, "test-secret").is_err());
    }
}
