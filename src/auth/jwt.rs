use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use secrecy::ExposeSecret;

use crate::config::jwt::JwtSettings;
use crate::middleware::auth::Claims;
use crate::models::user::User;

/// Signed HS256 token for `user` and the instant it expires.
pub fn generate_token(
    user: &User,
    jwt_settings: &JwtSettings,
) -> Result<(String, DateTime<Utc>), jsonwebtoken::errors::Error> {
    let expires_at = Utc::now() + Duration::hours(jwt_settings.expiration_hours);

    let claims = Claims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        role: user.role,
        exp: expires_at.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_settings.secret.expose_secret().as_bytes()),
    )?;
    Ok((token, expires_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;
    use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
    use uuid::Uuid;

    #[test]
    fn test_token_carries_role_and_subject() {
        let settings = JwtSettings::new("unit-test-secret".to_string(), 2);
        let user = User {
            id: Uuid::new_v4(),
            username: "referee".to_string(),
            password_hash: String::new(),
            role: UserRole::Admin,
            created_at: Utc::now(),
        };

        let (token, expires_at) = generate_token(&user, &settings).unwrap();
        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"unit-test-secret"),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap()
        .claims;

        assert_eq!(decoded.user_id(), Some(user.id));
        assert_eq!(decoded.role, UserRole::Admin);
        assert_eq!(decoded.exp, expires_at.timestamp() as usize);
    }
}
