use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::{
    audit,
    dto::auth::{AuthResponse, Claims, LoginRequest, RegisterRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{PublicUser, User},
    state::AppState,
    validate,
};

/// Issued tokens stay valid for 30 days.
const TOKEN_VALIDITY_DAYS: i64 = 30;

pub fn create_token(user_id: Uuid, secret: &str) -> AppResult<String> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::days(TOKEN_VALIDITY_DAYS))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp() as usize,
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub async fn register_user(state: &AppState, payload: RegisterRequest) -> AppResult<AuthResponse> {
    let RegisterRequest {
        name,
        phone,
        password,
    } = payload;
    validate::validate_registration(&name, &phone, &password)?;

    let exist: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE phone = $1")
        .bind(phone.as_str())
        .fetch_optional(&state.pool)
        .await?;

    if exist.is_some() {
        return Err(AppError::Conflict(
            "Um utilizador com este telefone já existe.".into(),
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();

    let id = Uuid::new_v4();

    let user: User = sqlx::query_as(
        "INSERT INTO users (id, name, phone, password_hash) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(id)
    .bind(name.trim())
    .bind(phone.as_str())
    .bind(password_hash)
    .fetch_one(&state.pool)
    .await?;

    let token = create_token(user.id, &state.config.jwt_secret)?;

    audit::record(
        &state.pool,
        Some(user.id),
        "user_register",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(AuthResponse {
        id: user.id,
        name: user.name,
        phone: user.phone,
        is_admin: user.is_admin,
        loyalty_stamps: user.loyalty_stamps,
        token,
    })
}

pub async fn login_user(state: &AppState, payload: LoginRequest) -> AppResult<AuthResponse> {
    let LoginRequest { phone, password } = payload;
    validate::validate_login(&phone, &password)?;

    let user: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE phone = $1")
        .bind(phone.as_str())
        .fetch_optional(&state.pool)
        .await?;

    let invalid = || AppError::Unauthenticated;
    let user = user.ok_or_else(invalid)?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    let argon2 = Argon2::default();
    if argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(invalid());
    }

    let token = create_token(user.id, &state.config.jwt_secret)?;

    audit::record(
        &state.pool,
        Some(user.id),
        "user_login",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(AuthResponse {
        id: user.id,
        name: user.name,
        phone: user.phone,
        is_admin: user.is_admin,
        loyalty_stamps: user.loyalty_stamps,
        token,
    })
}

pub async fn get_profile(state: &AppState, user: &AuthUser) -> AppResult<PublicUser> {
    let profile: Option<PublicUser> = sqlx::query_as(
        "SELECT id, name, phone, is_admin, loyalty_stamps FROM users WHERE id = $1",
    )
    .bind(user.user_id)
    .fetch_optional(&state.pool)
    .await?;

    profile.ok_or_else(|| AppError::NotFound("Utilizador não encontrado.".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{DecodingKey, Validation, decode};

    #[test]
    fn token_round_trips_with_thirty_day_window() {
        let user_id = Uuid::new_v4();
        let secret = "segredo-de-teste";

        let token = create_token(user_id, secret).unwrap();
        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .unwrap();

        assert_eq!(decoded.claims.sub, user_id.to_string());
        let window = decoded.claims.exp - decoded.claims.iat;
        assert_eq!(window, (TOKEN_VALIDITY_DAYS * 24 * 60 * 60) as usize);
    }

    #[test]
    fn token_fails_verification_with_wrong_secret() {
        let token = create_token(Uuid::new_v4(), "segredo-a").unwrap();
        let result = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"segredo-b"),
            &Validation::default(),
        );
        assert!(result.is_err());
    }
}
