//! Authentication service for login and token management

use bcrypt::verify;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::db::{QueryExecutor, SqlParam};
use crate::error::{AppError, AppResult};
use shared::models::{LoginUser, RoleAssignment};
use shared::permissions::permissions_for_roles;

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: QueryExecutor,
    jwt_secret: String,
    token_expiry: i64,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

/// Successful login payload
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: LoginUser,
    pub token: String,
}

/// Profile row as stored
#[derive(Debug, sqlx::FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub password_hash: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct UserRoleRow {
    id: Uuid,
    user_id: Uuid,
    role: String,
    created_at: DateTime<Utc>,
}

impl From<UserRoleRow> for RoleAssignment {
    fn from(row: UserRoleRow) -> Self {
        RoleAssignment {
            id: row.id,
            user_id: row.user_id,
            role: row.role,
            created_at: row.created_at,
        }
    }
}

impl AuthService {
    pub fn new(db: QueryExecutor, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            token_expiry: config.jwt.expiry_secs,
        }
    }

    /// Authenticate a user with email and password.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResponse> {
        let profile = self
            .db
            .fetch_optional::<ProfileRow>(
                r#"
                SELECT id, email, full_name, phone, password_hash
                FROM profiles
                WHERE email = $1
                "#,
                &[SqlParam::from(email)],
            )
            .await?;

        let profile = authenticate(profile, password).map_err(|e| {
            tracing::info!(email, "Login rejected");
            e
        })?;

        let roles: Vec<RoleAssignment> = self
            .db
            .fetch_all::<UserRoleRow>(
                "SELECT id, user_id, role, created_at FROM user_roles WHERE user_id = $1 ORDER BY created_at",
                &[SqlParam::from(profile.id)],
            )
            .await?
            .into_iter()
            .map(RoleAssignment::from)
            .collect();

        let role_names: Vec<String> = roles.iter().map(|r| r.role.clone()).collect();
        let token = self.issue_token(profile.id, &role_names)?;

        tracing::info!(user_id = %profile.id, roles = role_names.len(), "User logged in");

        Ok(LoginResponse {
            user: LoginUser {
                id: profile.id,
                email: profile.email,
                full_name: profile.full_name,
                phone: profile.phone,
                roles,
            },
            token,
        })
    }

    /// Sign a token carrying the user's roles and flattened permissions
    pub fn issue_token(&self, user_id: Uuid, roles: &[String]) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            roles: roles.to_vec(),
            permissions: permissions_for_roles(roles),
            exp: (now + Duration::seconds(self.token_expiry)).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
    }

    /// Validate a token and return its claims
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        decode_token(token, &self.jwt_secret)
    }
}

/// Accept the looked-up profile only when the password verifies.
///
/// An unknown email and a wrong password fail the same way.
pub fn authenticate(profile: Option<ProfileRow>, password: &str) -> AppResult<ProfileRow> {
    let profile = profile.ok_or(AppError::InvalidCredentials)?;
    if password_matches(password, profile.password_hash.as_deref())? {
        Ok(profile)
    } else {
        Err(AppError::InvalidCredentials)
    }
}

/// A profile without a stored hash can never log in
fn password_matches(password: &str, hash: Option<&str>) -> AppResult<bool> {
    match hash {
        Some(hash) if !hash.is_empty() => verify(password, hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e))),
        _ => Ok(false),
    }
}

/// Decode and validate a HS256 token
pub fn decode_token(token: &str, secret: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}
