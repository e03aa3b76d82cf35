//! Authentication service
//!
//! Password hashing with Argon2 and user account management.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

use crate::db::DbPool;
use crate::models::{RegisterUserRequest, User, UserRole};
use crate::utils::error::{AppError, AppResult};

const USER_COLUMNS: &str =
    "id, username, email, password_hash, role, phone, created_at";

/// Authentication service for user management
pub struct AuthService {
    pool: DbPool,
}

impl AuthService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Hash a password using Argon2id
    pub fn hash_password(password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Verify a password against a hash
    pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(password_hash)
            .map_err(|e| AppError::Internal(format!("Invalid password hash format: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Authenticate by username or email plus password
    pub async fn authenticate(&self, identifier: &str, password: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE username = ? OR email = ?",
            USER_COLUMNS
        ))
        .bind(identifier)
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        let user = match row {
            Some(row) => row_to_user(&row)?,
            None => return Ok(None),
        };

        if Self::verify_password(password, &user.password_hash)? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    /// Get a user by ID
    pub async fn get_user_by_id(&self, id: &Uuid) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    /// Get a user by username
    pub async fn get_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE username = ?",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    /// Get a user by email
    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_user(&r)).transpose()
    }

    /// Create a new user account
    pub async fn create_user(&self, req: &RegisterUserRequest) -> AppResult<User> {
        if self.get_user_by_username(&req.username).await?.is_some() {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        if self.get_user_by_email(&req.email).await?.is_some() {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let password_hash = Self::hash_password(&req.password)?;
        let user = User::new(
            req.username.clone(),
            req.email.clone(),
            password_hash,
            req.role,
            req.phone.clone(),
        );

        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, role, phone, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.to_string())
        .bind(&user.phone)
        .bind(user.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(user)
    }
}

/// Parse an RFC 3339 timestamp stored as TEXT
pub(crate) fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::Database(format!("Malformed timestamp '{}': {}", value, e)))
}

pub(crate) fn parse_uuid(value: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value).map_err(|e| AppError::Database(format!("Malformed UUID: {}", e)))
}

fn row_to_user(row: &SqliteRow) -> AppResult<User> {
    let role: String = row.get("role");
    let created_at: String = row.get("created_at");
    let id: String = row.get("id");

    Ok(User {
        id: parse_uuid(&id)?,
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role: role
            .parse::<UserRole>()
            .map_err(AppError::Database)?,
        phone: row.get("phone"),
        created_at: parse_timestamp(&created_at)?,
    })
}
