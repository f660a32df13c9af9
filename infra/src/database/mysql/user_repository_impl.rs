//! MySQL implementation of the UserRepository trait.
//!
//! Users span two tables: `users` for the account row and `user_roles`
//! for the role set. Account creation inserts both inside a transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use std::collections::HashSet;
use uuid::Uuid;

use ag_core::domain::entities::user::User;
use ag_core::errors::{AuthError, DomainError};
use ag_core::repositories::UserRepository;

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn load_roles(&self, user_id: &str) -> Result<HashSet<String>, DomainError> {
        let rows = sqlx::query("SELECT role FROM user_roles WHERE user_id = ?")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| internal(format!("Failed to load user roles: {}", e)))?;

        rows.iter()
            .map(|row| {
                row.try_get::<String, _>("role")
                    .map_err(|e| internal(format!("Failed to get role: {}", e)))
            })
            .collect()
    }

    async fn fetch_user(
        &self,
        row: Option<sqlx::mysql::MySqlRow>,
    ) -> Result<Option<User>, DomainError> {
        let Some(row) = row else {
            return Ok(None);
        };

        let id: String = row
            .try_get("id")
            .map_err(|e| internal(format!("Failed to get id: {}", e)))?;
        let roles = self.load_roles(&id).await?;

        Ok(Some(User {
            id: Uuid::parse_str(&id)
                .map_err(|e| internal(format!("Invalid user UUID: {}", e)))?,
            email: row
                .try_get("email")
                .map_err(|e| internal(format!("Failed to get email: {}", e)))?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| internal(format!("Failed to get password_hash: {}", e)))?,
            roles,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| internal(format!("Failed to get created_at: {}", e)))?,
        }))
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = ? LIMIT 1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| internal(format!("Failed to find user by email: {}", e)))?;

        self.fetch_user(row).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, created_at FROM users WHERE id = ? LIMIT 1",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| internal(format!("Failed to find user by id: {}", e)))?;

        self.fetch_user(row).await
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) AS user_count FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| internal(format!("Failed to check email existence: {}", e)))?;

        let count: i64 = row
            .try_get("user_count")
            .map_err(|e| internal(format!("Failed to get count: {}", e)))?;

        Ok(count > 0)
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| internal(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query(
            "INSERT INTO users (id, email, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                DomainError::Auth(AuthError::UserAlreadyExists)
            }
            _ => internal(format!("Failed to create user: {}", e)),
        })?;

        for role in &user.roles {
            sqlx::query("INSERT INTO user_roles (user_id, role) VALUES (?, ?)")
                .bind(user.id.to_string())
                .bind(role)
                .execute(&mut *tx)
                .await
                .map_err(|e| internal(format!("Failed to assign role: {}", e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| internal(format!("Failed to commit user creation: {}", e)))?;

        Ok(user)
    }
}

fn internal(message: String) -> DomainError {
    DomainError::Internal { message }
}
