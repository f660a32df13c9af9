//! MySQL implementation of the TokenRepository trait.
//!
//! Refresh-token rows are addressed by the SHA-256 digest computed in the
//! session layer; raw token values never reach this module. The two
//! consistency-critical operations run inside transactions:
//! `replace_user_token` (delete-then-insert for the single-session
//! invariant) and `take_refresh_token` (select-for-update-then-delete so
//! each row is handed to at most one caller).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use ag_core::domain::entities::token::RefreshToken;
use ag_core::errors::DomainError;
use ag_core::repositories::TokenRepository;

/// MySQL implementation of TokenRepository
pub struct MySqlTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    /// Create a new MySQL token repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a RefreshToken entity
    fn row_to_token(row: &sqlx::mysql::MySqlRow) -> Result<RefreshToken, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| internal(format!("Failed to get id: {}", e)))?;
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| internal(format!("Failed to get user_id: {}", e)))?;

        Ok(RefreshToken {
            id: Uuid::parse_str(&id)
                .map_err(|e| internal(format!("Invalid token UUID: {}", e)))?,
            user_id: Uuid::parse_str(&user_id)
                .map_err(|e| internal(format!("Invalid user UUID: {}", e)))?,
            token_hash: row
                .try_get("token_hash")
                .map_err(|e| internal(format!("Failed to get token_hash: {}", e)))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| internal(format!("Failed to get expires_at: {}", e)))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| internal(format!("Failed to get created_at: {}", e)))?,
        })
    }
}

const SELECT_COLUMNS: &str = "id, user_id, token_hash, expires_at, created_at";

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    async fn replace_user_token(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| internal(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ?")
            .bind(token.user_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| internal(format!("Failed to delete superseded tokens: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (id, user_id, token_hash, expires_at, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(token.id.to_string())
        .bind(token.user_id.to_string())
        .bind(&token.token_hash)
        .bind(token.expires_at)
        .bind(token.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| internal(format!("Failed to save refresh token: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| internal(format!("Failed to commit token replacement: {}", e)))?;

        Ok(token)
    }

    async fn find_refresh_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, DomainError> {
        let query = format!(
            "SELECT {} FROM refresh_tokens WHERE token_hash = ? LIMIT 1",
            SELECT_COLUMNS
        );

        let result = sqlx::query(&query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| internal(format!("Failed to find refresh token: {}", e)))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_token(&row)?)),
            None => Ok(None),
        }
    }

    async fn take_refresh_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| internal(format!("Failed to begin transaction: {}", e)))?;

        // The row lock serializes concurrent takers of the same value;
        // whoever loses the race sees no row after the winner's delete
        // commits.
        let query = format!(
            "SELECT {} FROM refresh_tokens WHERE token_hash = ? FOR UPDATE",
            SELECT_COLUMNS
        );
        let result = sqlx::query(&query)
            .bind(token_hash)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| internal(format!("Failed to look up refresh token: {}", e)))?;

        let Some(row) = result else {
            tx.rollback()
                .await
                .map_err(|e| internal(format!("Failed to release lookup: {}", e)))?;
            return Ok(None);
        };
        let token = Self::row_to_token(&row)?;

        sqlx::query("DELETE FROM refresh_tokens WHERE token_hash = ?")
            .bind(token_hash)
            .execute(&mut *tx)
            .await
            .map_err(|e| internal(format!("Failed to consume refresh token: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| internal(format!("Failed to commit token consumption: {}", e)))?;

        Ok(Some(token))
    }

    async fn find_user_tokens(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, DomainError> {
        let query = format!(
            "SELECT {} FROM refresh_tokens WHERE user_id = ? ORDER BY created_at DESC",
            SELECT_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| internal(format!("Failed to find user tokens: {}", e)))?;

        rows.iter().map(Self::row_to_token).collect()
    }

    async fn delete_user_tokens(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ?")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| internal(format!("Failed to delete user tokens: {}", e)))?;

        Ok(result.rows_affected() as usize)
    }

    async fn delete_expired_tokens(&self) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < ?")
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| internal(format!("Failed to delete expired tokens: {}", e)))?;

        Ok(result.rows_affected() as usize)
    }
}

fn internal(message: String) -> DomainError {
    DomainError::Internal { message }
}
