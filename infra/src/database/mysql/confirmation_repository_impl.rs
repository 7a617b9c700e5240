//! MySQL implementation of the ConfirmationRepository trait.
//!
//! Stores single-use email confirmation tokens. As with refresh tokens,
//! only SHA-256 digests are persisted; the raw token only exists inside
//! the confirmation link that is mailed out.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use tn_core::domain::entities::confirmation::EmailConfirmation;
use tn_core::errors::DomainError;
use tn_core::repositories::ConfirmationRepository;

/// MySQL implementation of ConfirmationRepository
pub struct MySqlConfirmationRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlConfirmationRepository {
    /// Create a new MySQL confirmation repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to EmailConfirmation entity
    fn row_to_confirmation(row: &sqlx::mysql::MySqlRow) -> Result<EmailConfirmation, DomainError> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Database {
            message: format!("Failed to get id: {}", e),
        })?;

        let user_id: String = row.try_get("user_id").map_err(|e| DomainError::Database {
            message: format!("Failed to get user_id: {}", e),
        })?;

        Ok(EmailConfirmation {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Database {
                message: format!("Invalid confirmation UUID: {}", e),
            })?,
            user_id: Uuid::parse_str(&user_id).map_err(|e| DomainError::Database {
                message: format!("Invalid user UUID: {}", e),
            })?,
            token_hash: row
                .try_get("token_hash")
                .map_err(|e| DomainError::Database {
                    message: format!("Failed to get token_hash: {}", e),
                })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Database {
                    message: format!("Failed to get created_at: {}", e),
                })?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| DomainError::Database {
                    message: format!("Failed to get expires_at: {}", e),
                })?,
        })
    }
}

#[async_trait]
impl ConfirmationRepository for MySqlConfirmationRepository {
    async fn save(
        &self,
        confirmation: EmailConfirmation,
    ) -> Result<EmailConfirmation, DomainError> {
        let query = r#"
            INSERT INTO email_confirmations (
                id, user_id, token_hash, created_at, expires_at
            ) VALUES (?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(confirmation.id.to_string())
            .bind(confirmation.user_id.to_string())
            .bind(&confirmation.token_hash)
            .bind(confirmation.created_at)
            .bind(confirmation.expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to save confirmation: {}", e),
            })?;

        Ok(confirmation)
    }

    async fn consume(&self, token_hash: &str) -> Result<Option<EmailConfirmation>, DomainError> {
        let select_query = r#"
            SELECT id, user_id, token_hash, created_at, expires_at
            FROM email_confirmations
            WHERE token_hash = ?
            LIMIT 1
        "#;

        let result = sqlx::query(select_query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to find confirmation: {}", e),
            })?;

        let row = match result {
            Some(row) => row,
            None => return Ok(None),
        };

        let confirmation = Self::row_to_confirmation(&row)?;

        // The DELETE is the claim; losing the race means another request
        // consumed this token first and it must not be honored twice.
        let delete_query = "DELETE FROM email_confirmations WHERE token_hash = ?";

        let deleted = sqlx::query(delete_query)
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to claim confirmation: {}", e),
            })?;

        if deleted.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(confirmation))
    }

    async fn delete_for_user(&self, user_id: Uuid) -> Result<u64, DomainError> {
        let query = "DELETE FROM email_confirmations WHERE user_id = ?";

        let result = sqlx::query(query)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to delete user confirmations: {}", e),
            })?;

        Ok(result.rows_affected())
    }

    async fn delete_expired(&self) -> Result<u64, DomainError> {
        let query = "DELETE FROM email_confirmations WHERE expires_at < ?";

        let result = sqlx::query(query)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to delete expired confirmations: {}", e),
            })?;

        Ok(result.rows_affected())
    }
}
