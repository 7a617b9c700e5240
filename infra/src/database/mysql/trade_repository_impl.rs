//! MySQL implementation of the TradeRequestRepository trait.
//!
//! Trade requests are stored with their status as a lowercase string
//! (`pending`, `accepted`, `declined`, `cancelled`). State transitions are
//! enforced in the core layer; this layer only persists them.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use tn_core::domain::entities::trade::{TradeRequest, TradeStatus};
use tn_core::errors::DomainError;
use tn_core::repositories::TradeRequestRepository;

const TRADE_COLUMNS: &str =
    "id, post_id, sender_id, receiver_id, offered_post_id, message, status, created_at, updated_at";

/// MySQL implementation of TradeRequestRepository
pub struct MySqlTradeRequestRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlTradeRequestRepository {
    /// Create a new MySQL trade request repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to TradeRequest entity
    fn row_to_request(row: &sqlx::mysql::MySqlRow) -> Result<TradeRequest, DomainError> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Database {
            message: format!("Failed to get id: {}", e),
        })?;

        let post_id: String = row.try_get("post_id").map_err(|e| DomainError::Database {
            message: format!("Failed to get post_id: {}", e),
        })?;

        let sender_id: String = row.try_get("sender_id").map_err(|e| DomainError::Database {
            message: format!("Failed to get sender_id: {}", e),
        })?;

        let receiver_id: String = row
            .try_get("receiver_id")
            .map_err(|e| DomainError::Database {
                message: format!("Failed to get receiver_id: {}", e),
            })?;

        let offered_post_id: Option<String> =
            row.try_get("offered_post_id")
                .map_err(|e| DomainError::Database {
                    message: format!("Failed to get offered_post_id: {}", e),
                })?;

        let status: String = row.try_get("status").map_err(|e| DomainError::Database {
            message: format!("Failed to get status: {}", e),
        })?;

        Ok(TradeRequest {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Database {
                message: format!("Invalid request UUID: {}", e),
            })?,
            post_id: Uuid::parse_str(&post_id).map_err(|e| DomainError::Database {
                message: format!("Invalid post UUID: {}", e),
            })?,
            sender_id: Uuid::parse_str(&sender_id).map_err(|e| DomainError::Database {
                message: format!("Invalid sender UUID: {}", e),
            })?,
            receiver_id: Uuid::parse_str(&receiver_id).map_err(|e| DomainError::Database {
                message: format!("Invalid receiver UUID: {}", e),
            })?,
            offered_post_id: offered_post_id
                .map(|value| {
                    Uuid::parse_str(&value).map_err(|e| DomainError::Database {
                        message: format!("Invalid offered post UUID: {}", e),
                    })
                })
                .transpose()?,
            message: row.try_get("message").map_err(|e| DomainError::Database {
                message: format!("Failed to get message: {}", e),
            })?,
            status: TradeStatus::from_str(&status).map_err(|e| DomainError::Database {
                message: format!("Invalid trade status: {}", e),
            })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Database {
                    message: format!("Failed to get created_at: {}", e),
                })?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| DomainError::Database {
                    message: format!("Failed to get updated_at: {}", e),
                })?,
        })
    }
}

#[async_trait]
impl TradeRequestRepository for MySqlTradeRequestRepository {
    async fn create(&self, request: TradeRequest) -> Result<TradeRequest, DomainError> {
        let query = r#"
            INSERT INTO trade_requests (
                id, post_id, sender_id, receiver_id,
                offered_post_id, message, status,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(request.id.to_string())
            .bind(request.post_id.to_string())
            .bind(request.sender_id.to_string())
            .bind(request.receiver_id.to_string())
            .bind(request.offered_post_id.map(|id| id.to_string()))
            .bind(&request.message)
            .bind(request.status.as_str())
            .bind(request.created_at)
            .bind(request.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to create trade request: {}", e),
            })?;

        Ok(request)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TradeRequest>, DomainError> {
        let query = format!(
            "SELECT {} FROM trade_requests WHERE id = ? LIMIT 1",
            TRADE_COLUMNS
        );

        let result = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Database query failed: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_request(&row)?)),
            None => Ok(None),
        }
    }

    async fn list_sent(&self, sender_id: Uuid) -> Result<Vec<TradeRequest>, DomainError> {
        let query = format!(
            r#"
            SELECT {}
            FROM trade_requests
            WHERE sender_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
            TRADE_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(sender_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to list sent requests: {}", e),
            })?;

        let mut requests = Vec::with_capacity(rows.len());
        for row in rows {
            requests.push(Self::row_to_request(&row)?);
        }

        Ok(requests)
    }

    async fn list_received(&self, receiver_id: Uuid) -> Result<Vec<TradeRequest>, DomainError> {
        let query = format!(
            r#"
            SELECT {}
            FROM trade_requests
            WHERE receiver_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
            TRADE_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(receiver_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to list received requests: {}", e),
            })?;

        let mut requests = Vec::with_capacity(rows.len());
        for row in rows {
            requests.push(Self::row_to_request(&row)?);
        }

        Ok(requests)
    }

    async fn pending_exists(&self, post_id: Uuid, sender_id: Uuid) -> Result<bool, DomainError> {
        let query = r#"
            SELECT EXISTS(
                SELECT 1 FROM trade_requests
                WHERE post_id = ? AND sender_id = ? AND status = 'pending'
            ) as request_exists
        "#;

        let result = sqlx::query(query)
            .bind(post_id.to_string())
            .bind(sender_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to check pending request: {}", e),
            })?;

        let exists: i8 = result
            .try_get("request_exists")
            .map_err(|e| DomainError::Database {
                message: format!("Failed to get existence result: {}", e),
            })?;

        Ok(exists == 1)
    }

    async fn update_status(&self, id: Uuid, status: TradeStatus) -> Result<bool, DomainError> {
        let query = r#"
            UPDATE trade_requests
            SET status = ?, updated_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(status.as_str())
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database {
                message: format!("Failed to update request status: {}", e),
            })?;

        Ok(result.rows_affected() > 0)
    }
}
