//! Type definitions module with domain-specific sub-modules
//!
//! This module organizes types into logical categories:
//! - `common` - Common types like Coordinate
//! - `pagination` - Cursor pagination for feed endpoints
//! - `response` - API response wrappers and health checks

pub mod common;
pub mod pagination;
pub mod response;

// Re-export commonly used types at module level
pub use common::Coordinate;
pub use pagination::{CursorPage, CursorPagination, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use response::{ApiResponse, HealthResponse, HealthStatus};
