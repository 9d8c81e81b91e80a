pub mod autobots;
pub mod docs;
pub mod error;
pub mod posts;

pub use error::{ApiError, ApiResult};

/// Maximum number of rows any listing endpoint returns
pub const PAGE_LIMIT: i64 = 10;

/// Parse a numeric path id, naming the resource in the error
pub(crate) fn parse_id(raw: &str, resource: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {} ID", resource)))
}
