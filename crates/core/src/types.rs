/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Boxed error type used at async trait seams (relation resolution,
/// email delivery) where callers only log the failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
