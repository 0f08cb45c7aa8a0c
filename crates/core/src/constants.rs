use std::time::Duration;

/// Page size used when a listing asks for no limit
pub const DEFAULT_QUOTE_LIMIT: i64 = 100;

/// Largest page a listing may return
pub const MAX_QUOTE_LIMIT: i64 = 1000;

/// Maximum author length, in characters, after trimming
pub const MAX_AUTHOR_LEN: usize = 100;

/// Maximum quote text length, in characters, after trimming
pub const MAX_QUOTE_TEXT_LEN: usize = 1000;

// Per-operation storage budgets. The caller's deadline still wins when it is earlier.
pub const CREATE_QUOTE_TIMEOUT: Duration = Duration::from_secs(5);
pub const LIST_QUOTES_TIMEOUT: Duration = Duration::from_secs(10);
pub const COUNT_QUOTES_TIMEOUT: Duration = Duration::from_secs(10);
pub const GET_QUOTE_TIMEOUT: Duration = Duration::from_secs(5);
pub const RANDOM_QUOTE_TIMEOUT: Duration = Duration::from_secs(5);
pub const DELETE_QUOTE_TIMEOUT: Duration = Duration::from_secs(5);
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(3);
