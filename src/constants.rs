/// Expected database schema version
/// Databases written by another version are refused at startup
pub const EXPECTED_DB_VERSION: &str = "1";

/// Records per page for every paginated listing
pub const PAGE_SIZE: usize = 10;

/// Venues and artists shown on the booking home page
pub const HOME_RECENT_LIMIT: u64 = 10;

/// Quiz category id meaning "pick any category"
pub const ANY_CATEGORY: i64 = 0;

/// Cookie carrying a one-shot flash message between a write and the next page
pub const FLASH_COOKIE: &str = "fyyur_flash";

pub const MIN_DIFFICULTY: i64 = 1;
pub const MAX_DIFFICULTY: i64 = 5;
