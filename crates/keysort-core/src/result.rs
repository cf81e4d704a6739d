//! Result type alias for keysort operations

use crate::error::KeysortError;

/// Standard Result type for keysort operations
pub type Result<T> = std::result::Result<T, KeysortError>;
