//! Offset/limit window for list queries.

use std::fmt;

/// Default page size when the caller does not supply a limit.
pub const DEFAULT_LIMIT: i64 = 100;
/// Largest page size a caller may request.
pub const MAX_LIMIT: i64 = 100;

/// Validation errors returned by [`Page::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageValidationError {
    NegativeOffset { offset: i64 },
    LimitOutOfRange { limit: i64, max: i64 },
}

impl fmt::Display for PageValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeOffset { offset } => {
                write!(f, "offset must be zero or positive, got {offset}")
            }
            Self::LimitOutOfRange { limit, max } => {
                write!(f, "limit must be between 1 and {max}, got {limit}")
            }
        }
    }
}

impl std::error::Error for PageValidationError {}

/// Validated offset/limit pair. A `Page` in hand is always within bounds, so
/// the repository can apply it to a query verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    offset: i64,
    limit: i64,
}

impl Page {
    /// Validate and construct a window; offset must be non-negative and limit
    /// within `1..=MAX_LIMIT`.
    pub const fn new(offset: i64, limit: i64) -> Result<Self, PageValidationError> {
        if offset < 0 {
            return Err(PageValidationError::NegativeOffset { offset });
        }
        if limit < 1 || limit > MAX_LIMIT {
            return Err(PageValidationError::LimitOutOfRange {
                limit,
                max: MAX_LIMIT,
            });
        }
        Ok(Self { offset, limit })
    }

    /// Number of records to skip.
    pub const fn offset(&self) -> i64 {
        self.offset
    }

    /// Maximum number of records to return.
    pub const fn limit(&self) -> i64 {
        self.limit
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}
