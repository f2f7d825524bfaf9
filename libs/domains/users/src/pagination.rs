//! Pagination engine
//!
//! Query strings are coerced leniently: a leading signed integer is read and
//! the rest ignored, so `?page=2abc` means page 2. Missing, non-numeric and
//! zero values fall back to the defaults.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::{UserError, UserResult};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// Raw `page` / `limit` query parameters
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Page number, 1-based (default 1)
    pub page: Option<String>,
    /// Page size (default 10)
    pub limit: Option<String>,
}

/// Query parameters of the search endpoint
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Search term; empty or missing returns every user
    pub q: Option<String>,
    /// Page number, 1-based (default 1)
    pub page: Option<String>,
    /// Page size (default 10)
    pub limit: Option<String>,
}

impl SearchParams {
    pub fn term(&self) -> &str {
        self.q.as_deref().unwrap_or_default()
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page.as_deref(), self.limit.as_deref())
    }
}

/// Skip/limit pair handed to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub skip: u64,
    pub limit: u64,
}

/// Coerced page and limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl From<&PageParams> for Pagination {
    fn from(params: &PageParams) -> Self {
        Self::new(params.page.as_deref(), params.limit.as_deref())
    }
}

impl Pagination {
    pub fn new(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: coerce(page, DEFAULT_PAGE),
            limit: coerce(limit, DEFAULT_LIMIT),
        }
    }

    /// `(page - 1) * limit`, may be negative
    pub fn skip(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Validate the window the store will see
    ///
    /// A negative skip is rejected. A negative limit is used by magnitude.
    pub fn window(&self) -> UserResult<Window> {
        let skip = u64::try_from(self.skip())
            .map_err(|_| UserError::Validation("skip value must be non-negative".to_string()))?;

        Ok(Window {
            skip,
            limit: self.limit.unsigned_abs(),
        })
    }

    /// `ceil(total / |limit|)`
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit.unsigned_abs())
    }
}

/// Read a leading `[+-]?digits` prefix; anything unusable or zero means `default`
fn coerce(raw: Option<&str>, default: i64) -> i64 {
    let Some(raw) = raw else {
        return default;
    };

    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return default;
    }

    let magnitude = rest[..digits].parse::<i64>().unwrap_or(i64::MAX);
    let value = if negative { -magnitude } else { magnitude };

    if value == 0 { default } else { value }
}
