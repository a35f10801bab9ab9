use serde::Deserialize;
use serde_json::json;

use crate::error::{ApiError, FieldViolation};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Optional `page`/`size` query parameters on list endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// A contiguous `[offset, offset + size)` slice of an ordered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: i64,
    pub size: i64,
}

impl Window {
    /// `offset = (page - 1) * size`. Callers must have checked the bounds.
    pub fn new(page: i64, size: i64) -> Self {
        Self {
            offset: (page - 1) * size,
            size,
        }
    }
}

impl PageQuery {
    /// Resolve the query into a window. No parameters at all means the
    /// caller wants the full, unpaginated collection. Bounds: `page >= 1`,
    /// `1 <= size <= 100`; every violated bound is reported.
    pub fn window(&self) -> Result<Option<Window>, ApiError> {
        if self.page.is_none() && self.size.is_none() {
            return Ok(None);
        }

        let page = self.page.unwrap_or(1);
        let size = self.size.unwrap_or(DEFAULT_PAGE_SIZE);

        let mut violations = Vec::new();
        if page < 1 {
            violations.push(FieldViolation {
                field: "page".to_string(),
                constraint: "range".to_string(),
                value: Some(json!(page)),
                message: "page must be 1 or greater".to_string(),
            });
        }
        if !(1..=MAX_PAGE_SIZE).contains(&size) {
            violations.push(FieldViolation {
                field: "size".to_string(),
                constraint: "range".to_string(),
                value: Some(json!(size)),
                message: format!("size must be between 1 and {}", MAX_PAGE_SIZE),
            });
        }
        if !violations.is_empty() {
            return Err(ApiError::validation("Invalid pagination parameters", violations));
        }

        Ok(Some(Window::new(page, size)))
    }
}
