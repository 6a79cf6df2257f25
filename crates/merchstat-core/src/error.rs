use thiserror::Error;

use crate::CalendarDate;

/// Validation and contract errors exposed by `merchstat-core`.
///
/// These are fatal to the call that raised them, unlike per-record field
/// failures, which are absorbed during normalization (see
/// [`BatchQuality`](crate::order_source::BatchQuality)).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("date must be an ISO calendar date (YYYY-MM-DD): '{value}'")]
    InvalidDate { value: String },

    #[error("date range start {start} is after end {end}")]
    InvalidDateRange {
        start: CalendarDate,
        end: CalendarDate,
    },
}
