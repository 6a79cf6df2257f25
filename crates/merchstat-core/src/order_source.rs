//! Order source contract and fetch types.
//!
//! An order source returns the normalized batch for one request. When the
//! request carries a window the batch arrives pre-filtered to it upstream;
//! the analytics layer never re-filters by date.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::{DateRange, Order};

/// Fetch parameters for one orders request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrdersRequest {
    pub window: Option<DateRange>,
}

impl OrdersRequest {
    pub const fn unscoped() -> Self {
        Self { window: None }
    }

    pub const fn scoped(window: DateRange) -> Self {
        Self {
            window: Some(window),
        }
    }
}

/// Per-fetch counts of records that degraded during normalization.
///
/// Observability counters, not errors: the batch is always usable. A
/// malformed price or date zeroes that field's contribution; a missing
/// customer reference only hides the order from classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchQuality {
    pub malformed_prices: usize,
    pub malformed_dates: usize,
    pub missing_customers: usize,
}

impl BatchQuality {
    pub const fn is_clean(&self) -> bool {
        self.malformed_prices == 0 && self.malformed_dates == 0 && self.missing_customers == 0
    }
}

/// Normalized batch of orders for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBatch {
    pub orders: Vec<Order>,
    pub quality: BatchQuality,
}

/// Source-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    InvalidRequest,
    Unavailable,
    UpstreamStatus,
    Internal,
}

/// Structured order-source error.
///
/// Fatal to the fetch, unlike per-record damage (see [`BatchQuality`]). An
/// `UpstreamStatus` error carries the upstream HTTP status so callers can
/// surface it in their own error payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    upstream_status: Option<u16>,
    retryable: bool,
}

impl SourceError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            upstream_status: None,
            retryable: false,
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            upstream_status: None,
            retryable: true,
        }
    }

    pub fn upstream(status: u16) -> Self {
        Self {
            kind: SourceErrorKind::UpstreamStatus,
            message: format!("order source returned status {status}"),
            upstream_status: Some(status),
            retryable: status >= 500,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            upstream_status: None,
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn upstream_status(&self) -> Option<u16> {
        self.upstream_status
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::UpstreamStatus => "source.upstream_status",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Order source contract.
///
/// Implementations must be `Send + Sync`; fetching is the only I/O in the
/// system and completes before any analytics run.
pub trait OrderSource: Send + Sync {
    /// Stable identifier used in logs.
    fn id(&self) -> &'static str;

    /// Fetch the normalized batch of orders for `req`.
    fn fetch_orders<'a>(
        &'a self,
        req: OrdersRequest,
    ) -> Pin<Box<dyn Future<Output = Result<OrderBatch, SourceError>> + Send + 'a>>;
}
