//! # Merchstat Core
//!
//! Domain types, order-source contract, and sales analytics for merchstat.
//!
//! The crate turns a merchant's raw order history into summary statistics:
//! total revenue, a per-day order histogram, average order value, and a
//! new-versus-returning customer split anchored on a date window. Fetching is
//! the only I/O; the analytics themselves are pure functions over an
//! in-memory batch.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Order-source adapters (Shopify Admin REST) |
//! | [`analytics`] | Batch aggregation and customer classification |
//! | [`domain`] | Domain types (Order, CalendarDate, DateRange) |
//! | [`error`] | Validation errors |
//! | [`http_client`] | HTTP transport seam |
//! | [`order_source`] | Order source trait and fetch types |
//!
//! ## Error Handling
//!
//! Per-record damage (unparsable price or timestamp, missing customer
//! reference) never fails a fetch: it degrades that field's contribution and
//! is tallied in [`BatchQuality`]. Range validation and upstream failures are
//! explicit errors ([`ValidationError`], [`SourceError`]).

pub mod adapters;
pub mod analytics;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod order_source;

// Re-export commonly used types at crate root for convenience

pub use adapters::ShopifyOrderSource;

pub use analytics::{classify, summarize, CustomerBreakdown, OrdersSummary};

pub use domain::{parse_price, CalendarDate, CustomerId, DateRange, Order, OrderId};

pub use error::ValidationError;

pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient,
};

pub use order_source::{
    BatchQuality, OrderBatch, OrderSource, OrdersRequest, SourceError, SourceErrorKind,
};
