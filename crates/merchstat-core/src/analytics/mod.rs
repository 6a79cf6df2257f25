//! Batch analytics over fetched orders.
//!
//! Both components are pure, stateless functions over an in-memory batch:
//! they share nothing and may be evaluated in either order, or concurrently
//! on independent snapshots of the same fetch.

mod customers;
mod summary;

pub use customers::{classify, CustomerBreakdown};
pub use summary::{summarize, OrdersSummary};
