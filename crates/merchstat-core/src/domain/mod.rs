//! Canonical domain types for merchant order data.
//!
//! All types validate at construction; field-level upstream damage is
//! carried as `Option` fields on [`Order`] rather than surfaced as errors.

mod date;
mod order;

pub use date::{CalendarDate, DateRange};
pub use order::{parse_price, CustomerId, Order, OrderId};
