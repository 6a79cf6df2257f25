use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::CalendarDate;

/// Opaque upstream order identifier. Carried for logging only; the analytics
/// layer never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(u64);

impl OrderId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the purchasing customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(u64);

impl CustomerId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl Display for CustomerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalized purchase record.
///
/// Field-level parse failures upstream are represented as `None` rather than
/// errors: an order with an unparsable price still counts toward order
/// volume, and an order with an unparsable timestamp still contributes
/// revenue. Orders without a resolvable customer are kept for revenue and
/// volume but are invisible to customer classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer: Option<CustomerId>,
    pub placed_on: Option<CalendarDate>,
    pub total_price: Option<f64>,
}

impl Order {
    pub const fn new(
        id: OrderId,
        customer: Option<CustomerId>,
        placed_on: Option<CalendarDate>,
        total_price: Option<f64>,
    ) -> Self {
        Self {
            id,
            customer,
            placed_on,
            total_price,
        }
    }

    /// Revenue contribution; unparsable prices contribute zero.
    pub fn revenue(&self) -> f64 {
        self.total_price.unwrap_or(0.0)
    }
}

/// Parse a monetary amount from its upstream string representation.
///
/// Returns `None` for anything that is not a finite non-negative decimal;
/// the caller treats that as a zero contribution, never as an error.
pub fn parse_price(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_price() {
        assert_eq!(parse_price("49.99"), Some(49.99));
        assert_eq!(parse_price(" 120 "), Some(120.0));
    }

    #[test]
    fn malformed_price_parses_to_none() {
        assert_eq!(parse_price("not-a-price"), None);
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("NaN"), None);
        assert_eq!(parse_price("-3.50"), None);
    }

    #[test]
    fn missing_price_contributes_zero_revenue() {
        let order = Order::new(OrderId::new(1), None, None, None);
        assert_eq!(order.revenue(), 0.0);
    }
}
