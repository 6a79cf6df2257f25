use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{CalendarDate, Order};

/// Aggregated revenue and volume statistics for one batch of orders.
///
/// Freshly constructed per call and never mutated afterwards. Serializes to
/// the orders-summary payload shape:
/// `{"total_revenue": n, "orders_by_day": {"YYYY-MM-DD": c}, "average_order_value": n}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdersSummary {
    pub total_revenue: f64,
    pub orders_by_day: BTreeMap<CalendarDate, u64>,
    pub average_order_value: f64,
}

/// Compute revenue totals and the per-day order histogram for a batch.
///
/// Pure function of its input; malformed individual fields degrade rather
/// than fail:
///
/// - an order with an unparsable price contributes zero revenue;
/// - an order with an unparsable timestamp is absent from `orders_by_day`
///   but still counts toward the average's denominator.
///
/// No rounding is applied; presentation rounding is the caller's concern.
pub fn summarize(orders: &[Order]) -> OrdersSummary {
    let total_revenue: f64 = orders.iter().map(Order::revenue).sum();

    let mut orders_by_day: BTreeMap<CalendarDate, u64> = BTreeMap::new();
    for day in orders.iter().filter_map(|order| order.placed_on) {
        *orders_by_day.entry(day).or_insert(0) += 1;
    }

    let average_order_value = if orders.is_empty() {
        0.0
    } else {
        total_revenue / orders.len() as f64
    };

    OrdersSummary {
        total_revenue,
        orders_by_day,
        average_order_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CustomerId, OrderId};

    fn order(id: u64, date: Option<&str>, price: Option<f64>) -> Order {
        Order::new(
            OrderId::new(id),
            Some(CustomerId::new(500 + id)),
            date.map(|raw| CalendarDate::parse(raw).expect("valid test date")),
            price,
        )
    }

    #[test]
    fn empty_batch_summarizes_to_zeroes() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_revenue, 0.0);
        assert!(summary.orders_by_day.is_empty());
        assert_eq!(summary.average_order_value, 0.0);
    }

    #[test]
    fn single_order_summary() {
        let summary = summarize(&[order(1, Some("2024-01-05"), Some(49.99))]);

        assert_eq!(summary.total_revenue, 49.99);
        assert_eq!(summary.average_order_value, 49.99);
        assert_eq!(summary.orders_by_day.len(), 1);
        let day = CalendarDate::parse("2024-01-05").expect("valid date");
        assert_eq!(summary.orders_by_day.get(&day), Some(&1));
    }

    #[test]
    fn groups_orders_by_calendar_day() {
        let summary = summarize(&[
            order(1, Some("2024-01-05"), Some(10.0)),
            order(2, Some("2024-01-05"), Some(20.0)),
            order(3, Some("2024-01-07"), Some(30.0)),
        ]);

        let jan5 = CalendarDate::parse("2024-01-05").expect("valid date");
        let jan7 = CalendarDate::parse("2024-01-07").expect("valid date");
        assert_eq!(summary.orders_by_day.get(&jan5), Some(&2));
        assert_eq!(summary.orders_by_day.get(&jan7), Some(&1));
        assert_eq!(summary.total_revenue, 60.0);
        assert_eq!(summary.average_order_value, 20.0);
    }

    #[test]
    fn unparsable_price_contributes_zero_without_failing() {
        let summary = summarize(&[
            order(1, Some("2024-01-05"), Some(40.0)),
            order(2, Some("2024-01-05"), None),
        ]);

        assert_eq!(summary.total_revenue, 40.0);
        assert_eq!(summary.average_order_value, 20.0);
    }

    #[test]
    fn undated_order_counts_toward_average_but_not_histogram() {
        let summary = summarize(&[
            order(1, Some("2024-01-05"), Some(30.0)),
            order(2, None, Some(10.0)),
        ]);

        assert_eq!(summary.orders_by_day.values().sum::<u64>(), 1);
        assert_eq!(summary.total_revenue, 40.0);
        assert_eq!(summary.average_order_value, 20.0);
    }

    #[test]
    fn repeated_calls_on_same_batch_are_identical() {
        let batch = vec![
            order(1, Some("2024-01-05"), Some(12.5)),
            order(2, Some("2024-01-06"), Some(87.5)),
        ];

        assert_eq!(summarize(&batch), summarize(&batch));
    }

    #[test]
    fn serializes_days_as_iso_keys() {
        let summary = summarize(&[order(1, Some("2024-01-05"), Some(49.99))]);
        let json = serde_json::to_value(&summary).expect("must serialize");
        assert_eq!(json["orders_by_day"]["2024-01-05"], 1);
    }
}
