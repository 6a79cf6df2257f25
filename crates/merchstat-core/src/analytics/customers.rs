use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{CalendarDate, CustomerId, Order};

/// New-versus-returning split of the customers seen in one batch.
///
/// Serializes to the customer-metric payload shape:
/// `{"new_customers": n, "returning_customers": n}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerBreakdown {
    pub new_customers: u64,
    pub returning_customers: u64,
}

/// Partition the batch's customers relative to the window's start date.
///
/// A customer's "first order" is approximated by their earliest dated order
/// within the supplied batch; the classifier has no visibility into history
/// outside the batch, so the result depends on how much history the batch
/// contains. An earliest date strictly before `range_start` classifies the
/// customer as returning; otherwise the customer is new. An order dated
/// exactly at `range_start` is therefore always new.
///
/// Orders without a resolvable customer are excluded entirely: they count
/// toward neither bucket. Customers whose orders all lack a parsable date
/// are likewise excluded, since no earliest date exists for them.
pub fn classify(orders: &[Order], range_start: CalendarDate) -> CustomerBreakdown {
    let mut earliest: HashMap<CustomerId, CalendarDate> = HashMap::new();
    for order in orders {
        let (customer, day) = match (order.customer, order.placed_on) {
            (Some(customer), Some(day)) => (customer, day),
            _ => continue,
        };

        earliest
            .entry(customer)
            .and_modify(|current| {
                if day < *current {
                    *current = day;
                }
            })
            .or_insert(day);
    }

    let mut breakdown = CustomerBreakdown::default();
    for first_order in earliest.values() {
        if *first_order < range_start {
            breakdown.returning_customers += 1;
        } else {
            breakdown.new_customers += 1;
        }
    }
    breakdown
}
