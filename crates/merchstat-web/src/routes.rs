//! HTTP handlers for the analytics endpoints.
//!
//! Routes mirror the dashboard contract: `/orders` returns the revenue
//! summary, `/customers_metric` the new-versus-returning split, `/up` a
//! liveness probe. Both metric endpoints accept `start`/`end` ISO dates;
//! the customer metric requires them because classification is meaningless
//! without a reference boundary.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use merchstat_core::{
    classify, summarize, CalendarDate, CustomerBreakdown, DateRange, OrderBatch, OrderSource,
    OrdersRequest, OrdersSummary,
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn OrderSource>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/orders", get(orders_summary))
        .route("/customers_metric", get(customers_metric))
        .route("/up", get(up))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Optional `start`/`end` ISO dates accepted by both metric endpoints.
#[derive(Debug, Deserialize)]
struct RangeQuery {
    start: Option<String>,
    end: Option<String>,
}

impl RangeQuery {
    /// The fetch window; present only when both bounds are supplied.
    fn window(&self) -> Result<Option<DateRange>, ApiError> {
        match (self.start.as_deref(), self.end.as_deref()) {
            (Some(start), Some(end)) => {
                let start = CalendarDate::parse(start)?;
                let end = CalendarDate::parse(end)?;
                Ok(Some(DateRange::new(start, end)?))
            }
            _ => Ok(None),
        }
    }
}

async fn orders_summary(
    State(state): State<AppState>,
    Query(range): Query<RangeQuery>,
) -> Result<Json<OrdersSummary>, ApiError> {
    let request = range
        .window()?
        .map_or_else(OrdersRequest::unscoped, OrdersRequest::scoped);

    let batch = state.source.fetch_orders(request).await?;
    log_batch_quality(state.source.id(), &batch);

    Ok(Json(summarize(&batch.orders)))
}

async fn customers_metric(
    State(state): State<AppState>,
    Query(range): Query<RangeQuery>,
) -> Result<Json<CustomerBreakdown>, ApiError> {
    let window = range.window()?.ok_or(ApiError::MissingRange)?;

    let batch = state
        .source
        .fetch_orders(OrdersRequest::scoped(window))
        .await?;
    log_batch_quality(state.source.id(), &batch);

    Ok(Json(classify(&batch.orders, window.start())))
}

async fn up() -> StatusCode {
    StatusCode::OK
}

fn log_batch_quality(source: &str, batch: &OrderBatch) {
    if !batch.quality.is_clean() {
        tracing::warn!(
            source,
            malformed_prices = batch.quality.malformed_prices,
            malformed_dates = batch.quality.malformed_dates,
            missing_customers = batch.quality.missing_customers,
            "order batch degraded during normalization"
        );
    }
}
