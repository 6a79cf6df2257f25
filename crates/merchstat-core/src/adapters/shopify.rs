use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use time::Duration;

use crate::domain::parse_price;
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, NoopHttpClient};
use crate::order_source::{BatchQuality, OrderBatch, OrderSource, OrdersRequest, SourceError};
use crate::{CalendarDate, CustomerId, Order, OrderId};

const API_VERSION: &str = "2023-01";
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Shopify Admin REST adapter supporting both real API calls and mock mode.
///
/// Mock mode serves deterministic seeded orders so the rest of the system can
/// run offline; it still drives the transport so tests observe URL shape and
/// auth headers.
#[derive(Clone)]
pub struct ShopifyOrderSource {
    http_client: Arc<dyn HttpClient>,
    shop_domain: String,
    access_token: String,
    use_real_api: bool,
}

impl Default for ShopifyOrderSource {
    fn default() -> Self {
        Self {
            http_client: Arc::new(NoopHttpClient),
            shop_domain: std::env::var("MERCHSTAT_SHOP_DOMAIN")
                .unwrap_or_else(|_| String::from("demo-store.myshopify.com")),
            access_token: std::env::var("MERCHSTAT_ACCESS_TOKEN")
                .unwrap_or_else(|_| String::from("demo")),
            use_real_api: false,
        }
    }
}

impl ShopifyOrderSource {
    pub fn with_http_client(
        http_client: Arc<dyn HttpClient>,
        shop_domain: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        let is_real = !http_client.is_mock();
        Self {
            http_client,
            shop_domain: shop_domain.into(),
            access_token: access_token.into(),
            use_real_api: is_real,
        }
    }

    fn is_real_client(&self) -> bool {
        self.use_real_api
    }

    /// Orders endpoint with `status=any` and, when a window is supplied,
    /// `created_at` bounds at the day boundaries.
    fn orders_url(&self, req: &OrdersRequest) -> String {
        let mut url = format!(
            "https://{}/admin/api/{API_VERSION}/orders.json?status=any",
            self.shop_domain
        );
        if let Some(window) = req.window {
            url.push_str(&format!(
                "&created_at_min={}T00:00:00Z&created_at_max={}T23:59:59Z",
                window.start(),
                window.end()
            ));
        }
        url
    }

    async fn execute_fetch(&self, req: &OrdersRequest) -> Result<String, SourceError> {
        let request = HttpRequest::get(self.orders_url(req))
            .with_auth(&HttpAuth::Header {
                name: String::from(ACCESS_TOKEN_HEADER),
                value: self.access_token.clone(),
            })
            .with_header("content-type", "application/json");

        let response = self.http_client.execute(request).await.map_err(|error| {
            SourceError::unavailable(format!("shopify transport error: {}", error.message()))
        })?;

        if !response.is_success() {
            return Err(SourceError::upstream(response.status));
        }

        Ok(response.body)
    }

    async fn fetch_real_orders(&self, req: &OrdersRequest) -> Result<OrderBatch, SourceError> {
        let body = self.execute_fetch(req).await?;

        let payload: ShopifyOrdersResponse = serde_json::from_str(&body).map_err(|error| {
            SourceError::internal(format!("failed to decode shopify orders: {error}"))
        })?;

        Ok(normalize_orders(payload.orders))
    }

    async fn fetch_mock_orders(&self, req: &OrdersRequest) -> Result<OrderBatch, SourceError> {
        self.execute_fetch(req).await?;

        let seed = domain_seed(&self.shop_domain);
        let (span_days, last_day) = match req.window {
            Some(window) => {
                let days =
                    (window.end().into_inner() - window.start().into_inner()).whole_days() + 1;
                (days.clamp(1, 31) as u64, window.end())
            }
            None => (7, CalendarDate::today_utc()),
        };

        let mut orders = Vec::with_capacity((span_days * 2) as usize);
        for index in 0..span_days * 2 {
            let day_offset = (seed + index * 3) % span_days;
            let placed_on =
                CalendarDate::from_date(last_day.into_inner() - Duration::days(day_offset as i64));
            let price = 18.0 + ((seed + index * 7) % 820) as f64 / 10.0;
            let customer = CustomerId::new(1_000 + (seed + index) % 5);

            orders.push(Order::new(
                OrderId::new(9_100 + index),
                Some(customer),
                Some(placed_on),
                Some(price),
            ));
        }

        Ok(OrderBatch {
            orders,
            quality: BatchQuality::default(),
        })
    }
}

impl OrderSource for ShopifyOrderSource {
    fn id(&self) -> &'static str {
        "shopify"
    }

    fn fetch_orders<'a>(
        &'a self,
        req: OrdersRequest,
    ) -> Pin<Box<dyn Future<Output = Result<OrderBatch, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            if self.shop_domain.trim().is_empty() {
                return Err(SourceError::invalid_request(
                    "shopify shop domain must not be empty",
                ));
            }

            if self.is_real_client() {
                self.fetch_real_orders(&req).await
            } else {
                self.fetch_mock_orders(&req).await
            }
        })
    }
}

// Shopify Admin REST payload structures
#[derive(Debug, Clone, Deserialize)]
struct ShopifyOrdersResponse {
    #[serde(default)]
    orders: Vec<ShopifyOrderPayload>,
}

#[derive(Debug, Clone, Deserialize)]
struct ShopifyOrderPayload {
    #[serde(default)]
    id: u64,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    current_total_price: Option<String>,
    #[serde(default)]
    customer: Option<ShopifyCustomerRef>,
}

#[derive(Debug, Clone, Deserialize)]
struct ShopifyCustomerRef {
    #[serde(default)]
    id: Option<u64>,
}

fn normalize_orders(payloads: Vec<ShopifyOrderPayload>) -> OrderBatch {
    let mut quality = BatchQuality::default();

    let orders = payloads
        .into_iter()
        .map(|payload| {
            let total_price = payload
                .current_total_price
                .as_deref()
                .and_then(parse_price);
            if total_price.is_none() {
                quality.malformed_prices += 1;
            }

            let placed_on = payload
                .created_at
                .as_deref()
                .and_then(|raw| CalendarDate::from_timestamp(raw).ok());
            if placed_on.is_none() {
                quality.malformed_dates += 1;
            }

            let customer = payload
                .customer
                .and_then(|reference| reference.id)
                .map(CustomerId::new);
            if customer.is_none() {
                quality.missing_customers += 1;
            }

            Order::new(OrderId::new(payload.id), customer, placed_on, total_price)
        })
        .collect();

    OrderBatch { orders, quality }
}

fn domain_seed(shop_domain: &str) -> u64 {
    shop_domain.bytes().fold(17_u64, |acc, byte| {
        acc.wrapping_mul(31).wrapping_add(byte as u64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::{HttpError, HttpResponse};
    use crate::order_source::SourceErrorKind;
    use crate::DateRange;
    use std::sync::Mutex;

    struct RecordingHttpClient {
        response: Result<HttpResponse, HttpError>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingHttpClient {
        fn respond(response: Result<HttpResponse, HttpError>) -> Arc<Self> {
            Arc::new(Self {
                response,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn recorded(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .clone()
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    fn window(start: &str, end: &str) -> DateRange {
        DateRange::new(
            CalendarDate::parse(start).expect("valid date"),
            CalendarDate::parse(end).expect("valid date"),
        )
        .expect("valid range")
    }

    #[tokio::test]
    async fn scoped_fetch_builds_day_boundary_url_with_token_header() {
        let client = RecordingHttpClient::respond(Ok(HttpResponse::ok_json(r#"{"orders":[]}"#)));
        let source = ShopifyOrderSource::with_http_client(
            client.clone(),
            "example.myshopify.com",
            "shpat-test",
        );

        let request = OrdersRequest::scoped(window("2024-01-01", "2024-01-31"));
        source.fetch_orders(request).await.expect("fetch succeeds");

        let recorded = client.recorded();
        assert_eq!(recorded.len(), 1);
        assert!(recorded[0].url.contains("status=any"));
        assert!(recorded[0]
            .url
            .contains("created_at_min=2024-01-01T00:00:00Z"));
        assert!(recorded[0]
            .url
            .contains("created_at_max=2024-01-31T23:59:59Z"));
        assert_eq!(
            recorded[0]
                .headers
                .get("x-shopify-access-token")
                .map(String::as_str),
            Some("shpat-test")
        );
    }

    #[tokio::test]
    async fn unscoped_fetch_omits_created_at_bounds() {
        let client = RecordingHttpClient::respond(Ok(HttpResponse::ok_json(r#"{"orders":[]}"#)));
        let source =
            ShopifyOrderSource::with_http_client(client.clone(), "example.myshopify.com", "t");

        source
            .fetch_orders(OrdersRequest::unscoped())
            .await
            .expect("fetch succeeds");

        let recorded = client.recorded();
        assert!(!recorded[0].url.contains("created_at_min"));
        assert!(!recorded[0].url.contains("created_at_max"));
    }

    #[tokio::test]
    async fn upstream_failure_surfaces_status() {
        let client = RecordingHttpClient::respond(Ok(HttpResponse {
            status: 503,
            body: String::new(),
        }));
        let source =
            ShopifyOrderSource::with_http_client(client, "example.myshopify.com", "shpat-test");

        let error = source
            .fetch_orders(OrdersRequest::unscoped())
            .await
            .expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::UpstreamStatus);
        assert_eq!(error.upstream_status(), Some(503));
    }

    #[tokio::test]
    async fn transport_failure_maps_to_unavailable() {
        let client = RecordingHttpClient::respond(Err(HttpError::new("connection refused")));
        let source =
            ShopifyOrderSource::with_http_client(client, "example.myshopify.com", "shpat-test");

        let error = source
            .fetch_orders(OrdersRequest::unscoped())
            .await
            .expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
    }

    #[tokio::test]
    async fn undecodable_body_is_an_internal_error() {
        let client = RecordingHttpClient::respond(Ok(HttpResponse::ok_json("not json")));
        let source =
            ShopifyOrderSource::with_http_client(client, "example.myshopify.com", "shpat-test");

        let error = source
            .fetch_orders(OrdersRequest::unscoped())
            .await
            .expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::Internal);
    }

    #[tokio::test]
    async fn field_damage_degrades_per_record_without_failing_the_batch() {
        let body = r#"{"orders":[
            {"id":1,"created_at":"2024-01-05T10:00:00-05:00","current_total_price":"49.99","customer":{"id":700}},
            {"id":2,"created_at":"2024-01-06T09:00:00-05:00","current_total_price":"oops"},
            {"id":3,"created_at":"whenever","current_total_price":"12.00","customer":{"id":701}}
        ]}"#;
        let client = RecordingHttpClient::respond(Ok(HttpResponse::ok_json(body)));
        let source =
            ShopifyOrderSource::with_http_client(client, "example.myshopify.com", "shpat-test");

        let batch = source
            .fetch_orders(OrdersRequest::unscoped())
            .await
            .expect("batch is usable despite damage");

        assert_eq!(batch.orders.len(), 3);
        assert_eq!(batch.quality.malformed_prices, 1);
        assert_eq!(batch.quality.malformed_dates, 1);
        assert_eq!(batch.quality.missing_customers, 1);

        let total: f64 = batch.orders.iter().map(Order::revenue).sum();
        assert!((total - 61.99).abs() < 1e-9);
        assert_eq!(
            batch.orders[0].placed_on,
            Some(CalendarDate::parse("2024-01-05").expect("valid date"))
        );
        assert_eq!(batch.orders[2].placed_on, None);
    }

    #[tokio::test]
    async fn mock_mode_serves_deterministic_orders() {
        let source = ShopifyOrderSource::with_http_client(
            Arc::new(NoopHttpClient),
            "demo-store.myshopify.com",
            "demo",
        );
        let request = OrdersRequest::scoped(window("2024-01-01", "2024-01-07"));

        let first = source.fetch_orders(request).await.expect("fetch succeeds");
        let second = source.fetch_orders(request).await.expect("fetch succeeds");

        assert_eq!(first, second);
        assert!(!first.orders.is_empty());
        assert!(first.quality.is_clean());
        for order in &first.orders {
            let day = order.placed_on.expect("mock orders are dated");
            assert!(day >= CalendarDate::parse("2024-01-01").expect("valid date"));
            assert!(day <= CalendarDate::parse("2024-01-07").expect("valid date"));
        }
    }
}
