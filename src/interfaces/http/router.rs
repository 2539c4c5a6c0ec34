//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::BookingService;
use crate::domain::RepositoryProvider;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::middleware::identity_middleware;
use crate::interfaces::http::modules::health::{self, HealthState};
use crate::interfaces::http::modules::metrics::{self, http_metrics_middleware, MetricsState};
use crate::interfaces::http::modules::request_id::request_id_middleware;
use crate::interfaces::http::modules::state::BookingState;
use crate::interfaces::http::modules::{availability, reservations, tables};
use crate::shared::clock::Clock;

/// Everything the router needs, split into per-module states via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub booking: Arc<BookingService>,
    pub repos: Arc<dyn RepositoryProvider>,
    pub clock: Arc<dyn Clock>,
    pub started_at: Arc<Instant>,
}

impl FromRef<AppState> for BookingState {
    fn from_ref(s: &AppState) -> Self {
        BookingState {
            booking: Arc::clone(&s.booking),
            clock: Arc::clone(&s.clock),
        }
    }
}

impl FromRef<AppState> for HealthState {
    fn from_ref(s: &AppState) -> Self {
        HealthState {
            repos: Arc::clone(&s.repos),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

/// Documents the identity headers forwarded by the upstream identity provider
struct IdentityAddon;

impl Modify for IdentityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "user_email",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "X-User-Email",
                    "Email of the authenticated guest",
                ))),
            );
            components.add_security_scheme(
                "user_role",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "X-User-Role",
                    "owner or customer",
                ))),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        metrics::prometheus_metrics,
        // Tables
        tables::create_table,
        tables::list_tables,
        // Reservations
        reservations::create_reservation,
        reservations::list_reservations,
        reservations::get_reservation,
        reservations::delete_reservation,
        reservations::delete_reservation_by_query,
        // Availability
        availability::available_tables,
        availability::available_dates,
        availability::available_times,
    ),
    components(
        schemas(
            ApiResponse<String>,
            health::HealthResponse,
            health::ComponentHealth,
            tables::CreateTableRequest,
            tables::TableDto,
            tables::TableAvailabilityDto,
            tables::AvailabilitySlotDto,
            reservations::CreateReservationRequest,
            reservations::ReservationDto,
        )
    ),
    modifiers(&IdentityAddon),
    tags(
        (name = "Health", description = "Service health and metrics"),
        (name = "Tables", description = "Dining tables and their availability grid"),
        (name = "Reservations", description = "Booking, listing and cancelling reservations"),
        (name = "Availability", description = "Which tables, dates and times are still free"),
    ),
    info(
        title = "Table Booking API",
        version = "1.0.0",
        description = "REST API for restaurant table reservations",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes.
///
/// `/metrics` is only mounted when a Prometheus handle is given.
pub fn create_api_router(state: AppState, prometheus: Option<PrometheusHandle>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let table_routes = Router::new().route("/", get(tables::list_tables).post(tables::create_table));

    let reservation_routes = Router::new()
        .route(
            "/",
            get(reservations::list_reservations)
                .post(reservations::create_reservation)
                .delete(reservations::delete_reservation_by_query),
        )
        .route(
            "/{reservation_id}",
            get(reservations::get_reservation).delete(reservations::delete_reservation),
        );

    let availability_routes = Router::new()
        .route("/tables", get(availability::available_tables))
        .route("/dates", get(availability::available_dates))
        .route("/times", get(availability::available_times));

    let api_routes = Router::new()
        .nest("/tables", table_routes)
        .nest("/reservations", reservation_routes)
        .nest("/availability", availability_routes)
        .layer(middleware::from_fn(identity_middleware));

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let mut router = Router::new()
        .merge(swagger_routes)
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_routes)
        .with_state(state);

    if let Some(handle) = prometheus {
        router = router.merge(
            Router::new()
                .route("/metrics", get(metrics::prometheus_metrics))
                .with_state(MetricsState { handle }),
        );
    }

    router
        .route_layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::NaiveDate;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::domain::{AvailabilityEngine, WindowPolicy};
    use crate::infrastructure::storage::InMemoryRepositoryProvider;
    use crate::shared::clock::FixedClock;
    use crate::shared::retry::RetryConfig;

    struct TestApp {
        router: Router,
        repos: Arc<InMemoryRepositoryProvider>,
    }

    fn app() -> TestApp {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let booking = BookingService::new(
            repos.clone(),
            AvailabilityEngine::default(),
            WindowPolicy::NextCalendarMonth,
        )
        .with_retry(RetryConfig::none());
        let state = AppState {
            booking: Arc::new(booking),
            repos: repos.clone(),
            clock: Arc::new(FixedClock(NaiveDate::from_ymd_opt(2024, 5, 20).unwrap())),
            started_at: Arc::new(Instant::now()),
        };
        TestApp {
            router: create_api_router(state, None),
            repos,
        }
    }

    async fn call(
        app: &TestApp,
        method: &str,
        uri: &str,
        headers: &[(&str, &str)],
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let req = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let resp = app.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    const OWNER: [(&str, &str); 1] = [("x-user-role", "owner")];

    async fn add_table(app: &TestApp, capacity: i32) -> i64 {
        let (status, body) = call(
            app,
            "POST",
            "/api/v1/tables",
            &OWNER,
            Some(json!({"capacity": capacity})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"]["id"].as_i64().unwrap()
    }

    fn booking(table_id: Option<i64>, date: &str, slot: &str, guests: i32) -> Value {
        json!({
            "table_id": table_id,
            "name": "Ana",
            "email": "ana@example.com",
            "date": date,
            "time_slot": slot,
            "guests": guests,
        })
    }

    #[tokio::test]
    async fn create_table_returns_id_and_capacity() {
        let app = app();
        let (status, body) = call(&app, "POST", "/api/v1/tables", &OWNER, Some(json!({"capacity": 4}))).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({"success": true, "data": {"id": 1, "capacity": 4}}));
    }

    #[tokio::test]
    async fn create_table_validates_and_authorizes() {
        let app = app();
        let (status, body) = call(&app, "POST", "/api/v1/tables", &OWNER, Some(json!({"capacity": 0}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);

        let (status, _) = call(
            &app,
            "POST",
            "/api/v1/tables",
            &[("x-user-role", "customer"), ("x-user-email", "ana@example.com")],
            Some(json!({"capacity": 2})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = call(
            &app,
            "POST",
            "/api/v1/tables",
            &[("content-type", "application/json")],
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_tables_shows_availability_grid() {
        let app = app();
        let t1 = add_table(&app, 2).await;
        add_table(&app, 4).await;
        let (status, _) = call(
            &app,
            "POST",
            "/api/v1/reservations",
            &[],
            Some(booking(Some(t1), "2024-06-15", "13:00:00", 2)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = call(&app, "GET", "/api/v1/tables", &[], None).await;
        assert_eq!(status, StatusCode::OK);

        let tables = body["data"].as_array().unwrap();
        assert_eq!(tables.len(), 2);
        let days = tables[0]["availability"].as_array().unwrap();
        assert_eq!(days.len(), 30);
        assert_eq!(days[0]["date"], "2024-06-01");
        assert_eq!(
            days[14],
            json!({
                "date": "2024-06-15",
                "times": {"12:00 PM": true, "1:00 PM": false, "2:00 PM": true, "3:00 PM": true}
            })
        );
        assert_eq!(tables[1]["availability"][14]["times"]["1:00 PM"], true);
    }

    #[tokio::test]
    async fn double_booking_is_a_conflict() {
        let app = app();
        let t1 = add_table(&app, 2).await;
        let body = booking(Some(t1), "2024-06-01", "12:00 PM", 2);

        let (status, created) = call(&app, "POST", "/api/v1/reservations", &[], Some(body.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["data"]["time_slot"], "12:00 PM");
        assert_eq!(created["data"]["time_value"], "12:00:00");

        let (status, again) = call(&app, "POST", "/api/v1/reservations", &[], Some(body)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(again["success"], false);
    }

    #[tokio::test]
    async fn reservation_errors_map_to_statuses() {
        let app = app();
        add_table(&app, 2).await;

        let (status, _) = call(&app, "POST", "/api/v1/reservations", &[], Some(booking(Some(42), "2024-06-01", "12:00 PM", 2))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(&app, "POST", "/api/v1/reservations", &[], Some(booking(None, "2024-05-01", "12:00 PM", 2))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let mut bad_email = booking(None, "2024-06-01", "12:00 PM", 2);
        bad_email["email"] = json!("not-an-email");
        let (status, _) = call(&app, "POST", "/api/v1/reservations", &[], Some(bad_email)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = call(&app, "POST", "/api/v1/reservations", &[], Some(booking(None, "2024-06-01", "12:00 PM", 3))).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn delete_returns_deleted_rows_or_error() {
        let app = app();
        add_table(&app, 2).await;
        let (_, created) = call(&app, "POST", "/api/v1/reservations", &[], Some(booking(None, "2024-06-01", "2:00 PM", 2))).await;
        let id = created["data"]["id"].as_i64().unwrap();

        let (status, _) = call(&app, "DELETE", "/api/v1/reservations", &OWNER, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = call(&app, "DELETE", "/api/v1/reservations/abc", &OWNER, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call(&app, "DELETE", &format!("/api/v1/reservations/{id}"), &OWNER, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["id"], id);

        let (status, _) = call(&app, "DELETE", &format!("/api/v1/reservations?id={id}"), &OWNER, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn customers_only_see_their_own() {
        let app = app();
        add_table(&app, 4).await;
        let ana = [("x-user-role", "customer"), ("x-user-email", "ana@example.com")];
        let bo = [("x-user-role", "customer"), ("x-user-email", "bo@example.com")];

        let (_, mine) = call(&app, "POST", "/api/v1/reservations", &ana, Some(booking(None, "2024-06-01", "12:00 PM", 2))).await;
        call(&app, "POST", "/api/v1/reservations", &bo, Some(booking(None, "2024-06-01", "1:00 PM", 2))).await;

        let (status, body) = call(&app, "GET", "/api/v1/reservations", &ana, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (_, body) = call(&app, "GET", "/api/v1/reservations", &OWNER, None).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let id = mine["data"]["id"].as_i64().unwrap();
        let (status, _) = call(&app, "DELETE", &format!("/api/v1/reservations/{id}"), &bo, None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = call(&app, "GET", &format!("/api/v1/reservations/{id}"), &ana, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = call(&app, "GET", "/api/v1/reservations", &[("x-user-role", "chef")], None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn requests_without_identity_can_only_book() {
        let app = app();
        add_table(&app, 4).await;

        let (status, created) = call(&app, "POST", "/api/v1/reservations", &[], Some(booking(None, "2024-06-01", "12:00 PM", 2))).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["data"]["id"].as_i64().unwrap();

        let (status, _) = call(&app, "POST", "/api/v1/tables", &[], Some(json!({"capacity": 2}))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = call(&app, "GET", "/api/v1/reservations", &[], None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = call(&app, "GET", &format!("/api/v1/reservations/{id}"), &[], None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = call(&app, "DELETE", &format!("/api/v1/reservations/{id}"), &[], None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = call(&app, "GET", "/api/v1/tables", &[], None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn list_reservations_filters_by_date_range() {
        let app = app();
        add_table(&app, 4).await;
        for date in ["2024-06-01", "2024-06-05", "2024-06-20"] {
            call(&app, "POST", "/api/v1/reservations", &[], Some(booking(None, date, "12:00 PM", 2))).await;
        }

        let (_, body) = call(&app, "GET", "/api/v1/reservations?from=2024-06-01&days=7", &OWNER, None).await;
        let dates: Vec<_> = body["data"].as_array().unwrap().iter().map(|r| r["date"].clone()).collect();
        assert_eq!(dates, vec![json!("2024-06-01"), json!("2024-06-05")]);

        let (status, _) = call(&app, "GET", "/api/v1/reservations?days=0", &OWNER, None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn availability_lookups() {
        let app = app();
        let t1 = add_table(&app, 2).await;
        add_table(&app, 4).await;
        call(&app, "POST", "/api/v1/reservations", &[], Some(booking(Some(t1), "2024-06-01", "12:00 PM", 2))).await;

        let (status, body) = call(&app, "GET", "/api/v1/availability/tables?guests=2&date=2024-06-01&time=12:00%20PM", &[], None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([{"id": 2, "capacity": 4}]));

        let (status, _) = call(&app, "GET", "/api/v1/availability/tables?guests=2&date=2024-06-01&time=9am", &[], None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (_, body) = call(&app, "GET", "/api/v1/availability/times?guests=3&date=2024-06-01", &[], None).await;
        assert_eq!(body["data"], json!(["12:00 PM", "1:00 PM", "2:00 PM", "3:00 PM"]));

        let (_, body) = call(&app, "GET", "/api/v1/availability/dates?guests=4", &[], None).await;
        let dates = body["data"].as_array().unwrap();
        assert_eq!(dates.len(), 30);
        assert_eq!(dates[0], "2024-06-01");

        let (status, _) = call(&app, "GET", "/api/v1/availability/dates?guests=0", &[], None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let (status, _) = call(&app, "GET", "/api/v1/availability/dates", &[], None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn health_reports_store_state() {
        let app = app();
        let (status, body) = call(&app, "GET", "/health", &[], None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        app.repos.set_available(false);
        let (status, body) = call(&app, "GET", "/health", &[], None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["database"]["status"], "error");
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let app = app();
        let (status, body) = call(&app, "GET", "/api-doc/openapi.json", &[], None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/api/v1/reservations"].is_object());
    }
}
