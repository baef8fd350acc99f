use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    auth::{require_admin, require_auth},
    metrics_handler, metrics_middleware, rate_limit_middleware, security_headers_middleware,
    trace_id, RateLimiterState,
};
use crate::routes::{auth, employees, health, inventory, requests};
use crate::services::EmailService;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<shared::jwt::JwtConfig>,
    pub email: EmailService,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    let jwt = Arc::new(shared::jwt::JwtConfig::new(
        &config.jwt.secret,
        config.jwt.token_expiry_secs,
        config.jwt.leeway_secs,
    ));

    let email = EmailService::new(config.email.clone());

    // Rate limiting is enabled when rate_limit_per_minute > 0
    let rate_limiter = if config.security.rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        )))
    } else {
        None
    };

    let state = AppState {
        pool,
        config: config.clone(),
        jwt,
        email,
        rate_limiter,
    };

    // An empty origin list means a permissive development setup; anything
    // configured narrows CORS to exactly those origins.
    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Employee-facing routes (any authenticated employee)
    // Middleware order: auth runs first, then rate limiting (keyed by subject)
    let employee_routes = Router::new()
        .route("/api/v1/requests", post(requests::submit_request))
        .route("/api/v1/requests/form-data", get(requests::get_form_data))
        .route(
            "/api/v1/employees/:employee_id/assigned-inventory",
            get(employees::get_assigned_inventory),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Admin routes (admin role claim required)
    let admin_routes = Router::new()
        .route("/api/v1/requests", get(requests::list_requests))
        .route(
            "/api/v1/requests/:request_id/status",
            put(requests::update_request_status),
        )
        .route(
            "/api/v1/requests/:request_id",
            delete(requests::delete_request),
        )
        .route(
            "/api/v1/employees",
            get(employees::list_employees).post(employees::create_employee),
        )
        .route(
            "/api/v1/employees/:employee_id",
            put(employees::update_employee).delete(employees::delete_employee),
        )
        .route(
            "/api/v1/employees/:employee_id/assigned-inventory",
            post(employees::assign_inventory),
        )
        .route(
            "/api/v1/employees/:employee_id/assigned-inventory/:inventory_id",
            delete(employees::remove_assigned_inventory),
        )
        .route(
            "/api/v1/inventory",
            get(inventory::list_inventory).post(inventory::create_inventory),
        )
        .route(
            "/api/v1/inventory/:inventory_id",
            put(inventory::update_inventory).delete(inventory::delete_inventory),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(employee_routes)
        .merge(admin_routes)
        // Outermost layer last: cors -> trace id -> trace -> metrics ->
        // timeout -> compression -> security headers -> routes.
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
