use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use domain::services::{InviteIssuanceService, InviteRedemptionService};
use persistence::repositories::{
    AccountRepository, InviteCodeRepository, RegistrationRepository,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{Config, SecurityConfig};
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_session, trace_id,
    RateLimiterState,
};
use crate::routes::{account, auth, codes, health};
use crate::services::{AuthService, CookieHelper};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub auth: AuthService,
    pub cookies: CookieHelper,
    pub issuance: InviteIssuanceService,
    pub redemption: InviteRedemptionService,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

impl AppState {
    /// Wires the services to PostgreSQL-backed stores.
    pub fn new(config: Config, pool: PgPool) -> Self {
        let invites = Arc::new(InviteCodeRepository::new(pool.clone()));
        let accounts = Arc::new(AccountRepository::new(pool.clone()));
        let registrations = Arc::new(RegistrationRepository::new(pool.clone()));

        // A limit of 0 disables rate limiting.
        let limit = config.security.auth_rate_limit_per_minute;
        let rate_limiter = (limit > 0).then(|| Arc::new(RateLimiterState::new(limit)));

        Self {
            auth: AuthService::new(pool.clone(), config.session.ttl_secs),
            cookies: CookieHelper::new(config.session.clone()),
            issuance: InviteIssuanceService::new(invites.clone()),
            redemption: InviteRedemptionService::new(invites, accounts, registrations),
            rate_limiter,
            config: Arc::new(config),
            pool,
        }
    }
}

/// CORS: any origin when none are configured (development), otherwise only
/// the listed ones with credentials allowed.
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<_> = security
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .allow_credentials(true)
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let state = AppState::new(config, pool);
    let config = state.config.clone();

    // Public authentication routes, rate limited per client IP
    let auth_routes = Router::new()
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/signup", post(auth::signup))
        .route("/api/v1/auth/signup/:code", get(auth::inspect_code))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    // Routes for logged-in accounts
    let session_routes = Router::new()
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/codes", post(codes::issue_codes))
        .route("/api/v1/account", get(account::current_account))
        .route(
            "/api/v1/account/change-password",
            post(account::change_password),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(session_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors_layer(&config.security))
        .with_state(state)
}
