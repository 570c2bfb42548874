use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::AuthService;
use crate::config::AppConfig;
use crate::database::models::{Category, Customer, Method, Payment};
use crate::database::Store;
use crate::handlers::protected::{reference, resource, service, Activatable, Resource};
use crate::handlers::public::auth;
use crate::middleware::jwt_auth_middleware;

/// Shared handler state, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub auth: Arc<AuthService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Store, config: AppConfig) -> Self {
        let auth = AuthService::from_config(store.users.clone(), &config.security);
        Self {
            store,
            auth: Arc::new(auth),
            config: Arc::new(config),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let router = Router::new()
        // Public auth routes
        .merge(auth_public_routes())
        // Protected API
        .merge(service_routes())
        .merge(resource_routes::<Category>("/v1/category"))
        .merge(activatable_routes::<Customer>("/v1/customers"))
        .merge(activatable_routes::<Method>("/v1/methods"))
        .merge(resource_routes::<Payment>("/v1/payments"))
        .merge(reference_routes())
        .fallback(service::not_found)
        // The gate wraps the fallback as well, so unknown paths also need a token
        .layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware))
        .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes));

    // Global middleware
    let router = if state.config.security.enable_cors {
        router.layer(cors_layer(&state.config.security.cors_origins))
    } else {
        router
    };

    let router = if state.config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

fn auth_public_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login_post))
        .route("/register", post(auth::register_post))
}

fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(service::root))
        .route("/health", get(service::health))
        .route("/v1/auth/whoami", get(service::whoami))
}

fn resource_routes<T: Resource>(base: &str) -> Router<AppState> {
    Router::new()
        .route(base, get(resource::list::<T>).post(resource::create::<T>))
        .route(
            &format!("{}/:id", base),
            get(resource::get_one::<T>)
                .put(resource::replace::<T>)
                .patch(resource::patch::<T>)
                .delete(resource::delete::<T>),
        )
}

fn activatable_routes<T: Activatable>(base: &str) -> Router<AppState> {
    resource_routes::<T>(base)
        .route(&format!("{}/activate/:status", base), put(resource::activate_all::<T>))
        .route(&format!("{}/deactivate/:id", base), put(resource::deactivate::<T>))
        .route(&format!("{}/reactivate/:id", base), put(resource::reactivate::<T>))
}

fn reference_routes() -> Router<AppState> {
    Router::new()
        .route("/v2/category/:name", get(reference::categories_by_name))
        .route("/v3/category/:id", get(reference::category_by_id))
}
