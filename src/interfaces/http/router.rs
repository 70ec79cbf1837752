//! API router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{AvailabilityService, BookingService};
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::modules::metrics::http_metrics_middleware;
use crate::interfaces::http::modules::{auth, bookings, health, metrics, rooms};
use crate::shared::Clock;

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::handlers::health_check,
        // Auth
        auth::handlers::signup,
        auth::handlers::login,
        auth::handlers::me,
        // Rooms
        rooms::handlers::list_rooms,
        rooms::handlers::get_room,
        rooms::handlers::search_available,
        // Bookings
        bookings::handlers::list_my_bookings,
        bookings::handlers::create_booking,
        bookings::handlers::get_booking,
        bookings::handlers::check_in,
        bookings::handlers::check_out,
        bookings::handlers::cancel,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            // Auth
            auth::dto::SignupRequest,
            auth::dto::LoginRequest,
            auth::dto::LoginResponse,
            auth::dto::UserInfo,
            // Rooms
            rooms::dto::RoomDto,
            // Bookings
            bookings::dto::CreateBookingRequest,
            bookings::dto::BookingDto,
            // Health
            health::handlers::HealthResponse,
            health::handlers::ComponentHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Authentication", description = "User authentication: signup, login (JWT), profile"),
        (name = "Rooms", description = "Room catalogue and availability search"),
        (name = "Bookings", description = "Booking creation and lifecycle: check-in, check-out, cancel"),
    ),
    info(
        title = "Hotel Booking API",
        version = "1.0.0",
        description = "REST API for searching room availability and managing bookings",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    repos: Arc<dyn RepositoryProvider>,
    booking_service: Arc<BookingService>,
    availability_service: Arc<AvailabilityService>,
    db: DatabaseConnection,
    jwt_config: JwtConfig,
    clock: Arc<dyn Clock>,
    prometheus_handle: PrometheusHandle,
) -> Router {
    let middleware_state = AuthState {
        jwt_config: jwt_config.clone(),
    };

    // Auth routes (public)
    let auth_state = auth::AuthAppState {
        repos: repos.clone(),
        jwt_config,
        clock,
    };
    let auth_routes = Router::new()
        .route("/signup", post(auth::handlers::signup))
        .route("/login", post(auth::handlers::login))
        .with_state(auth_state.clone());

    // Auth routes (protected)
    let auth_protected_routes = Router::new()
        .route("/me", get(auth::handlers::me))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(auth_state);

    // Room routes (public; search is advisory and lock-free)
    let room_state = rooms::RoomAppState {
        repos,
        availability: availability_service,
    };
    let room_routes = Router::new()
        .route("/", get(rooms::handlers::list_rooms))
        .route("/available", get(rooms::handlers::search_available))
        .route("/{room_id}", get(rooms::handlers::get_room))
        .with_state(room_state);

    // Booking routes (protected, owner-scoped)
    let booking_state = bookings::BookingAppState {
        bookings: booking_service,
    };
    let booking_routes = Router::new()
        .route(
            "/",
            get(bookings::handlers::list_my_bookings).post(bookings::handlers::create_booking),
        )
        .route("/{booking_id}", get(bookings::handlers::get_booking))
        .route("/{booking_id}/check-in", post(bookings::handlers::check_in))
        .route(
            "/{booking_id}/check-out",
            post(bookings::handlers::check_out),
        )
        .route("/{booking_id}/cancel", post(bookings::handlers::cancel))
        .layer(middleware::from_fn_with_state(
            middleware_state,
            auth_middleware,
        ))
        .with_state(booking_state);

    // Health + metrics (no auth)
    let health_routes = Router::new()
        .route("/health", get(health::handlers::health_check))
        .with_state(health::HealthState {
            db,
            started_at: Arc::new(Instant::now()),
        });
    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::handlers::prometheus_metrics))
        .with_state(metrics::MetricsState {
            handle: prometheus_handle,
        });

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        // Auth
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/auth", auth_protected_routes)
        // Rooms
        .nest("/api/v1/rooms", room_routes)
        // Bookings
        .nest("/api/v1/bookings", booking_routes)
        // Middleware
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
