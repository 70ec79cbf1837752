//!
//! Hotel room booking REST service.
//! Reads configuration from TOML file (~/.config/booking-service/config.toml).

use std::path::PathBuf;
use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};
use uuid::Uuid;

use hotel_booking::application::{AvailabilityService, BookingService};
use hotel_booking::domain::{RepositoryProvider, User};
use hotel_booking::infrastructure::crypto::jwt::JwtConfig;
use hotel_booking::infrastructure::crypto::password::hash_password;
use hotel_booking::infrastructure::database::migrator::Migrator;
use hotel_booking::shared::{Clock, SystemClock};
use hotel_booking::{
    create_api_router, default_config_path, init_database, AppConfig, DatabaseConfig,
    SeaOrmRepositoryProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("BOOKING_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            // Initialize logging with configured level
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting hotel booking service...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    info!("Prometheus metrics recorder installed");

    // ── Build sub-configs from AppConfig ───────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.url.clone(),
    };
    info!("Database: {}", db_config.url);

    let jwt_config = JwtConfig {
        secret: app_cfg.security.jwt_secret.clone(),
        expiration_hours: app_cfg.security.jwt_expiration_hours,
        issuer: "booking-service".to_string(),
    };
    info!(
        "JWT configured with {}h token expiration",
        jwt_config.expiration_hours
    );

    // ── Database ───────────────────────────────────────────────
    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // Initialize repository provider and services
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    if app_cfg.demo.seed {
        seed_demo_user(repos.as_ref(), &app_cfg, clock.as_ref()).await;
    }

    let booking_service = Arc::new(BookingService::new(repos.clone(), clock.clone()));
    let availability_service = Arc::new(AvailabilityService::new(repos.clone()));

    // Create REST API router
    let router = create_api_router(
        repos,
        booking_service,
        availability_service,
        db.clone(),
        jwt_config,
        clock,
        prometheus_handle,
    );

    // Start REST API server with graceful shutdown
    let addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs/", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Perform final cleanup
    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("Hotel booking service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}

/// Create the demo user on first boot (empty users table).
/// Rooms are managed out of band; see the migrations for the schema.
async fn seed_demo_user(repos: &dyn RepositoryProvider, app_cfg: &AppConfig, clock: &dyn Clock) {
    let users_count = match repos.users().count().await {
        Ok(count) => count,
        Err(e) => {
            error!("Failed to count users: {}", e);
            return;
        }
    };
    if users_count > 0 {
        return;
    }

    info!("Creating demo user...");

    let password_hash = match hash_password(&app_cfg.demo.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!("Failed to hash demo password: {}", e);
            return;
        }
    };

    let now = clock.now();
    let demo = User {
        id: Uuid::new_v4().to_string(),
        username: app_cfg.demo.username.clone(),
        email: app_cfg.demo.email.clone(),
        password_hash,
        is_active: true,
        created_at: now,
        updated_at: now,
        last_login_at: None,
    };

    match repos.users().insert(demo).await {
        Ok(()) => {
            info!("Demo user created: {}", app_cfg.demo.username);
            info!("Change or disable the demo account before going to production!");
        }
        Err(e) => {
            error!("Failed to create demo user: {}", e);
        }
    }
}
