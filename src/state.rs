use blog_config::{CorsConfig, JwtConfig};
use blog_db::{init_db_pool, run_migrations};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;

use crate::middleware::session::SessionManager;

/// Shared by both routers.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub sessions: SessionManager,
    pub cors_config: CorsConfig,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        db: PgPool,
        jwt_config: &JwtConfig,
        cors_config: CorsConfig,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            db,
            sessions: SessionManager::from_config(jwt_config),
            cors_config,
            metrics,
        }
    }
}

/// Connects to the database, applies migrations and loads configuration.
pub async fn init_app_state(metrics: Option<PrometheusHandle>) -> anyhow::Result<AppState> {
    let db = init_db_pool().await?;
    run_migrations(&db).await?;

    Ok(AppState::new(
        db,
        &JwtConfig::from_env(),
        CorsConfig::from_env(),
        metrics,
    ))
}
