use std::future::IntoFuture;

use blog::blog_config::ServerConfig;
use blog::logging::init_tracing;
use blog::metrics::init_metrics;
use blog::router::{init_resource_router, init_user_router};
use blog::state::init_app_state;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let metrics = init_metrics();
    let state = init_app_state(metrics).await?;

    let user_app = init_user_router(state.clone())?;
    let resource_app = init_resource_router(state)?;

    let server = ServerConfig::from_env();
    let user_listener = TcpListener::bind(&server.user_addr).await?;
    let resource_listener = TcpListener::bind(&server.resource_addr).await?;

    info!(addr = %server.user_addr, "User router listening");
    info!(addr = %server.resource_addr, "Resource router listening");
    info!("Scalar UI available at http://{}/scalar", server.user_addr);

    tokio::try_join!(
        axum::serve(user_listener, user_app)
            .with_graceful_shutdown(shutdown_signal())
            .into_future(),
        axum::serve(resource_listener, resource_app)
            .with_graceful_shutdown(shutdown_signal())
            .into_future(),
    )?;

    info!("Servers stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
