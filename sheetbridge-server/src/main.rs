mod routes;
mod singleton;
mod state;

use anyhow::Result;
use axum::Router;
use sheetbridge_core::Settings;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let settings = Settings::load()?;

    // One server per port
    let _lock = singleton::acquire(&settings)?;
    let state = AppState::new(&settings).await?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::command::router())
        .merge(routes::sheets::router())
        .merge(routes::records::router())
        .with_state(state)
        .layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], settings.server_port));
    log::info!("sheetbridge-server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
