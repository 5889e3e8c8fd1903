pub mod config;
mod routes;
#[cfg(feature = "test-helpers")]
pub mod test_helpers;

use std::sync::Arc;

use anyhow::Result;
use kanban_db::Database;
use kanban_service::LocalService;
use tokio::net::TcpListener;

pub use routes::{build_router, AppState, InnerAppState};

/// Serve the REST API on `listener` until the process is stopped.
pub async fn serve(listener: TcpListener, db: Arc<dyn Database>) -> Result<()> {
    let state = Arc::new(InnerAppState {
        service: LocalService::new(db),
    });
    let app = build_router(state);
    axum::serve(listener, app).await?;
    Ok(())
}
