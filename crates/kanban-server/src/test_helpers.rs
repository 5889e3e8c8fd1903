use std::sync::Arc;

use axum::Router;
use kanban_db::SqliteDatabase;
use kanban_service::LocalService;
use tokio::net::TcpListener;

use crate::routes::{build_router, InnerAppState};

/// Build a router over a fresh in-memory SQLite database.
pub fn test_router() -> Router {
    let db = Arc::new(SqliteDatabase::open_in_memory().unwrap());
    build_router(Arc::new(InnerAppState {
        service: LocalService::new(db),
    }))
}

/// A running test server with base_url and background task handle.
pub struct TestServer {
    pub base_url: String,
    _handle: tokio::task::JoinHandle<()>,
}

/// Spawn the API on a random local port, e.g. "http://127.0.0.1:12345".
pub async fn spawn_test_server() -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = test_router();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    TestServer {
        base_url: format!("http://{addr}"),
        _handle: handle,
    }
}
