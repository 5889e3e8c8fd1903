use async_trait::async_trait;
use kanban_core::board::{CreateBoard, UpdateBoard};
use kanban_core::column::{CreateColumn, ReplaceColumns, UpdateColumn};
use kanban_core::subtodo::{CreateSubtodo, UpdateSubtodo};
use kanban_core::todo::{CreateTodo, UpdateTodo};
use kanban_core::{Board, Column, Subtodo, Todo};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{KanbanService, ServiceError};

/// Async HTTP client implementation of KanbanService.
/// Connects to a running kanban-server and unwraps its
/// `{ "message": ..., "<entity>": ... }` envelopes.
#[derive(Clone)]
pub struct HttpService {
    base_url: String,
    client: Client,
}

impl HttpService {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if the server is reachable.
    pub async fn health_check(&self) -> Result<(), ServiceError> {
        let resp = self
            .client
            .get(self.url("/api/health"))
            .send()
            .await
            .map_err(|e| ServiceError::Internal(format!("connection failed: {e}")))?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ServiceError::Internal(format!(
                "health check failed: {}",
                resp.status()
            )))
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send a request and pull `key` out of the success envelope.
    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        key: &str,
    ) -> Result<T, ServiceError> {
        let resp = builder
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        let mut envelope: Value = handle_response(resp).await?;
        let field = envelope
            .get_mut(key)
            .map(Value::take)
            .ok_or_else(|| ServiceError::Internal(format!("response missing `{key}`")))?;
        serde_json::from_value(field)
            .map_err(|e| ServiceError::Internal(format!("json decode: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, key: &str) -> Result<T, ServiceError> {
        self.send(self.client.get(self.url(path)), key).await
    }

    async fn post_json<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        key: &str,
    ) -> Result<T, ServiceError> {
        self.send(self.client.post(self.url(path)).json(body), key)
            .await
    }

    async fn put_json<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        key: &str,
    ) -> Result<T, ServiceError> {
        self.send(self.client.put(self.url(path)).json(body), key)
            .await
    }

    async fn patch_empty<T: DeserializeOwned>(&self, path: &str, key: &str) -> Result<T, ServiceError> {
        self.send(self.client.patch(self.url(path)), key).await
    }

    async fn delete_req<T: DeserializeOwned>(&self, path: &str, key: &str) -> Result<T, ServiceError> {
        self.send(self.client.delete(self.url(path)), key).await
    }
}

async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ServiceError> {
    let status = resp.status();
    if status.is_success() {
        resp.json::<T>()
            .await
            .map_err(|e| ServiceError::Internal(format!("json decode: {e}")))
    } else {
        Err(parse_error_with_status(status, resp).await)
    }
}

async fn parse_error_with_status(status: StatusCode, resp: reqwest::Response) -> ServiceError {
    let body = resp.text().await.unwrap_or_default();
    let parsed = serde_json::from_str::<Value>(&body).ok();
    let msg = parsed
        .as_ref()
        .and_then(|v| v["message"].as_str().map(String::from))
        .unwrap_or(body);

    if let Some(code) = parsed.as_ref().and_then(|v| v["error"].as_str()) {
        return ServiceError::from_code(code, msg);
    }
    match status {
        StatusCode::NOT_FOUND => ServiceError::NotFound(msg),
        StatusCode::BAD_REQUEST => ServiceError::InvalidInput(msg),
        _ => ServiceError::Internal(msg),
    }
}

#[async_trait]
impl KanbanService for HttpService {
    // -- Boards --
    async fn list_boards(&self) -> Result<Vec<Board>, ServiceError> {
        self.get_json("/api/boards", "boards").await
    }

    async fn get_board(&self, id: &str) -> Result<Board, ServiceError> {
        self.get_json(&format!("/api/boards/{id}"), "board").await
    }

    async fn create_board(&self, input: &CreateBoard) -> Result<Board, ServiceError> {
        self.post_json("/api/boards", input, "board").await
    }

    async fn update_board(&self, id: &str, update: &UpdateBoard) -> Result<Board, ServiceError> {
        self.put_json(&format!("/api/boards/{id}"), update, "board")
            .await
    }

    async fn delete_board(&self, id: &str) -> Result<Board, ServiceError> {
        self.delete_req(&format!("/api/boards/{id}"), "board").await
    }

    async fn delete_all_boards(&self) -> Result<usize, ServiceError> {
        self.delete_req("/api/boards", "deleted").await
    }

    async fn list_board_columns(&self, board_id: &str) -> Result<Vec<Column>, ServiceError> {
        self.get_json(&format!("/api/boards/{board_id}/columns"), "columns")
            .await
    }

    async fn replace_board_columns(
        &self,
        board_id: &str,
        input: &ReplaceColumns,
    ) -> Result<Vec<Column>, ServiceError> {
        self.put_json(&format!("/api/boards/{board_id}/columns"), input, "columns")
            .await
    }

    // -- Columns --
    async fn list_columns(&self) -> Result<Vec<Column>, ServiceError> {
        self.get_json("/api/columns", "columns").await
    }

    async fn get_column(&self, id: &str) -> Result<Column, ServiceError> {
        self.get_json(&format!("/api/columns/{id}"), "column").await
    }

    async fn create_column(&self, input: &CreateColumn) -> Result<Column, ServiceError> {
        self.post_json("/api/columns", input, "column").await
    }

    async fn update_column(
        &self,
        id: &str,
        update: &UpdateColumn,
    ) -> Result<Column, ServiceError> {
        self.put_json(&format!("/api/columns/{id}"), update, "column")
            .await
    }

    async fn delete_column(&self, id: &str) -> Result<Column, ServiceError> {
        self.delete_req(&format!("/api/columns/{id}"), "column").await
    }

    async fn delete_all_columns(&self) -> Result<usize, ServiceError> {
        self.delete_req("/api/columns", "deleted").await
    }

    async fn list_column_todos(&self, column_id: &str) -> Result<Vec<Todo>, ServiceError> {
        self.get_json(&format!("/api/columns/{column_id}/todos"), "todos")
            .await
    }

    // -- Todos --
    async fn list_todos(&self) -> Result<Vec<Todo>, ServiceError> {
        self.get_json("/api/todos", "todos").await
    }

    async fn get_todo(&self, id: &str) -> Result<Todo, ServiceError> {
        self.get_json(&format!("/api/todos/{id}"), "todo").await
    }

    async fn create_todo(&self, input: &CreateTodo) -> Result<Todo, ServiceError> {
        self.post_json("/api/todos", input, "todo").await
    }

    async fn update_todo(&self, id: &str, update: &UpdateTodo) -> Result<Todo, ServiceError> {
        self.put_json(&format!("/api/todos/{id}"), update, "todo")
            .await
    }

    async fn delete_todo(&self, id: &str) -> Result<Todo, ServiceError> {
        self.delete_req(&format!("/api/todos/{id}"), "todo").await
    }

    async fn delete_all_todos(&self) -> Result<usize, ServiceError> {
        self.delete_req("/api/todos", "deleted").await
    }

    async fn list_todo_subtodos(&self, todo_id: &str) -> Result<Vec<Subtodo>, ServiceError> {
        self.get_json(&format!("/api/todos/{todo_id}/subtodos"), "subtodos")
            .await
    }

    // -- Subtodos --
    async fn list_subtodos(&self) -> Result<Vec<Subtodo>, ServiceError> {
        self.get_json("/api/subtodos", "subtodos").await
    }

    async fn get_subtodo(&self, id: &str) -> Result<Subtodo, ServiceError> {
        self.get_json(&format!("/api/subtodos/{id}"), "subtodo").await
    }

    async fn create_subtodo(&self, input: &CreateSubtodo) -> Result<Subtodo, ServiceError> {
        self.post_json("/api/subtodos", input, "subtodo").await
    }

    async fn update_subtodo(
        &self,
        id: &str,
        update: &UpdateSubtodo,
    ) -> Result<Subtodo, ServiceError> {
        self.put_json(&format!("/api/subtodos/{id}"), update, "subtodo")
            .await
    }

    async fn toggle_subtodo(&self, id: &str) -> Result<Subtodo, ServiceError> {
        self.patch_empty(&format!("/api/subtodos/toggle/{id}"), "subtodo")
            .await
    }

    async fn delete_subtodo(&self, id: &str) -> Result<Subtodo, ServiceError> {
        self.delete_req(&format!("/api/subtodos/{id}"), "subtodo").await
    }

    async fn delete_all_subtodos(&self) -> Result<usize, ServiceError> {
        self.delete_req("/api/subtodos", "deleted").await
    }
}
