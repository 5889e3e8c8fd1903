pub(crate) mod migrations;
pub mod queries;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{Connection, ErrorCode};

use kanban_core::board::CreateBoard;
use kanban_core::column::{ColumnDraft, CreateColumn};
use kanban_core::subtodo::{CreateSubtodo, UpdateSubtodo};
use kanban_core::todo::CreateTodo;
use kanban_core::{Board, Column, Subtodo, Todo};

use crate::{Database, DbConfig, DbError, TodoChanges};

/// Extension trait that converts `rusqlite::Result<T>` into `Result<T, DbError>`.
pub(crate) trait SqliteResultExt<T> {
    fn to_db(self) -> Result<T, DbError>;
}

impl<T> SqliteResultExt<T> for rusqlite::Result<T> {
    fn to_db(self) -> Result<T, DbError> {
        self.map_err(map_sqlite_err)
    }
}

#[derive(Clone)]
pub struct SqliteDatabase {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDatabase {
    pub fn open(config: &DbConfig) -> Result<Self, DbError> {
        let path = config
            .sqlite_path
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| crate::data_dir().join("kanban.db"));
        std::fs::create_dir_all(path.parent().unwrap_or(Path::new(".")))?;
        Self::open_path(&path)
    }

    pub fn open_path(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path).to_db()?;
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA busy_timeout=5000;",
        )
        .to_db()?;
        tracing::debug!("opened sqlite database at {}", path.display());
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory().to_db()?;
        Self::from_connection(conn)
    }

    pub fn open_default() -> Result<Self, DbError> {
        Self::open(&DbConfig::default())
    }

    fn from_connection(conn: Connection) -> Result<Self, DbError> {
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.with_conn(|conn| migrations::run(conn))?;
        Ok(db)
    }

    pub(crate) fn with_conn<F, T>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&Connection) -> Result<T, DbError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|_| DbError::Internal("lock poisoned".into()))?;
        f(&conn)
    }

    /// Run `f` inside a transaction; commits on `Ok`, rolls back on `Err`.
    pub(crate) fn with_tx<F, T>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&Connection) -> Result<T, DbError>,
    {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction().to_db()?;
            let out = f(&tx)?;
            tx.commit().to_db()?;
            Ok(out)
        })
    }

    /// Move a synchronous query onto the blocking pool.
    async fn blocking<T, F>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&SqliteDatabase) -> Result<T, DbError> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.clone();
        tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(|e| DbError::Internal(e.to_string()))?
    }
}

/// Map a `rusqlite::Error` into a `DbError`. Constraint violations become
/// `Conflict`, everything else `Internal`.
pub(crate) fn map_sqlite_err(e: rusqlite::Error) -> DbError {
    match e {
        rusqlite::Error::SqliteFailure(err, msg) if err.code == ErrorCode::ConstraintViolation => {
            DbError::Conflict(msg.unwrap_or_else(|| "constraint violation".into()))
        }
        other => DbError::Internal(other.to_string()),
    }
}

/// Map a single-row lookup error, turning "no rows" into `NotFound(what)`.
pub(crate) fn not_found_or(what: String) -> impl FnOnce(rusqlite::Error) -> DbError {
    move |e| match e {
        rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(what),
        other => map_sqlite_err(other),
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    // -- Boards --
    async fn create_board(&self, input: &CreateBoard) -> Result<Board, DbError> {
        let input = input.clone();
        self.blocking(move |db| db.create_board_sync(&input)).await
    }
    async fn get_board(&self, id: &str) -> Result<Board, DbError> {
        let id = id.to_string();
        self.blocking(move |db| db.get_board_sync(&id)).await
    }
    async fn find_board_by_name(&self, name: &str) -> Result<Option<Board>, DbError> {
        let name = name.to_string();
        self.blocking(move |db| db.find_board_by_name_sync(&name)).await
    }
    async fn list_boards(&self) -> Result<Vec<Board>, DbError> {
        self.blocking(|db| db.list_boards_sync()).await
    }
    async fn update_board(&self, id: &str, name: &str) -> Result<Board, DbError> {
        let id = id.to_string();
        let name = name.to_string();
        self.blocking(move |db| db.update_board_sync(&id, &name)).await
    }
    async fn delete_board(&self, id: &str) -> Result<Board, DbError> {
        let id = id.to_string();
        self.blocking(move |db| db.delete_board_sync(&id)).await
    }
    async fn delete_all_boards(&self) -> Result<usize, DbError> {
        self.blocking(|db| db.delete_all_boards_sync()).await
    }

    // -- Columns --
    async fn create_column(&self, input: &CreateColumn) -> Result<Column, DbError> {
        let input = input.clone();
        self.blocking(move |db| db.create_column_sync(&input)).await
    }
    async fn get_column(&self, id: &str) -> Result<Column, DbError> {
        let id = id.to_string();
        self.blocking(move |db| db.get_column_sync(&id)).await
    }
    async fn find_column_by_name(
        &self,
        board_id: &str,
        name: &str,
    ) -> Result<Option<Column>, DbError> {
        let board_id = board_id.to_string();
        let name = name.to_string();
        self.blocking(move |db| db.find_column_by_name_sync(&board_id, &name))
            .await
    }
    async fn list_columns(&self) -> Result<Vec<Column>, DbError> {
        self.blocking(|db| db.list_columns_sync()).await
    }
    async fn list_board_columns(&self, board_id: &str) -> Result<Vec<Column>, DbError> {
        let board_id = board_id.to_string();
        self.blocking(move |db| db.list_board_columns_sync(&board_id))
            .await
    }
    async fn update_column(&self, id: &str, name: &str) -> Result<Column, DbError> {
        let id = id.to_string();
        let name = name.to_string();
        self.blocking(move |db| db.update_column_sync(&id, &name)).await
    }
    async fn replace_board_columns(
        &self,
        board_id: &str,
        drafts: &[ColumnDraft],
    ) -> Result<Vec<Column>, DbError> {
        let board_id = board_id.to_string();
        let drafts = drafts.to_vec();
        self.blocking(move |db| db.replace_board_columns_sync(&board_id, &drafts))
            .await
    }
    async fn delete_column(&self, id: &str) -> Result<Column, DbError> {
        let id = id.to_string();
        self.blocking(move |db| db.delete_column_sync(&id)).await
    }
    async fn delete_all_columns(&self) -> Result<usize, DbError> {
        self.blocking(|db| db.delete_all_columns_sync()).await
    }

    // -- Todos --
    async fn create_todo(&self, input: &CreateTodo) -> Result<Todo, DbError> {
        let input = input.clone();
        self.blocking(move |db| db.create_todo_sync(&input)).await
    }
    async fn get_todo(&self, id: &str) -> Result<Todo, DbError> {
        let id = id.to_string();
        self.blocking(move |db| db.get_todo_sync(&id)).await
    }
    async fn list_todos(&self) -> Result<Vec<Todo>, DbError> {
        self.blocking(|db| db.list_todos_sync()).await
    }
    async fn list_column_todos(&self, column_id: &str) -> Result<Vec<Todo>, DbError> {
        let column_id = column_id.to_string();
        self.blocking(move |db| db.list_column_todos_sync(&column_id))
            .await
    }
    async fn update_todo(&self, id: &str, changes: &TodoChanges) -> Result<Todo, DbError> {
        let id = id.to_string();
        let changes = changes.clone();
        self.blocking(move |db| db.update_todo_sync(&id, &changes)).await
    }
    async fn delete_todo(&self, id: &str) -> Result<Todo, DbError> {
        let id = id.to_string();
        self.blocking(move |db| db.delete_todo_sync(&id)).await
    }
    async fn delete_all_todos(&self) -> Result<usize, DbError> {
        self.blocking(|db| db.delete_all_todos_sync()).await
    }

    // -- Subtodos --
    async fn create_subtodo(&self, input: &CreateSubtodo) -> Result<Subtodo, DbError> {
        let input = input.clone();
        self.blocking(move |db| db.create_subtodo_sync(&input)).await
    }
    async fn get_subtodo(&self, id: &str) -> Result<Subtodo, DbError> {
        let id = id.to_string();
        self.blocking(move |db| db.get_subtodo_sync(&id)).await
    }
    async fn list_subtodos(&self) -> Result<Vec<Subtodo>, DbError> {
        self.blocking(|db| db.list_subtodos_sync()).await
    }
    async fn list_todo_subtodos(&self, todo_id: &str) -> Result<Vec<Subtodo>, DbError> {
        let todo_id = todo_id.to_string();
        self.blocking(move |db| db.list_todo_subtodos_sync(&todo_id))
            .await
    }
    async fn update_subtodo(
        &self,
        id: &str,
        update: &UpdateSubtodo,
    ) -> Result<Subtodo, DbError> {
        let id = id.to_string();
        let update = update.clone();
        self.blocking(move |db| db.update_subtodo_sync(&id, &update))
            .await
    }
    async fn toggle_subtodo(&self, id: &str) -> Result<Subtodo, DbError> {
        let id = id.to_string();
        self.blocking(move |db| db.toggle_subtodo_sync(&id)).await
    }
    async fn delete_subtodo(&self, id: &str) -> Result<Subtodo, DbError> {
        let id = id.to_string();
        self.blocking(move |db| db.delete_subtodo_sync(&id)).await
    }
    async fn delete_all_subtodos(&self) -> Result<usize, DbError> {
        self.blocking(|db| db.delete_all_subtodos_sync()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_in_memory_runs_migrations() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let count: i64 = conn
                .query_row(
                    "SELECT count(*) FROM sqlite_master WHERE type = 'table'
                     AND name IN ('boards', 'board_columns', 'todos', 'subtodos')",
                    [],
                    |row| row.get(0),
                )
                .to_db()?;
            assert_eq!(count, 4);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn open_path_creates_file() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("test.db");
        assert!(!db_path.exists());

        let _db = SqliteDatabase::open_path(&db_path).unwrap();
        assert!(db_path.exists());
    }

    #[test]
    fn open_with_config_creates_parent_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("nested/dir/kanban.db");
        let config = DbConfig {
            sqlite_path: Some(db_path.to_string_lossy().to_string()),
        };
        let _db = SqliteDatabase::open(&config).unwrap();
        assert!(db_path.exists());
    }

    #[test]
    fn failed_transaction_rolls_back() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let result: Result<(), DbError> = db.with_tx(|conn| {
            conn.execute(
                "INSERT INTO boards (id, name, created_at) VALUES ('b1', 'A', '2024-01-01T00:00:00Z')",
                [],
            )
            .to_db()?;
            Err(DbError::Internal("boom".into()))
        });
        assert!(result.is_err());
        assert!(db.list_boards_sync().unwrap().is_empty());
    }
}
