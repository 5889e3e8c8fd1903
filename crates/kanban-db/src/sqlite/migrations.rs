use rusqlite::Connection;

use super::SqliteResultExt;
use crate::DbError;

pub fn run(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        );",
    )
    .to_db()?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |r| r.get(0),
        )
        .to_db()?;

    if current_version < 1 {
        // v1: boards, columns, todos, subtodos. Parent references are checked
        // by the service layer, not by foreign keys.
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS boards (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL UNIQUE,
                created_at  TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS board_columns (
                id          TEXT PRIMARY KEY,
                board_id    TEXT NOT NULL,
                name        TEXT NOT NULL,
                position    INTEGER NOT NULL DEFAULT 0,
                created_at  TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_columns_board
                ON board_columns(board_id, position);
            CREATE UNIQUE INDEX IF NOT EXISTS idx_columns_board_name
                ON board_columns(board_id, name);

            CREATE TABLE IF NOT EXISTS todos (
                id          TEXT PRIMARY KEY,
                column_id   TEXT NOT NULL,
                title       TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                created_at  TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_todos_column ON todos(column_id);

            CREATE TABLE IF NOT EXISTS subtodos (
                id           TEXT PRIMARY KEY,
                todo_id      TEXT NOT NULL,
                title        TEXT NOT NULL,
                is_completed INTEGER NOT NULL DEFAULT 0,
                created_at   TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_subtodos_todo ON subtodos(todo_id);

            INSERT INTO schema_version (version, applied_at)
                VALUES (1, strftime('%Y-%m-%dT%H:%M:%SZ', 'now'));
            ",
        )
        .to_db()?;
        tracing::info!("applied schema migration v1");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        run(&conn).unwrap();
        let version: i64 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(version, 1);
    }
}
