pub mod boards;
pub mod columns;
pub mod subtodos;
pub mod todos;

use rusqlite::{params, Connection};

use super::SqliteResultExt;
use crate::DbError;

/// Counts of rows removed by a cascade.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Purged {
    pub columns: usize,
    pub todos: usize,
    pub subtodos: usize,
}

/// Remove every todo (and its subtodos) in the given column.
pub(crate) fn purge_column_children(conn: &Connection, column_id: &str) -> Result<Purged, DbError> {
    let subtodos = conn
        .execute(
            "DELETE FROM subtodos WHERE todo_id IN
                (SELECT id FROM todos WHERE column_id = ?1)",
            params![column_id],
        )
        .to_db()?;
    let todos = conn
        .execute("DELETE FROM todos WHERE column_id = ?1", params![column_id])
        .to_db()?;
    Ok(Purged {
        columns: 0,
        todos,
        subtodos,
    })
}

/// Remove every column of a board along with their todos and subtodos.
pub(crate) fn purge_board_children(conn: &Connection, board_id: &str) -> Result<Purged, DbError> {
    let subtodos = conn
        .execute(
            "DELETE FROM subtodos WHERE todo_id IN
                (SELECT t.id FROM todos t
                 JOIN board_columns c ON c.id = t.column_id
                 WHERE c.board_id = ?1)",
            params![board_id],
        )
        .to_db()?;
    let todos = conn
        .execute(
            "DELETE FROM todos WHERE column_id IN
                (SELECT id FROM board_columns WHERE board_id = ?1)",
            params![board_id],
        )
        .to_db()?;
    let columns = conn
        .execute(
            "DELETE FROM board_columns WHERE board_id = ?1",
            params![board_id],
        )
        .to_db()?;
    Ok(Purged {
        columns,
        todos,
        subtodos,
    })
}
