// Integration tests that exercise the Database trait against the
// in-memory SQLite backend. The assertions live in `common/mod.rs`.

mod common;

use std::sync::Arc;

use kanban_db::Database;

async fn make_db() -> Arc<dyn Database> {
    Arc::new(kanban_db::SqliteDatabase::open_in_memory().unwrap())
}

#[tokio::test]
async fn board_crud() {
    let db = make_db().await;
    common::test_board_crud(&*db).await;
}

#[tokio::test]
async fn board_cascade() {
    let db = make_db().await;
    common::test_board_cascade(&*db).await;
}

#[tokio::test]
async fn delete_all_boards() {
    let db = make_db().await;
    common::test_delete_all_boards(&*db).await;
}

#[tokio::test]
async fn board_name_unique() {
    let db = make_db().await;
    common::test_board_name_unique(&*db).await;
}

#[tokio::test]
async fn replace_columns() {
    let db = make_db().await;
    common::test_replace_columns(&*db).await;
}

#[tokio::test]
async fn todo_and_subtodos() {
    let db = make_db().await;
    common::test_todo_and_subtodos(&*db).await;
}

#[tokio::test]
async fn on_disk_database_persists() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("kanban.db");
    {
        let db = kanban_db::SqliteDatabase::open_path(&path).unwrap();
        db.create_board(&kanban_core::board::CreateBoard {
            name: "Persisted".into(),
            columns: vec!["Todo".into()],
        })
        .await
        .unwrap();
    }
    let db = kanban_db::SqliteDatabase::open_path(&path).unwrap();
    let boards = db.list_boards().await.unwrap();
    assert_eq!(boards.len(), 1);
    assert_eq!(boards[0].columns.len(), 1);
}
