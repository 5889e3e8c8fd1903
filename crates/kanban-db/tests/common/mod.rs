// Backend-agnostic integration tests for the Database trait.
//
// Each public async function accepts `&dyn Database` so the same
// assertions can run against any storage backend.

use kanban_core::board::CreateBoard;
use kanban_core::column::{ColumnDraft, CreateColumn};
use kanban_core::subtodo::CreateSubtodo;
use kanban_core::todo::CreateTodo;
use kanban_db::{Database, DbError, TodoChanges};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_board(name: &str) -> CreateBoard {
    CreateBoard {
        name: name.to_string(),
        columns: Vec::new(),
    }
}

async fn make_column(db: &dyn Database, board_id: &str, name: &str) -> String {
    db.create_column(&CreateColumn {
        board_id: board_id.to_string(),
        name: name.to_string(),
    })
    .await
    .unwrap()
    .id
}

async fn make_todo(db: &dyn Database, column_id: &str, title: &str) -> String {
    db.create_todo(&CreateTodo {
        column_id: column_id.to_string(),
        title: title.to_string(),
        description: String::new(),
    })
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Boards
// ---------------------------------------------------------------------------

/// Create, get, list, rename and delete a board.
pub async fn test_board_crud(db: &dyn Database) {
    let board = db
        .create_board(&CreateBoard {
            name: "Platform Launch".into(),
            columns: vec!["Todo".into(), "Doing".into()],
        })
        .await
        .unwrap();
    assert_eq!(board.columns.len(), 2);

    let fetched = db.get_board(&board.id).await.unwrap();
    assert_eq!(fetched.id, board.id);

    let all = db.list_boards().await.unwrap();
    assert_eq!(all.len(), 1);

    let renamed = db.update_board(&board.id, "Roadmap").await.unwrap();
    assert_eq!(renamed.name, "Roadmap");

    let deleted = db.delete_board(&board.id).await.unwrap();
    assert_eq!(deleted.name, "Roadmap");
    assert!(db.list_boards().await.unwrap().is_empty());
    assert!(db.list_columns().await.unwrap().is_empty());
    assert!(matches!(db.get_board(&board.id).await, Err(DbError::NotFound(_))));
}

/// Boards {A,B}, columns {c1->A, c2->A, c3->B}; deleting A leaves {B} and {c3}.
pub async fn test_board_cascade(db: &dyn Database) {
    let a = db.create_board(&make_board("A")).await.unwrap();
    let b = db.create_board(&make_board("B")).await.unwrap();
    let c1 = make_column(db, &a.id, "c1").await;
    make_column(db, &a.id, "c2").await;
    let c3 = make_column(db, &b.id, "c3").await;
    let t1 = make_todo(db, &c1, "under A").await;
    let t3 = make_todo(db, &c3, "under B").await;

    db.delete_board(&a.id).await.unwrap();

    let boards: Vec<String> = db.list_boards().await.unwrap().into_iter().map(|b| b.name).collect();
    assert_eq!(boards, vec!["B"]);
    let columns: Vec<String> = db.list_columns().await.unwrap().into_iter().map(|c| c.name).collect();
    assert_eq!(columns, vec!["c3"]);
    assert!(db.get_todo(&t1).await.is_err());
    assert!(db.get_todo(&t3).await.is_ok());
}

/// Deleting all boards removes every column, todo and subtodo.
pub async fn test_delete_all_boards(db: &dyn Database) {
    assert_eq!(db.delete_all_boards().await.unwrap(), 0);

    let a = db.create_board(&make_board("A")).await.unwrap();
    let b = db.create_board(&make_board("B")).await.unwrap();
    let ca = make_column(db, &a.id, "todo").await;
    make_column(db, &b.id, "todo").await;
    let todo = make_todo(db, &ca, "t").await;
    db.create_subtodo(&CreateSubtodo {
        todo_id: todo,
        title: "s".into(),
    })
    .await
    .unwrap();

    assert_eq!(db.delete_all_boards().await.unwrap(), 2);
    assert!(db.list_boards().await.unwrap().is_empty());
    assert!(db.list_columns().await.unwrap().is_empty());
    assert!(db.list_todos().await.unwrap().is_empty());
    assert!(db.list_subtodos().await.unwrap().is_empty());
}

/// A rename that collides with another board fails and leaves the name alone.
pub async fn test_board_name_unique(db: &dyn Database) {
    let a = db.create_board(&make_board("A")).await.unwrap();
    db.create_board(&make_board("B")).await.unwrap();

    assert!(matches!(
        db.create_board(&make_board("A")).await,
        Err(DbError::Conflict(_))
    ));
    assert!(matches!(
        db.update_board(&a.id, "B").await,
        Err(DbError::Conflict(_))
    ));
    assert_eq!(db.get_board(&a.id).await.unwrap().name, "A");
    assert!(db.find_board_by_name("A").await.unwrap().is_some());
}

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

/// Replacing a board's columns keeps ids for surviving rows.
pub async fn test_replace_columns(db: &dyn Database) {
    let board = db
        .create_board(&CreateBoard {
            name: "Board".into(),
            columns: vec!["Todo".into(), "Doing".into(), "Done".into()],
        })
        .await
        .unwrap();
    let doing = board.columns[1].clone();
    let todo_in_done = make_todo(db, &board.columns[2], "ship").await;

    let columns = db
        .replace_board_columns(
            &board.id,
            &[
                ColumnDraft {
                    id: Some(doing.clone()),
                    name: "In Progress".into(),
                },
                ColumnDraft {
                    id: None,
                    name: "Review".into(),
                },
            ],
        )
        .await
        .unwrap();

    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["In Progress", "Review"]);
    assert_eq!(columns[0].id, doing);
    assert!(db.get_todo(&todo_in_done).await.is_err());

    let board = db.get_board(&board.id).await.unwrap();
    assert_eq!(board.columns, columns.iter().map(|c| c.id.clone()).collect::<Vec<_>>());
    assert!(db
        .find_column_by_name(&board.id, "Review")
        .await
        .unwrap()
        .is_some());
}

// ---------------------------------------------------------------------------
// Todos & subtodos
// ---------------------------------------------------------------------------

/// Moving a todo changes its status; toggling a subtodo touches nothing else.
pub async fn test_todo_and_subtodos(db: &dyn Database) {
    let board = db
        .create_board(&CreateBoard {
            name: "Board".into(),
            columns: vec!["Todo".into(), "Done".into()],
        })
        .await
        .unwrap();
    let todo_id = make_todo(db, &board.columns[0], "Parent").await;
    let mut subs = Vec::new();
    for title in ["one", "two", "three"] {
        subs.push(
            db.create_subtodo(&CreateSubtodo {
                todo_id: todo_id.clone(),
                title: title.into(),
            })
            .await
            .unwrap(),
        );
    }
    let before = db.get_todo(&todo_id).await.unwrap();

    let toggled = db.toggle_subtodo(&subs[1].id).await.unwrap();
    assert!(toggled.is_completed);

    let after = db.list_todo_subtodos(&todo_id).await.unwrap();
    let flags: Vec<bool> = after.iter().map(|s| s.is_completed).collect();
    assert_eq!(flags, vec![false, true, false]);
    assert_eq!(db.get_todo(&todo_id).await.unwrap(), before);

    let moved = db
        .update_todo(
            &todo_id,
            &TodoChanges {
                column_id: Some(board.columns[1].clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.status, "Done");
    assert_eq!(db.list_column_todos(&board.columns[1]).await.unwrap().len(), 1);

    db.delete_subtodo(&subs[0].id).await.unwrap();
    assert_eq!(db.get_todo(&todo_id).await.unwrap().subtodos.len(), 2);

    db.delete_todo(&todo_id).await.unwrap();
    assert!(db.list_subtodos().await.unwrap().is_empty());
    assert_eq!(db.delete_all_todos().await.unwrap(), 0);
    assert_eq!(db.delete_all_subtodos().await.unwrap(), 0);
    assert_eq!(db.delete_all_columns().await.unwrap(), 2);
}
