//! Modal flows driven end to end against LocalService over in-memory SQLite.

use std::sync::Arc;

use kanban_client::{Action, ActiveModal, App, Effect, Modal, Point};
use kanban_core::board::CreateBoard;
use kanban_core::subtodo::CreateSubtodo;
use kanban_core::todo::CreateTodo;
use kanban_core::{Board, Todo};
use kanban_db::SqliteDatabase;
use kanban_service::{KanbanService, LocalService, ServiceError};

struct Fixture {
    service: Arc<LocalService>,
    board: Board,
    todo: Todo,
    subtodos: Vec<String>,
}

async fn fixture() -> Fixture {
    let db = Arc::new(SqliteDatabase::open_in_memory().unwrap());
    let service = Arc::new(LocalService::new(db));
    let board = service
        .create_board(&CreateBoard {
            name: "Platform Launch".into(),
            columns: vec!["Todo".into(), "Doing".into(), "Done".into()],
        })
        .await
        .unwrap();
    let todo = service
        .create_todo(&CreateTodo {
            column_id: board.columns[0].clone(),
            title: "Build settings UI".into(),
            description: "Theme and account pages".into(),
        })
        .await
        .unwrap();
    let mut subtodos = Vec::new();
    for title in ["Account page", "Billing page"] {
        let sub = service
            .create_subtodo(&CreateSubtodo {
                todo_id: todo.id.clone(),
                title: title.into(),
            })
            .await
            .unwrap();
        subtodos.push(sub.id);
    }
    Fixture {
        service,
        board,
        todo,
        subtodos,
    }
}

fn app(fx: &Fixture) -> App {
    let service: Arc<dyn KanbanService> = fx.service.clone();
    App::new(service)
}

#[tokio::test]
async fn checklist_loads_and_toggles() {
    let fx = fixture().await;
    let mut app = app(&fx);

    app.open(ActiveModal::check_todo(fx.todo.id.clone()));
    app.settle().await;

    let check = app.modal().and_then(Modal::as_check_todo).unwrap();
    assert_eq!(check.todo().map(|t| t.title.as_str()), Some("Build settings UI"));
    assert_eq!(check.summary(), "Subtasks (0 of 2)");

    let target = fx.subtodos[1].clone();
    app.interact(|m| match m.as_check_todo_mut() {
        Some(check) => check.toggle(&target),
        None => Effect::None,
    });
    app.settle().await;

    let check = app.modal().and_then(Modal::as_check_todo).unwrap();
    assert_eq!(check.summary(), "Subtasks (1 of 2)");
    assert!(!check.subtodos()[0].is_completed);
    assert!(check.subtodos()[1].is_completed);
    assert!(check.error().is_none());

    let stored = fx.service.get_subtodo(&target).await.unwrap();
    assert!(stored.is_completed);
}

#[tokio::test]
async fn checklist_for_missing_todo_records_error() {
    let fx = fixture().await;
    let mut app = app(&fx);

    app.open(ActiveModal::check_todo("missing"));
    app.settle().await;

    let modal = app.modal().unwrap();
    assert!(matches!(modal.error(), Some(ServiceError::NotFound(_))));
    assert!(app.state().modal.is_some());
    assert_eq!(app.in_flight(), 0);
}

#[tokio::test]
async fn settings_delete_then_confirm_removes_todo() {
    let fx = fixture().await;
    let mut app = app(&fx);

    app.open(ActiveModal::check_todo(fx.todo.id.clone()));
    app.settle().await;

    app.interact(|m| {
        let check = m.as_check_todo_mut().unwrap();
        check.toggle_settings();
        check.delete()
    });
    assert_eq!(
        app.state().modal,
        Some(ActiveModal::delete_todo(fx.todo.id.clone()))
    );

    app.interact(|m| m.as_delete_todo_mut().unwrap().confirm());
    app.settle().await;

    assert!(app.state().modal.is_none());
    assert!(app.modal().is_none());
    assert!(matches!(
        fx.service.get_todo(&fx.todo.id).await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        fx.service.list_subtodos().await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn cancel_delete_keeps_todo() {
    let fx = fixture().await;
    let mut app = app(&fx);

    app.open(ActiveModal::delete_todo(fx.todo.id.clone()));
    app.interact(|m| m.as_delete_todo_mut().unwrap().cancel());
    app.settle().await;

    assert!(app.state().modal.is_none());
    assert!(fx.service.get_todo(&fx.todo.id).await.is_ok());
}

#[tokio::test]
async fn settings_edit_swaps_to_edit_todo() {
    let fx = fixture().await;
    let mut app = app(&fx);

    app.open(ActiveModal::check_todo(fx.todo.id.clone()));
    app.settle().await;
    app.interact(|m| m.as_check_todo_mut().unwrap().edit());

    assert_eq!(
        app.state().modal,
        Some(ActiveModal::edit_todo(fx.todo.id.clone()))
    );
}

#[tokio::test]
async fn outside_press_closes_but_popover_press_does_not() {
    let fx = fixture().await;
    let mut app = app(&fx);

    app.open(ActiveModal::check_todo(fx.todo.id.clone()));
    app.settle().await;
    app.interact(|m| {
        m.as_check_todo_mut().unwrap().toggle_settings();
        Effect::None
    });

    let (bounds, popover) = {
        let check = app.modal().and_then(Modal::as_check_todo).unwrap();
        (check.bounds(), check.settings_bounds())
    };

    // Inside the modal, outside the popover: only the popover closes.
    app.pointer_down(Point::new(bounds.x + 1, bounds.y + 1));
    let check = app.modal().and_then(Modal::as_check_todo).unwrap();
    assert!(!check.settings_open());
    assert!(popover.contains(Point::new(popover.x, popover.y)));

    app.pointer_down(Point::new(bounds.x - 10, bounds.y));
    assert!(app.modal().is_none());
    assert!(app.state().modal.is_none());
}

#[tokio::test]
async fn edit_board_saves_name_and_columns() {
    let fx = fixture().await;
    let mut app = app(&fx);

    app.dispatch(Action::SelectBoard(Some(fx.board.id.clone())));
    app.edit_selected_board();
    app.settle().await;

    {
        let edit = app.modal().and_then(Modal::as_edit_board).unwrap();
        assert!(edit.loaded());
        assert_eq!(edit.name(), "Platform Launch");
        let names: Vec<&str> = edit.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Todo", "Doing", "Done"]);
    }

    app.interact(|m| {
        let edit = m.as_edit_board_mut().unwrap();
        edit.set_name("Roadmap");
        edit.remove_column(2);
        edit.rename_column(1, "In progress");
        edit.add_column();
        edit.rename_column(2, "Shipped");
        edit.submit()
    });
    app.settle().await;

    assert!(app.modal().is_none());
    let board = fx.service.get_board(&fx.board.id).await.unwrap();
    assert_eq!(board.name, "Roadmap");
    let columns = fx.service.list_board_columns(&fx.board.id).await.unwrap();
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Todo", "In progress", "Shipped"]);
    assert_eq!(columns[0].id, fx.board.columns[0]);
    assert_eq!(columns[1].id, fx.board.columns[1]);

    // The todo stayed in its column.
    let todo = fx.service.get_todo(&fx.todo.id).await.unwrap();
    assert_eq!(todo.status, "Todo");
}

#[tokio::test]
async fn edit_board_conflict_stays_open() {
    let fx = fixture().await;
    fx.service
        .create_board(&CreateBoard {
            name: "Marketing".into(),
            columns: Vec::new(),
        })
        .await
        .unwrap();
    let mut app = app(&fx);

    app.open(ActiveModal::edit_board(fx.board.id.clone()));
    app.settle().await;
    app.interact(|m| {
        let edit = m.as_edit_board_mut().unwrap();
        edit.set_name("Marketing");
        edit.submit()
    });
    app.settle().await;

    let edit = app.modal().and_then(Modal::as_edit_board).unwrap();
    assert_eq!(
        edit.error(),
        Some(&ServiceError::Conflict("Board already exists".into()))
    );
    assert!(!edit.saving());
    let board = fx.service.get_board(&fx.board.id).await.unwrap();
    assert_eq!(board.name, "Platform Launch");
}

#[tokio::test]
async fn reopening_replaces_the_earlier_fetch() {
    let fx = fixture().await;
    let other = fx
        .service
        .create_todo(&CreateTodo {
            column_id: fx.board.columns[1].clone(),
            title: "Write launch post".into(),
            description: String::new(),
        })
        .await
        .unwrap();
    let mut app = app(&fx);

    app.open(ActiveModal::check_todo(fx.todo.id.clone()));
    app.open(ActiveModal::check_todo(other.id.clone()));
    app.settle().await;

    let check = app.modal().and_then(Modal::as_check_todo).unwrap();
    assert_eq!(check.todo_id(), other.id);
    assert_eq!(check.todo().map(|t| t.title.as_str()), Some("Write launch post"));
    assert!(check.subtodos().is_empty());
}

#[tokio::test]
async fn edit_board_submit_before_load_sends_nothing() {
    let fx = fixture().await;
    let mut app = app(&fx);

    app.open(ActiveModal::edit_board(fx.board.id.clone()));
    app.interact(|m| {
        let edit = m.as_edit_board_mut().unwrap();
        edit.set_name("Launch v2");
        edit.submit()
    });
    assert_eq!(app.in_flight(), 1);
    app.settle().await;

    let edit = app.modal().and_then(Modal::as_edit_board).unwrap();
    assert!(edit.loaded());
    assert!(!edit.saving());
    assert_eq!(edit.name(), "Launch v2");
    assert_eq!(edit.columns().len(), 3);

    let board = fx.service.get_board(&fx.board.id).await.unwrap();
    assert_eq!(board.name, "Platform Launch");
    assert_eq!(board.columns, fx.board.columns);
    let todo = fx.service.get_todo(&fx.todo.id).await.unwrap();
    assert_eq!(todo.column_id, fx.board.columns[0]);
}

#[tokio::test]
async fn closing_mid_save_still_finishes_the_save() {
    let fx = fixture().await;
    let mut app = app(&fx);

    app.open(ActiveModal::edit_board(fx.board.id.clone()));
    app.settle().await;
    app.interact(|m| {
        let edit = m.as_edit_board_mut().unwrap();
        edit.set_name("Roadmap");
        edit.remove_column(2);
        edit.submit()
    });
    app.close();
    assert_eq!(app.in_flight(), 1);
    app.settle().await;

    assert!(app.modal().is_none());
    let board = fx.service.get_board(&fx.board.id).await.unwrap();
    assert_eq!(board.name, "Roadmap");
    let columns = fx.service.list_board_columns(&fx.board.id).await.unwrap();
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Todo", "Doing"]);
}

#[tokio::test]
async fn closing_after_confirm_still_deletes() {
    let fx = fixture().await;
    let mut app = app(&fx);

    app.open(ActiveModal::delete_todo(fx.todo.id.clone()));
    app.interact(|m| m.as_delete_todo_mut().unwrap().confirm());
    app.close();
    app.settle().await;

    assert!(app.modal().is_none());
    assert!(matches!(
        fx.service.get_todo(&fx.todo.id).await,
        Err(ServiceError::NotFound(_))
    ));
}
