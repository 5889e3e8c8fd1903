//! Client-side state for the kanban board: the app-wide state slice, the
//! modal views and the host that runs their requests.
//!
//! Nothing here draws anything. A front end feeds pointer events and user
//! input in, and reads the modal state back out to render it.

pub mod app;
pub mod components;
pub mod geometry;
pub mod modals;
pub mod state;

pub use app::App;
pub use geometry::{Point, Rect};
pub use modals::{Effect, Modal, Request, Response};
pub use state::{Action, ActiveModal, AppState, EntityType, ModalKind};
