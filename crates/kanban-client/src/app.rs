use std::sync::Arc;

use kanban_service::KanbanService;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::debug;

use crate::geometry::Point;
use crate::modals::{Effect, Modal, Request, Response};
use crate::state::{Action, ActiveModal, AppState};

/// A response tagged with the modal generation that asked for it.
#[derive(Debug)]
struct Delivery {
    generation: u64,
    response: Response,
}

/// Owns the app state and the open modal, and runs the modal's requests.
///
/// Requests run as tokio tasks. Every modal change bumps `generation` and
/// aborts the previous modal's loads. Writes always run to completion so a
/// save is never cut off halfway. A response queued under an older
/// generation is discarded when it is delivered.
pub struct App {
    service: Arc<dyn KanbanService>,
    state: AppState,
    modal: Option<Modal>,
    generation: u64,
    loads: JoinSet<()>,
    writes: JoinSet<()>,
    tx: mpsc::UnboundedSender<Delivery>,
    rx: mpsc::UnboundedReceiver<Delivery>,
}

impl App {
    pub fn new(service: Arc<dyn KanbanService>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            service,
            state: AppState::default(),
            modal: None,
            generation: 0,
            loads: JoinSet::new(),
            writes: JoinSet::new(),
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn modal_mut(&mut self) -> Option<&mut Modal> {
        self.modal.as_mut()
    }

    /// Number of requests still running, writes from closed modals included.
    pub fn in_flight(&self) -> usize {
        self.loads.len() + self.writes.len()
    }

    pub fn dispatch(&mut self, action: Action) {
        let swaps_modal = matches!(action, Action::SwapModal(_));
        self.state.dispatch(action);
        if swaps_modal {
            self.mount_modal();
        }
    }

    pub fn open(&mut self, modal: ActiveModal) {
        self.dispatch(Action::SwapModal(Some(modal)));
    }

    pub fn close(&mut self) {
        self.dispatch(Action::SwapModal(None));
    }

    /// Open the board editor for the selected board, if one is selected.
    pub fn edit_selected_board(&mut self) {
        if let Some(id) = self.state.selected_board.clone() {
            self.open(ActiveModal::edit_board(id));
        }
    }

    /// Pointer press anywhere on screen. A press outside the open modal closes it.
    pub fn pointer_down(&mut self, p: Point) {
        let Some(modal) = self.modal.as_mut() else {
            return;
        };
        if !modal.bounds().contains(p) {
            self.close();
            return;
        }
        modal.pointer_down(p);
    }

    /// Run a user interaction against the open modal and carry out its effect.
    pub fn interact(&mut self, f: impl FnOnce(&mut Modal) -> Effect) {
        let Some(modal) = self.modal.as_mut() else {
            return;
        };
        let effect = f(modal);
        self.apply_effect(effect);
    }

    /// Apply every response that has already arrived.
    pub fn drain(&mut self) {
        while let Some(joined) = self.writes.try_join_next() {
            report(joined);
        }
        while let Ok(delivery) = self.rx.try_recv() {
            self.deliver(delivery);
        }
    }

    /// Wait for every request, including any their responses trigger, and
    /// apply the responses.
    pub async fn settle(&mut self) {
        loop {
            while let Some(joined) = self.loads.join_next().await {
                report(joined);
            }
            while let Some(joined) = self.writes.join_next().await {
                report(joined);
            }
            self.drain();
            if self.loads.is_empty() && self.writes.is_empty() {
                break;
            }
        }
    }

    fn mount_modal(&mut self) {
        self.generation += 1;
        // Dropping the set aborts every load in it.
        self.loads = JoinSet::new();
        self.modal = None;

        let Some(active) = self.state.modal.clone() else {
            return;
        };
        match Modal::open(&active) {
            Some((modal, load)) => {
                self.modal = Some(modal);
                if let Some(request) = load {
                    self.send(request);
                }
            }
            None => debug!(?active, "no view for modal"),
        }
    }

    fn send(&mut self, request: Request) {
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        let generation = self.generation;
        debug!(generation, ?request, "sending modal request");
        let tasks = if request.is_load() {
            &mut self.loads
        } else {
            &mut self.writes
        };
        tasks.spawn(async move {
            let response = request.run(service.as_ref()).await;
            // The receiver lives as long as the App.
            let _ = tx.send(Delivery {
                generation,
                response,
            });
        });
    }

    fn deliver(&mut self, delivery: Delivery) {
        if delivery.generation != self.generation {
            debug!(
                stale = delivery.generation,
                current = self.generation,
                "dropping response for a closed modal"
            );
            return;
        }
        let Some(modal) = self.modal.as_mut() else {
            return;
        };
        let effect = modal.apply(delivery.response);
        self.apply_effect(effect);
    }

    fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::Close => self.close(),
            Effect::Swap(active) => self.open(active),
            Effect::Send(request) => self.send(request),
        }
    }
}

fn report(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        if !e.is_cancelled() {
            tracing::warn!("modal request task failed: {e}");
        }
    }
}
