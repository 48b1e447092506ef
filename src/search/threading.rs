//! Background search task.
//!
//! A search runs on one dedicated worker thread over a private copy of the
//! position. Each completed depth is sent to the owner as a
//! [`SearchMessage::Update`]; the stream ends with `Finished` or, if the
//! worker panicked, `Failed` carrying the panic message. Cancellation is a
//! shared flag polled by the search itself.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError};
use tracing::{debug, warn};

use crate::engines::engine_trait::Engine;
use crate::errors::SearchError;
use crate::game_state::position::Position;
use crate::search::iterative_deepening::SearchUpdate;
use crate::search::transposition_table::TranspositionTable;

/// Table shared between consecutive searches of one game.
pub type SharedTable = Arc<Mutex<TranspositionTable>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMessage {
    Update(SearchUpdate),
    Finished,
    Failed(String),
}

pub struct SearchTask {
    receiver: Receiver<SearchMessage>,
    cancel: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    last: Option<SearchUpdate>,
    done: bool,
    failure: Option<SearchError>,
}

impl SearchTask {
    /// Start `engine` on a copy of `position`. The table stays locked by the
    /// worker until the search ends.
    pub fn spawn(mut engine: Box<dyn Engine>, position: &Position, tt: SharedTable) -> Self {
        let (sender, receiver) = unbounded();
        let cancel = Arc::new(AtomicBool::new(false));
        let worker_cancel = Arc::clone(&cancel);
        let position = position.clone();

        let handle = thread::spawn(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                let mut table = tt.lock().unwrap_or_else(PoisonError::into_inner);
                debug!("[TASK] {} search started", engine.name());
                engine.search(&position, &mut table, &worker_cancel, &mut |update| {
                    // The owner may already be gone; the search then just runs out.
                    let _ = sender.send(SearchMessage::Update(update.clone()));
                });
            }));
            let message = match outcome {
                Ok(()) => SearchMessage::Finished,
                Err(payload) => SearchMessage::Failed(panic_message(payload.as_ref())),
            };
            let _ = sender.send(message);
        });

        Self {
            receiver,
            cancel,
            handle: Some(handle),
            last: None,
            done: false,
            failure: None,
        }
    }

    /// Block until the next completed depth. `Ok(None)` once the search has
    /// finished.
    pub fn next_update(&mut self) -> Result<Option<SearchUpdate>, SearchError> {
        if self.done {
            return self.finished_result();
        }
        match self.receiver.recv() {
            Ok(message) => self.accept(message),
            Err(_) => self.fail(SearchError::Disconnected),
        }
    }

    /// Like [`next_update`](Self::next_update) but gives up after `timeout`,
    /// returning `Ok(None)`. Use [`is_finished`](Self::is_finished) to tell
    /// a timeout from the end of the search.
    pub fn next_update_timeout(
        &mut self,
        timeout: Duration,
    ) -> Result<Option<SearchUpdate>, SearchError> {
        if self.done {
            return self.finished_result();
        }
        match self.receiver.recv_timeout(timeout) {
            Ok(message) => self.accept(message),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => self.fail(SearchError::Disconnected),
        }
    }

    /// Drain the stream and return the deepest completed update.
    pub fn wait(&mut self) -> Result<Option<SearchUpdate>, SearchError> {
        while self.next_update()?.is_some() {}
        Ok(self.last.clone())
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// The flag this task's worker polls, for cancelling from elsewhere.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Whether the end of the stream has been received.
    pub fn is_finished(&self) -> bool {
        self.done
    }

    /// Deepest update received so far.
    pub fn last_update(&self) -> Option<&SearchUpdate> {
        self.last.as_ref()
    }

    fn accept(&mut self, message: SearchMessage) -> Result<Option<SearchUpdate>, SearchError> {
        match message {
            SearchMessage::Update(update) => {
                self.last = Some(update.clone());
                Ok(Some(update))
            }
            SearchMessage::Finished => {
                self.done = true;
                self.join();
                Ok(None)
            }
            SearchMessage::Failed(reason) => {
                warn!("[TASK] search worker failed: {reason}");
                self.fail(SearchError::WorkerFailed(reason))
            }
        }
    }

    fn fail(&mut self, error: SearchError) -> Result<Option<SearchUpdate>, SearchError> {
        self.done = true;
        self.failure = Some(error.clone());
        self.join();
        Err(error)
    }

    fn finished_result(&self) -> Result<Option<SearchUpdate>, SearchError> {
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(None),
        }
    }

    fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            // Panics are caught inside the worker, so joining cannot fail.
            let _ = handle.join();
        }
    }
}

impl Drop for SearchTask {
    fn drop(&mut self) {
        self.cancel();
        self.join();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::engine_iterative::IterativeEngine;
    use crate::search::iterative_deepening::SearchLimits;

    struct PanickingEngine;

    impl Engine for PanickingEngine {
        fn name(&self) -> &str {
            "panicking"
        }

        fn search(
            &mut self,
            _position: &Position,
            _tt: &mut TranspositionTable,
            _cancel: &AtomicBool,
            _report: &mut dyn FnMut(&SearchUpdate),
        ) -> Option<SearchUpdate> {
            panic!("evaluation blew up");
        }
    }

    fn shared_table() -> SharedTable {
        Arc::new(Mutex::new(TranspositionTable::new(14)))
    }

    fn paranoid(max_depth: u8) -> Box<dyn Engine> {
        Box::new(IterativeEngine::paranoid(SearchLimits {
            max_depth,
            movetime: None,
        }))
    }

    #[test]
    fn updates_stream_then_finish() {
        let mut task = SearchTask::spawn(paranoid(2), &Position::start(), shared_table());
        let first = task.next_update().expect("no failure").expect("depth 1");
        assert_eq!(first.depth, 1);
        let last = task.wait().expect("no failure").expect("depth 2");
        assert_eq!(last.depth, 2);
        assert!(task.is_finished());
        assert_eq!(task.next_update(), Ok(None));
    }

    #[test]
    fn worker_panics_are_surfaced() {
        let mut task =
            SearchTask::spawn(Box::new(PanickingEngine), &Position::start(), shared_table());
        let error = task.wait().expect_err("worker panicked");
        assert_eq!(error, SearchError::WorkerFailed("evaluation blew up".to_string()));
        assert!(task.is_finished());
        assert_eq!(task.next_update(), Err(error));
    }

    #[test]
    fn cancel_ends_a_deep_search() {
        let tt = shared_table();
        let mut task = SearchTask::spawn(paranoid(30), &Position::start(), Arc::clone(&tt));
        let first = task.next_update().expect("no failure").expect("depth 1 completes");
        task.cancel();
        let last = task.wait().expect("no failure").expect("at least depth 1");
        assert!(last.depth >= first.depth && last.depth < 30);
        assert!(!tt.lock().expect("worker released the table").is_empty());
    }

    #[test]
    fn timeout_returns_without_an_update() {
        let tt = shared_table();
        let guard = tt.lock().expect("fresh lock");
        let mut task = SearchTask::spawn(paranoid(2), &Position::start(), Arc::clone(&tt));
        assert_eq!(task.next_update_timeout(Duration::from_millis(20)), Ok(None));
        assert!(!task.is_finished());
        drop(guard);
        assert!(task.wait().expect("no failure").is_some());
    }
}
