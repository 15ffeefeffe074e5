//! Background star catalog load.
//!
//! The fetch runs once on a worker thread and hands its result back over a
//! bounded channel. The render loop calls [`PendingStarField::poll`] once per
//! frame and keeps drawing an empty field until the result arrives.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, RecvError, TryRecvError};
use log::{debug, warn};

use crate::star_field::{CatalogSource, FetchError, ReferencePoint, StarField, StarFieldParams};

/// Handle to an in-flight star field load.
pub struct PendingStarField {
    receiver: Receiver<Result<StarField, FetchError>>,
    worker: Option<JoinHandle<()>>,
}

/// Start loading the star field around `reference` on a worker thread.
pub fn spawn_load(
    reference: ReferencePoint,
    source: Arc<dyn CatalogSource>,
    params: StarFieldParams,
) -> PendingStarField {
    let (sender, receiver) = bounded(1);

    let worker = thread::spawn(move || {
        debug!("Star catalog worker started for {}", reference.name);
        let result = StarField::try_load(&reference, source.as_ref(), &params);
        if sender.send(result).is_err() {
            debug!("Star catalog result for {} dropped, session ended", reference.name);
        }
    });

    PendingStarField {
        receiver,
        worker: Some(worker),
    }
}

impl PendingStarField {
    /// Check for a finished load without blocking.
    ///
    /// Returns `None` while the worker is still running. A worker that exits
    /// without sending (a panic inside the source) is reported as
    /// [`FetchError::WorkerLost`].
    pub fn poll(&mut self) -> Option<Result<StarField, FetchError>> {
        match self.receiver.try_recv() {
            Ok(result) => {
                self.join_worker();
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.join_worker();
                Some(Err(FetchError::WorkerLost))
            }
        }
    }

    /// Block until the load finishes.
    pub fn wait(mut self) -> Result<StarField, FetchError> {
        let result = match self.receiver.recv() {
            Ok(result) => result,
            Err(RecvError) => Err(FetchError::WorkerLost),
        };
        self.join_worker();
        result
    }

    fn join_worker(&mut self) {
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                warn!("Star catalog worker panicked");
            }
        }
    }
}
