use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

use super::{load, Snapshot, SnapshotError, SnapshotSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Dataset {
    /// The line-item budget ledger.
    Ledger,
    /// The public-works project list.
    PublicWorks,
}

impl Dataset {
    pub(crate) fn all() -> &'static [Dataset] {
        &[Self::Ledger, Self::PublicWorks]
    }

    fn index(self) -> usize {
        match self {
            Self::Ledger => 0,
            Self::PublicWorks => 1,
        }
    }
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ledger => write!(f, "budget ledger"),
            Self::PublicWorks => write!(f, "public works"),
        }
    }
}

#[derive(Debug)]
pub(crate) struct LoadOutcome {
    pub(crate) dataset: Dataset,
    pub(crate) generation: u64,
    pub(crate) result: Result<Snapshot, SnapshotError>,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    cancel: Option<Arc<AtomicBool>>,
}

pub(crate) struct Loader {
    tx: Sender<LoadOutcome>,
    rx: Receiver<LoadOutcome>,
    slots: [Slot; 2],
}

impl Loader {
    pub(crate) fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            slots: Default::default(),
        }
    }

    /// Start loading `dataset` from `source`, superseding any load of the
    /// same dataset still in flight. Returns the request's generation.
    pub(crate) fn request(&mut self, dataset: Dataset, source: SnapshotSource) -> u64 {
        let (generation, cancel) = self.begin(dataset);
        let tx = self.tx.clone();

        let spawned = std::thread::Builder::new()
            .name(format!("load-{}", dataset.index()))
            .spawn(move || {
                let result = load(&source);
                if cancel.load(Ordering::Relaxed) {
                    tracing::debug!("Load of {dataset} #{generation} cancelled");
                    return;
                }
                // The receiver is gone once the app has quit.
                let _ = tx.send(LoadOutcome {
                    dataset,
                    generation,
                    result,
                });
            });
        if let Err(e) = spawned {
            tracing::error!("Failed to start load of {dataset}: {e}");
            self.slots[dataset.index()].cancel = None;
        }
        generation
    }

    /// Bump the generation and cancel the previous request.
    fn begin(&mut self, dataset: Dataset) -> (u64, Arc<AtomicBool>) {
        let slot = &mut self.slots[dataset.index()];
        if let Some(previous) = slot.cancel.take() {
            previous.store(true, Ordering::Relaxed);
        }
        slot.generation += 1;
        let cancel = Arc::new(AtomicBool::new(false));
        slot.cancel = Some(Arc::clone(&cancel));
        (slot.generation, cancel)
    }

    /// Keep `outcome` only if it answers the latest request for its dataset.
    fn accept(&mut self, outcome: LoadOutcome) -> Option<LoadOutcome> {
        let slot = &mut self.slots[outcome.dataset.index()];
        if outcome.generation != slot.generation {
            tracing::debug!(
                "Dropping stale load of {} (#{}, current #{})",
                outcome.dataset,
                outcome.generation,
                slot.generation
            );
            return None;
        }
        slot.cancel = None;
        Some(outcome)
    }

    /// Collect every finished, current load without blocking.
    pub(crate) fn poll(&mut self) -> Vec<LoadOutcome> {
        let mut done = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(outcome) => done.extend(self.accept(outcome)),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        done
    }

    /// Block until the next current load finishes or `timeout` passes.
    pub(crate) fn wait(&mut self, timeout: Duration) -> Option<LoadOutcome> {
        let deadline = std::time::Instant::now() + timeout;
        loop {
            let left = deadline.saturating_duration_since(std::time::Instant::now());
            let outcome = self.rx.recv_timeout(left).ok()?;
            if let Some(outcome) = self.accept(outcome) {
                return Some(outcome);
            }
        }
    }

    pub(crate) fn is_loading(&self, dataset: Dataset) -> bool {
        self.slots[dataset.index()].cancel.is_some()
    }

    pub(crate) fn cancel_all(&mut self) {
        for slot in &mut self.slots {
            if let Some(cancel) = slot.cancel.take() {
                cancel.store(true, Ordering::Relaxed);
            }
        }
    }
}

impl Drop for Loader {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod loader_tests;
