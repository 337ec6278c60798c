use futures::Stream;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tracing::{debug, trace};
use crate::state::ScreenState;

type Slot = Option<mpsc::UnboundedSender<ScreenState>>;

/// Carries states from a screen to at most one attached view.
///
/// States emitted while nothing is attached are dropped, not buffered: a view
/// that (re)attaches must request a reload to get structural state back.
/// Attaching replaces the previous observer, whose stream then ends.
#[derive(Debug, Clone, Default)]
pub struct StateBridge {
    observer: Arc<Mutex<Slot>>,
}

/// Receiving end handed to a view by `StateBridge::attach`
#[derive(Debug)]
pub struct StateObserver {
    rx: mpsc::UnboundedReceiver<ScreenState>,
}

impl StateBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self) -> StateObserver {
        let (tx, rx) = mpsc::unbounded_channel();
        if self.slot().replace(tx).is_some() {
            debug!("Replacing attached observer");
        }
        StateObserver { rx }
    }

    pub fn detach(&self) {
        if self.slot().take().is_some() {
            debug!("Observer detached");
        }
    }

    pub fn has_observer(&self) -> bool {
        self.slot().as_ref().is_some_and(|tx| !tx.is_closed())
    }

    /// Deliver `state` to the attached observer. Returns `false` if it was dropped.
    pub fn emit(&self, state: ScreenState) -> bool {
        let mut slot = self.slot();

        let Some(tx) = slot.as_ref() else {
            debug!(?state, "No observer attached, dropping state");
            return false;
        };

        match tx.send(state) {
            Ok(()) => true,
            Err(mpsc::error::SendError(state)) => {
                // Observer went away without detaching
                *slot = None;
                debug!(?state, "Observer gone, dropping state");
                false
            }
        }
    }

    fn slot(&self) -> MutexGuard<'_, Slot> {
        self.observer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StateObserver {
    /// Next state, or `None` once this observer was replaced or detached and
    /// everything delivered to it has been read.
    pub async fn next(&mut self) -> Option<ScreenState> {
        let state = self.rx.recv().await;
        trace!(?state, "Observed state");
        state
    }

    /// Next state if one is already waiting
    pub fn try_next(&mut self) -> Option<ScreenState> {
        self.rx.try_recv().ok()
    }
}

impl Stream for StateObserver {
    type Item = ScreenState;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
