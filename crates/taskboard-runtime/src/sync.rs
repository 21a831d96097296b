//! SyncChannel - fans committed boards out to views.
//!
//! Every commit goes out twice: as a [`BoardEvent`] on a broadcast channel
//! for push subscribers, and as the latest snapshot on a watch channel that
//! poll-based views resample. The watch value only ever moves to a higher
//! version.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::trace;

use taskboard_models::Board;
use taskboard_views::Projector;

use crate::event::BoardEvent;
use crate::view::{Delivery, ViewHandle};

/// Publisher side of board synchronization. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SyncChannel {
    events: broadcast::Sender<BoardEvent>,
    latest: Arc<watch::Sender<Arc<Board>>>,
}

impl SyncChannel {
    /// Creates a channel whose latest board is `initial`.
    pub fn new(initial: Arc<Board>, capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        let (latest, _) = watch::channel(initial);
        Self {
            events,
            latest: Arc::new(latest),
        }
    }

    /// Publishes a commit. Events older than the latest board are still
    /// broadcast but never roll the latest snapshot back.
    pub fn publish(&self, event: BoardEvent) {
        let board = Arc::clone(&event.board);
        self.latest.send_if_modified(|current| {
            if board.version > current.version {
                *current = board;
                true
            } else {
                false
            }
        });

        trace!(
            version = event.version,
            change = event.change.kind(),
            subscribers = self.events.receiver_count(),
            "board event published"
        );
        // no subscribers is fine
        let _ = self.events.send(event);
    }

    /// Latest published board.
    pub fn latest(&self) -> Arc<Board> {
        Arc::clone(&self.latest.borrow())
    }

    /// Subscribes to every future board event.
    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.events.subscribe()
    }

    /// Watches the latest board.
    pub fn watch(&self) -> watch::Receiver<Arc<Board>> {
        self.latest.subscribe()
    }

    /// Attaches a live view. The view is projected from the latest board
    /// immediately and then kept current according to `delivery`.
    pub fn attach<P: Projector>(&self, projector: P, delivery: Delivery) -> ViewHandle<P::View> {
        ViewHandle::spawn(self, projector, delivery)
    }
}
