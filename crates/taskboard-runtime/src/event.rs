//! Board events published on every commit.

use std::sync::Arc;

use taskboard_core::{Applied, Change};
use taskboard_models::Board;

/// One committed mutation and the board it produced.
#[derive(Debug, Clone)]
pub struct BoardEvent {
    /// Version of `board`.
    pub version: u64,
    /// What changed.
    pub change: Change,
    /// The committed board.
    pub board: Arc<Board>,
}

impl From<&Applied> for BoardEvent {
    fn from(applied: &Applied) -> Self {
        Self {
            version: applied.board.version,
            change: applied.change.clone(),
            board: Arc::clone(&applied.board),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_from_applied() {
        let mut board = Board::new();
        board.version = 3;
        let applied = Applied {
            feedback: "ok".to_string(),
            change: Change::ListCreated {
                list: "Raid".to_string(),
            },
            board: Arc::new(board),
        };

        let event = BoardEvent::from(&applied);
        assert_eq!(event.version, 3);
        assert_eq!(event.change, applied.change);
        assert!(Arc::ptr_eq(&event.board, &applied.board));
    }
}
