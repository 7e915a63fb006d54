//! Stage transition controller
//!
//! Turns a move message (deal, source stage, target stage, origin surface)
//! into at most one remote mutation. Nothing local changes before the
//! remote store confirms, so a failed move needs no rollback: the board
//! simply re-renders from the untouched cache.
//!
//! Policy:
//! - a move to the same stage is a no-op;
//! - board gestures can neither reach nor leave `ClosedLost` (that column is
//!   not on the board); direct edits can;
//! - while a move of a deal is in flight, further moves of that deal are
//!   refused rather than queued.

use std::collections::HashSet;
use std::sync::Arc;

use dealflow_domain::constants::{MSG_MOVE_FAILED, MSG_MOVE_PENDING, MSG_MOVE_REJECTED_LOST};
use dealflow_domain::{CrmError, Deal, Notification, Stage};
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::deals::ports::DealRepository;
use crate::notification_ports::Notifier;
use crate::query::{QueryCache, ResourceKey};

/// Surface the move was issued from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOrigin {
    /// Drag-and-drop (or keyboard equivalent) on the kanban board.
    Board,
    /// Stage field changed through the deal editor.
    DirectEdit,
}

/// Request to move one deal between stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageMove {
    pub deal_id: String,
    pub from: Stage,
    pub to: Stage,
    pub origin: MoveOrigin,
}

impl StageMove {
    pub fn board(deal_id: impl Into<String>, from: Stage, to: Stage) -> Self {
        Self { deal_id: deal_id.into(), from, to, origin: MoveOrigin::Board }
    }

    pub fn edit(deal_id: impl Into<String>, from: Stage, to: Stage) -> Self {
        Self { deal_id: deal_id.into(), from, to, origin: MoveOrigin::DirectEdit }
    }
}

/// Why a move was refused without contacting the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Board gesture touching the hidden `ClosedLost` column.
    LostNotOnBoard,
}

/// Result of a move request. Errors are reported here, never thrown.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionOutcome {
    /// Target equals the current stage; nothing was sent.
    Unchanged,
    /// The remote store accepted the move.
    Moved(Deal),
    Rejected(RejectReason),
    /// Another move of the same deal has not resolved yet.
    InFlight,
    Failed(CrmError),
}

impl TransitionOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, Self::Moved(_))
    }
}

/// Mediates user-initiated stage changes.
pub struct StageTransitionController {
    deals: Arc<dyn DealRepository>,
    cache: Arc<QueryCache>,
    notifier: Arc<dyn Notifier>,
    pending: Mutex<HashSet<String>>,
}

impl StageTransitionController {
    pub fn new(
        deals: Arc<dyn DealRepository>,
        cache: Arc<QueryCache>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { deals, cache, notifier, pending: Mutex::new(HashSet::new()) }
    }

    /// Apply a move message.
    ///
    /// On success the deal list and dashboard are invalidated before this
    /// returns, so the caller's next read sees the new stage.
    #[instrument(skip(self), fields(deal_id = %stage_move.deal_id, from = %stage_move.from, to = %stage_move.to))]
    pub async fn request_transition(&self, stage_move: StageMove) -> TransitionOutcome {
        if stage_move.from == stage_move.to {
            debug!("target equals current stage; ignoring");
            return TransitionOutcome::Unchanged;
        }

        if let Err(reason) = check_policy(&stage_move) {
            debug!(?reason, "move rejected by policy");
            self.notifier.notify(Notification::warning(MSG_MOVE_REJECTED_LOST));
            return TransitionOutcome::Rejected(reason);
        }

        let Some(_pending) = PendingGuard::acquire(&self.pending, &stage_move.deal_id) else {
            debug!("move already in flight for this deal");
            self.notifier.notify(Notification::warning(MSG_MOVE_PENDING));
            return TransitionOutcome::InFlight;
        };

        match self.deals.update_stage(&stage_move.deal_id, stage_move.to).await {
            Ok(deal) => {
                self.cache.invalidate_many(&ResourceKey::DEAL_DEPENDENTS);
                info!("deal moved");
                self.notifier
                    .notify(Notification::success(format!("Opportunity moved to {}", stage_move.to.label())));
                TransitionOutcome::Moved(deal)
            }
            Err(err) => {
                warn!(error = %err, error_type = err.label(), "deal move failed");
                self.notifier.notify(Notification::error(MSG_MOVE_FAILED));
                TransitionOutcome::Failed(err)
            }
        }
    }

    /// Move a deal by id, reading its current stage from the cached deal
    /// list. Treated as a direct edit.
    pub async fn move_deal(&self, deal_id: &str, to: Stage) -> TransitionOutcome {
        let current = match self.cache.deals().await.into_result() {
            Ok(deals) => deals.iter().find(|deal| deal.id == deal_id).map(|deal| deal.stage),
            Err(err) => {
                warn!(deal_id, error = %err, "cannot resolve current stage");
                self.notifier.notify(Notification::error(MSG_MOVE_FAILED));
                return TransitionOutcome::Failed(err);
            }
        };

        match current {
            Some(from) => self.request_transition(StageMove::edit(deal_id, from, to)).await,
            None => {
                warn!(deal_id, "deal not found in cached list");
                self.notifier.notify(Notification::error(MSG_MOVE_FAILED));
                TransitionOutcome::Failed(CrmError::NotFound(format!("deal {deal_id}")))
            }
        }
    }

    /// Whether a move of `deal_id` is currently awaiting the remote store.
    pub fn is_pending(&self, deal_id: &str) -> bool {
        self.pending.lock().contains(deal_id)
    }
}

fn check_policy(stage_move: &StageMove) -> Result<(), RejectReason> {
    let touches_hidden_column = !stage_move.from.is_on_board() || !stage_move.to.is_on_board();
    if stage_move.origin == MoveOrigin::Board && touches_hidden_column {
        return Err(RejectReason::LostNotOnBoard);
    }
    Ok(())
}

/// Marks a deal as having a move in flight until dropped.
struct PendingGuard<'a> {
    pending: &'a Mutex<HashSet<String>>,
    deal_id: String,
}

impl<'a> PendingGuard<'a> {
    fn acquire(pending: &'a Mutex<HashSet<String>>, deal_id: &str) -> Option<Self> {
        if pending.lock().insert(deal_id.to_string()) {
            Some(Self { pending, deal_id: deal_id.to_string() })
        } else {
            None
        }
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.pending.lock().remove(&self.deal_id);
    }
}
