use serde::Serialize;
use crate::models::{MatchId, MatchStatus, ProfileId};

/// Event published after a match edge changes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    MatchRequested {
        match_id: MatchId,
        initiator_id: ProfileId,
        receiver_id: ProfileId,
    },
    MatchResponded {
        match_id: MatchId,
        initiator_id: ProfileId,
        receiver_id: ProfileId,
        status: MatchStatus,
    },
}

impl Notification {
    /// Profile that should hear about this event
    pub fn recipient(&self) -> ProfileId {
        match self {
            Notification::MatchRequested { receiver_id, .. } => *receiver_id,
            Notification::MatchResponded { initiator_id, .. } => *initiator_id,
        }
    }
}

/// Fire-and-forget notification fan-out
///
/// Implementations must not block; delivery failures are theirs to log.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Sink that emits each notification as a structured log event
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn notify(&self, notification: Notification) {
        let payload = serde_json::to_string(&notification).unwrap_or_default();
        tracing::info!(recipient = notification.recipient(), %payload, "notification");
    }
}
