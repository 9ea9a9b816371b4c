use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use crate::core::{exclusion_set, Matcher, MatchResult};
use crate::models::{
    ConnectionView, Decision, Direction, MatchEdge, MatchId, MatchStatus, Profile, ProfileDraft,
    ProfileId, ProfileView,
};
use crate::services::notify::{Notification, NotificationSink};
use crate::services::store::{ProfileStore, RelationshipGraph, StoreError};

/// Errors surfaced by the connection workflow
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not authorized: {0}")]
    Authorization(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(#[source] StoreError),
}

impl From<StoreError> for MatchError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(message) => MatchError::NotFound(message),
            StoreError::Conflict(message) => MatchError::Conflict(message),
            other => MatchError::Store(other),
        }
    }
}

/// Ties the pure matcher to the profile store, relationship graph and
/// notification sink
#[derive(Clone)]
pub struct ConnectionService {
    profiles: Arc<dyn ProfileStore>,
    graph: Arc<dyn RelationshipGraph>,
    notifier: Arc<dyn NotificationSink>,
    matcher: Matcher,
}

impl ConnectionService {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        graph: Arc<dyn RelationshipGraph>,
        notifier: Arc<dyn NotificationSink>,
        matcher: Matcher,
    ) -> Self {
        Self {
            profiles,
            graph,
            notifier,
            matcher,
        }
    }

    pub fn profiles(&self) -> &Arc<dyn ProfileStore> {
        &self.profiles
    }

    /// Load the caller's profile; a profile must exist before matching
    pub async fn profile(&self, owner_id: &str) -> Result<Profile, MatchError> {
        self.profiles
            .get_by_owner(owner_id)
            .await?
            .ok_or_else(|| MatchError::NotFound(format!("No profile for account {}", owner_id)))
    }

    pub async fn save_profile(&self, owner_id: &str, draft: &ProfileDraft) -> Result<Profile, MatchError> {
        let profile = self.profiles.upsert_for_owner(owner_id, draft).await?;
        tracing::info!("Saved profile {} for account {}", profile.id, owner_id);
        Ok(profile)
    }

    /// Candidate pool and exclusion set for one request
    async fn candidate_snapshot(
        &self,
        requester: &Profile,
    ) -> Result<(Vec<Profile>, HashSet<ProfileId>), MatchError> {
        let edges = self.graph.edges_touching(requester.id).await?;
        let excluded = exclusion_set(requester.id, &edges);
        let pool = self.profiles.list_excluding(&excluded).await?;

        tracing::debug!(
            "Profile {}: {} edges, {} excluded, {} candidates",
            requester.id,
            edges.len(),
            excluded.len(),
            pool.len()
        );

        Ok((pool, excluded))
    }

    /// Eligible candidates ranked by affinity score
    pub async fn potential_matches(&self, owner_id: &str) -> Result<MatchResult, MatchError> {
        let requester = self.profile(owner_id).await?;
        let (pool, excluded) = self.candidate_snapshot(&requester).await?;

        let result = self.matcher.rank(&requester, pool, &excluded);

        tracing::info!(
            "Returning {} potential matches for profile {} (from {} candidates)",
            result.matches.len(),
            requester.id,
            result.total_candidates
        );
        Ok(result)
    }

    /// Eligible candidates whose goals complement the requester's
    pub async fn suggested_matches(&self, owner_id: &str) -> Result<MatchResult, MatchError> {
        let requester = self.profile(owner_id).await?;
        let (pool, excluded) = self.candidate_snapshot(&requester).await?;

        let result = self.matcher.suggest(&requester, pool, &excluded);

        tracing::info!(
            "Returning {} suggested matches for profile {} (from {} candidates)",
            result.matches.len(),
            requester.id,
            result.total_candidates
        );
        Ok(result)
    }

    /// Send a connection request from the caller's profile
    pub async fn request_match(&self, owner_id: &str, receiver_id: ProfileId) -> Result<MatchEdge, MatchError> {
        let requester = self.profile(owner_id).await?;
        self.request_match_from(requester.id, receiver_id).await
    }

    /// Create a pending edge from `initiator_id` to `receiver_id`
    pub async fn request_match_from(
        &self,
        initiator_id: ProfileId,
        receiver_id: ProfileId,
    ) -> Result<MatchEdge, MatchError> {
        if initiator_id == receiver_id {
            return Err(MatchError::Conflict("Cannot request a match with yourself".to_string()));
        }

        if self.profiles.get_by_id(receiver_id).await?.is_none() {
            return Err(MatchError::NotFound(format!("Profile {} not found", receiver_id)));
        }

        let existing = self.graph.edges_touching(initiator_id).await?;
        if let Some(edge) = existing
            .iter()
            .find(|e| e.is_active() && e.connects(initiator_id, receiver_id))
        {
            return Err(MatchError::Conflict(format!(
                "Match {} with profile {} is already {}",
                edge.id,
                receiver_id,
                edge.status.as_str()
            )));
        }

        let edge = self.graph.create_edge(initiator_id, receiver_id).await?;

        tracing::info!("Match {} requested: {} -> {}", edge.id, initiator_id, receiver_id);

        self.notifier.notify(Notification::MatchRequested {
            match_id: edge.id,
            initiator_id,
            receiver_id,
        });

        Ok(edge)
    }

    /// Answer a pending request addressed to the caller's profile
    pub async fn respond(&self, match_id: MatchId, owner_id: &str, decision: Decision) -> Result<MatchEdge, MatchError> {
        let edge = self.load_edge(match_id).await?;

        let responder = self.profiles.get_by_owner(owner_id).await?.ok_or_else(|| {
            MatchError::Authorization(format!("Only the receiver may respond to match {}", match_id))
        })?;

        self.apply_response(edge, responder.id, decision).await
    }

    /// Answer a pending request as `responder_id`
    pub async fn respond_as(
        &self,
        match_id: MatchId,
        responder_id: ProfileId,
        decision: Decision,
    ) -> Result<MatchEdge, MatchError> {
        let edge = self.load_edge(match_id).await?;
        self.apply_response(edge, responder_id, decision).await
    }

    async fn load_edge(&self, match_id: MatchId) -> Result<MatchEdge, MatchError> {
        self.graph
            .get_edge(match_id)
            .await?
            .ok_or_else(|| MatchError::NotFound(format!("Match {} not found", match_id)))
    }

    async fn apply_response(
        &self,
        edge: MatchEdge,
        responder_id: ProfileId,
        decision: Decision,
    ) -> Result<MatchEdge, MatchError> {
        if edge.receiver_id != responder_id {
            return Err(MatchError::Authorization(format!(
                "Only the receiver may respond to match {}",
                edge.id
            )));
        }

        let next: MatchStatus = edge.status.transition(decision).map_err(|current| {
            MatchError::Conflict(format!("Match {} is already {}", edge.id, current.as_str()))
        })?;

        let updated = self.graph.set_status(edge.id, next).await?;

        tracing::info!("Match {} {} by profile {}", updated.id, updated.status.as_str(), responder_id);

        self.notifier.notify(Notification::MatchResponded {
            match_id: updated.id,
            initiator_id: updated.initiator_id,
            receiver_id: updated.receiver_id,
            status: updated.status,
        });

        Ok(updated)
    }

    /// The caller's edges with the counterpart's profile
    ///
    /// Contact details are revealed only on accepted edges.
    pub async fn connections(&self, owner_id: &str) -> Result<Vec<ConnectionView>, MatchError> {
        let me = self.profile(owner_id).await?;
        let edges = self.graph.edges_touching(me.id).await?;

        let mut connections = Vec::with_capacity(edges.len());
        for edge in edges {
            let counterpart_id = edge.counterpart(me.id);
            let Some(counterpart) = self.profiles.get_by_id(counterpart_id).await? else {
                tracing::warn!("Match {} references missing profile {}", edge.id, counterpart_id);
                continue;
            };

            let counterpart = if edge.status == MatchStatus::Accepted {
                ProfileView::revealed(&counterpart)
            } else {
                ProfileView::public(&counterpart)
            };

            connections.push(ConnectionView {
                match_id: edge.id,
                status: edge.status,
                direction: if edge.initiator_id == me.id { Direction::Outgoing } else { Direction::Incoming },
                counterpart,
                created_at: edge.created_at,
                responded_at: edge.responded_at,
            });
        }

        Ok(connections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::memory::InMemoryStore;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<Notification>>,
    }

    impl NotificationSink for RecordingNotifier {
        fn notify(&self, notification: Notification) {
            self.sent.lock().unwrap().push(notification);
        }
    }

    fn draft(goal: &[&str], profession: &[&str]) -> ProfileDraft {
        ProfileDraft {
            alias: "Member".to_string(),
            bio: String::new(),
            age_range: "25_34".to_string(),
            contact_method: "email".to_string(),
            contact_value: "member@example.com".to_string(),
            profession: profession.iter().map(|v| v.to_string()).collect(),
            goal: goal.iter().map(|v| v.to_string()).collect(),
            interests: vec![],
            hobbies: vec![],
            is_public: true,
        }
    }

    fn service(store: Arc<InMemoryStore>, notifier: Arc<RecordingNotifier>) -> ConnectionService {
        ConnectionService::new(store.clone(), store, notifier, Matcher::with_default_weights())
    }

    #[tokio::test]
    async fn test_missing_requester_profile_is_not_found() {
        let svc = service(Arc::new(InMemoryStore::new()), Arc::default());

        assert!(matches!(svc.potential_matches("nobody").await, Err(MatchError::NotFound(_))));
        assert!(matches!(svc.suggested_matches("nobody").await, Err(MatchError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_self_match_rejected_without_edge() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(store.clone(), Arc::default());
        let me = svc.save_profile("acct-1", &draft(&[], &[])).await.unwrap();

        let result = svc.request_match("acct-1", me.id).await;

        assert!(matches!(result, Err(MatchError::Conflict(_))));
        assert_eq!(store.edge_count().await, 0);
    }

    #[tokio::test]
    async fn test_request_notifies_receiver() {
        let store = Arc::new(InMemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let svc = service(store, notifier.clone());
        let a = svc.save_profile("acct-a", &draft(&[], &[])).await.unwrap();
        let b = svc.save_profile("acct-b", &draft(&[], &[])).await.unwrap();

        let edge = svc.request_match("acct-a", b.id).await.unwrap();

        assert_eq!(edge.status, MatchStatus::Pending);
        assert_eq!((edge.initiator_id, edge.receiver_id), (a.id, b.id));
        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient(), b.id);
    }

    #[tokio::test]
    async fn test_reverse_request_conflicts_while_pending() {
        let svc = service(Arc::new(InMemoryStore::new()), Arc::default());
        let a = svc.save_profile("acct-a", &draft(&[], &[])).await.unwrap();
        let b = svc.save_profile("acct-b", &draft(&[], &[])).await.unwrap();

        svc.request_match("acct-a", b.id).await.unwrap();
        let reverse = svc.request_match("acct-b", a.id).await;

        assert!(matches!(reverse, Err(MatchError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_unknown_receiver_is_not_found() {
        let svc = service(Arc::new(InMemoryStore::new()), Arc::default());
        svc.save_profile("acct-a", &draft(&[], &[])).await.unwrap();

        assert!(matches!(svc.request_match("acct-a", 404).await, Err(MatchError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_only_receiver_may_respond() {
        let svc = service(Arc::new(InMemoryStore::new()), Arc::default());
        let _a = svc.save_profile("acct-a", &draft(&[], &[])).await.unwrap();
        let b = svc.save_profile("acct-b", &draft(&[], &[])).await.unwrap();
        svc.save_profile("acct-c", &draft(&[], &[])).await.unwrap();
        let edge = svc.request_match("acct-a", b.id).await.unwrap();

        let by_initiator = svc.respond(edge.id, "acct-a", Decision::Accepted).await;
        let by_stranger = svc.respond(edge.id, "acct-c", Decision::Accepted).await;
        let by_nobody = svc.respond(edge.id, "acct-z", Decision::Accepted).await;

        assert!(matches!(by_initiator, Err(MatchError::Authorization(_))));
        assert!(matches!(by_stranger, Err(MatchError::Authorization(_))));
        assert!(matches!(by_nobody, Err(MatchError::Authorization(_))));

        let accepted = svc.respond(edge.id, "acct-b", Decision::Accepted).await.unwrap();
        assert_eq!(accepted.status, MatchStatus::Accepted);
    }

    #[tokio::test]
    async fn test_terminal_edge_is_immutable() {
        let svc = service(Arc::new(InMemoryStore::new()), Arc::default());
        svc.save_profile("acct-a", &draft(&[], &[])).await.unwrap();
        let b = svc.save_profile("acct-b", &draft(&[], &[])).await.unwrap();
        let edge = svc.request_match("acct-a", b.id).await.unwrap();

        svc.respond_as(edge.id, b.id, Decision::Rejected).await.unwrap();
        let again = svc.respond_as(edge.id, b.id, Decision::Accepted).await;

        assert!(matches!(again, Err(MatchError::Conflict(_))));
        let connections = svc.connections("acct-b").await.unwrap();
        assert_eq!(connections[0].status, MatchStatus::Rejected);
    }

    #[tokio::test]
    async fn test_respond_to_missing_edge() {
        let svc = service(Arc::new(InMemoryStore::new()), Arc::default());
        let b = svc.save_profile("acct-b", &draft(&[], &[])).await.unwrap();

        assert!(matches!(svc.respond_as(77, b.id, Decision::Accepted).await, Err(MatchError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_contact_revealed_only_after_acceptance() {
        let svc = service(Arc::new(InMemoryStore::new()), Arc::default());
        svc.save_profile("acct-a", &draft(&[], &[])).await.unwrap();
        let b = svc.save_profile("acct-b", &draft(&[], &[])).await.unwrap();
        let edge = svc.request_match("acct-a", b.id).await.unwrap();

        let pending = svc.connections("acct-a").await.unwrap();
        assert_eq!(pending[0].direction, Direction::Outgoing);
        assert!(pending[0].counterpart.contact_value.is_none());

        svc.respond_as(edge.id, b.id, Decision::Accepted).await.unwrap();

        let accepted = svc.connections("acct-a").await.unwrap();
        assert_eq!(accepted[0].counterpart.contact_value.as_deref(), Some("member@example.com"));
        let incoming = svc.connections("acct-b").await.unwrap();
        assert_eq!(incoming[0].direction, Direction::Incoming);
    }

    #[tokio::test]
    async fn test_rejected_pair_never_resurfaces() {
        let svc = service(Arc::new(InMemoryStore::new()), Arc::default());
        svc.save_profile("acct-a", &draft(&["networking"], &["technology"])).await.unwrap();
        let b = svc.save_profile("acct-b", &draft(&[], &["technology"])).await.unwrap();

        let before = svc.potential_matches("acct-a").await.unwrap();
        assert_eq!(before.matches.len(), 1);

        let edge = svc.request_match("acct-a", b.id).await.unwrap();
        svc.respond_as(edge.id, b.id, Decision::Rejected).await.unwrap();

        assert!(svc.potential_matches("acct-a").await.unwrap().matches.is_empty());
        assert!(svc.suggested_matches("acct-a").await.unwrap().matches.is_empty());
        assert!(svc.potential_matches("acct-b").await.unwrap().matches.is_empty());
    }
}
