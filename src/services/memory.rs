use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashSet};
use tokio::sync::RwLock;
use crate::models::{MatchEdge, MatchId, MatchStatus, Profile, ProfileDraft, ProfileId, TaxonomyOption};
use crate::services::store::{ProfileStore, RelationshipGraph, StoreError, TaxonomySource};

#[derive(Debug, Default)]
struct MemoryState {
    profiles: BTreeMap<ProfileId, Profile>,
    edges: BTreeMap<MatchId, MatchEdge>,
    options: Vec<TaxonomyOption>,
    last_profile_id: ProfileId,
    last_match_id: MatchId,
}

/// In-process store backing all collaborator traits
///
/// Used by tests and by `storage.backend = "memory"` deployments. Ids are
/// assigned sequentially starting at 1.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully formed profile, keeping its id
    pub async fn insert_profile(&self, profile: Profile) {
        let mut state = self.state.write().await;
        state.last_profile_id = state.last_profile_id.max(profile.id);
        state.profiles.insert(profile.id, profile);
    }

    /// Insert a fully formed edge, keeping its id and status
    pub async fn insert_edge(&self, edge: MatchEdge) {
        let mut state = self.state.write().await;
        state.last_match_id = state.last_match_id.max(edge.id);
        state.edges.insert(edge.id, edge);
    }

    pub async fn edge_count(&self) -> usize {
        self.state.read().await.edges.len()
    }
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn get_by_id(&self, id: ProfileId) -> Result<Option<Profile>, StoreError> {
        Ok(self.state.read().await.profiles.get(&id).cloned())
    }

    async fn get_by_owner(&self, owner_id: &str) -> Result<Option<Profile>, StoreError> {
        let state = self.state.read().await;
        Ok(state.profiles.values().find(|p| p.owner_id == owner_id).cloned())
    }

    async fn list_excluding(&self, ids: &HashSet<ProfileId>) -> Result<Vec<Profile>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .profiles
            .values()
            .filter(|p| p.is_public && !ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn upsert_for_owner(&self, owner_id: &str, draft: &ProfileDraft) -> Result<Profile, StoreError> {
        let mut state = self.state.write().await;
        let now = Utc::now();

        let existing = state
            .profiles
            .values()
            .find(|p| p.owner_id == owner_id)
            .map(|p| (p.id, p.created_at));

        let (id, created_at) = match existing {
            Some(found) => found,
            None => {
                state.last_profile_id += 1;
                (state.last_profile_id, Some(now))
            }
        };

        let profile = Profile {
            id,
            owner_id: owner_id.to_string(),
            alias: draft.alias.clone(),
            bio: draft.bio.clone(),
            age_range: draft.age_range.clone(),
            contact_method: draft.contact_method.clone(),
            contact_value: draft.contact_value.clone(),
            profession: draft.profession.clone(),
            goal: draft.goal.clone(),
            interests: draft.interests.clone(),
            hobbies: draft.hobbies.clone(),
            is_public: draft.is_public,
            created_at,
            updated_at: Some(now),
        };

        state.profiles.insert(id, profile.clone());
        Ok(profile)
    }
}

#[async_trait]
impl RelationshipGraph for InMemoryStore {
    async fn edges_touching(&self, profile_id: ProfileId) -> Result<Vec<MatchEdge>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .edges
            .values()
            .filter(|e| e.touches(profile_id))
            .cloned()
            .collect())
    }

    async fn get_edge(&self, id: MatchId) -> Result<Option<MatchEdge>, StoreError> {
        Ok(self.state.read().await.edges.get(&id).cloned())
    }

    async fn create_edge(&self, initiator_id: ProfileId, receiver_id: ProfileId) -> Result<MatchEdge, StoreError> {
        let mut state = self.state.write().await;

        if state
            .edges
            .values()
            .any(|e| e.is_active() && e.connects(initiator_id, receiver_id))
        {
            return Err(StoreError::Conflict(format!(
                "Active match already exists between {} and {}",
                initiator_id, receiver_id
            )));
        }

        state.last_match_id += 1;
        let edge = MatchEdge {
            id: state.last_match_id,
            initiator_id,
            receiver_id,
            status: MatchStatus::Pending,
            created_at: Utc::now(),
            responded_at: None,
        };

        state.edges.insert(edge.id, edge.clone());
        Ok(edge)
    }

    async fn set_status(&self, id: MatchId, status: MatchStatus) -> Result<MatchEdge, StoreError> {
        let mut state = self.state.write().await;
        let edge = state
            .edges
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("Match {} not found", id)))?;

        if edge.status.is_terminal() {
            return Err(StoreError::Conflict(format!(
                "Match {} is already {}",
                id,
                edge.status.as_str()
            )));
        }

        edge.status = status;
        edge.responded_at = Some(Utc::now());
        Ok(edge.clone())
    }
}

#[async_trait]
impl TaxonomySource for InMemoryStore {
    async fn list_options(&self) -> Result<Vec<TaxonomyOption>, StoreError> {
        Ok(self.state.read().await.options.clone())
    }

    async fn add_custom_option(&self, category: &str, key: &str, label: &str) -> Result<TaxonomyOption, StoreError> {
        let mut state = self.state.write().await;

        if let Some(existing) = state
            .options
            .iter()
            .find(|o| o.category == category && o.key == key)
        {
            return Ok(existing.clone());
        }

        let option = TaxonomyOption {
            category: category.to_string(),
            key: key.to_string(),
            label: label.to_string(),
            is_custom: true,
        };
        state.options.push(option.clone());
        Ok(option)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(alias: &str) -> ProfileDraft {
        ProfileDraft {
            alias: alias.to_string(),
            bio: String::new(),
            age_range: "25_34".to_string(),
            contact_method: "email".to_string(),
            contact_value: "me@example.com".to_string(),
            profession: vec!["technology".to_string()],
            goal: vec![],
            interests: vec![],
            hobbies: vec![],
            is_public: true,
        }
    }

    #[tokio::test]
    async fn test_upsert_creates_then_updates_in_place() {
        let store = InMemoryStore::new();

        let created = store.upsert_for_owner("acct-1", &draft("Orca")).await.unwrap();
        let updated = store.upsert_for_owner("acct-1", &draft("Heron")).await.unwrap();

        assert_eq!(created.id, updated.id);
        assert_eq!(updated.alias, "Heron");
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(store.list_excluding(&HashSet::new()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_excluding_skips_private_profiles() {
        let store = InMemoryStore::new();
        store.upsert_for_owner("acct-1", &draft("Orca")).await.unwrap();
        let mut hidden = draft("Heron");
        hidden.is_public = false;
        store.upsert_for_owner("acct-2", &hidden).await.unwrap();
        let third = store.upsert_for_owner("acct-3", &draft("Lynx")).await.unwrap();

        let listed = store.list_excluding(&HashSet::from([third.id])).await.unwrap();
        let aliases: Vec<&str> = listed.iter().map(|p| p.alias.as_str()).collect();
        assert_eq!(aliases, vec!["Orca"]);
    }

    #[tokio::test]
    async fn test_active_duplicate_edge_conflicts() {
        let store = InMemoryStore::new();
        store.create_edge(1, 2).await.unwrap();

        let reverse = store.create_edge(2, 1).await;
        assert!(matches!(reverse, Err(StoreError::Conflict(_))));
        assert_eq!(store.edge_count().await, 1);
    }

    #[tokio::test]
    async fn test_set_status_only_from_pending() {
        let store = InMemoryStore::new();
        let edge = store.create_edge(1, 2).await.unwrap();

        let accepted = store.set_status(edge.id, MatchStatus::Accepted).await.unwrap();
        assert_eq!(accepted.status, MatchStatus::Accepted);
        assert!(accepted.responded_at.is_some());

        let again = store.set_status(edge.id, MatchStatus::Rejected).await;
        assert!(matches!(again, Err(StoreError::Conflict(_))));
        let stored = store.get_edge(edge.id).await.unwrap().unwrap();
        assert_eq!(stored.status, MatchStatus::Accepted);

        let missing = store.set_status(99, MatchStatus::Accepted).await;
        assert!(matches!(missing, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_custom_option_is_idempotent() {
        let store = InMemoryStore::new();
        store.add_custom_option("hobbies", "bouldering", "Bouldering").await.unwrap();
        let again = store.add_custom_option("hobbies", "bouldering", "Climbing").await.unwrap();

        assert_eq!(again.label, "Bouldering");
        assert_eq!(store.list_options().await.unwrap().len(), 1);
    }
}
