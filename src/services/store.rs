use async_trait::async_trait;
use std::collections::HashSet;
use thiserror::Error;
use crate::models::{MatchEdge, MatchId, MatchStatus, Profile, ProfileDraft, ProfileId, TaxonomyOption};

/// Errors raised by the persistence collaborators
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Member profile persistence
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_by_id(&self, id: ProfileId) -> Result<Option<Profile>, StoreError>;

    async fn get_by_owner(&self, owner_id: &str) -> Result<Option<Profile>, StoreError>;

    /// Public profiles whose id is not in `ids`, in ascending id order
    async fn list_excluding(&self, ids: &HashSet<ProfileId>) -> Result<Vec<Profile>, StoreError>;

    /// Create the owner's profile on first submission, update it in place afterwards
    async fn upsert_for_owner(&self, owner_id: &str, draft: &ProfileDraft) -> Result<Profile, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

/// Directed match edges between profiles
#[async_trait]
pub trait RelationshipGraph: Send + Sync {
    /// Every edge where `profile_id` is initiator or receiver, any status
    async fn edges_touching(&self, profile_id: ProfileId) -> Result<Vec<MatchEdge>, StoreError>;

    async fn get_edge(&self, id: MatchId) -> Result<Option<MatchEdge>, StoreError>;

    /// Insert a pending edge
    ///
    /// Fails with `StoreError::Conflict` when the pair already has an active
    /// (pending or accepted) edge in either direction.
    async fn create_edge(&self, initiator_id: ProfileId, receiver_id: ProfileId) -> Result<MatchEdge, StoreError>;

    /// Move a pending edge to `status`
    ///
    /// Terminal edges are left untouched and yield `StoreError::Conflict`.
    async fn set_status(&self, id: MatchId, status: MatchStatus) -> Result<MatchEdge, StoreError>;
}

/// Curated and member-contributed taxonomy options
#[async_trait]
pub trait TaxonomySource: Send + Sync {
    async fn list_options(&self) -> Result<Vec<TaxonomyOption>, StoreError>;

    /// Record a member-contributed option; existing keys are returned unchanged
    async fn add_custom_option(&self, category: &str, key: &str, label: &str) -> Result<TaxonomyOption, StoreError>;
}
