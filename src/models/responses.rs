use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::models::domain::{MatchId, MatchStatus, Profile, ProfileId, TaxonomyOption};

/// Profile as exposed over the API
///
/// `contactValue` is only present once both members have accepted a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileView {
    pub id: ProfileId,
    pub alias: String,
    pub bio: String,
    #[serde(rename = "ageRange")]
    pub age_range: String,
    #[serde(rename = "contactMethod")]
    pub contact_method: String,
    #[serde(rename = "contactValue", skip_serializing_if = "Option::is_none", default)]
    pub contact_value: Option<String>,
    pub profession: Vec<String>,
    pub goal: Vec<String>,
    pub interests: Vec<String>,
    pub hobbies: Vec<String>,
}

impl ProfileView {
    /// Public projection without contact details
    pub fn public(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            alias: profile.alias.clone(),
            bio: profile.bio.clone(),
            age_range: profile.age_range.clone(),
            contact_method: profile.contact_method.clone(),
            contact_value: None,
            profession: profile.profession.clone(),
            goal: profile.goal.clone(),
            interests: profile.interests.clone(),
            hobbies: profile.hobbies.clone(),
        }
    }

    /// Projection including the contact value
    pub fn revealed(profile: &Profile) -> Self {
        Self {
            contact_value: Some(profile.contact_value.clone()),
            ..Self::public(profile)
        }
    }
}

/// Response for potential and suggested match listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchListResponse {
    pub matches: Vec<ProfileView>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Which side of the edge the requester is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outgoing,
    Incoming,
}

/// One of the requester's connections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionView {
    #[serde(rename = "matchId")]
    pub match_id: MatchId,
    pub status: MatchStatus,
    pub direction: Direction,
    pub counterpart: ProfileView,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "respondedAt")]
    pub responded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionsResponse {
    pub connections: Vec<ConnectionView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyResponse {
    pub category: String,
    pub options: Vec<TaxonomyOption>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
