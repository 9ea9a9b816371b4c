use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Numeric profile identifier (one profile per owner account)
pub type ProfileId = i64;

/// Numeric match edge identifier
pub type MatchId = i64;

/// A member's pseudonymous persona
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    #[serde(rename = "ownerId")]
    pub owner_id: String,
    pub alias: String,
    #[serde(default)]
    pub bio: String,
    #[serde(rename = "ageRange")]
    pub age_range: String,
    #[serde(rename = "contactMethod")]
    pub contact_method: String,
    #[serde(rename = "contactValue", default)]
    pub contact_value: String,
    #[serde(default, deserialize_with = "taxonomy_list")]
    pub profession: Vec<String>,
    #[serde(default, deserialize_with = "taxonomy_list")]
    pub goal: Vec<String>,
    #[serde(default, deserialize_with = "taxonomy_list")]
    pub interests: Vec<String>,
    #[serde(default, deserialize_with = "taxonomy_list")]
    pub hobbies: Vec<String>,
    #[serde(rename = "isPublic", default = "default_true")]
    pub is_public: bool,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool { true }

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Deserialize a taxonomy attribute that may be stored as a single string
/// (legacy records) or as a list of keys.
///
/// Always yields a list; `null` and blank scalars become an empty list.
pub fn taxonomy_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(value)) if value.trim().is_empty() => Vec::new(),
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
    })
}

/// Lifecycle state of a match edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pending,
    Accepted,
    Rejected,
}

/// Receiver's answer to a pending match request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Accepted,
    Rejected,
}

impl MatchStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, MatchStatus::Pending)
    }

    /// Pending edges move to the decided state exactly once.
    ///
    /// Returns the current status as the error when the edge is already terminal.
    pub fn transition(self, decision: Decision) -> Result<MatchStatus, MatchStatus> {
        match self {
            MatchStatus::Pending => Ok(decision.into()),
            terminal => Err(terminal),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchStatus::Pending => "pending",
            MatchStatus::Accepted => "accepted",
            MatchStatus::Rejected => "rejected",
        }
    }
}

impl From<Decision> for MatchStatus {
    fn from(value: Decision) -> Self {
        match value {
            Decision::Accepted => MatchStatus::Accepted,
            Decision::Rejected => MatchStatus::Rejected,
        }
    }
}

/// Directed connection request between two profiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEdge {
    pub id: MatchId,
    #[serde(rename = "initiatorId")]
    pub initiator_id: ProfileId,
    #[serde(rename = "receiverId")]
    pub receiver_id: ProfileId,
    pub status: MatchStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "respondedAt", default)]
    pub responded_at: Option<DateTime<Utc>>,
}

impl MatchEdge {
    /// True if `profile_id` is either endpoint
    pub fn touches(&self, profile_id: ProfileId) -> bool {
        self.initiator_id == profile_id || self.receiver_id == profile_id
    }

    /// The other endpoint as seen from `profile_id`
    pub fn counterpart(&self, profile_id: ProfileId) -> ProfileId {
        if self.initiator_id == profile_id {
            self.receiver_id
        } else {
            self.initiator_id
        }
    }

    /// True if the edge joins `a` and `b` in either direction
    pub fn connects(&self, a: ProfileId, b: ProfileId) -> bool {
        (self.initiator_id == a && self.receiver_id == b)
            || (self.initiator_id == b && self.receiver_id == a)
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, MatchStatus::Pending | MatchStatus::Accepted)
    }
}

/// Profile paired with its affinity score for one requester
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub profile: Profile,
    pub score: u32,
}

/// Member-contributed or curated taxonomy option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyOption {
    pub category: String,
    pub key: String,
    pub label: String,
    #[serde(rename = "isCustom", default)]
    pub is_custom: bool,
}

/// Per-rule affinity weights
///
/// Defaults reproduce the production rule table:
/// networking = 3 per shared profession + 2 per shared interest,
/// friendship = 2 per shared hobby + 3 for the same age range,
/// activity = 3 per shared hobby, baseline = 1 per shared interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    pub networking_profession: u32,
    pub networking_interest: u32,
    pub friendship_hobby: u32,
    pub friendship_age_range: u32,
    pub activity_hobby: u32,
    pub baseline_interest: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            networking_profession: 3,
            networking_interest: 2,
            friendship_hobby: 2,
            friendship_age_range: 3,
            activity_hobby: 3,
            baseline_interest: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_scalar_taxonomy_is_normalized() {
        let profile: Profile = serde_json::from_value(serde_json::json!({
            "id": 1,
            "ownerId": "acct-1",
            "alias": "Orca",
            "ageRange": "25_34",
            "contactMethod": "email",
            "profession": "technology",
            "goal": ["find_mentor"],
            "interests": null,
            "hobbies": ""
        }))
        .unwrap();

        assert_eq!(profile.profession, vec!["technology"]);
        assert_eq!(profile.goal, vec!["find_mentor"]);
        assert!(profile.interests.is_empty());
        assert!(profile.hobbies.is_empty());
        assert!(profile.is_public);
    }

    #[test]
    fn test_status_transitions() {
        assert_eq!(MatchStatus::Pending.transition(Decision::Accepted), Ok(MatchStatus::Accepted));
        assert_eq!(MatchStatus::Pending.transition(Decision::Rejected), Ok(MatchStatus::Rejected));
        assert_eq!(MatchStatus::Accepted.transition(Decision::Rejected), Err(MatchStatus::Accepted));
        assert_eq!(MatchStatus::Rejected.transition(Decision::Accepted), Err(MatchStatus::Rejected));
        assert!(!MatchStatus::Pending.is_terminal());
    }

    #[test]
    fn test_edge_endpoints() {
        let edge = MatchEdge {
            id: 7,
            initiator_id: 1,
            receiver_id: 2,
            status: MatchStatus::Pending,
            created_at: Utc::now(),
            responded_at: None,
        };

        assert!(edge.touches(1) && edge.touches(2) && !edge.touches(3));
        assert_eq!(edge.counterpart(1), 2);
        assert_eq!(edge.counterpart(2), 1);
        assert!(edge.connects(2, 1));
        assert!(edge.is_active());
    }
}
