use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{taxonomy_list, Decision, ProfileId};

/// Profile submission (create on first submit, update in place afterwards)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProfileDraft {
    #[validate(length(min = 1, max = 50))]
    pub alias: String,
    #[validate(length(max = 1000))]
    #[serde(default)]
    pub bio: String,
    #[validate(length(min = 1))]
    #[serde(alias = "age_range", rename = "ageRange")]
    pub age_range: String,
    #[validate(length(min = 1))]
    #[serde(alias = "contact_method", rename = "contactMethod")]
    pub contact_method: String,
    #[validate(length(max = 200))]
    #[serde(alias = "contact_value", rename = "contactValue", default)]
    pub contact_value: String,
    #[validate(length(max = 20))]
    #[serde(default, deserialize_with = "taxonomy_list")]
    pub profession: Vec<String>,
    #[validate(length(max = 20))]
    #[serde(default, deserialize_with = "taxonomy_list")]
    pub goal: Vec<String>,
    #[validate(length(max = 50))]
    #[serde(default, deserialize_with = "taxonomy_list")]
    pub interests: Vec<String>,
    #[validate(length(max = 50))]
    #[serde(default, deserialize_with = "taxonomy_list")]
    pub hobbies: Vec<String>,
    #[serde(alias = "is_public", rename = "isPublic", default = "default_public")]
    pub is_public: bool,
}

fn default_public() -> bool {
    true
}

/// Request to connect with another profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateMatchRequest {
    #[validate(range(min = 1))]
    #[serde(alias = "receiver_id", rename = "receiverId")]
    pub receiver_id: ProfileId,
}

/// Receiver's response to a pending match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespondMatchRequest {
    pub decision: Decision,
}
