use crate::models::{Profile, ScoringWeights};
use crate::core::{
    goals::{GoalIntent, GoalIntents},
    overlap::overlap_count,
};

/// Calculate the affinity score of `candidate` for `requester`
///
/// Only the requester's goals select which rules apply, so the score is
/// asymmetric. Rules stack:
/// score = (
///     networking:  profession_overlap * 3 + interest_overlap * 2
///     friendship:  hobby_overlap * 2 + same_age_range * 3
///     activity:    hobby_overlap * 3
///     baseline:    interest_overlap * 1      # always applied
/// )
pub fn calculate_affinity_score(
    requester: &Profile,
    requester_intents: GoalIntents,
    candidate: &Profile,
    weights: &ScoringWeights,
) -> u32 {
    let shared_interests = overlap_count(&requester.interests, &candidate.interests) as u32;

    let mut score = shared_interests * weights.baseline_interest;

    if requester_intents.contains(GoalIntent::Networking) {
        let shared_professions = overlap_count(&requester.profession, &candidate.profession) as u32;
        score += shared_professions * weights.networking_profession
            + shared_interests * weights.networking_interest;
    }

    if requester_intents.contains(GoalIntent::Friendship) {
        let shared_hobbies = overlap_count(&requester.hobbies, &candidate.hobbies) as u32;
        score += shared_hobbies * weights.friendship_hobby;
        if requester.age_range == candidate.age_range {
            score += weights.friendship_age_range;
        }
    }

    if requester_intents.contains(GoalIntent::ActivityPartner) {
        let shared_hobbies = overlap_count(&requester.hobbies, &candidate.hobbies) as u32;
        score += shared_hobbies * weights.activity_hobby;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::goals::classify_goals;

    fn create_test_profile(
        id: i64,
        goal: &[&str],
        profession: &[&str],
        interests: &[&str],
        hobbies: &[&str],
        age_range: &str,
    ) -> Profile {
        let owned = |values: &[&str]| values.iter().map(|v| v.to_string()).collect::<Vec<_>>();
        Profile {
            id,
            owner_id: format!("acct-{}", id),
            alias: format!("Member {}", id),
            bio: String::new(),
            age_range: age_range.to_string(),
            contact_method: "email".to_string(),
            contact_value: format!("member{}@example.com", id),
            profession: owned(profession),
            goal: owned(goal),
            interests: owned(interests),
            hobbies: owned(hobbies),
            is_public: true,
            created_at: None,
            updated_at: None,
        }
    }

    fn score(requester: &Profile, candidate: &Profile) -> u32 {
        calculate_affinity_score(
            requester,
            classify_goals(&requester.goal),
            candidate,
            &ScoringWeights::default(),
        )
    }

    #[test]
    fn test_networking_score() {
        let a = create_test_profile(1, &["professional_networking"], &["technology", "finance"], &["ai"], &[], "25_34");
        let b = create_test_profile(2, &[], &["technology"], &["ai", "startups"], &[], "35_44");
        let c = create_test_profile(3, &[], &["law"], &[], &[], "25_34");

        assert_eq!(score(&a, &b), 6);
        assert_eq!(score(&a, &c), 0);
    }

    #[test]
    fn test_baseline_applies_without_goals() {
        let a = create_test_profile(1, &[], &["technology"], &["ai", "music"], &["chess"], "25_34");
        let b = create_test_profile(2, &[], &["technology"], &["ai", "music"], &["chess"], "25_34");

        assert_eq!(score(&a, &b), 2);
    }

    #[test]
    fn test_friendship_score_with_age_bonus() {
        let a = create_test_profile(1, &["make_friendship"], &[], &[], &["chess", "hiking"], "25_34");
        let b = create_test_profile(2, &[], &[], &[], &["hiking"], "25_34");
        let c = create_test_profile(3, &[], &[], &[], &["hiking"], "45_54");

        assert_eq!(score(&a, &b), 2 + 3);
        assert_eq!(score(&a, &c), 2);
    }

    #[test]
    fn test_rules_stack() {
        let a = create_test_profile(1, &["networking", "social", "activity_partner"], &["technology"], &["ai"], &["climbing"], "25_34");
        let b = create_test_profile(2, &[], &["technology"], &["ai"], &["climbing"], "25_34");

        let networking = 3 + 2;
        let friendship = 2 + 3;
        let activity = 3;
        let baseline = 1;
        assert_eq!(score(&a, &b), networking + friendship + activity + baseline);
    }

    #[test]
    fn test_score_is_asymmetric() {
        let a = create_test_profile(1, &["networking"], &["technology"], &[], &[], "25_34");
        let b = create_test_profile(2, &[], &["technology"], &[], &[], "25_34");

        assert_eq!(score(&a, &b), 3);
        assert_eq!(score(&b, &a), 0);
    }

    #[test]
    fn test_duplicate_values_not_double_counted() {
        let a = create_test_profile(1, &["activity"], &[], &[], &["tennis", "tennis"], "25_34");
        let b = create_test_profile(2, &[], &[], &[], &["tennis"], "25_34");

        assert_eq!(score(&a, &b), 3);
    }

    #[test]
    fn test_score_is_deterministic() {
        let a = create_test_profile(1, &["networking", "friendship"], &["technology"], &["ai"], &["chess"], "25_34");
        let b = create_test_profile(2, &[], &["technology"], &["ai"], &["chess"], "25_34");

        let first = score(&a, &b);
        for _ in 0..10 {
            assert_eq!(score(&a, &b), first);
        }
    }
}
