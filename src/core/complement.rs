use crate::models::Profile;
use crate::core::{
    goals::{classify_goals, GoalIntent, GoalIntents},
    overlap::shares_any_ignore_case,
};

/// Check whether `candidate` complements the requester's goals
///
/// The candidate is kept if any rule holds:
/// - requester seeks a mentor, candidate seeks a mentee, shared profession
/// - requester seeks a mentee, candidate seeks a mentor, shared profession
/// - requester wants networking, shared profession or shared interest
/// - requester wants friendship, same age range and shared interest or hobby
/// - requester wants an activity partner, shared hobby
///
/// Overlaps here are case-insensitive. The relation is not symmetric.
pub fn is_complementary(
    requester: &Profile,
    requester_intents: GoalIntents,
    candidate: &Profile,
    candidate_intents: GoalIntents,
) -> bool {
    if requester_intents.is_empty() {
        return false;
    }

    let shared_profession = || shares_any_ignore_case(&requester.profession, &candidate.profession);
    let shared_interest = || shares_any_ignore_case(&requester.interests, &candidate.interests);
    let shared_hobby = || shares_any_ignore_case(&requester.hobbies, &candidate.hobbies);

    if requester_intents.contains(GoalIntent::SeekingMentor)
        && candidate_intents.contains(GoalIntent::SeekingMentee)
        && shared_profession()
    {
        return true;
    }

    if requester_intents.contains(GoalIntent::SeekingMentee)
        && candidate_intents.contains(GoalIntent::SeekingMentor)
        && shared_profession()
    {
        return true;
    }

    if requester_intents.wants_networking() && (shared_profession() || shared_interest()) {
        return true;
    }

    if requester_intents.contains(GoalIntent::Friendship)
        && requester.age_range == candidate.age_range
        && (shared_interest() || shared_hobby())
    {
        return true;
    }

    requester_intents.contains(GoalIntent::ActivityPartner) && shared_hobby()
}

/// Filter a candidate pool down to complementary profiles, keeping pool order
pub fn filter_complementary(
    requester: &Profile,
    requester_intents: GoalIntents,
    candidates: Vec<Profile>,
) -> Vec<Profile> {
    candidates
        .into_iter()
        .filter(|candidate| {
            is_complementary(requester, requester_intents, candidate, classify_goals(&candidate.goal))
        })
        .collect()
}
