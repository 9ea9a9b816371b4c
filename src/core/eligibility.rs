use std::collections::HashSet;
use crate::models::{MatchEdge, Profile, ProfileId};

/// Build the set of profile ids that may never appear as candidates
///
/// Contains the requester plus both endpoints of every edge touching the
/// requester, whatever the edge status. Rejected pairs are never resurfaced,
/// and duplicate edges from concurrent requests are harmless.
pub fn exclusion_set(requester_id: ProfileId, edges: &[MatchEdge]) -> HashSet<ProfileId> {
    let mut excluded = HashSet::with_capacity(edges.len() * 2 + 1);
    excluded.insert(requester_id);

    for edge in edges.iter().filter(|edge| edge.touches(requester_id)) {
        excluded.insert(edge.initiator_id);
        excluded.insert(edge.receiver_id);
    }

    excluded
}

/// Check if a profile may enter the candidate pool
#[inline]
pub fn is_eligible(profile: &Profile, excluded: &HashSet<ProfileId>) -> bool {
    !excluded.contains(&profile.id)
}

/// Drop excluded profiles, preserving pool order
pub fn eligible_candidates(
    pool: Vec<Profile>,
    excluded: &HashSet<ProfileId>,
) -> Vec<Profile> {
    pool.into_iter()
        .filter(|profile| is_eligible(profile, excluded))
        .collect()
}
