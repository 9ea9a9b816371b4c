use std::collections::HashSet;
use crate::models::{Profile, ProfileId, ScoredCandidate, ScoringWeights};
use crate::core::{
    complement::filter_complementary,
    eligibility::eligible_candidates,
    goals::classify_goals,
    scoring::calculate_affinity_score,
};

/// Result of the ranking or suggestion process
#[derive(Debug)]
pub struct MatchResult {
    pub matches: Vec<Profile>,
    pub total_candidates: usize,
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Eligibility filter (self and every already-connected profile removed)
/// 2. Goal classification of the requester
/// 3. Either affinity scoring + stable descending sort (potential matches)
///    or complementary-goal filtering (suggested matches)
///
/// Pure and stateless: safe to share across request handlers.
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    max_results: Option<usize>,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights, max_results: None }
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringWeights::default())
    }

    /// Cap the number of profiles returned per listing
    pub fn with_max_results(mut self, max_results: Option<usize>) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score every eligible candidate, highest first
    ///
    /// Sorting is stable, so candidates with equal scores keep their pool order.
    pub fn rank_scored(
        &self,
        requester: &Profile,
        candidates: Vec<Profile>,
        excluded: &HashSet<ProfileId>,
    ) -> Vec<ScoredCandidate> {
        let intents = classify_goals(&requester.goal);

        let mut scored: Vec<ScoredCandidate> = eligible_candidates(candidates, excluded)
            .into_iter()
            .map(|profile| {
                let score = calculate_affinity_score(requester, intents, &profile, &self.weights);
                ScoredCandidate { profile, score }
            })
            .collect();

        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored
    }

    /// Potential matches: eligible candidates ordered by affinity score
    pub fn rank(
        &self,
        requester: &Profile,
        candidates: Vec<Profile>,
        excluded: &HashSet<ProfileId>,
    ) -> MatchResult {
        let total_candidates = candidates.len();

        let mut matches: Vec<Profile> = self
            .rank_scored(requester, candidates, excluded)
            .into_iter()
            .map(|scored| scored.profile)
            .collect();

        self.truncate(&mut matches);

        MatchResult { matches, total_candidates }
    }

    /// Suggested matches: eligible candidates complementing the requester's goals
    pub fn suggest(
        &self,
        requester: &Profile,
        candidates: Vec<Profile>,
        excluded: &HashSet<ProfileId>,
    ) -> MatchResult {
        let total_candidates = candidates.len();
        let intents = classify_goals(&requester.goal);

        let mut matches = filter_complementary(
            requester,
            intents,
            eligible_candidates(candidates, excluded),
        );

        self.truncate(&mut matches);

        MatchResult { matches, total_candidates }
    }

    fn truncate(&self, matches: &mut Vec<Profile>) {
        if let Some(limit) = self.max_results {
            matches.truncate(limit);
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::eligibility::exclusion_set;

    fn create_candidate(id: i64, goal: &[&str], profession: &[&str], interests: &[&str]) -> Profile {
        Profile {
            id,
            owner_id: format!("acct-{}", id),
            alias: format!("Member {}", id),
            bio: String::new(),
            age_range: "25_34".to_string(),
            contact_method: "email".to_string(),
            contact_value: String::new(),
            profession: profession.iter().map(|v| v.to_string()).collect(),
            goal: goal.iter().map(|v| v.to_string()).collect(),
            interests: interests.iter().map(|v| v.to_string()).collect(),
            hobbies: vec![],
            is_public: true,
            created_at: None,
            updated_at: None,
        }
    }

    fn ids(profiles: &[Profile]) -> Vec<i64> {
        profiles.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_rank_orders_by_score() {
        let matcher = Matcher::with_default_weights();
        let a = create_candidate(1, &["professional_networking"], &["technology", "finance"], &["ai"]);
        let c = create_candidate(3, &[], &["law"], &[]);
        let b = create_candidate(2, &[], &["technology"], &["ai", "startups"]);

        let result = matcher.rank(&a, vec![c, b], &exclusion_set(a.id, &[]));

        assert_eq!(ids(&result.matches), vec![2, 3]);
        assert_eq!(result.total_candidates, 2);
    }

    #[test]
    fn test_rank_ties_keep_pool_order() {
        let matcher = Matcher::with_default_weights();
        let requester = create_candidate(1, &["networking"], &["technology"], &[]);
        let pool = vec![
            create_candidate(9, &[], &["law"], &[]),
            create_candidate(4, &[], &["technology"], &[]),
            create_candidate(7, &[], &["art"], &[]),
            create_candidate(2, &[], &["technology"], &[]),
        ];

        let scored = matcher.rank_scored(&requester, pool, &exclusion_set(1, &[]));
        let order: Vec<(i64, u32)> = scored.iter().map(|s| (s.profile.id, s.score)).collect();

        assert_eq!(order, vec![(4, 3), (2, 3), (9, 0), (7, 0)]);
    }

    #[test]
    fn test_rank_excludes_self_and_connected() {
        let matcher = Matcher::with_default_weights();
        let requester = create_candidate(1, &[], &[], &[]);
        let pool = vec![
            create_candidate(1, &[], &[], &[]),
            create_candidate(2, &[], &[], &[]),
            create_candidate(3, &[], &[], &[]),
        ];
        let excluded = HashSet::from([1, 3]);

        let result = matcher.rank(&requester, pool, &excluded);
        assert_eq!(ids(&result.matches), vec![2]);
    }

    #[test]
    fn test_suggest_mentor_scenario() {
        let matcher = Matcher::with_default_weights();
        let m = create_candidate(1, &["find_mentor"], &["technology"], &[]);
        let n = create_candidate(2, &["find_mentee"], &["technology"], &[]);
        let p = create_candidate(3, &["find_mentee"], &["law"], &[]);

        let result = matcher.suggest(&m, vec![n, p], &exclusion_set(m.id, &[]));
        assert_eq!(ids(&result.matches), vec![2]);
    }

    #[test]
    fn test_respects_max_results() {
        let matcher = Matcher::with_default_weights().with_max_results(Some(3));
        let requester = create_candidate(0, &[], &[], &[]);
        let pool: Vec<Profile> = (1..=10).map(|i| create_candidate(i, &[], &[], &[])).collect();

        let result = matcher.rank(&requester, pool, &exclusion_set(0, &[]));
        assert_eq!(result.matches.len(), 3);
        assert_eq!(result.total_candidates, 10);
    }
}
