// Core algorithm exports
pub mod complement;
pub mod eligibility;
pub mod goals;
pub mod matcher;
pub mod overlap;
pub mod scoring;

pub use complement::{is_complementary, filter_complementary};
pub use eligibility::{exclusion_set, is_eligible, eligible_candidates};
pub use goals::{classify_goals, GoalIntent, GoalIntents};
pub use matcher::{Matcher, MatchResult};
pub use overlap::{overlap_count, shares_any_ignore_case};
pub use scoring::calculate_affinity_score;
