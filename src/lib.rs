//! Rapport Algo - candidate ranking and complementary-goal matching
//!
//! This library provides the matching core used by the Rapport member network:
//! affinity-ranked potential matches, goal-complementary suggestions, and the
//! connection request workflow around them.

pub mod auth;
pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{Matcher, MatchResult, classify_goals, GoalIntent, GoalIntents, calculate_affinity_score, is_complementary, exclusion_set};
pub use models::{Profile, MatchEdge, MatchStatus, Decision, ScoringWeights, ProfileView, MatchListResponse};
pub use services::{ConnectionService, MatchError};
