// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Profile, ProfileId, MatchId, MatchEdge, MatchStatus, Decision, ScoredCandidate, ScoringWeights, TaxonomyOption, taxonomy_list};
pub use requests::{ProfileDraft, CreateMatchRequest, RespondMatchRequest};
pub use responses::{ProfileView, MatchListResponse, ConnectionView, ConnectionsResponse, Direction, TaxonomyResponse, HealthResponse, ErrorResponse};
