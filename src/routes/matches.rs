use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::auth::AuthenticatedMember;
use crate::core::MatchResult;
use crate::models::{
    ConnectionsResponse, CreateMatchRequest, ErrorResponse, HealthResponse, MatchId,
    MatchListResponse, ProfileView, RespondMatchRequest,
};
use crate::routes::{match_error_response, AppState};

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/potential", web::get().to(potential_matches))
        .route("/matches/suggested", web::get().to(suggested_matches))
        .route("/matches", web::get().to(list_connections))
        .route("/matches", web::post().to(request_match))
        .route("/matches/{match_id}/respond", web::post().to(respond_to_match));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let healthy = state
        .connections
        .profiles()
        .health_check()
        .await
        .unwrap_or(false);

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

fn list_response(result: MatchResult) -> MatchListResponse {
    MatchListResponse {
        matches: result.matches.iter().map(ProfileView::public).collect(),
        total_candidates: result.total_candidates,
    }
}

/// Potential matches, best affinity first
///
/// GET /api/v1/matches/potential
async fn potential_matches(
    state: web::Data<AppState>,
    member: AuthenticatedMember,
) -> impl Responder {
    match state.connections.potential_matches(&member.owner_id).await {
        Ok(result) => HttpResponse::Ok().json(list_response(result)),
        Err(e) => {
            tracing::info!("Potential matches failed for {}: {}", member.owner_id, e);
            match_error_response(&e)
        }
    }
}

/// Suggested matches with complementary goals
///
/// GET /api/v1/matches/suggested
async fn suggested_matches(
    state: web::Data<AppState>,
    member: AuthenticatedMember,
) -> impl Responder {
    match state.connections.suggested_matches(&member.owner_id).await {
        Ok(result) => HttpResponse::Ok().json(list_response(result)),
        Err(e) => {
            tracing::info!("Suggested matches failed for {}: {}", member.owner_id, e);
            match_error_response(&e)
        }
    }
}

/// The caller's connections in every status
///
/// GET /api/v1/matches
async fn list_connections(
    state: web::Data<AppState>,
    member: AuthenticatedMember,
) -> impl Responder {
    match state.connections.connections(&member.owner_id).await {
        Ok(connections) => HttpResponse::Ok().json(ConnectionsResponse { connections }),
        Err(e) => match_error_response(&e),
    }
}

/// Request a connection
///
/// POST /api/v1/matches
///
/// Request body:
/// ```json
/// { "receiverId": 42 }
/// ```
async fn request_match(
    state: web::Data<AppState>,
    member: AuthenticatedMember,
    req: web::Json<CreateMatchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state.connections.request_match(&member.owner_id, req.receiver_id).await {
        Ok(edge) => HttpResponse::Created().json(edge),
        Err(e) => {
            tracing::info!("Match request from {} to {} failed: {}", member.owner_id, req.receiver_id, e);
            match_error_response(&e)
        }
    }
}

/// Accept or reject a pending request
///
/// POST /api/v1/matches/{match_id}/respond
///
/// Request body:
/// ```json
/// { "decision": "accepted|rejected" }
/// ```
async fn respond_to_match(
    state: web::Data<AppState>,
    member: AuthenticatedMember,
    path: web::Path<MatchId>,
    req: web::Json<RespondMatchRequest>,
) -> impl Responder {
    let match_id = path.into_inner();

    match state.connections.respond(match_id, &member.owner_id, req.decision).await {
        Ok(edge) => HttpResponse::Ok().json(edge),
        Err(e) => {
            tracing::info!("Response to match {} by {} failed: {}", match_id, member.owner_id, e);
            match_error_response(&e)
        }
    }
}
