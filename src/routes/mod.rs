// Route exports
pub mod matches;
pub mod profiles;
pub mod taxonomy;

use actix_web::{http::StatusCode, web, HttpResponse};
use std::sync::Arc;
use crate::models::ErrorResponse;
use crate::services::{ConnectionService, MatchError, TaxonomyCache, TaxonomySource};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub connections: ConnectionService,
    pub taxonomy: Arc<TaxonomyCache>,
    pub taxonomy_source: Arc<dyn TaxonomySource>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(profiles::configure)
            .configure(taxonomy::configure),
    );
}

/// Map a workflow error to its HTTP response
///
/// 404 not found, 403 not the receiver, 400 conflict or validation, 500 otherwise.
pub fn match_error_response(err: &MatchError) -> HttpResponse {
    let (status, error) = match err {
        MatchError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        MatchError::Authorization(_) => (StatusCode::FORBIDDEN, "forbidden"),
        MatchError::Conflict(_) => (StatusCode::BAD_REQUEST, "conflict"),
        MatchError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_failed"),
        MatchError::Store(e) => {
            tracing::error!("Store failure: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
        }
    };

    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: err.to_string(),
        status_code: status.as_u16(),
    })
}
