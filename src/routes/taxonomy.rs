use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use validator::Validate;
use crate::auth::AuthenticatedMember;
use crate::models::{ErrorResponse, TaxonomyResponse};
use crate::routes::AppState;
use crate::services::taxonomy::is_known_category;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/taxonomy/{category}", web::get().to(list_options))
        .route("/taxonomy/{category}", web::post().to(add_custom_option));
}

/// Member-contributed option
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CustomOptionRequest {
    #[validate(length(min = 1, max = 64))]
    pub key: String,
    #[validate(length(min = 1, max = 100))]
    pub label: String,
}

fn unknown_category(category: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse {
        error: "not_found".to_string(),
        message: format!("Unknown taxonomy category: {}", category),
        status_code: 404,
    })
}

/// GET /api/v1/taxonomy/{category}
async fn list_options(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let category = path.into_inner();
    if !is_known_category(&category) {
        return unknown_category(&category);
    }

    let options = state.taxonomy.options(&category).await;
    HttpResponse::Ok().json(TaxonomyResponse { category, options })
}

/// POST /api/v1/taxonomy/{category}
///
/// Records the option and refreshes the label cache.
async fn add_custom_option(
    state: web::Data<AppState>,
    member: AuthenticatedMember,
    path: web::Path<String>,
    req: web::Json<CustomOptionRequest>,
) -> impl Responder {
    let category = path.into_inner();
    if !is_known_category(&category) {
        return unknown_category(&category);
    }

    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let key = req.key.trim().to_lowercase();
    let option = match state
        .taxonomy_source
        .add_custom_option(&category, &key, req.label.trim())
        .await
    {
        Ok(option) => option,
        Err(e) => {
            tracing::error!("Failed to record custom option for {}: {}", member.owner_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to record option".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    if let Err(e) = state.taxonomy.refresh(state.taxonomy_source.as_ref()).await {
        tracing::warn!("Taxonomy cache refresh failed: {}", e);
    }

    HttpResponse::Created().json(option)
}
