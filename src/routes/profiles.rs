use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::auth::AuthenticatedMember;
use crate::models::{ErrorResponse, ProfileDraft, ProfileView};
use crate::routes::{match_error_response, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/profile", web::get().to(get_profile))
        .route("/profile", web::put().to(save_profile));
}

/// The caller's own profile, contact details included
///
/// GET /api/v1/profile
async fn get_profile(
    state: web::Data<AppState>,
    member: AuthenticatedMember,
) -> impl Responder {
    match state.connections.profile(&member.owner_id).await {
        Ok(profile) => HttpResponse::Ok().json(ProfileView::revealed(&profile)),
        Err(e) => match_error_response(&e),
    }
}

/// Create or update the caller's profile
///
/// PUT /api/v1/profile
async fn save_profile(
    state: web::Data<AppState>,
    member: AuthenticatedMember,
    req: web::Json<ProfileDraft>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Profile validation failed for {}: {:?}", member.owner_id, errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state.connections.save_profile(&member.owner_id, &req).await {
        Ok(profile) => HttpResponse::Ok().json(ProfileView::revealed(&profile)),
        Err(e) => match_error_response(&e),
    }
}
