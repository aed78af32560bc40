use crate::{
    database::MongoDB,
    middleware::auth::Claims,
    services::preference_service::{self, PreferenceResponse, SavePreferenceRequest},
};
use actix_web::{web, HttpResponse};

/// POST /api/v1/preferences - Save the caller's interest selection
#[utoipa::path(
    post,
    path = "/api/v1/preferences",
    tag = "Preferences",
    request_body = SavePreferenceRequest,
    responses(
        (status = 200, description = "Preferences saved", body = PreferenceResponse),
        (status = 400, description = "Unknown interest label")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn save_preference(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<SavePreferenceRequest>,
) -> HttpResponse {
    let user_id = &user.sub;

    log::info!(
        "📝 POST /preferences - user: {}, {} interests",
        user_id,
        request.interest.len()
    );

    match preference_service::save_preference(&db, user_id, request.into_inner()).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            log::error!("❌ Failed to save preferences for {}: {}", user_id, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    }
}

/// GET /api/v1/preferences/{user_id} - Stored interests for a user
#[utoipa::path(
    get,
    path = "/api/v1/preferences/{user_id}",
    tag = "Preferences",
    responses(
        (status = 200, description = "Stored preferences", body = PreferenceResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_preference(
    _user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    user_id: web::Path<String>,
) -> HttpResponse {
    log::info!("📋 GET /preferences/{}", user_id);

    match preference_service::get_preference(&db, &user_id).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            log::error!("❌ Failed to fetch preferences for {}: {}", user_id, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    }
}
