use crate::{database::MongoDB, middleware::auth::Claims, models::UserInfo, services::auth_service};
use actix_web::{web, HttpResponse};

/// GET /api/v1/users/{user_id} - Public profile fields (name, country)
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "Users",
    responses(
        (status = 200, description = "User profile", body = UserInfo),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_user(
    _user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    user_id: web::Path<String>,
) -> HttpResponse {
    log::info!("👤 GET /users/{}", user_id);

    match auth_service::get_current_user(&db, &user_id).await {
        Ok(info) => HttpResponse::Ok().json(info),
        Err(e) => {
            log::warn!("❌ Failed to fetch user {}: {}", user_id, e);

            if e.contains("not found") {
                return HttpResponse::NotFound().json(serde_json::json!({
                    "success": false,
                    "error": format!("User '{}' not found", user_id)
                }));
            }

            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
    }
}
