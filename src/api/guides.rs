use crate::{
    api::metrics,
    database::MongoDB,
    middleware::auth::Claims,
    models::GuideDocument,
    services::guide_service::{self, GenerateGuideRequest},
    services::normalizer_service::{normalize_response, NormalizedResponse},
};
use actix_web::{web, HttpResponse};
use serde::Serialize;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct GenerateGuideResponse {
    pub success: bool,
    pub currency: String,
    pub currency_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guide: Option<GuideDocument>,
    /// Original response text, returned when no JSON document could be
    /// recovered from it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_failure: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Maps an orchestrator error to an HTTP response. Generation-client
/// failures are matched by their prefixes before the generic substring
/// checks, so an upstream error body that happens to contain "not found"
/// is still reported as an upstream failure, not a missing user.
fn generation_error_response(e: String) -> HttpResponse {
    if e.starts_with("Generation API error") || e.starts_with("Failed to reach generation API") {
        // Surface the raw error payload; no retry, no partial guide.
        return HttpResponse::BadGateway().json(serde_json::json!({
            "success": false,
            "error": e
        }));
    }

    if e.contains("is required") {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": e
        }));
    }

    if e.contains("not found") {
        return HttpResponse::NotFound().json(serde_json::json!({
            "success": false,
            "error": e
        }));
    }

    if e.starts_with("Database error") {
        return HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": "Failed to fetch user info or interests"
        }));
    }

    HttpResponse::BadGateway().json(serde_json::json!({
        "success": false,
        "error": e
    }))
}

/// POST /api/v1/guides/generate - One best-effort guide submission
#[utoipa::path(
    post,
    path = "/api/v1/guides/generate",
    tag = "Guides",
    request_body = GenerateGuideRequest,
    responses(
        (status = 200, description = "Guide generated (or topic refused)", body = GenerateGuideResponse),
        (status = 400, description = "Missing destination or current location"),
        (status = 502, description = "Generation API failure")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn generate_guide(
    user: web::ReqData<Claims>,
    db: web::Data<MongoDB>,
    request: web::Json<GenerateGuideRequest>,
) -> HttpResponse {
    let user_id = &user.sub;

    log::info!(
        "🗺️ POST /guides/generate - user: {}, destination: '{}', search: {}",
        user_id,
        request.destination,
        request.use_search
    );

    metrics::increment_guide_request_count();

    let result = match guide_service::generate_guide_for_user(&db, user_id, &request).await {
        Ok(result) => result,
        Err(e) => {
            log::error!("❌ Guide generation failed for {}: {}", user_id, e);
            metrics::increment_guide_error_count();
            return generation_error_response(e);
        }
    };

    match normalize_response(&result.raw_text) {
        NormalizedResponse::Parsed(guide) => {
            log::info!(
                "✅ Guide parsed for '{}'",
                guide.destination.as_deref().unwrap_or("unknown")
            );
            HttpResponse::Ok().json(GenerateGuideResponse {
                success: true,
                currency: result.currency,
                currency_fallback: result.currency_fallback,
                guide: Some(guide),
                raw_text: None,
                parse_failure: None,
                error: None,
            })
        }
        NormalizedResponse::Refused(message) => {
            log::warn!("⚠️ Topic refused: {}", message);
            HttpResponse::Ok().json(GenerateGuideResponse {
                success: false,
                currency: result.currency,
                currency_fallback: result.currency_fallback,
                guide: None,
                raw_text: None,
                parse_failure: None,
                error: Some(message),
            })
        }
        NormalizedResponse::Malformed(raw_text) => {
            log::warn!("⚠️ Response was not parseable JSON ({} chars)", raw_text.len());
            HttpResponse::Ok().json(GenerateGuideResponse {
                success: false,
                currency: result.currency,
                currency_fallback: result.currency_fallback,
                guide: None,
                raw_text: Some(raw_text),
                parse_failure: Some(true),
                error: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_missing_field_maps_to_bad_request() {
        let response = generation_error_response("Destination is required".to_string());
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_user_maps_to_not_found() {
        let response = generation_error_response("User not found".to_string());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_database_failure_maps_to_internal_error() {
        let response =
            generation_error_response("Database error: connection pool timed out".to_string());
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_generation_failure_maps_to_bad_gateway() {
        let response = generation_error_response(
            "Failed to reach generation API: connection refused".to_string(),
        );
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    // An upstream 404 body contains "is not found for API version v1beta";
    // the client prefix must win over the missing-user substring check.
    #[test]
    fn test_upstream_not_found_body_still_maps_to_bad_gateway() {
        let response = generation_error_response(
            "Generation API error 404 Not Found: models/bogus is not found for API version v1beta"
                .to_string(),
        );
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_unclassified_error_maps_to_bad_gateway() {
        let response = generation_error_response("No response generated.".to_string());
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
