use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Nepal Guide Service API",
        version = "1.0.0",
        description = "Personalized Nepal travel-guide generation service. \n\n**Authentication:** Most endpoints require JWT Bearer token authentication.\n\n**Features:**\n- Email/password registration and login\n- Travel-interest preference storage\n- Search-augmented, personalized guide generation\n- Health monitoring and metrics",
        contact(
            name = "Guide Service Team",
            email = "support@guide-service.com"
        )
    ),
    paths(
        // Auth endpoints
        crate::api::auth::login,
        crate::api::auth::register,
        crate::api::auth::refresh_token,
        crate::api::auth::verify_token,
        crate::api::auth::get_me,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,

        // Profile store
        crate::api::users::get_user,
        crate::api::preferences::save_preference,
        crate::api::preferences::get_preference,

        // Guides
        crate::api::guides::generate_guide,
    ),
    components(
        schemas(
            // Auth
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::RegisterRequest,
            crate::services::auth_service::RefreshTokenRequest,
            crate::services::auth_service::AuthResponse,
            crate::services::auth_service::VerifyTokenResponse,
            crate::models::UserInfo,

            // Health & Metrics
            crate::api::health::HealthResponse,
            crate::api::metrics::MetricsResponse,

            // Preferences
            crate::models::Interest,
            crate::services::preference_service::SavePreferenceRequest,
            crate::services::preference_service::PreferenceResponse,

            // Guides
            crate::services::guide_service::GenerateGuideRequest,
            crate::api::guides::GenerateGuideResponse,
            crate::models::GuideDocument,
        )
    ),
    tags(
        (name = "Auth", description = "Authentication and user management endpoints. Email/password with JWT bearer tokens."),
        (name = "Health", description = "Health check and system metrics endpoints for monitoring service status."),
        (name = "Users", description = "User profile endpoints."),
        (name = "Preferences", description = "Travel-interest preference storage. Interests are validated against a closed set of 10 categories."),
        (name = "Guides", description = "Guide generation. Orchestrates search-augmented lookup calls and a final structured generation call against the external generation API."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your JWT token"))
                        .build(),
                ),
            );
        }
    }
}
