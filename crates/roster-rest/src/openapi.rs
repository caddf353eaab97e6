//! OpenAPI documentation configuration.

use crate::controllers::{HealthResponse, ReadinessResponse};
use roster_core::{ErrorResponse, FieldErrors, UserId};
use roster_service::{CreateUserRequest, MessageResponse, UpdateUserRequest, UserResponse};
use utoipa::OpenApi;

/// OpenAPI documentation for the user management API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Management API",
        version = "1.0.0",
        description = "API for managing users",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    paths(
        // User endpoints
        crate::controllers::user_controller::list_users,
        crate::controllers::user_controller::create_user,
        crate::controllers::user_controller::get_user,
        crate::controllers::user_controller::update_user,
        crate::controllers::user_controller::delete_user,
        // Health endpoints
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            UserId,
            ErrorResponse,
            FieldErrors,
            CreateUserRequest,
            UpdateUserRequest,
            UserResponse,
            MessageResponse,
            HealthResponse,
            ReadinessResponse,
        )
    ),
    tags(
        (name = "Users", description = "User management endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_info_and_paths() {
        let doc = ApiDoc::openapi();
        assert_eq!(doc.info.title, "User Management API");
        assert_eq!(doc.info.version, "1.0.0");

        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        assert!(paths.contains(&"/api/users"));
        assert!(paths.contains(&"/api/users/{id}"));
        assert!(paths.contains(&"/health/ready"));
    }
}
