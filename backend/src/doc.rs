//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI specification for the REST API. It
//! registers the users and health paths from the inbound layer together with
//! the domain and request schemas they reference. The generated document is
//! served by Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode, User};
use crate::inbound::http::users::{CreateUserRequest, UpdateUserRequest};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Users backend API",
        description = "HTTP interface for user management and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(User, Error, ErrorCode, CreateUserRequest, UpdateUserRequest)),
    tags(
        (name = "users", description = "Operations related to users"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        for path in ["/api/v1/users", "/api/v1/users/{user_id}", "/health/ready", "/health/live"] {
            assert!(paths.contains_key(path), "missing path {path}");
        }
    }

    #[test]
    fn document_registers_domain_schemas() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        for schema in ["User", "Error", "ErrorCode", "CreateUserRequest", "UpdateUserRequest"] {
            assert!(
                components.schemas.contains_key(schema),
                "missing schema {schema}"
            );
        }
    }
}
