//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Users API",
        version = "0.1.0",
        description = "MongoDB-backed user directory: CRUD, search and filtering"
    ),
    servers(
        (url = "http://localhost:3001", description = "Local development server")
    ),
    nest(
        (path = "/api/users", api = domain_users::ApiDoc)
    ),
    tags(
        (name = "users", description = "User directory operations")
    )
)]
pub struct ApiDoc;
