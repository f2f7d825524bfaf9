use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    QueryParams, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestResponse, BadRequestUuidResponse, BadRequestValidationResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{CreateUser, MessageResponse, UpdateUser, UserFilter, UserPage, UserResponse};
use crate::pagination::{PageParams, Pagination, SearchParams};
use crate::repository::UserRepository;
use crate::service::UserService;

const USER_DELETED: &str = "User deleted successfully";

/// OpenAPI documentation for the users API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_users,
        search_users,
        filter_users,
        get_user,
        create_user,
        update_user,
        delete_user,
    ),
    components(
        schemas(UserResponse, CreateUser, UpdateUser, UserFilter, UserPage, MessageResponse),
        responses(
            BadRequestResponse,
            BadRequestUuidResponse,
            BadRequestValidationResponse,
            InternalServerErrorResponse,
            NotFoundResponse
        )
    ),
    tags(
        (name = "users", description = "User directory operations")
    )
)]
pub struct ApiDoc;

/// Create the users router with all HTTP endpoints
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/find", get(search_users))
        .route("/filter", post(filter_users))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
        .with_state(shared_service)
}

/// List users, one page at a time, with totals
#[utoipa::path(
    get,
    path = "",
    tag = "users",
    params(PageParams),
    responses(
        (status = 200, description = "Page of users", body = UserPage),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    QueryParams(params): QueryParams<PageParams>,
) -> UserResult<Json<UserPage>> {
    let page = service.list_users(Pagination::from(&params)).await?;
    Ok(Json(page))
}

/// Free-text search across the searchable user fields
#[utoipa::path(
    get,
    path = "/find",
    tag = "users",
    params(SearchParams),
    responses(
        (status = 200, description = "Page of matching users", body = UserPage),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn search_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    QueryParams(params): QueryParams<SearchParams>,
) -> UserResult<Json<UserPage>> {
    let page = service
        .search_users(params.term(), params.pagination())
        .await?;
    Ok(Json(page))
}

/// Filter users by per-field substrings
#[utoipa::path(
    post,
    path = "/filter",
    tag = "users",
    params(PageParams),
    request_body = UserFilter,
    responses(
        (status = 200, description = "Page of matching users", body = UserPage),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn filter_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    QueryParams(params): QueryParams<PageParams>,
    ValidatedJson(filter): ValidatedJson<UserFilter>,
) -> UserResult<Json<UserPage>> {
    let page = service
        .filter_users(filter, Pagination::from(&params))
        .await?;
    Ok(Json(page))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "users",
    params(
        ("id" = uuid::Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn get_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    UuidPath(id): UuidPath,
) -> UserResult<Json<UserResponse>> {
    let user = service.get_user(id).await?;
    Ok(Json(user))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "",
    tag = "users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn create_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> UserResult<impl IntoResponse> {
    let user = service.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Update a user
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "users",
    params(
        ("id" = uuid::Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn update_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateUser>,
) -> UserResult<Json<UserResponse>> {
    let user = service.update_user(id, input).await?;
    Ok(Json(user))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "users",
    params(
        ("id" = uuid::Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub async fn delete_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    UuidPath(id): UuidPath,
) -> UserResult<Json<MessageResponse>> {
    service.delete_user(id).await?;
    Ok(Json(MessageResponse {
        message: USER_DELETED.to_string(),
    }))
}
