//! Users API handlers.
//!
//! ```text
//! POST   /api/v1/users
//! GET    /api/v1/users
//! GET    /api/v1/users/{user_id}
//! PATCH  /api/v1/users/{user_id}
//! DELETE /api/v1/users/{user_id}
//! ```
//!
//! Handlers parse and structurally validate inbound requests, invoke exactly
//! one service operation through the driving ports, and shape the response.
//! Domain errors pass through untouched; the `ResponseError` impl maps them.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Deserializer};

use crate::domain::{
    DEFAULT_LIMIT, EmailAddress, Error, FullName, NewUser, Page, User, UserChanges,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    body_field_error, page_validation_error, parse_user_id,
};

/// Request body for `POST /api/v1/users`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[serde(default, alias = "full_name")]
    #[schema(example = "Ada Lovelace")]
    pub full_name: Option<String>,
    #[serde(default, alias = "is_active")]
    pub is_active: Option<bool>,
}

impl CreateUserRequest {
    fn into_candidate(self) -> Result<NewUser, Error> {
        let email =
            EmailAddress::new(self.email).map_err(|err| body_field_error("email", &err))?;
        let full_name = self
            .full_name
            .map(FullName::new)
            .transpose()
            .map_err(|err| body_field_error("fullName", &err))?;
        let candidate = NewUser::new(email, full_name);
        Ok(match self.is_active {
            Some(is_active) => candidate.with_active(is_active),
            None => candidate,
        })
    }
}

/// Distinguishes an absent field from an explicit `null`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Request body for `PATCH /api/v1/users/{user_id}`. Absent fields are left
/// unchanged; `"fullName": null` clears the stored name.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "full_name", deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub full_name: Option<Option<String>>,
    #[serde(default, alias = "is_active")]
    pub is_active: Option<bool>,
}

impl UpdateUserRequest {
    fn into_changes(self) -> Result<UserChanges, Error> {
        let mut changes = UserChanges::none();
        if let Some(email) = self.email {
            let email = EmailAddress::new(email).map_err(|err| body_field_error("email", &err))?;
            changes = changes.with_email(email);
        }
        if let Some(full_name) = self.full_name {
            let full_name = full_name
                .map(FullName::new)
                .transpose()
                .map_err(|err| body_field_error("fullName", &err))?;
            changes = changes.with_full_name(full_name);
        }
        if let Some(is_active) = self.is_active {
            changes = changes.with_active(is_active);
        }
        Ok(changes)
    }
}

/// Query parameters for `GET /api/v1/users`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(deny_unknown_fields)]
pub struct ListUsersQuery {
    /// Records to skip; zero or positive. Defaults to 0.
    #[serde(default)]
    pub offset: Option<i64>,
    /// Page size between 1 and 100. Defaults to 100.
    #[serde(default)]
    pub limit: Option<i64>,
}

impl ListUsersQuery {
    fn into_page(self) -> Result<Page, Error> {
        Page::new(
            self.offset.unwrap_or(0),
            self.limit.unwrap_or(DEFAULT_LIMIT),
        )
        .map_err(|err| page_validation_error(&err))
    }
}

/// Create a new user.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 409, description = "Email already registered", body = Error),
        (status = 422, description = "Structural validation failed", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let candidate = payload.into_inner().into_candidate()?;
    let user = state.users_command.create_user(candidate).await?;
    Ok(HttpResponse::Created().json(user))
}

/// List users within an offset/limit window, in creation order.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Users in the requested window", body = [User]),
        (status = 422, description = "Window out of range", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    query: web::Query<ListUsersQuery>,
) -> ApiResult<web::Json<Vec<User>>> {
    let page = query.into_inner().into_page()?;
    let users = state.users_query.list_users(page).await?;
    Ok(web::Json(users))
}

/// Fetch a single user by identifier.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = String, Path, description = "User identifier (UUID)")),
    responses(
        (status = 200, description = "The requested user", body = User),
        (status = 404, description = "No user with this identifier", body = Error),
        (status = 422, description = "Malformed identifier", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{user_id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let id = parse_user_id(&path.into_inner())?;
    let user = state.users_query.get_user(&id).await?;
    Ok(web::Json(user))
}

/// Apply a partial update to an existing user.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = String, Path, description = "User identifier (UUID)")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "The updated user", body = User),
        (status = 404, description = "No user with this identifier", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 422, description = "Structural validation failed", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/users/{user_id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<User>> {
    let id = parse_user_id(&path.into_inner())?;
    let changes = payload.into_inner().into_changes()?;
    let user = state.users_command.update_user(&id, changes).await?;
    Ok(web::Json(user))
}

/// Delete an existing user.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = String, Path, description = "User identifier (UUID)")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "No user with this identifier", body = Error),
        (status = 422, description = "Malformed identifier", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{user_id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path.into_inner())?;
    state.users_command.delete_user(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
