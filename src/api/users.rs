use actix_web::{web, HttpResponse};

use crate::models::{CreateUserResponse, ErrorResponse, MessageResponse, User, UserPayload};
use crate::storage::{StorageError, UserStore};
use crate::utils::AppError;

/// Logs a failed storage call at the level its HTTP status deserves
fn storage_error(context: &str, err: StorageError) -> AppError {
    match &err {
        StorageError::NotFound | StorageError::InvalidArgument(_) => {
            log::warn!("⚠️  {}: {}", context, err)
        }
        _ => log::error!("❌ {}: {}", context, err),
    }
    AppError::from(err)
}

/// GET /users/ - Lists every user
#[utoipa::path(
    get,
    path = "/users/",
    tag = "Users",
    responses(
        (status = 200, description = "All users, unordered", body = [User]),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn list_users(store: web::Data<dyn UserStore>) -> Result<HttpResponse, AppError> {
    let users = store
        .list()
        .await
        .map_err(|e| storage_error("Failed to list users", e))?;

    log::info!("📋 Listed {} users", users.len());
    Ok(HttpResponse::Ok().json(users))
}

/// GET /users/{id} - Fetches one user
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "The user", body = User),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn get_user(
    store: web::Data<dyn UserStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let user = store
        .get(&id)
        .await
        .map_err(|e| storage_error(&format!("Failed to fetch user {}", id), e))?;

    Ok(HttpResponse::Ok().json(user))
}

/// POST /users/ - Creates a user; any `id` in the body is ignored
#[utoipa::path(
    post,
    path = "/users/",
    tag = "Users",
    request_body = UserPayload,
    responses(
        (status = 201, description = "User created", body = CreateUserResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn create_user(
    store: web::Data<dyn UserStore>,
    body: web::Json<UserPayload>,
) -> Result<HttpResponse, AppError> {
    let user = User::from(body.into_inner());

    let id = store
        .create(user.clone())
        .await
        .map_err(|e| storage_error("Failed to create user", e))?;

    log::info!("✅ User created: {}", id);
    Ok(HttpResponse::Created().json(CreateUserResponse {
        message: "User created successfully".to_string(),
        user: user.with_id(id),
    }))
}

/// PUT /users/{id} - Replaces name and email of an existing user
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User identifier")),
    request_body = UserPayload,
    responses(
        (status = 200, description = "User updated", body = MessageResponse),
        (status = 400, description = "Malformed identifier or body", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn update_user(
    store: web::Data<dyn UserStore>,
    path: web::Path<String>,
    body: web::Json<UserPayload>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    store
        .update(&id, User::from(body.into_inner()))
        .await
        .map_err(|e| storage_error(&format!("Failed to update user {}", id), e))?;

    log::info!("🔧 User updated: {}", id);
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "User updated successfully".to_string(),
    }))
}

/// DELETE /users/{id} - Removes a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn delete_user(
    store: web::Data<dyn UserStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    store
        .delete(&id)
        .await
        .map_err(|e| storage_error(&format!("Failed to delete user {}", id), e))?;

    log::info!("🗑️  User deleted: {}", id);
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "User deleted successfully".to_string(),
    }))
}
