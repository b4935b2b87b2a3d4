use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Users Service API",
        version = "1.0.0",
        description = "CRUD API for a single User resource (id, name, email).\n\n**Storage:** backed by a JSON file or MongoDB, selected with `STORAGE_MODE`."
    ),
    paths(
        // Users
        crate::api::users::list_users,
        crate::api::users::get_user,
        crate::api::users::create_user,
        crate::api::users::update_user,
        crate::api::users::delete_user,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            crate::models::User,
            crate::models::UserPayload,
            crate::models::CreateUserResponse,
            crate::models::MessageResponse,
            crate::models::ErrorResponse,
            crate::api::health::HealthResponse,
            crate::api::metrics::MetricsResponse,
        )
    ),
    tags(
        (name = "Users", description = "Create, read, update and delete users."),
        (name = "Health", description = "Health check and request metrics."),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_user_routes() {
        let json = ApiDoc::openapi().to_json().unwrap();
        assert!(json.contains("\"/users/\""));
        assert!(json.contains("\"/users/{id}\""));
        assert!(json.contains("\"/health\""));
    }
}
