pub mod health;
pub mod metrics;
pub mod swagger;
pub mod users;

use actix_web::web;

use crate::utils::AppError;

/// Registers every HTTP route. Expects `web::Data<dyn UserStore>` in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .route("/metrics", web::get().to(metrics::get_metrics))
        .service(
            web::scope("/users")
                .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                    log::warn!("⚠️  Rejected request body: {}", err);
                    AppError::InvalidRequest("Invalid request payload".to_string()).into()
                }))
                .service(
                    web::resource(["", "/"])
                        .route(web::get().to(users::list_users))
                        .route(web::post().to(users::create_user)),
                )
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(users::get_user))
                        .route(web::put().to(users::update_user))
                        .route(web::delete().to(users::delete_user)),
                ),
        );
}
