use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use sqlx::PgPool;
use std::net::TcpListener;

use crate::configuration::AuthSettings;
use crate::logger::RequestLogger;
use crate::middleware::AuthMiddleware;
use crate::routes::{delete_account, health_check, login, logout, profile, register};

pub fn run(
    listener: TcpListener,
    connection: PgPool,
    redis_client: redis::Client,
    auth_config: AuthSettings,
) -> Result<Server, std::io::Error> {
    let connection = web::Data::new(connection);
    let redis_client_data = web::Data::new(redis_client.clone());
    let auth_config_data = web::Data::new(auth_config.clone());

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestLogger)

            // Shared state
            .app_data(connection.clone())
            .app_data(redis_client_data.clone())
            .app_data(auth_config_data.clone())

            // Public routes (no token required)
            .route("/health", web::get().to(health_check))
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/delete", web::post().to(delete_account))

            // Protected routes (require a live session token)
            .service(
                web::resource("/logout")
                    .wrap(AuthMiddleware::new(auth_config.clone(), redis_client.clone()))
                    .route(web::post().to(logout)),
            )
            .service(
                web::resource("/profile")
                    .wrap(AuthMiddleware::new(auth_config.clone(), redis_client.clone()))
                    .route(web::get().to(profile)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
