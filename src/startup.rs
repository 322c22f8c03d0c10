use actix_files as fs;
use actix_web::dev::Server;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::PgPool;
use std::net::TcpListener;

use crate::configuration::{ApplicationSettings, JwtSettings};
use crate::middleware::{FileserverMetrics, MetricsMiddleware};
use crate::routes::{
    create_chirp, create_user, delete_chirp, get_chirp, get_chirps, health_check, login, metrics,
    refresh, reset, revoke, update_user,
};

pub fn run(
    listener: TcpListener,
    connection: PgPool,
    jwt_config: JwtSettings,
    app_settings: ApplicationSettings,
) -> Result<Server, std::io::Error> {
    let connection = web::Data::new(connection);
    let jwt_config_data = web::Data::new(jwt_config);
    let app_settings_data = web::Data::new(app_settings);
    let fileserver_metrics = web::Data::new(FileserverMetrics::new());

    let server = HttpServer::new(move || {
        App::new()
            // Global middleware
            .wrap(Logger::default())

            // Shared state
            .app_data(connection.clone())
            .app_data(jwt_config_data.clone())
            .app_data(app_settings_data.clone())
            .app_data(fileserver_metrics.clone())

            // API routes; writes authorize per-handler since /api/chirps
            // mixes public reads and protected writes on one path
            .route("/api/healthz", web::get().to(health_check))
            .route("/api/users", web::post().to(create_user))
            .route("/api/users", web::put().to(update_user))
            .route("/api/login", web::post().to(login))
            .route("/api/refresh", web::post().to(refresh))
            .route("/api/revoke", web::post().to(revoke))
            .route("/api/chirps", web::post().to(create_chirp))
            .route("/api/chirps", web::get().to(get_chirps))
            .route("/api/chirps/{chirp_id}", web::get().to(get_chirp))
            .route("/api/chirps/{chirp_id}", web::delete().to(delete_chirp))

            // Admin surface
            .route("/admin/metrics", web::get().to(metrics))
            .route("/admin/reset", web::post().to(reset))

            // Static app shell, hit-counted (must be last to not override
            // API routes)
            .service(
                web::scope("/app")
                    .wrap(MetricsMiddleware::new(fileserver_metrics.clone()))
                    .service(fs::Files::new("/", "./public").index_file("index.html")),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
