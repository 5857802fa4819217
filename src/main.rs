use actix_cors::Cors;
use actix_web::{
    self, App, HttpServer,
    middleware::{Logger, from_fn},
    web,
};
use std::sync::{Arc, LazyLock};

use crate::{
    configs::{RedisCache, connect_database},
    middlewares::authentication,
    modules::{
        catalog::repository_pg::CatalogRepositoryPg,
        friend::{repository_pg::FriendRepositoryPg, service::FriendService},
        notification::{
            hub::NotificationHub, repository_pg::NotificationRepositoryPg,
            service::NotificationService,
        },
        profile::{repository_pg::ProfileRepositoryPg, service::ProfileService},
        ranking::{repository_pg::RankingRepositoryPg, service::RankingService},
    },
};

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
#[cfg(test)]
mod test;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check() -> &'static str {
    "Server is running"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let db_pool =
        connect_database().await.map_err(|_| std::io::Error::other("Database connection error"))?;

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .map_err(|e| std::io::Error::other(format!("Migration error: {e}")))?;

    let redis_cache = Arc::new(
        RedisCache::new().await.map_err(|_| std::io::Error::other("Redis connection error"))?,
    );

    let profile_repo = Arc::new(ProfileRepositoryPg::new(db_pool.clone()));
    let friend_repo = Arc::new(FriendRepositoryPg::new(db_pool.clone()));
    let ranking_repo = Arc::new(RankingRepositoryPg::new(db_pool.clone()));
    let catalog_repo = Arc::new(CatalogRepositoryPg::new(db_pool.clone()));
    let notification_repo = Arc::new(NotificationRepositoryPg::new(db_pool.clone()));

    let hub = NotificationHub::new();
    let notification_service =
        Arc::new(NotificationService::with_dependencies(notification_repo, hub.clone()));

    let profile_service = web::Data::new(ProfileService::with_dependencies(
        profile_repo.clone(),
        redis_cache.clone(),
    ));
    let friend_service = web::Data::new(FriendService::with_dependencies(
        friend_repo.clone(),
        profile_repo.clone(),
        ranking_repo.clone(),
        notification_service.clone(),
    ));
    let ranking_service = web::Data::new(RankingService::with_dependencies(
        ranking_repo,
        catalog_repo,
        profile_repo,
        friend_repo,
        notification_service.clone(),
    ));
    let notification_service = web::Data::from(notification_service);
    let hub = web::Data::new(hub);

    println!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(ENV.frontend_url.as_str())
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(profile_service.clone())
            .app_data(friend_service.clone())
            .app_data(ranking_service.clone())
            .app_data(notification_service.clone())
            .app_data(hub.clone())
            .app_data(web::Data::new(db_pool.clone()))
            .service(health_check)
            .service(
                web::scope("/api")
                    .wrap(from_fn(authentication))
                    .configure(modules::profile::route::configure)
                    .configure(modules::friend::route::configure)
                    .configure(modules::ranking::route::configure)
                    .configure(modules::notification::route::configure),
            )
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await
}
