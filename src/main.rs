use std::sync::Arc;
use std::thread;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{middleware::Logger, web, App, HttpServer};

use sealbox::config::{Config, StoreBackend};
use sealbox::handlers;
use sealbox::store::memory::MemStore;
use sealbox::store::postgres::PgStore;
use sealbox::store::NoteStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();

    let store: Arc<dyn NoteStore> = match config.backend {
        StoreBackend::Postgres => {
            let database_url = config.database_url.clone().expect("env DATABASE_URL");
            Arc::new(PgStore::connect(&database_url).expect("failed to open the note store"))
        }
        StoreBackend::Memory => {
            log::warn!("running on the in-memory store, notes die with the process");
            Arc::new(MemStore::new())
        }
    };

    let sweeper = store.clone();
    let interval = config.cleanup_interval;
    thread::spawn(move || loop {
        thread::sleep(interval);
        match sweeper.purge_expired() {
            Ok(0) => {}
            Ok(count) => log::info!("purged {} expired notes", count),
            Err(err) => log::error!("expiry sweep failed: {}", err),
        }
    });

    let governor_config = GovernorConfigBuilder::default()
        .per_second(1)
        .burst_size(120)
        .finish()
        .expect("rate limiter configuration");

    let port = config.port;
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::from(store.clone()))
            // sealed 1 MiB notes must still fit after base64 and JSON framing
            .app_data(web::JsonConfig::default().limit(2 * 1024 * 1024))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Governor::new(&governor_config))
            .wrap(Logger::default())
            .route("/", web::get().to(handlers::index))
            .service(
                web::scope("/private-note")
                    .route("", web::post().to(handlers::note::create))
                    .route("/{id}", web::post().to(handlers::note::read)),
            )
    })
    .bind(format!("0.0.0.0:{}", port))?
    .run()
    .await
}
