#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_files::Files;
#[cfg(feature = "server")]
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
#[cfg(feature = "server")]
use actix_web::cookie::Key;
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware as actix_middleware, web};
#[cfg(feature = "server")]
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
#[cfg(feature = "server")]
use tera::Tera;

#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::repository::http::HttpRepository;
#[cfg(feature = "server")]
use crate::services::feature_flags::FeatureFlagCache;
#[cfg(feature = "server")]
use crate::services::suppliers::ListingSequencers;

pub mod domain;
#[cfg(feature = "server")]
pub mod dto;
pub mod error_conversions;
pub mod forms;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod models;
pub mod pagination;
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
pub mod selection;
#[cfg(feature = "server")]
pub mod services;

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    use crate::routes::api::{api_suppliers, invalidate_feature_flags};
    use crate::routes::selection::{
        clear_compare, show_compare, show_favorites, toggle_compare, toggle_favorite,
    };
    use crate::routes::submit::{show_submit, submit_supplier};
    use crate::routes::suppliers::{
        add_quote_request, add_review, contact_supplier, send_contact, show_contact, show_index,
        show_supplier,
    };

    let repo = HttpRepository::new(&server_config)
        .map_err(|e| std::io::Error::other(format!("Failed to build backend client: {e}")))?;

    // Shared across workers: flag values and per-visitor listing sequencing.
    let flags = web::Data::new(FeatureFlagCache::new());
    let sequencers = web::Data::new(ListingSequencers::new());

    // Keys and stores for sessions and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Starting supplier directory on {}:{}",
        bind_address.0,
        bind_address.1
    );

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::error_handlers())
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(server_config.domain.clone()))
                    .build(),
            )
            .wrap(actix_middleware::Compress::default())
            .wrap(actix_middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(
                web::scope("/api")
                    .service(api_suppliers)
                    .service(invalidate_feature_flags),
            )
            .service(show_index)
            .service(show_supplier)
            .service(add_review)
            .service(add_quote_request)
            .service(contact_supplier)
            .service(show_contact)
            .service(send_contact)
            .service(show_favorites)
            .service(toggle_favorite)
            .service(show_compare)
            // Registered before the toggle so `clear` is not read as an id.
            .service(clear_compare)
            .service(toggle_compare)
            .service(show_submit)
            .service(submit_supplier)
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(flags.clone())
            .app_data(sequencers.clone())
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
