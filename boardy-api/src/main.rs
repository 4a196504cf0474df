use actix_cors::Cors;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::prelude::*;

mod config;
mod error;
mod handlers;
mod helpers;
mod integrations;

use helpers::attempts::AttemptCounter;
use helpers::session::{InMemorySessionStore, SessionPropagator};
use integrations::contact_store::{ContactStore, SupabaseContactStore};
use integrations::linkedin_import::LinkedInImporter;
use integrations::make_webhooks::MakeWebhooks;

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Boardy Pro onboarding API"
    }))
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy"
    }))
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    log_file_path: Option<String>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = args.log_file_path {
        let log_path = std::path::Path::new(&log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("boardy-api.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter.clone())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    // Load config
    let (config, config_path) = config::ApiConfig::load().expect("Failed to load config");
    tracing::info!("Config loaded from {:?}", config_path);

    // Get server config or use defaults
    let (host, port) = if let Some(server_config) = &config.server {
        (server_config.host.clone(), server_config.port)
    } else {
        ("127.0.0.1".to_string(), 8080)
    };

    tracing::info!("Server will listen on {}:{}", host, port);

    let http_client = reqwest::Client::new();

    // External collaborators
    let supabase = config.supabase.clone().unwrap_or_default();
    let contact_store: Arc<dyn ContactStore> = Arc::new(SupabaseContactStore::new(
        http_client.clone(),
        &supabase.url,
        supabase.anon_key.clone(),
    ));

    let webhooks_config = config.webhooks.clone().unwrap_or_default();
    let webhooks = Arc::new(MakeWebhooks::new(
        http_client.clone(),
        &webhooks_config.team_lookup_url,
        &webhooks_config.team_join_url,
        &webhooks_config.pro_status_url,
    ));

    let railway = config.railway.clone().unwrap_or_default();
    let importer = Arc::new(LinkedInImporter::new(
        http_client.clone(),
        &railway.linkedin_import_base,
    ));

    // Cross-step session identity
    let session_store = Arc::new(InMemorySessionStore::new());
    let session = Arc::new(SessionPropagator::new(session_store));

    // Latest-attempt-wins guard for contact lookups
    let attempts = Arc::new(AttemptCounter::new());

    let config_data = Arc::new(config.clone());

    println!("Starting server on {}:{}", host, port);

    HttpServer::new(move || {
        // Configure CORS
        let cors = if let Some(cors_config) = &config.cors {
            let mut cors_builder = Cors::default();
            for origin in &cors_config.allowed_origins {
                cors_builder = cors_builder.allowed_origin(origin);
            }
            cors_builder
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec!["Authorization", "Accept", "Content-Type"])
                .max_age(3600)
        } else {
            Cors::default()
                .allow_any_origin()
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                .allowed_headers(vec!["Authorization", "Accept", "Content-Type"])
                .max_age(3600)
        };

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(config_data.clone()))
            .app_data(web::Data::new(contact_store.clone()))
            .app_data(web::Data::new(webhooks.clone()))
            .app_data(web::Data::new(importer.clone()))
            .app_data(web::Data::new(session.clone()))
            .app_data(web::Data::new(attempts.clone()))
            .app_data(web::Data::new(http_client.clone()))
            .service(hello)
            .service(health)
            .route("/api/contacts/lookup", web::post().to(handlers::contacts::lookup_contact))
            .route("/api/session", web::get().to(handlers::session::resolve_session))
            .route("/api/cronofy/link/{contact_id}", web::get().to(handlers::cronofy::calendar_link))
            .route("/api/teams/resolve", web::post().to(handlers::teams::resolve_team))
            .route("/api/teams/join", web::post().to(handlers::teams::join_team))
            .route("/api/contacts/{contact_id}/linkedin", web::post().to(handlers::linkedin::upload_connections))
            .route("/api/contacts/{contact_id}/pro", web::post().to(handlers::onboarding::activate_pro))
            .route("/api/booking-link", web::post().to(handlers::onboarding::save_booking_link))
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
