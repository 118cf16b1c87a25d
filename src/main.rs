#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![deny(warnings)]
#![allow(clippy::multiple_crate_versions)]

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use schedeuler_auth::{
    authentication::{AuthenticationServiceFactory, PostAuthResolver},
    handlers::{auth_callback, health},
    settings::SchedeulerSettings,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load configuration from Settings.toml and environment variables
    // This also loads .env file and initializes the logger
    let settings = SchedeulerSettings::load()
        .map_err(|e| std::io::Error::other(format!("Failed to load settings: {e}")))?;

    let resolver = AuthenticationServiceFactory::create_resolver(&settings)
        .map_err(|e| std::io::Error::other(format!("Failed to build HTTP client: {e}")))?;

    start_server(resolver, settings).await
}

/// Start the HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Server binding fails
/// - Server fails to start
async fn start_server(resolver: PostAuthResolver, settings: SchedeulerSettings) -> std::io::Result<()> {
    let bind_address = settings.get_bind_address();
    print_startup_info(&bind_address, &settings);

    let cors_origins = settings.get_cors_origins();
    let resolver = web::Data::new(resolver);
    let settings = web::Data::new(settings);

    HttpServer::new(move || {
        let cors_origins = cors_origins.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _| {
                cors_origins
                    .iter()
                    .any(|allowed| allowed == origin.to_str().unwrap_or(""))
            })
            .allowed_methods(vec!["GET", "OPTIONS"])
            .allowed_headers(vec!["Content-Type", "Accept"])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(resolver.clone())
            .app_data(settings.clone())
            .wrap(cors)
            .wrap(Logger::new("%a \"%r\" %s %T").exclude("/ping"))
            .configure(configure_services)
    })
    .bind(&bind_address)?
    .run()
    .await
}

fn configure_services(cfg: &mut web::ServiceConfig) {
    cfg.route("/auth/callback", web::get().to(auth_callback))
        .route("/ping", web::get().to(health));
}

fn print_startup_info(bind_address: &str, settings: &SchedeulerSettings) {
    println!(
        "Starting SchedEuler auth callback service v{} on http://{bind_address}",
        schedeuler_auth::VERSION
    );
    println!();
    println!("Endpoints:");
    println!("  GET  /auth/callback - OAuth callback (code exchange + dashboard redirect)");
    println!("  GET  /ping          - Health check");
    println!();
    println!("Identity provider: {}", settings.supabase.auth_url());
    match settings.site_url() {
        Some(site_url) => println!("Redirects are absolute on {site_url}"),
        None => println!("Redirects are relative to the request origin"),
    }
}
