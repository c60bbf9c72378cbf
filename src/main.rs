use apacks_server::{Config, build_rocket, init_tracing};

#[rocket::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level, config.logging.json_format);
    tracing::info!(address = %config.server.address, port = config.server.port, "starting server");

    if let Err(e) = build_rocket(config).launch().await {
        tracing::error!(error = %e, "server failed to start");
        std::process::exit(1);
    }
}
