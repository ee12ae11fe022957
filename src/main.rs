use std::net::TcpListener;

use authd::configuration::get_configuration;
use authd::startup::run;
use authd::telemetry::init_telemetry;
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry();

    tracing::info!("Starting application");

    let configuration = match get_configuration() {
        Ok(config) => {
            tracing::info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Configuration error",
            ));
        }
    };

    let connection_string = configuration.database.connection_string();
    tracing::info!("Attempting to connect to database");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&connection_string)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create connection pool: {}", e);
            std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "Database connection error",
            )
        })?;

    tracing::info!("Database connection pool created successfully");

    let redis_client = redis::Client::open(configuration.session_store.connection_string())
        .map_err(|e| {
            tracing::error!("Invalid session store configuration: {}", e);
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "Session store error")
        })?;

    tracing::info!("Session store client created successfully");

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    tracing::info!("Binding server to address: {}", address);

    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    let auth_config = configuration.auth.clone();

    let server = run(listener, pool, redis_client, auth_config)?;
    tracing::info!("Server started successfully");

    let _ = server.await;

    Ok(())
}
