use menu_server::{Config, Server, init_logger};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    init_logger();

    let config = Config::from_env()?;
    tracing::info!(
        environment = %config.environment,
        hosts = ?config.cassandra.hosts,
        "Starting menu-server"
    );

    Server::new(config).run().await?;
    Ok(())
}
