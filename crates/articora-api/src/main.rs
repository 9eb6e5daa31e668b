use articora_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    articora_api::telemetry::init_telemetry();

    // Initialize the application (database, services, routes)
    let (state, router) = articora_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    articora_api::setup::server::start_server(&config, router).await?;

    // Stop the retention sweeper before exiting
    state.shutdown_background().await;

    Ok(())
}
