use color_eyre::eyre::Result;
use dotenv::dotenv;
use portfolio_api::config::ApiConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;

    // Wire the external-service clients
    let state = portfolio_api::build_state(&config)?;

    // Start API server
    portfolio_api::start_server(config, state).await?;

    Ok(())
}
