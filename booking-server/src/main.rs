use booking_server::{print_banner, setup_environment, Config, Server, ServerState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_environment()?;
    print_banner();

    let config = Config::from_env();
    tracing::info!(
        port = config.http_port,
        environment = %config.environment,
        "DineBook booking server starting"
    );

    let state = ServerState::initialize(&config).await?;
    Server::with_state(config, state).run().await?;
    Ok(())
}
