use anyhow::Context;
use batch_executor::{
    BatchAssembler, ExecutionContext,
    api::{AppState, InFlight, Server},
    config::Config,
    dispatch::{DirectSubmitter, Dispatcher, RelayChannel, RelayClient},
    gateway::GatewayClient,
    simulation::TenderlyClient,
};
use std::sync::Arc;
use tracing::info;

/// The main entry point for the batch executor service.
///
/// This function initializes logging, loads the configuration, connects the
/// gateway, simulation, relay and executor clients, and starts the JSON-RPC
/// API server.
#[tokio::main] // Marks the async main function to be run by the Tokio runtime.
async fn main() -> anyhow::Result<()> {
    // Initialize logging using tracing_subscriber.
    // This sets up a default formatter that prints logs to stdout.
    tracing_subscriber::fmt::init();

    // Load the configuration; the path can be overridden per deployment.
    // The config holds the simulation access key, so it is not logged as a whole.
    let config_path =
        std::env::var("BATCH_EXECUTOR_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    let config = Config::load(&config_path)
        .with_context(|| format!("loading configuration from {}", config_path))?;
    info!(
        "Batch executor starting for Safe {:?} on chain {}",
        config.chain.safe_address, config.chain.chain_id
    );

    // Connect the executor account.
    // Its private key is read from the environment, never from the config file.
    let chain = &config.chain;
    let private_key = std::env::var(&chain.signer_key_env)
        .with_context(|| format!("executor key not set in {}", chain.signer_key_env))?;
    let direct = DirectSubmitter::connect(&chain.rpc_url, &private_key, chain.chain_id)?;
    info!("Executing as {:?} on chain {}", direct.address(), chain.chain_id);

    // Every batch run is built, simulated and submitted for this Safe and executor
    let context = ExecutionContext {
        chain_id: chain.chain_id,
        safe_address: chain.safe_address,
        executing_account: direct.address(),
        simulate_execution: true,
    };

    // Create the relay channel if a relay is configured.
    // The same client serves both submission and the quota lookup.
    let relay = RelayClient::from_config(&config.relay, chain.chain_id, &chain.safe_version)?
        .map(|client| {
            let client = Arc::new(client);
            RelayChannel {
                submitter: client.clone(),
                quota: client,
            }
        });
    if relay.is_none() {
        info!("No relay configured, batches are executed directly");
    }

    // Create the batch assembler (gateway lookups + simulation)
    let assembler = BatchAssembler::new(
        Arc::new(GatewayClient::new(&config.gateway)?),
        Arc::new(TenderlyClient::new(&config.simulation, chain.multisend_address)?),
    );
    // Create the dispatcher that submits finalized batches to the multi-send contract
    let dispatcher = Dispatcher::new(chain.multisend_address, Arc::new(direct), relay);

    // Shared state for all request handlers
    let state = AppState {
        assembler: Arc::new(assembler),
        dispatcher: Arc::new(dispatcher),
        context,
        in_flight: InFlight::new(),
    };

    // Start the API server. This binds to the configured address and serves
    // requests until the process exits. The `?` operator propagates any
    // errors that occur during server startup.
    Server::new(config.api.clone(), state).start().await?;

    // Return `Ok(())` to indicate successful execution of the main function.
    Ok(())
}
