use clap::Parser;

use common::config::{ConfigManager, FileContentConfigProvider, Validate};
use common::logger;
use tictactoe_hub_server::broadcaster::Broadcaster;
use tictactoe_hub_server::hub::{GameHub, HubSettings};
use tictactoe_hub_server::log;
use tictactoe_hub_server::server_config::{DEFAULT_CONFIG_PATH, ServerConfig};
use tictactoe_hub_server::web_server::{WebServerState, run_web_server};

#[derive(Parser)]
#[command(name = "tictactoe_hub_server")]
struct Args {
    #[arg(long)]
    use_log_prefix: bool,

    /// YAML config file; defaults are used when it does not exist
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Overrides `listen_address` from the config file
    #[arg(long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Server".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let config_manager = ConfigManager::<FileContentConfigProvider, ServerConfig>::from_yaml_file(&args.config);
    let mut config = config_manager.get_config()?;
    if let Some(listen) = args.listen {
        config.listen_address = listen;
        config.validate()?;
    }
    let addr = config.socket_addr()?;

    let broadcaster = Broadcaster::new();
    let hub = GameHub::new(broadcaster.clone(), HubSettings::from(&config));
    let state = WebServerState {
        hub,
        broadcaster,
        outbound_queue_size: config.outbound_queue_size,
    };

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        log!("Shutdown signal received");
    };

    run_web_server(state, addr, shutdown_signal).await?;

    log!("Server shut down gracefully");

    Ok(())
}
