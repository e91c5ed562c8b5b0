use anyhow::Result;
use clap::Parser;
use farm_deployer::config::{Config, ConfigOverrides};
use farm_deployer::report::{OutputFormat, format_deployers};
use farm_deployer::rpc::RpcClient;
use farm_deployer::scanner::{ScanSettings, Scanner};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "deployers")]
#[command(about = "Map every farm of a factory to the address that deployed it", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "json")]
    format: String,

    /// Overrides JSON_RPC_URL
    #[arg(long)]
    rpc_url: Option<String>,

    /// Overrides FARM_FACTORY_ADDRESS
    #[arg(long)]
    factory: Option<String>,

    /// Overrides START_BLOCK
    #[arg(long)]
    from_block: Option<u64>,

    /// Only process the first N farms
    #[arg(long)]
    limit: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::from(cli.format.as_str());

    let config = Config::from_env(ConfigOverrides {
        rpc_url: cli.rpc_url,
        factory: cli.factory,
        start_block: cli.from_block,
    })?;
    info!("Factory address: {:?}", config.factory_address);
    info!("Start block: {}", config.start_block);

    let client = RpcClient::new(&config.json_rpc_url, config.request_timeout)?;
    info!("RPC endpoint: {}", client.endpoint());
    client.log_chain_head().await;

    let scanner = Scanner::new(
        client,
        ScanSettings {
            factory_address: config.factory_address,
            start_block: config.start_block,
            limit: cli.limit,
        },
    );

    let deployers = match scanner.run().await {
        Ok(deployers) => deployers,
        Err(e) => {
            error!("Scanner error: {:#}", e);
            return Err(e);
        }
    };

    println!("{}", format_deployers(&deployers, &format));

    Ok(())
}
