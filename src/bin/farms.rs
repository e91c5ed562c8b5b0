use anyhow::Result;
use clap::Parser;
use farm_deployer::config::{Config, ConfigOverrides};
use farm_deployer::deployer::list_farms;
use farm_deployer::report::{OutputFormat, format_farms};
use farm_deployer::rpc::RpcClient;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "farms")]
#[command(about = "List the farms registered with a factory", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "table")]
    format: String,

    #[arg(long)]
    rpc_url: Option<String>,

    #[arg(long)]
    factory: Option<String>,
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
        ..Default::default()
    })?;

    let client = RpcClient::new(&config.json_rpc_url, config.request_timeout)?;
    let farms = list_farms(&client, config.factory_address).await?;

    println!("{}", format_farms(&farms, &format));

    Ok(())
}
