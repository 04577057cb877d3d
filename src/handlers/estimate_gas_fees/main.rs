use anyhow::Context;
use clap::{Parser, ValueEnum};
use common::config::ConfigLoader;
use eip1559_gas_fees::blockchain::gas_fees::estimation::FeeEstimator;
use eip1559_gas_fees::blockchain::providers::{
    ethers_provider::MiddlewareEvmBlockchainProvider, json_rpc::JsonRpcEvmBlockchainProvider,
    EvmBlockchainProvider,
};
use eip1559_gas_fees::config::Config;
use ethers::providers::{Http, Provider};
use reqwest_middleware::ClientBuilder;
use tracing::level_filters::LevelFilter;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Transport {
    /// ethers `Provider<Http>`
    Ethers,
    /// Raw JSON-RPC requests over reqwest
    JsonRpc,
}

#[derive(Parser)]
#[command(name = "estimate_gas_fees")]
#[command(about = "Estimates EIP-1559 gas fees from the tips paid in the most recent blocks")]
struct Args {
    /// Confirmation speed (slow, normal, fast). Defaults to DEFAULT_SPEED
    #[arg(short, long)]
    speed: Option<String>,

    /// Number of recent blocks to sample. Defaults to DEFAULT_BLOCK_COUNT
    #[arg(short = 'b', long = "blocks")]
    nb_blocks: Option<u64>,

    /// Client used to reach EVM_RPC_ENDPOINT
    #[arg(short, long, value_enum, default_value_t = Transport::Ethers)]
    transport: Transport,

    /// Log debug events to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// Arguments given on the command line win over the configured defaults.
fn resolve_request(args: &Args, config: &Config) -> (String, u64) {
    let speed = args
        .speed
        .clone()
        .unwrap_or_else(|| config.default_speed.clone());
    let nb_blocks = args.nb_blocks.unwrap_or(config.default_block_count);

    (speed, nb_blocks)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    LogTracer::init()?;
    let app_name = concat!(env!("CARGO_PKG_NAME"), "-", env!("CARGO_PKG_VERSION")).to_string();
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(std::io::stderr());
    let bunyan_formatting_layer = BunyanFormattingLayer::new(app_name, non_blocking_writer);

    let level = if args.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::registry()
        .with(level)
        .with(JsonStorageLayer)
        .with(bunyan_formatting_layer)
        .init();

    let config = ConfigLoader::load_default::<Config>()?;
    let estimator = FeeEstimator::new(config.speed_modes()?);

    let provider: Box<dyn EvmBlockchainProvider> = match args.transport {
        Transport::Ethers => {
            let client = Provider::<Http>::try_from(config.evm_rpc_endpoint.as_str())
                .with_context(|| format!("Invalid endpoint {}", config.evm_rpc_endpoint))?;
            Box::new(MiddlewareEvmBlockchainProvider::new(client))
        }
        Transport::JsonRpc => {
            let http_client = ClientBuilder::new(reqwest::Client::new()).build();
            Box::new(JsonRpcEvmBlockchainProvider::new(
                config.evm_rpc_endpoint.clone(),
                http_client,
            ))
        }
    };

    let (speed, nb_blocks) = resolve_request(&args, &config);
    tracing::info!(speed = %speed, nb_blocks, transport = ?args.transport, "Execution started");

    let fees = estimator
        .estimate(provider.as_ref(), &speed, nb_blocks)
        .await
        .context("Gas fee estimation failed")?;

    println!("{}", serde_json::to_string_pretty(&fees)?);

    Ok(())
}
