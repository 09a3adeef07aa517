mod config_commands;
mod run_commands;

use {
    clap::{Parser, Subcommand},
    std::path::PathBuf,
    tracing::{error, info, warn},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "courier", about = "Courier: LivePerson messaging gateway", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file (default: courier.{toml,yaml,yml,json} in ./ or the user config dir).
    #[arg(long, global = true, env = "COURIER_CONFIG")]
    config: Option<PathBuf>,

    // Gateway arguments (used when no subcommand is provided, or with `gateway` subcommand)
    /// Address to bind to (overrides config value).
    #[arg(long, global = true)]
    bind: Option<String>,
    /// Port to listen on (overrides config value).
    #[arg(long, global = true)]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gateway server (default when no subcommand is provided).
    Gateway,
    /// Run one greeting handshake and print the conversation id.
    Greet,
    /// Fetch conversation history and write it to the output file.
    History {
        /// Conversation to search for (overrides config value).
        #[arg(long)]
        conversation_id: Option<String>,
    },
    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: config_commands::ConfigAction,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);
    // Ignore the error: a provider may already be installed.
    let _ = rustls::crypto::ring::default_provider().install_default();

    info!(version = env!("CARGO_PKG_VERSION"), "courier starting");

    match cli.command {
        // Default: start gateway when no subcommand is provided
        None | Some(Commands::Gateway) => {
            let (mut config, path) = courier_config::load_or_discover(cli.config.as_deref())?;
            match &path {
                Some(path) => info!(path = %path.display(), "loaded config"),
                None => warn!("using default config"),
            }

            let report = courier_config::validate_config(&config);
            for d in &report.diagnostics {
                match d.severity {
                    courier_config::Severity::Error => {
                        error!(path = %d.path, "{}", d.message)
                    },
                    courier_config::Severity::Warning => warn!(path = %d.path, "{}", d.message),
                    courier_config::Severity::Info => info!(path = %d.path, "{}", d.message),
                }
            }
            if report.has_errors() {
                anyhow::bail!("invalid configuration, run `courier config check` for details");
            }

            // CLI args override config values
            if let Some(bind) = cli.bind {
                config.server.bind = bind;
            }
            if let Some(port) = cli.port {
                config.server.port = port;
            }
            courier_gateway::start_gateway(config).await
        },
        Some(Commands::Greet) => {
            let (config, _) = courier_config::load_or_discover(cli.config.as_deref())?;
            run_commands::greet(&config).await
        },
        Some(Commands::History { conversation_id }) => {
            let (config, _) = courier_config::load_or_discover(cli.config.as_deref())?;
            run_commands::history(&config, conversation_id).await
        },
        Some(Commands::Config { action }) => {
            config_commands::handle_config(action, cli.config.as_deref())
        },
    }
}
