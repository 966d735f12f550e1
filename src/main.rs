use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use sporlproxy::{config, error, info, logging, server, success, warning};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Defaults to `serve` when omitted
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the proxy server
    Serve(ServeOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone, Default)]
pub struct ServeOptions {
    /// Port to listen on, overrides PORT
    #[clap(long)]
    pub port: Option<u16>,

    /// Load environment variables from this file instead of the default locations
    #[clap(long)]
    pub env_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[clap(long, env = "LOG_LEVEL", default_value = logging::DEFAULT_LOG_LEVEL)]
    pub log_level: String,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

async fn serve(opt: ServeOptions) {
    let log_level = if opt.log_level.is_empty() {
        logging::DEFAULT_LOG_LEVEL
    } else {
        opt.log_level.as_str()
    };
    logging::init_tracing(log_level);

    match config::load_env(opt.env_file.as_deref()) {
        Ok(Some(path)) => info!("Loaded environment from {}", path.display()),
        Ok(None) => warning!("No .env file found, relying on process environment"),
        Err(e) => error!("Cannot load environment. Err: {}", e),
    }

    let mut config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Invalid configuration. Err: {}", e),
    };
    if let Some(port) = opt.port {
        config.port = port;
    }

    success!("Listening on http://{}", config.socket_addr());
    if let Err(e) = server::start_api_server(config).await {
        error!("Server stopped. Err: {}", e);
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve(ServeOptions::default())) {
        Command::Serve(opt) => serve(opt).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
