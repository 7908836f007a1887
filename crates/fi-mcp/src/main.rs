//! Fi MCP mock server: entry point.

use std::time::Duration;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use fi_data::FixtureStore;
use fi_mcp::config::{
    resolve_data_roots, resolve_dist_dir, resolve_listen_addr, ServerConfig,
    DEFAULT_READ_TIMEOUT_MS,
};
use fi_mcp::protocol::router::DEFAULT_SESSION_ID;
use fi_mcp::tools::ToolRegistry;
use fi_mcp::transport::HttpTransport;
use fi_mcp::types::{SERVER_NAME, SERVER_VERSION};

#[derive(Parser)]
#[command(
    name = "fi-mcp",
    about = "Mock Fi MCP server: session-gated access to per-user financial fixtures",
    version
)]
struct Cli {
    /// Fixture root directory; repeat to probe several roots in order.
    /// Also reads FI_MCP_DATA_DIRS.
    #[arg(short, long = "data-dir", global = true)]
    data_dirs: Vec<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default).
    Serve {
        /// Listen address (host:port). Defaults to 0.0.0.0:$PORT, or port 3001.
        #[arg(long)]
        addr: Option<String>,

        /// Built front-end directory served at /assets with an index.html fallback.
        /// Also reads FI_MCP_DIST_DIR.
        #[arg(long)]
        dist_dir: Option<String>,

        /// Session id assumed when a request has no Mcp-Session-Id header.
        #[arg(long, default_value = DEFAULT_SESSION_ID)]
        default_session: String,

        /// Upper bound on a single fixture read, in milliseconds.
        #[arg(long, default_value_t = DEFAULT_READ_TIMEOUT_MS)]
        read_timeout_ms: u64,
    },

    /// Print server info and the tool catalog as JSON.
    Info,

    /// List phone-number profiles and the catalog tools each has fixtures for.
    Profiles {
        /// Print the profiles as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   fi-mcp completions bash > ~/.local/share/bash-completion/completions/fi-mcp
    ///   fi-mcp completions zsh > ~/.zfunc/_fi-mcp
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let data_roots = resolve_data_roots(&cli.data_dirs);

    match cli.command.unwrap_or(Commands::Serve {
        addr: None,
        dist_dir: None,
        default_session: DEFAULT_SESSION_ID.to_string(),
        read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
    }) {
        Commands::Serve {
            addr,
            dist_dir,
            default_session,
            read_timeout_ms,
        } => {
            let config = ServerConfig {
                addr: resolve_listen_addr(addr.as_deref())?,
                data_roots,
                dist_dir: resolve_dist_dir(dist_dir.as_deref()),
                default_session_id: default_session,
                read_timeout: Duration::from_millis(read_timeout_ms),
            };

            tracing::info!("Fi MCP mock server v{SERVER_VERSION}");
            for root in &config.data_roots {
                tracing::info!("Data root: {}", root.display());
            }
            match &config.dist_dir {
                Some(dist) => tracing::info!("Front-end: {}", dist.display()),
                None => tracing::info!("Front-end: disabled (no dist directory)"),
            }

            let transport = HttpTransport::new(&config);
            transport.run(config.addr).await?;
        }

        Commands::Info => {
            let tools = ToolRegistry::list_tools();
            let info = serde_json::json!({
                "server": { "name": SERVER_NAME, "version": SERVER_VERSION },
                "tools": tools,
                "tool_count": tools.len(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Profiles { json } => {
            let store = FixtureStore::new(data_roots);
            let summaries = store.summaries();
            if summaries.is_empty() {
                eprintln!("No profiles found under:");
                for root in store.roots() {
                    eprintln!("  {}", root.display());
                }
                std::process::exit(1);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
                return Ok(());
            }

            let catalog_size = ToolRegistry::tool_names().count();
            for summary in summaries {
                let missing: Vec<&str> = ToolRegistry::tool_names()
                    .filter(|name| !summary.tools.iter().any(|t| t == name))
                    .collect();
                let label = summary
                    .description
                    .as_deref()
                    .map(|d| format!(" ({d})"))
                    .unwrap_or_default();
                println!(
                    "{}: {}/{catalog_size} tools{label}",
                    summary.phone_number,
                    catalog_size - missing.len()
                );
                if !missing.is_empty() {
                    println!("  missing: {}", missing.join(", "));
                }
            }
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "fi-mcp", &mut std::io::stdout());
        }
    }

    Ok(())
}
