//! couch-relay
//!
//! Serves CouchDB `_list`, `_show` and `_view` results through templates.
//!
//! ```text
//!     Client Request                ┌──────────────────────────────────────────┐
//!     ──────────────────────────────┼─▶ axum router ──▶ Forwarder ──────────────┼──▶ CouchDB
//!       GET /show/article-42        │   /show/{*name}    resolve_url + GET      │    /_design/app/_show/article-42
//!                                   │                        │                  │
//!     Client Response               │                        ▼                  │
//!     ◀─────────────────────────────┼── response.rs ◀── 200: decode + render    │
//!                                   │                   404: not-found page     │
//!                                   │                   *:   relay status       │
//!                                   └──────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use couch_relay::config::RelayConfig;
use couch_relay::couch::{resolve_url, DocType};
use couch_relay::lifecycle::{prepare, read_config, signals::shutdown_on_signal, Shutdown};
use couch_relay::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "couch-relay", version)]
#[command(about = "Relay requests to CouchDB list, show and view functions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Path to a TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the listener bind address
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Print the CouchDB URL a request would be forwarded to
    Resolve {
        /// Design-document function type (list, show or view)
        doc_type: String,

        /// Name of the function target, e.g. "by_date" or "index/recent"
        name: String,

        #[arg(long)]
        couch_url: Option<String>,

        #[arg(long)]
        design_doc: Option<String>,

        /// Path to a TOML configuration file supplying the defaults
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve { config: None, bind: None }) {
        Commands::Serve { config, bind } => {
            let mut config = read_config(config.as_deref())?;
            if let Some(bind) = bind {
                config.listener.bind_address = bind;
            }
            serve(config).await
        }
        Commands::Resolve {
            doc_type,
            name,
            couch_url,
            design_doc,
            config,
        } => {
            doc_type.parse::<DocType>()?;
            let config = read_config(config.as_deref())?;
            let url = resolve_url(
                &doc_type,
                &name,
                couch_url.as_deref(),
                design_doc.as_deref(),
                &config.couch,
            )?;
            println!("{}", url);
            Ok(())
        }
    }
}

async fn serve(config: RelayConfig) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&config.observability);
    tracing::info!("couch-relay v{} starting", env!("CARGO_PKG_VERSION"));

    let (server, listener) = match prepare(config).await {
        Ok(prepared) => prepared,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return Err(e.into());
        }
    };

    let shutdown = Shutdown::new();
    tokio::spawn(shutdown_on_signal(shutdown.clone()));

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
