use clap::{Parser, Subcommand};
use colored::*;
use std::net::IpAddr;
use std::path::PathBuf;
use std::process;

use todo_cli::Config;

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "Todo - task list server with a browser client")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server and serve the client app
    Serve {
        #[arg(long, help = "Address to bind (overrides TODO_HOST)")]
        host: Option<IpAddr>,
        #[arg(long, help = "Port to listen on (overrides PORT)")]
        port: Option<u16>,
        #[arg(long, help = "SQLite database file (overrides TODO_DATABASE_PATH)")]
        database: Option<PathBuf>,
        #[arg(long, help = "Directory holding the client app (overrides TODO_STATIC_DIR)")]
        static_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = handle_command(cli.command).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Serve {
            host,
            port,
            database,
            static_dir,
        } => {
            let mut config = Config::from_env()?;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config = config.with_port(port)?;
            }
            if let Some(database) = database {
                config.database_path = database;
            }
            if let Some(static_dir) = static_dir {
                config.static_dir = static_dir;
            }

            todo_cli::init_tracing();
            todo_cli::run(config).await
        }
    }
}
