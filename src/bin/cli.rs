//! lsmkv CLI
//!
//! Offline tool that opens a data directory directly. Do not point it at a
//! directory a running server owns.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use lsmkv::{Config, Engine};
use tracing_subscriber::{fmt, EnvFilter};

/// lsmkv CLI
#[derive(Parser, Debug)]
#[command(name = "lsmkv-cli")]
#[command(about = "Inspect and edit an lsmkv data directory")]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./lsmkv_data")]
    data_dir: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair (flushed to a table before exit)
    Put {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// List SSTables, oldest first
    Tables,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = Args::parse();
    let config = Config::builder().data_dir(&args.data_dir).build();

    let engine = match Engine::open(config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("error: failed to open {}: {}", args.data_dir, e);
            return ExitCode::FAILURE;
        }
    };

    let result = match args.command {
        Commands::Get { key } => match engine.get(&key) {
            Some(value) => {
                println!("{}", value);
                Ok(())
            }
            None => {
                eprintln!("key not found: {}", key);
                return ExitCode::from(2);
            }
        },
        Commands::Put { key, value } => engine.put(&key, &value).map(|_| {
            println!("stored value for key: {}", key);
        }),
        Commands::Tables => {
            for name in engine.tables() {
                println!("{}", name);
            }
            println!("# counter={}", engine.sequence());
            Ok(())
        }
    };

    if let Err(e) = result.and_then(|_| engine.close()) {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
