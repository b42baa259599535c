use clap::Parser;
use colored::*;
use eyre::{Context, Result, bail};
use log::info;

use planstore::Store;
use planstore::cli::{Cli, Command};
use planstore::config::Config;

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let store_path = cli.store.unwrap_or(config.store_path);

    info!("planstore starting at {}", store_path.display());
    let store = Store::open(&store_path)?;

    match cli.command {
        Command::Keys => {
            let keys = store.keys()?;
            if keys.is_empty() {
                println!("No keys found");
            } else {
                for key in keys {
                    println!("{}", key);
                }
            }
        }
        Command::Cat { key } => match store.get_raw(&key)? {
            Some(content) => println!("{}", content),
            None => bail!("Key not found: {}", key),
        },
        Command::Set { key, value } => {
            serde_json::from_str::<serde_json::Value>(&value).context("Value must be valid JSON")?;
            store.set_raw(&key, &value)?;
            println!("{} Wrote key: {}", "✓".green(), key.cyan());
        }
        Command::Rm { key } => {
            if store.remove(&key)? {
                println!("{} Removed key: {}", "✓".green(), key);
            } else {
                println!("Key not found: {}", key.yellow());
            }
        }
        Command::Stats => {
            let stats = store.stats()?;
            println!("Store: {}", store_path.display().to_string().cyan());
            println!("  Keys: {}", stats.key_count);
            println!("  Total bytes: {}", stats.total_bytes);
        }
    }

    Ok(())
}
