use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use quickstep::config::Config;
use quickstep::demo::{browse_radios, Catalog};
use quickstep::flow::FlowController;
use quickstep::logging;
use quickstep::ui::{install_panic_hook, TerminalGuard, TerminalPromptHost};

#[derive(Parser)]
#[command(name = "quickstep")]
#[command(about = "Multi-step terminal prompts with back and forward navigation")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the sample radio catalog (default)
    Radio,

    /// Print the effective configuration as TOML
    Config {
        /// Also write it to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;

    let is_tui_mode = matches!(cli.command, None | Some(Commands::Radio));
    let logging_handle = logging::init_logging(&config, is_tui_mode, cli.debug)?;

    match cli.command {
        Some(Commands::Config { output }) => cmd_config(&config, output)?,
        Some(Commands::Radio) | None => {
            cmd_radio(config, logging_handle.log_file_path.clone()).await?;
        }
    }

    Ok(())
}

fn cmd_config(config: &Config, output: Option<PathBuf>) -> Result<()> {
    print!("{}", config.to_toml()?);
    if let Some(path) = output {
        config.save_to(&path)?;
        eprintln!("Wrote {}", path.display());
    }
    Ok(())
}

async fn cmd_radio(config: Config, log_file_path: Option<PathBuf>) -> Result<()> {
    install_panic_hook();

    let result = {
        let guard = TerminalGuard::enter().context("Failed to prepare terminal")?;
        let host = TerminalPromptHost::new(config.ui.clone())
            .context("Failed to open terminal prompt host")?;
        let mut controller = FlowController::new(Box::new(host), config.flow.clone());
        let result = browse_radios(&mut controller, Arc::new(Catalog::sample())).await;
        guard.release();
        result
    };

    if let Some(log_path) = log_file_path {
        if log_path.metadata().map(|m| m.len() > 0).unwrap_or(false) {
            eprintln!("Session log: {}", log_path.display());
        }
    }

    let (report, selection) = result?;
    if report.is_completed() {
        print!("{}", selection);
    } else {
        println!("Cancelled.");
        for link in &selection.links {
            println!("copied:  {}", link);
        }
    }
    Ok(())
}
