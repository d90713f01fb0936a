//! payq - operator CLI for payment-item grouping and merging

mod cli;

use anstream::println;
use clap::{Parser, Subcommand};
use cli::context::CommandContext;
use cli::style::{Stylize, check};
use cli::{MergeOptions, run_groups, run_merge, run_select, run_submit, run_unmerge};
use payq::config::{Config, default_config_path, save_config};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "payq", version, about = "Group, merge and submit payment items")]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Session file (overrides the configured one)
    #[arg(long, global = true)]
    session: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show items grouped by project, problem groups first
    Groups,
    /// Flag items for submission
    Select {
        /// Item ids
        #[arg(required = true)]
        ids: Vec<String>,
        /// Clear the flag instead of setting it
        #[arg(long)]
        off: bool,
    },
    /// Merge items paid into the same account; the first id leads
    Merge {
        /// Item ids, leader first
        #[arg(required = true, num_args = 2..)]
        ids: Vec<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Dissolve a merge group
    Unmerge {
        /// Merge group id
        group_id: String,
    },
    /// Submit selected items as payment requests
    Submit,
    /// Write a default config file
    Init,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "payq=debug" } else { "payq=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run_init(config: Option<PathBuf>) -> anyhow::Result<()> {
    let path = config
        .or_else(default_config_path)
        .ok_or_else(|| anyhow::anyhow!("no config directory available; pass --config"))?;
    save_config(&path, &Config::default())?;
    println!("{} Wrote {}", check(), path.display().to_string().accent());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let open = || CommandContext::new(cli.config.as_deref(), cli.session.as_deref());

    match cli.command {
        Commands::Init => run_init(cli.config.clone())?,
        Commands::Groups => run_groups(&open()?)?,
        Commands::Select { ids, off } => run_select(&mut open()?, &ids, !off)?,
        Commands::Merge { ids, yes } => run_merge(&mut open()?, &ids, &MergeOptions { yes })?,
        Commands::Unmerge { group_id } => run_unmerge(&mut open()?, &group_id).await?,
        Commands::Submit => run_submit(&mut open()?).await?,
    }

    Ok(())
}
