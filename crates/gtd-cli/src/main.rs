mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    action::ActionSubcommand, config::ConfigSubcommand, inbox::InSubcommand,
    project::ProjectSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "gtd",
    about = "Capture ins, triage them into actions and projects, and track what gets done",
    version,
    propagate_version = true
)]
struct Cli {
    /// Data root (default: nearest ancestor containing .gtd/, else cwd)
    #[arg(long, global = true, env = "GTD_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .gtd/ with a default config and an empty store
    Init,

    /// Capture and triage ins
    In {
        #[command(subcommand)]
        subcommand: InSubcommand,
    },

    /// Manage actions
    Action {
        #[command(subcommand)]
        subcommand: ActionSubcommand,
    },

    /// Manage projects
    Project {
        #[command(subcommand)]
        subcommand: ProjectSubcommand,
    },

    /// Active and completed counts
    Stats,

    /// Completed actions and projects, grouped by day
    Completed,

    /// Archived actions and projects
    Archive,

    /// Inspect and validate configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    tracing::debug!(root = %root.display(), "resolved root");

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root, cli.json),
        Commands::In { subcommand } => cmd::inbox::run(&root, subcommand, cli.json),
        Commands::Action { subcommand } => cmd::action::run(&root, subcommand, cli.json),
        Commands::Project { subcommand } => cmd::project::run(&root, subcommand, cli.json),
        Commands::Stats => cmd::stats::run(&root, cli.json),
        Commands::Completed => cmd::history::completed(&root, cli.json),
        Commands::Archive => cmd::history::archived(&root, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
