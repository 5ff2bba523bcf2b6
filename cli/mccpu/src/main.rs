//! MCCPU CLI — renders lowered abstract-machine programs into host-language source.

mod commands;
mod manifest;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};

use commands::render::RenderArgs;
use commands::Project;

#[derive(Parser)]
#[command(name = "mccpu", version, about = "MCCPU target backend")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new MCCPU project
    Init {
        /// Project name
        name: String,
        /// Default target for the project
        #[arg(long, default_value = manifest::DEFAULT_TARGET)]
        target: String,
    },
    /// Render lowered instruction text into a program for a target
    Render(RenderArgs),
    /// Manage targets
    Target {
        #[command(subcommand)]
        action: TargetAction,
        /// Directory of extra .target.toml descriptors
        #[arg(long, global = true)]
        targets_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum TargetAction {
    /// List available targets
    List,
    /// Show details of a target
    Describe {
        /// Target name or alias
        name: String,
        /// Output format (default: human-readable, "toml" or "json")
        #[arg(long)]
        format: Option<String>,
    },
    /// Validate a .target.toml descriptor and its template
    Validate {
        /// Path to the descriptor
        path: PathBuf,
    },
    /// Create a starter descriptor and template in the targets directory
    New {
        /// Target name
        name: String,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Init { name, target } => commands::init::run(&name, &target),

        Commands::Render(args) => {
            let project = Project::discover(&cwd)?;
            commands::render::run(&project, &args)
        }

        Commands::Target {
            action,
            targets_dir,
        } => {
            let project = Project::discover(&cwd)?;
            if !project.has_manifest {
                log::info!("no {} found; using defaults", manifest::MANIFEST_FILE);
            }
            match action {
                TargetAction::List => {
                    commands::target::list(&project.registry(targets_dir.as_deref())?)
                }
                TargetAction::Describe { name, format } => commands::target::describe(
                    &project.registry(targets_dir.as_deref())?,
                    &name,
                    format.as_deref(),
                ),
                TargetAction::Validate { path } => commands::target::validate(&path),
                TargetAction::New { name } => {
                    let dir = targets_dir
                        .unwrap_or_else(|| project.manifest.targets_dir(&project.dir));
                    commands::target::new(&name, &dir)
                }
            }
        }
    }
}
