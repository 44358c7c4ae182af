use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use autoblog::cli::RunArgs;
use autoblog::cli::commands;

#[derive(Parser)]
#[command(name = "autoblog")]
#[command(
    version,
    about = "Generate long-form blog posts section by section and publish them to Blogger"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, global = true, help = "Config file (default: ./autoblog.toml if present)")]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and publish a post (daily scheduler unless --once)
    Run {
        #[arg(long, help = "Run a single job now instead of scheduling")]
        once: bool,
        #[arg(long, short, help = "Topic to write about (must be allow-listed)")]
        topic: Option<String>,
        #[arg(long = "dry-run", help = "Generate but only log the post")]
        dry_run: bool,
        #[arg(long = "no-news", help = "Skip news collection")]
        no_news: bool,
    },

    /// Collect news once and save the snapshot
    Collect,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ConfigFormat {
    Toml,
    Json,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(short = 'f', long, value_enum, default_value = "toml")]
        format: ConfigFormat,
    },
    /// Write a default config file
    Init {
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mautoblog encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Run {
            once,
            topic,
            dry_run,
            no_news,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(commands::run::run(
                config_path,
                RunArgs {
                    once,
                    topic,
                    dry_run,
                    no_news,
                },
            ))?;
        }
        Commands::Collect => {
            let rt = Runtime::new()?;
            rt.block_on(commands::collect::run(config_path))?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                commands::config::show(config_path, matches!(format, ConfigFormat::Json))?;
            }
            ConfigAction::Init { force } => {
                commands::config::init(config_path, force)?;
            }
        },
    }

    Ok(())
}
