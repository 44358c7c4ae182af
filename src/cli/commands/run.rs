//! Run Command
//!
//! Generate (and publish) a post, once or on the daily schedule.
//!
//! Usage:
//!   autoblog run [--once] [--topic T] [--dry-run] [--no-news]

use std::path::Path;

use tracing::info;

use crate::app::{RunOptions, Runner, Scheduler};
use crate::cli::ui::Output;
use crate::config::{ConfigLoader, RunMode};
use crate::types::Result;

#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    /// Force a single run regardless of `schedule.run_mode`
    pub once: bool,
    pub topic: Option<String>,
    pub dry_run: bool,
    pub no_news: bool,
}

pub async fn run(config_path: Option<&Path>, args: RunArgs) -> Result<()> {
    let config = ConfigLoader::load(config_path)?;
    let runner = Runner::from_config(
        &config,
        RunOptions {
            dry_run: args.dry_run,
            no_news: args.no_news,
        },
    )?;

    let mode = if args.once {
        RunMode::Direct
    } else {
        config.schedule.run_mode
    };
    info!(mode = %mode, allowed = %runner.selector().allowed().join(", "), "Starting");

    match mode {
        RunMode::Direct => {
            let outcome = runner.run_job(args.topic.as_deref()).await?;
            Output::new().job(&outcome);
            Ok(())
        }
        RunMode::Scheduler => {
            let scheduler = Scheduler::new(&config.schedule)?;
            Output::new().info(&format!(
                "Scheduler started. News + posts daily at {}",
                scheduler.daily_at().format("%H:%M")
            ));
            scheduler.run(&runner, args.topic.as_deref()).await
        }
    }
}
