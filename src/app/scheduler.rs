//! Daily job timer.

use chrono::{DateTime, Days, Local, NaiveTime, TimeZone};
use tracing::{error, info};

use super::runner::{JobOutcome, Runner};
use crate::config::ScheduleConfig;
use crate::types::Result;

/// Runs a job once a day at a fixed local wall-clock time
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    daily_at: NaiveTime,
}

impl Scheduler {
    pub fn new(config: &ScheduleConfig) -> Result<Self> {
        Ok(Self {
            daily_at: config.daily_time()?,
        })
    }

    pub fn daily_at(&self) -> NaiveTime {
        self.daily_at
    }

    /// First occurrence of the daily time strictly after `now`.
    ///
    /// Days where the time falls in a DST gap are skipped.
    pub fn next_run_after<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DateTime<Tz> {
        let tz = now.timezone();
        let date = now.date_naive();

        (0..=2)
            .filter_map(|offset| date.checked_add_days(Days::new(offset)))
            .filter_map(|day| tz.from_local_datetime(&day.and_time(self.daily_at)).earliest())
            .find(|candidate| candidate > now)
            .unwrap_or_else(|| now.clone() + chrono::Duration::days(1))
    }

    /// Loop forever; returns on Ctrl-C
    pub async fn run(&self, runner: &Runner, topic: Option<&str>) -> Result<()> {
        info!(daily_at = %self.daily_at.format("%H:%M"), "Scheduler started");

        loop {
            let now = Local::now();
            let next = self.next_run_after(&now);
            let wait = (next - now).to_std().unwrap_or_default();
            info!(next_run = %next.format("%Y-%m-%d %H:%M"), "Waiting for next run");

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown requested, stopping scheduler");
                    return Ok(());
                }
            }

            match runner.run_job(topic).await {
                Ok(JobOutcome::Published { title, .. }) => info!(title = %title, "Scheduled job finished"),
                Ok(JobOutcome::Skipped { word_count, .. }) => {
                    info!(word_count, "Scheduled job finished without posting")
                }
                Err(e) => error!(error = %e, category = %e.category(), "Scheduled job failed"),
            }
        }
    }
}
