use std::time::Duration;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::{info, warn};

/// fires once a day at a fixed wall-clock time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyTrigger {
    at: NaiveTime,
    timezone: Tz,
}

impl DailyTrigger {
    pub const fn new(at: NaiveTime, timezone: Tz) -> Self {
        Self { at, timezone }
    }

    /// first time the trigger fires strictly after `now`
    pub fn next_after(&self, now: DateTime<Tz>) -> Option<DateTime<Tz>> {
        now.date_naive()
            .iter_days()
            .take(3)
            .find_map(|date| self.on(date).filter(|time| *time > now))
    }

    /// when the trigger fires on `date`.
    /// a time skipped by a dst switch fires an hour later instead.
    fn on(&self, date: NaiveDate) -> Option<DateTime<Tz>> {
        let local = date.and_time(self.at);
        self.timezone.from_local_datetime(&local).earliest().or_else(|| {
            self.timezone
                .from_local_datetime(&(local + chrono::Duration::hours(1)))
                .earliest()
        })
    }

    /// sleep until the trigger fires next
    pub async fn wait(&self) {
        let now = Utc::now().with_timezone(&self.timezone);
        let delay = match self.next_after(now) {
            Some(next) => {
                info!("next run at {next}");
                (next - now).to_std().unwrap_or_default()
            }
            None => {
                warn!("could not determine next run time, waiting a day");
                Duration::from_secs(24 * 60 * 60)
            }
        };
        tokio::time::sleep(delay).await;
    }
}
