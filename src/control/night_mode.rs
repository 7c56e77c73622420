use chrono::{NaiveDate, NaiveTime, Utc};
use tracing::{error, info};
use crate::constants::device::NIGHT_MODE_ENDPOINT;
use crate::control::{send_all, timer::DailyTrigger, Report};
use crate::util::api_request::{DeviceRequest, Transport};
use crate::util::config::NightModeSettings;
use crate::util::sun::{SunClock, SunError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// waiting for the daily trigger
    Idle,
    /// update pass in progress
    Running,
}

/// nightly window in local time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NightModeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl NightModeWindow {
    /// like 21:30
    pub fn start_time(&self) -> String { self.start.format("%H:%M").to_string() }
    /// like 06:15
    pub fn end_time(&self) -> String { self.end.format("%H:%M").to_string() }
}

/// pushes the night mode window to every device once a day
pub struct NightModeScheduler<S, T> {
    settings: NightModeSettings,
    sun: S,
    transport: T,
    state: SchedulerState,
}

impl<S: SunClock, T: Transport> NightModeScheduler<S, T> {
    pub fn new(settings: NightModeSettings, sun: S, transport: T) -> Self {
        Self { settings, sun, transport, state: SchedulerState::Idle }
    }

    #[cfg(test)]
    pub const fn state(&self) -> SchedulerState { self.state }

    /// starts at sunset + start offset, ends at sunrise - end offset
    pub fn window(&self, date: NaiveDate) -> Result<NightModeWindow, SunError> {
        let sun = self.sun.sun_times(date)?;
        let timezone = self.settings.timezone;
        let sunset = sun.sunset.with_timezone(&timezone);
        let sunrise = sun.sunrise.with_timezone(&timezone);
        Ok(NightModeWindow {
            start: self.settings.start_offset.shift(&sunset).time(),
            end: (-self.settings.end_offset).shift(&sunrise).time(),
        })
    }

    /// one request per device, in config order
    pub fn requests(&self, window: &NightModeWindow) -> Vec<DeviceRequest> {
        self.settings.devices.iter()
            .map(|address| {
                DeviceRequest::new(address.clone(), NIGHT_MODE_ENDPOINT)
                    .credentials(self.settings.credentials.clone())
                    .parameter("start_time", window.start_time())
                    .parameter("end_time", window.end_time())
            })
            .collect()
    }

    /// resolve the window for `date` and send it to every device
    pub async fn run_pass(&mut self, date: NaiveDate) -> Result<Report, SunError> {
        self.state = SchedulerState::Running;
        let result = self.update_devices(date).await;
        self.state = SchedulerState::Idle;
        result
    }

    async fn update_devices(&self, date: NaiveDate) -> Result<Report, SunError> {
        let window = self.window(date)?;
        let report = send_all(&self.transport, self.requests(&window)).await;
        info!(
            "night mode times have been updated on {} of {} devices. start time is {}, end time is {}",
            report.succeeded.len(),
            report.total(),
            window.start_time(),
            window.end_time(),
        );
        Ok(report)
    }

    /// run a pass every time `trigger` fires. never returns.
    pub async fn run_daily(&mut self, trigger: &DailyTrigger) {
        loop {
            trigger.wait().await;
            let today = Utc::now().with_timezone(&self.settings.timezone).date_naive();
            if let Err(err) = self.run_pass(today).await {
                error!("night mode update skipped: {err}");
            }
        }
    }
}
