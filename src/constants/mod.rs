/// name of the yaml config file inside the platform config directory
pub const CONFIG_FILE_NAME: &str = "dimmer-setup.yaml";

/// timezone to use if the config does not name one
pub const DEFAULT_TIMEZONE: chrono_tz::Tz = chrono_tz::Europe::Berlin;

/// log filter if `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "info";

pub mod device {
    pub const NIGHT_MODE_ENDPOINT: &str = "/settings/night_mode";
    pub const STATION_ENDPOINT: &str = "/settings/sta";
    pub const PARAMETER_SEPARATOR: &str = "&";
    /// replaces the password in logged urls
    pub const PASSWORD_MASK: &str = "***";
}

pub mod night_mode {
    /// wall-clock time of the daily update pass (hour, minute, second)
    pub const DEFAULT_RUN_TIME: (u32, u32, u32) = (12, 0, 0);
    /// offset used when none is configured
    pub const DEFAULT_OFFSET: &str = "00:00";
    /// allowed length of an offset string, sign included
    pub const OFFSET_MIN_LEN: usize = 5;
    pub const OFFSET_MAX_LEN: usize = 8;
}

pub mod net {
    pub const IP_SEPARATOR: char = '.';
    pub const OCTET_COUNT: usize = 4;
    /// first host-id handed out if the config does not say otherwise
    pub const DEFAULT_HOST_ID_START: u32 = 2;
    pub const MAX_HOST_ID: u32 = 255;
}
