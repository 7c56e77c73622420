use std::path::{Path, PathBuf};
use itertools::Itertools;
use chrono::NaiveTime;
use serde::Deserialize;
use crate::constants::{self, net::{DEFAULT_HOST_ID_START, MAX_HOST_ID}, night_mode::{DEFAULT_OFFSET, DEFAULT_RUN_TIME}};
use crate::util::address::{AddressFormatError, DeviceAddress};
use crate::util::api_request::Credentials;
use crate::util::sun::Location;
use crate::util::timeday::{OffsetFormatError, TimeOffset};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("path to config file could not be determined, which means your operating system is not supported")]
    NoConfigDir,
    #[error("config file could not be read from {}: {source}", .path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("config file at {} could not be parsed: {source}", .path.display())]
    Parse { path: PathBuf, source: serde_yaml::Error },
}

/// a config value that does not satisfy its constraints. `field` is the path to it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("`{field}`: {source}")]
    InvalidAddress { field: String, source: AddressFormatError },
    #[error("`{field}`: {source}")]
    InvalidOffset { field: String, source: OffsetFormatError },
    #[error("`{field}`: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("config has no `{0}` section")]
    MissingSection(&'static str),
}

impl ValidationError {
    /// path of the offending field
    pub fn field(&self) -> &str {
        match self {
            Self::InvalidAddress { field, .. }
            | Self::InvalidOffset { field, .. }
            | Self::InvalidValue { field, .. } => field,
            Self::MissingSection(section) => section,
        }
    }
}

/// whole config file. each job reads its own section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub night_mode: Option<NightModeArgs>,
    pub provision: Option<ProvisionArgs>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NightModeArgs {
    pub ip_addresses: Vec<String>,
    pub credentials: Option<Credentials>,
    pub start_time_offset: Option<String>,
    pub end_time_offset: Option<String>,
    pub location: Location,
    pub timezone: Option<String>,
    /// like 12:00:00
    pub run_time: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProvisionArgs {
    pub current_ip_address_list: Vec<String>,
    pub credentials: Option<Credentials>,
    pub new_network_information: NetworkArgs,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkArgs {
    pub credentials: Option<WifiCredentials>,
    pub static_ipv4: Option<StaticIpv4Args>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WifiCredentials {
    pub ssid: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticIpv4Args {
    pub gateway: String,
    pub netmask: String,
    pub dns: Option<String>,
    pub host_id_start: Option<u32>,
    pub host_id_exceptions: Option<Vec<u32>>,
}

/// validated `night_mode` section
#[derive(Debug, Clone)]
pub struct NightModeSettings {
    pub devices: Vec<DeviceAddress>,
    pub credentials: Option<Credentials>,
    pub start_offset: TimeOffset,
    pub end_offset: TimeOffset,
    pub location: Location,
    pub timezone: chrono_tz::Tz,
    pub run_time: NaiveTime,
}

/// validated `provision` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionSettings {
    pub devices: Vec<DeviceAddress>,
    pub credentials: Option<Credentials>,
    pub network: NetworkConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub wifi: Option<WifiCredentials>,
    pub static_ipv4: Option<StaticIpv4>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticIpv4 {
    pub gateway: DeviceAddress,
    pub netmask: DeviceAddress,
    pub dns: Option<DeviceAddress>,
    pub host_id_start: u32,
    /// sorted, without duplicates
    pub host_id_exceptions: Vec<u32>,
}

/// `<config dir>/dimmer-setup.yaml`
pub fn default_path() -> Result<PathBuf, ConfigError> {
    let mut path = dirs_next::config_dir().ok_or(ConfigError::NoConfigDir)?;
    path.push(constants::CONFIG_FILE_NAME);
    Ok(path)
}

pub fn from_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let yaml_config = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_owned(), source })?;
    serde_yaml::from_str(&yaml_config)
        .map_err(|source| ConfigError::Parse { path: path.to_owned(), source })
}

impl ConfigFile {
    pub fn night_mode(self) -> Result<NightModeSettings, ValidationError> {
        self.night_mode
            .ok_or(ValidationError::MissingSection("night_mode"))?
            .validate()
    }

    pub fn provision(self) -> Result<ProvisionSettings, ValidationError> {
        self.provision
            .ok_or(ValidationError::MissingSection("provision"))?
            .validate()
    }
}

impl NightModeArgs {
    pub fn validate(self) -> Result<NightModeSettings, ValidationError> {
        let devices = addresses("night_mode.ip_addresses", &self.ip_addresses)?;
        let start_offset = offset("night_mode.start_time_offset", self.start_time_offset.as_deref())?;
        let end_offset = offset("night_mode.end_time_offset", self.end_time_offset.as_deref())?;

        if !self.location.is_valid() {
            return Err(invalid_value(
                "night_mode.location",
                "latitude has to be from -90 to 90 and longitude from -180 to 180",
            ));
        }

        let timezone = match self.timezone {
            None => constants::DEFAULT_TIMEZONE,
            Some(name) => name.parse::<chrono_tz::Tz>()
                .map_err(|err| invalid_value("night_mode.timezone", format!("{err}")))?,
        };

        let run_time = match self.run_time {
            None => {
                let (hour, minute, second) = DEFAULT_RUN_TIME;
                NaiveTime::from_hms_opt(hour, minute, second)
                    .ok_or_else(|| invalid_value("night_mode.run_time", "invalid default"))?
            }
            Some(time) => NaiveTime::parse_from_str(&time, "%H:%M:%S")
                .map_err(|_| invalid_value("night_mode.run_time", format!("`{time}` is not a time like 12:00:00")))?,
        };

        Ok(NightModeSettings {
            devices,
            credentials: self.credentials,
            start_offset,
            end_offset,
            location: self.location,
            timezone,
            run_time,
        })
    }
}

impl ProvisionArgs {
    pub fn validate(self) -> Result<ProvisionSettings, ValidationError> {
        let devices = addresses("provision.current_ip_address_list", &self.current_ip_address_list)?;

        let network = self.new_network_information;
        let static_ipv4 = match network.static_ipv4 {
            None => None,
            Some(args) => Some(args.validate("provision.new_network_information.static_ipv4")?),
        };

        Ok(ProvisionSettings {
            devices,
            credentials: self.credentials,
            network: NetworkConfig { wifi: network.credentials, static_ipv4 },
        })
    }
}

impl StaticIpv4Args {
    fn validate(self, field: &str) -> Result<StaticIpv4, ValidationError> {
        let gateway = address(&format!("{field}.gateway"), &self.gateway)?;
        let netmask = address(&format!("{field}.netmask"), &self.netmask)?;
        let dns = match self.dns {
            None => None,
            Some(dns) => Some(address(&format!("{field}.dns"), &dns)?),
        };

        let host_id_start = self.host_id_start.unwrap_or(DEFAULT_HOST_ID_START);
        host_id(&format!("{field}.host_id_start"), host_id_start)?;

        let host_id_exceptions = self.host_id_exceptions.unwrap_or_default();
        for (index, exception) in host_id_exceptions.iter().enumerate() {
            host_id(&format!("{field}.host_id_exceptions[{index}]"), *exception)?;
        }

        Ok(StaticIpv4 {
            gateway,
            netmask,
            dns,
            host_id_start,
            host_id_exceptions: host_id_exceptions.into_iter().unique().sorted().collect_vec(),
        })
    }
}

fn invalid_value(field: &str, reason: impl Into<String>) -> ValidationError {
    ValidationError::InvalidValue { field: field.to_owned(), reason: reason.into() }
}

fn address(field: &str, value: &str) -> Result<DeviceAddress, ValidationError> {
    DeviceAddress::parse(value)
        .map_err(|source| ValidationError::InvalidAddress { field: field.to_owned(), source })
}

fn addresses(field: &str, values: &[String]) -> Result<Vec<DeviceAddress>, ValidationError> {
    values.iter()
        .enumerate()
        .map(|(index, value)| address(&format!("{field}[{index}]"), value))
        .collect()
}

fn offset(field: &str, value: Option<&str>) -> Result<TimeOffset, ValidationError> {
    TimeOffset::parse(value.unwrap_or(DEFAULT_OFFSET))
        .map_err(|source| ValidationError::InvalidOffset { field: field.to_owned(), source })
}

fn host_id(field: &str, value: u32) -> Result<(), ValidationError> {
    if value > MAX_HOST_ID {
        return Err(invalid_value(field, format!("host id has to be <= {MAX_HOST_ID}, was {value}")));
    }
    Ok(())
}
