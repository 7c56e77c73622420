use chrono::{DateTime, NaiveDate, Datelike, Utc};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SunError {
    #[error("sun does not rise or set on {date} at latitude {latitude}, longitude {longitude}")]
    NoSunriseOrSunset { date: NaiveDate, latitude: f64, longitude: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunTimes {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

/// resolves sunrise and sunset for a calendar date
pub trait SunClock {
    fn sun_times(&self, date: NaiveDate) -> Result<SunTimes, SunError>;
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl SunClock for Location {
    fn sun_times(&self, date: NaiveDate) -> Result<SunTimes, SunError> {
        let error = || SunError::NoSunriseOrSunset {
            date,
            latitude: self.latitude,
            longitude: self.longitude,
        };

        #[allow(deprecated)]
        let (sunrise, sunset) = sunrise::sunrise_sunset(
            self.latitude,
            self.longitude,
            date.year(),
            date.month(),
            date.day(),
        );
        let sunrise = DateTime::from_timestamp(sunrise, 0).ok_or_else(error)?;
        let sunset = DateTime::from_timestamp(sunset, 0).ok_or_else(error)?;

        // polar day/night makes the calculation fall back to nonsense timestamps
        let close_to_date = |time: &DateTime<Utc>| {
            (time.date_naive() - date).num_days().abs() <= 1
        };
        if !close_to_date(&sunrise) || !close_to_date(&sunset) || sunrise >= sunset {
            return Err(error());
        }

        Ok(SunTimes { sunrise, sunset })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, month, day).unwrap()
    }

    #[test]
    fn berlin_summer_solstice() {
        let berlin = Location { latitude: 52.52, longitude: 13.405 };
        let times = berlin.sun_times(date(6, 21)).unwrap();
        // about 04:43 and 21:33 local summer time (utc+2)
        assert!((2..=3).contains(&times.sunrise.hour()), "sunrise was {}", times.sunrise);
        assert!((19..=20).contains(&times.sunset.hour()), "sunset was {}", times.sunset);
        assert!(times.sunrise < times.sunset);
    }

    #[test]
    fn location_ranges() {
        assert!(Location { latitude: 52.5, longitude: 13.4 }.is_valid());
        assert!(!Location { latitude: 91.0, longitude: 0.0 }.is_valid());
        assert!(!Location { latitude: 0.0, longitude: -180.5 }.is_valid());
    }
}
