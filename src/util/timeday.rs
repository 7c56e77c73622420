use itertools::Itertools;
use chrono::{DateTime, TimeZone};
use crate::constants::night_mode::{OFFSET_MAX_LEN, OFFSET_MIN_LEN};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OffsetFormatError {
    #[error("`{value}` has to be {min} to {max} characters long", min = OFFSET_MIN_LEN, max = OFFSET_MAX_LEN)]
    Length { value: String },
    #[error("`{value}` is not a time offset like HH:MM, H:MM:SS or -HH:MM")]
    Format { value: String },
}

/// signed duration written as `[-]H:MM[:SS]` or `[-]HH:MM[:SS]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeOffset {
    /// can be negative
    seconds: i64,
}

impl TimeOffset {
    pub const fn from_seconds(seconds: i64) -> Self { Self { seconds } }
    #[cfg(test)]
    pub const fn as_seconds(&self) -> i64 { self.seconds }

    pub fn parse(value: &str) -> Result<Self, OffsetFormatError> {
        if !(OFFSET_MIN_LEN..=OFFSET_MAX_LEN).contains(&value.len()) {
            return Err(OffsetFormatError::Length { value: value.to_owned() });
        }
        let error = || OffsetFormatError::Format { value: value.to_owned() };

        let (sign, unsigned) = match value.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, value),
        };

        let fields = unsigned.split(':').collect_vec();
        let (hours, minutes, seconds) = match fields.as_slice() {
            // the seconds default to zero like in "sunset + HH:MM:00"
            [hours, minutes] => (*hours, *minutes, "00"),
            [hours, minutes, seconds] => (*hours, *minutes, *seconds),
            _ => return Err(error()),
        };

        let hours = parse_field(hours, 1..=2, 23).ok_or_else(error)?;
        let minutes = parse_field(minutes, 2..=2, 59).ok_or_else(error)?;
        let seconds = parse_field(seconds, 2..=2, 59).ok_or_else(error)?;

        Ok(Self::from_seconds(sign * (hours * 3600 + minutes * 60 + seconds)))
    }

    /// can shift in both forwards and backwards in time
    pub fn shift<Tz: TimeZone>(&self, time: &DateTime<Tz>) -> DateTime<Tz> {
        time.clone() + chrono::Duration::seconds(self.seconds)
    }
}

/// digits only, with a digit count in `digits` and a value <= `max`
fn parse_field(field: &str, digits: std::ops::RangeInclusive<usize>, max: i64) -> Option<i64> {
    if !digits.contains(&field.len()) || !field.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    field.parse().ok().filter(|value| *value <= max)
}

// format like -1:05:00
impl std::fmt::Display for TimeOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.seconds < 0 { "-" } else { "" };
        let total = self.seconds.abs();
        write!(f, "{sign}{}:{:02}:{:02}", total / 3600, (total / 60) % 60, total % 60)
    }
}

impl std::ops::Neg for TimeOffset {
    type Output = Self;

    fn neg(self) -> Self {
        Self::from_seconds(-self.seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 21, hour, minute, 0).unwrap()
    }

    #[test]
    fn hour_minute_offset() {
        assert_eq!(TimeOffset::parse("00:30").unwrap().as_seconds(), 30 * 60);
        assert_eq!(TimeOffset::parse("01:05").unwrap().as_seconds(), 3900);
    }

    #[test]
    fn offset_with_seconds() {
        assert_eq!(TimeOffset::parse("0:15:30").unwrap().as_seconds(), 15 * 60 + 30);
        assert_eq!(TimeOffset::parse("12:00:00").unwrap().as_seconds(), 12 * 3600);
    }

    #[test]
    fn negative_offset() {
        assert_eq!(TimeOffset::parse("-0:45").unwrap().as_seconds(), -45 * 60);
        assert_eq!(TimeOffset::parse("-1:00:00").unwrap().as_seconds(), -3600);
    }

    #[test]
    fn offset_length() {
        assert!(matches!(TimeOffset::parse("0:30"), Err(OffsetFormatError::Length { .. })));
        assert!(matches!(TimeOffset::parse("-10:00:00"), Err(OffsetFormatError::Length { .. })));
    }

    #[test]
    fn malformed_offset() {
        for value in ["aa:bb", "1:2:3:4", "24:00", "00:60", "0:5:00", "00-30", "+0:30"] {
            assert!(
                matches!(TimeOffset::parse(value), Err(OffsetFormatError::Format { .. })),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn simple_forward_shift() {
        let offset = TimeOffset::parse("00:30").unwrap();
        assert_eq!(offset.shift(&at(21, 0)), at(21, 30));
    }

    #[test]
    fn simple_backward_shift() {
        let offset = TimeOffset::parse("-1:15:00").unwrap();
        assert_eq!(offset.shift(&at(6, 30)), at(5, 15));
    }

    #[test]
    fn midnight_shift_wraps_clock() {
        let offset = TimeOffset::parse("01:30").unwrap();
        assert_eq!(offset.shift(&at(23, 15)).format("%H:%M").to_string(), "00:45");
    }

    #[test]
    fn negated_offset() {
        let offset = -TimeOffset::parse("0:15:00").unwrap();
        assert_eq!(offset.as_seconds(), -900);
        assert_eq!(offset.shift(&at(4, 43)), at(4, 28));
    }

    #[test]
    fn display() {
        assert_eq!(TimeOffset::parse("00:30").unwrap().to_string(), "0:30:00");
        assert_eq!(TimeOffset::parse("-2:05:09").unwrap().to_string(), "-2:05:09");
        assert_eq!(TimeOffset::default().to_string(), "0:00:00");
    }
}
