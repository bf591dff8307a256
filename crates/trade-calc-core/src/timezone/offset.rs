use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CalcError;

/// A fixed UTC offset from the supported zone table. No DST, no history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimezoneOffset {
    minutes: i32,
}

/// One entry of the supported zone table
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ZoneEntry {
    pub offset: TimezoneOffset,
    pub label: &'static str,
}

const fn zone(minutes: i32, label: &'static str) -> ZoneEntry {
    ZoneEntry {
        offset: TimezoneOffset { minutes },
        label,
    }
}

/// Supported offsets, west to east.
pub const SUPPORTED_ZONES: [ZoneEntry; 30] = [
    zone(-720, "(UTC-12) International Date Line West"),
    zone(-660, "(UTC-11) Midway Island, Samoa"),
    zone(-600, "(UTC-10) Hawaii"),
    zone(-540, "(UTC-09) Alaska"),
    zone(-480, "(UTC-08) Pacific Time (US/Canada), Tijuana"),
    zone(-420, "(UTC-07) Mountain Time (US/Canada), Chihuahua, Mazatlan"),
    zone(-360, "(UTC-06) Central America, Central Time (US/Canada), Mexico City"),
    zone(-300, "(UTC-05) Eastern Time (US/Canada), Colombia, Peru, Cuba"),
    zone(-240, "(UTC-04) Atlantic Time (Canada), Caracas, La Paz, Santiago"),
    zone(-180, "(UTC-03) Newfoundland, Brasilia, Rio, Argentina, Greenland"),
    zone(-120, "(UTC-02) Mid-Atlantic"),
    zone(-60, "(UTC-01) Azores, Cape Verde Island"),
    zone(0, "(UTC) United Kingdom, Iceland, Ghana, Senegal, Mali"),
    zone(60, "(UTC+01) France, Germany, Central Europe Time, West Africa Time"),
    zone(120, "(UTC+02) Eastern Europe Time, Central Africa Time, Greece, Egypt"),
    zone(180, "(UTC+03) East Africa Time, Moscow, Iraq, Kuwait, Kenya"),
    zone(210, "(UTC+03:30) Iran"),
    zone(240, "(UTC+04) Armenia, Georgia, Oman, United Arab Emirates"),
    zone(270, "(UTC+04:30) Afghanistan"),
    zone(300, "(UTC+05) Pakistan, Kazakhstan (west), Uzbekistan"),
    zone(330, "(UTC+05:30) India, Sri Lanka"),
    zone(345, "(UTC+05:45) Nepal"),
    zone(360, "(UTC+06) Bangladesh, Bhutan, Kazakhstan (most)"),
    zone(390, "(UTC+06:30) Myanmar"),
    zone(420, "(UTC+07) Cambodia, Jakarta, Thailand, Vietnam"),
    zone(480, "(UTC+08) China, Malaysia, Philippines, Singapore"),
    zone(540, "(UTC+09) Japan, Korea"),
    zone(600, "(UTC+10) Sydney, Guam, Vladivostok, Melbourne"),
    zone(660, "(UTC+11) Solomon Island, Vanuatu"),
    zone(720, "(UTC+12) New Zealand (most), Fiji, Marshall Island"),
];

/// The zone table in display order.
pub fn supported_offsets() -> &'static [ZoneEntry] {
    &SUPPORTED_ZONES
}

impl TimezoneOffset {
    pub const UTC: TimezoneOffset = TimezoneOffset { minutes: 0 };

    /// Build an offset from signed minutes east of UTC. Only table entries are accepted.
    pub fn from_minutes(minutes: i32) -> Result<Self, CalcError> {
        let candidate = TimezoneOffset { minutes };
        if SUPPORTED_ZONES.iter().any(|z| z.offset == candidate) {
            Ok(candidate)
        } else {
            Err(CalcError::UnsupportedOffset(candidate.to_string()))
        }
    }

    pub fn minutes(&self) -> i32 {
        self.minutes
    }

    pub fn label(&self) -> &'static str {
        SUPPORTED_ZONES
            .iter()
            .find(|z| z.offset == *self)
            .map(|z| z.label)
            .unwrap_or("")
    }

    /// Signed shift from UTC as a chrono duration.
    pub fn as_duration(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.minutes))
    }
}

impl fmt::Display for TimezoneOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minutes < 0 { '-' } else { '+' };
        let abs = self.minutes.abs();
        write!(f, "{sign}{:02}:{:02}", abs / 60, abs % 60)
    }
}

impl FromStr for TimezoneOffset {
    type Err = CalcError;

    /// Accepts `±HH:MM`, `±HH`, `HH:MM`, and `0` / `Z` for UTC.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let unsupported = || CalcError::UnsupportedOffset(raw.to_string());

        if raw == "0" || raw.eq_ignore_ascii_case("z") {
            return Ok(TimezoneOffset::UTC);
        }

        let (sign, body) = match raw.as_bytes().first() {
            Some(b'+') => (1, &raw[1..]),
            Some(b'-') => (-1, &raw[1..]),
            Some(_) => (1, raw),
            None => return Err(unsupported()),
        };

        let (hours, minutes) = match body.split_once(':') {
            Some((h, m)) => (h, m),
            None => (body, "0"),
        };
        if hours.is_empty()
            || hours.len() > 2
            || minutes.len() > 2
            || !hours.bytes().all(|b| b.is_ascii_digit())
            || !minutes.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(unsupported());
        }

        let hours: i32 = hours.parse().map_err(|_| unsupported())?;
        let minutes: i32 = minutes.parse().map_err(|_| unsupported())?;
        if minutes >= 60 {
            return Err(unsupported());
        }

        TimezoneOffset::from_minutes(sign * (hours * 60 + minutes)).map_err(|_| unsupported())
    }
}

impl TryFrom<String> for TimezoneOffset {
    type Error = CalcError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimezoneOffset> for String {
    fn from(value: TimezoneOffset) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fractional_zones() {
        assert_eq!("+05:30".parse::<TimezoneOffset>().unwrap().minutes(), 330);
        assert_eq!("+05:45".parse::<TimezoneOffset>().unwrap().minutes(), 345);
        assert_eq!("+03:30".parse::<TimezoneOffset>().unwrap().minutes(), 210);
        assert_eq!("-12:00".parse::<TimezoneOffset>().unwrap().minutes(), -720);
    }

    #[test]
    fn test_utc_spellings() {
        for s in ["0", "Z", "+00:00", "-00:00", "00:00", "+0"] {
            assert_eq!(s.parse::<TimezoneOffset>().unwrap(), TimezoneOffset::UTC, "{s}");
        }
    }

    #[test]
    fn test_display_round_trips() {
        for zone in supported_offsets() {
            let text = zone.offset.to_string();
            assert_eq!(text.parse::<TimezoneOffset>().unwrap(), zone.offset);
        }
        assert_eq!(TimezoneOffset::UTC.to_string(), "+00:00");
    }

    #[test]
    fn test_unsupported_offsets() {
        for s in ["+13:00", "-12:30", "+05:15", "+5:60", "", "+", "abc", "+05:30:00", "+123"] {
            assert!(
                matches!(s.parse::<TimezoneOffset>(), Err(CalcError::UnsupportedOffset(_))),
                "{s:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_labels() {
        let india: TimezoneOffset = "+05:30".parse().unwrap();
        assert_eq!(india.label(), "(UTC+05:30) India, Sri Lanka");
    }

    #[test]
    fn test_table_is_sorted_and_unique() {
        let zones = supported_offsets();
        assert!(zones.windows(2).all(|w| w[0].offset < w[1].offset));
    }

    #[test]
    fn test_serde_as_string() {
        let offset: TimezoneOffset = serde_json::from_str("\"+05:45\"").unwrap();
        assert_eq!(offset.minutes(), 345);
        assert_eq!(serde_json::to_string(&offset).unwrap(), "\"+05:45\"");
        assert!(serde_json::from_str::<TimezoneOffset>("\"+14:00\"").is_err());
    }
}
