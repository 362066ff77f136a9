use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use super::error::DateTimeError;

/// Formats ChemStation uses for injection timestamps (`12-May-22, 11:24:28` and
/// `12 May 22  11:24 am`)
pub const DEFAULT_DATE_FORMATS: [&str; 2] = ["%d-%b-%y, %H:%M:%S", "%d %b %y %I:%M %p"];

/// Turns the free-text timestamps written by the instrument into UTC instants.
///
/// Every format is tried and the last one that parses wins, so formats should be listed
/// from least to most specific. The wall-clock value is read in the configured zone.
#[derive(Debug, Clone)]
pub struct DateTimeNormalizer {
    formats: Vec<String>,
    time_zone: Tz,
}

impl DateTimeNormalizer {
    pub fn new(formats: Vec<String>, time_zone: Tz) -> Self {
        Self { formats, time_zone }
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    pub fn normalize(&self, raw: &str) -> Result<DateTime<Utc>, DateTimeError> {
        // ChemStation pads some fields with double spaces
        let cleaned = raw.split_whitespace().collect::<Vec<_>>().join(" ");

        let mut parsed: Option<NaiveDateTime> = None;
        for format in self.formats.iter() {
            if let Ok(naive) = NaiveDateTime::parse_from_str(&cleaned, format) {
                parsed = Some(naive);
            }
        }

        let naive = match parsed {
            Some(n) => n,
            None => return Err(DateTimeError::UnrecognizedFormat(raw.to_string())),
        };

        // Wall-clock times skipped by a DST change are moved forward by the gap
        let local = match self.time_zone.from_local_datetime(&naive).earliest() {
            Some(dt) => dt,
            None => match self
                .time_zone
                .from_local_datetime(&(naive + TimeDelta::hours(1)))
                .earliest()
            {
                Some(dt) => dt,
                None => return Err(DateTimeError::UnrecognizedFormat(raw.to_string())),
            },
        };

        Ok(local.with_timezone(&Utc))
    }
}

impl Default for DateTimeNormalizer {
    fn default() -> Self {
        Self::new(
            DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
            Tz::UTC,
        )
    }
}
