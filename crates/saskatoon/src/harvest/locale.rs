use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::domain::{EquipmentType, Harvest};

/// Languages the platform renders bilingual fields in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Fr,
    En,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::Fr, Locale::En];

    pub const fn code(self) -> &'static str {
        match self {
            Locale::Fr => "fr",
            Locale::En => "en",
        }
    }

    pub fn from_code(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "fr" | "fr-ca" | "fr_ca" => Some(Locale::Fr),
            "en" | "en-ca" | "en_ca" | "en-us" => Some(Locale::En),
            _ => None,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl EquipmentType {
    pub fn localized_name(&self, locale: Locale) -> &str {
        match locale {
            Locale::Fr => &self.name_fr,
            Locale::En => &self.name_en,
        }
    }
}

/// Converts stored UTC instants into the deployment's display time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayClock {
    zone: Tz,
}

impl DisplayClock {
    pub const fn new(zone: Tz) -> Self {
        Self { zone }
    }

    pub const fn zone(&self) -> Tz {
        self.zone
    }

    pub fn localize(&self, instant: DateTime<Utc>) -> DateTime<Tz> {
        instant.with_timezone(&self.zone)
    }

    pub fn local_start(&self, harvest: &Harvest) -> DateTime<Tz> {
        self.localize(harvest.start_date)
    }

    pub fn local_end(&self, harvest: &Harvest) -> DateTime<Tz> {
        self.localize(harvest.end_date)
    }
}

impl Default for DisplayClock {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

pub fn format_date(instant: &DateTime<Tz>) -> String {
    instant.format(DATE_FORMAT).to_string()
}

pub fn format_time(instant: &DateTime<Tz>) -> String {
    instant.format(TIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn localizes_across_the_date_line() {
        let clock = DisplayClock::new(chrono_tz::America::Toronto);
        let stored = Utc
            .with_ymd_and_hms(2024, 8, 3, 2, 30, 0)
            .single()
            .expect("valid instant");
        let local = clock.localize(stored);
        assert_eq!(format_date(&local), "2024-08-02");
        assert_eq!(format_time(&local), "22:30");
    }

    #[test]
    fn parses_regional_codes() {
        assert_eq!(Locale::from_code("FR-CA"), Some(Locale::Fr));
        assert_eq!(Locale::from_code("en"), Some(Locale::En));
        assert_eq!(Locale::from_code("de"), None);
    }
}
