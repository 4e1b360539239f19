use crate::error::{CoreError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Calendar date as exchanged with the backend (`YYYY-MM-DD`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClinicDate(pub Date);

impl ClinicDate {
    pub fn new(date: Date) -> Self {
        Self(date)
    }

    pub fn inner(&self) -> &Date {
        &self.0
    }
}

impl fmt::Display for ClinicDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self
            .0
            .format(format_description!("[year]-[month]-[day]"))
            .map_err(|_| fmt::Error)?;
        write!(f, "{formatted}")
    }
}

impl FromStr for ClinicDate {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        // Backends sometimes send a full timestamp for date-only fields.
        let date_part = s.split('T').next().unwrap_or(s);
        let date = Date::parse(date_part, format_description!("[year]-[month]-[day]"))
            .map_err(|e| CoreError::invalid_date(format!("Failed to parse date '{s}': {e}")))?;
        Ok(Self(date))
    }
}

impl Serialize for ClinicDate {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClinicDate {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ClinicDate::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Point in time, RFC 3339 on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClinicDateTime(pub OffsetDateTime);

impl ClinicDateTime {
    pub fn new(datetime: OffsetDateTime) -> Self {
        Self(datetime)
    }

    pub fn inner(&self) -> &OffsetDateTime {
        &self.0
    }

    pub fn date(&self) -> ClinicDate {
        ClinicDate(self.0.date())
    }
}

impl fmt::Display for ClinicDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self.0.format(&Rfc3339).map_err(|_| fmt::Error)?;
        write!(f, "{formatted}")
    }
}

impl FromStr for ClinicDateTime {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let datetime = OffsetDateTime::parse(s, &Rfc3339).map_err(|e| {
            CoreError::invalid_date(format!("Failed to parse date-time '{s}': {e}"))
        })?;
        Ok(Self(datetime))
    }
}

impl Serialize for ClinicDateTime {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = self.0.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }
}

impl<'de> Deserialize<'de> for ClinicDateTime {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ClinicDateTime::from_str(&s).map_err(serde::de::Error::custom)
    }
}

pub fn now_utc() -> ClinicDateTime {
    ClinicDateTime(OffsetDateTime::now_utc())
}

pub fn today_utc() -> ClinicDate {
    ClinicDate(OffsetDateTime::now_utc().date())
}

/// Whole years elapsed between `birth` and `on`, birthday-aware.
///
/// Returns `None` when `on` precedes `birth`.
pub fn age_in_years(birth: ClinicDate, on: ClinicDate) -> Option<u32> {
    if on < birth {
        return None;
    }
    let (b, o) = (birth.0, on.0);
    let mut years = o.year() - b.year();
    if (o.month() as u8, o.day()) < (b.month() as u8, b.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

/// Signed number of days from `from` to `to`.
pub fn days_between(from: ClinicDate, to: ClinicDate) -> i64 {
    (to.0 - from.0).whole_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn test_date_from_str() {
        let d = ClinicDate::from_str("1990-04-12").unwrap();
        assert_eq!(d.0, date!(1990 - 04 - 12));
    }

    #[test]
    fn test_date_accepts_timestamp_suffix() {
        let d = ClinicDate::from_str("1990-04-12T00:00:00Z").unwrap();
        assert_eq!(d.0, date!(1990 - 04 - 12));
    }

    #[test]
    fn test_date_from_str_invalid() {
        assert!(ClinicDate::from_str("1990-13-01").is_err());
        assert!(ClinicDate::from_str("not-a-date").is_err());
        assert!(ClinicDate::from_str("").is_err());
    }

    #[test]
    fn test_date_serde() {
        let d = ClinicDate(date!(2001 - 02 - 03));
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, "\"2001-02-03\"");
        let back: ClinicDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn test_datetime_display() {
        let dt = ClinicDateTime(datetime!(2024-05-15 14:30:00 UTC));
        assert_eq!(dt.to_string(), "2024-05-15T14:30:00Z");
        assert_eq!(dt.date().0, date!(2024 - 05 - 15));
    }

    #[test]
    fn test_datetime_from_str_with_offset() {
        let dt = ClinicDateTime::from_str("2024-05-15T14:30:00+05:30").unwrap();
        assert_eq!(
            dt.0.to_offset(time::UtcOffset::UTC),
            datetime!(2024-05-15 09:00:00 UTC)
        );
    }

    #[test]
    fn test_age_before_and_after_birthday() {
        let birth = ClinicDate(date!(1990 - 06 - 15));
        assert_eq!(age_in_years(birth, ClinicDate(date!(2020 - 06 - 14))), Some(29));
        assert_eq!(age_in_years(birth, ClinicDate(date!(2020 - 06 - 15))), Some(30));
        assert_eq!(age_in_years(birth, ClinicDate(date!(2020 - 12 - 01))), Some(30));
    }

    #[test]
    fn test_age_leap_day_birth() {
        let birth = ClinicDate(date!(2000 - 02 - 29));
        assert_eq!(age_in_years(birth, ClinicDate(date!(2001 - 02 - 28))), Some(0));
        assert_eq!(age_in_years(birth, ClinicDate(date!(2001 - 03 - 01))), Some(1));
    }

    #[test]
    fn test_age_in_future_is_none() {
        let birth = ClinicDate(date!(2030 - 01 - 01));
        assert_eq!(age_in_years(birth, ClinicDate(date!(2020 - 01 - 01))), None);
    }

    #[test]
    fn test_days_between() {
        let a = ClinicDate(date!(2024 - 02 - 27));
        let b = ClinicDate(date!(2024 - 03 - 02));
        assert_eq!(days_between(a, b), 4);
        assert_eq!(days_between(b, a), -4);
    }
}
