use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Scribe timestamps are formatted prescribed from [RFC 3339] or
/// `YYYY-MM-DDTHH:MM:SS.SSSZ`.
///
/// [RFC 3339]: https://www.rfc-editor.org/rfc/rfc3339
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a [`Timestamp`] object based on the current time
    /// in the system.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Human readable calendar date, e.g. `July 20, 2024`.
    #[must_use]
    pub fn calendar_date(&self) -> String {
        self.0.format("%B %-d, %Y").to_string()
    }

    /// Midnight (UTC) of the given calendar date.
    #[must_use]
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Self(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc)))
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct Visitor;

        impl<'de> serde::de::Visitor<'de> for Visitor {
            type Value = Timestamp;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("Scribe timestamp")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Timestamp::from_str(v).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_str(Visitor)
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0.to_rfc3339(), f)
    }
}

impl FromStr for Timestamp {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateTime::parse_from_rfc3339(s).map(|v| Self(v.with_timezone(&Utc)))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(value: Timestamp) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_test::Token;

    #[test]
    fn test_calendar_date() {
        let ts = Timestamp::from_str("2024-07-20T10:00:00Z").unwrap();
        assert_eq!(ts.calendar_date(), "July 20, 2024");

        let ts = Timestamp::from_ymd(2024, 7, 5).unwrap();
        assert_eq!(ts.calendar_date(), "July 5, 2024");
    }

    #[test]
    fn test_offsets_are_normalized_to_utc() {
        let a = Timestamp::from_str("2024-07-20T12:00:00+02:00").unwrap();
        let b = Timestamp::from_str("2024-07-20T10:00:00Z").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_serde_impl() {
        let ts = Timestamp::from_ymd(2024, 7, 20).unwrap();
        serde_test::assert_tokens(&ts, &[Token::Str("2024-07-20T00:00:00+00:00")]);
    }
}
