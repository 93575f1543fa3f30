//! Timestamp and date types used on the wire by the platform.
//!
//! The platform emits timestamps with either `+0000` or `+00:00` offsets depending
//! on the endpoint, so both are accepted when decoding. Encoding always uses
//! [`MODZY_TIME_FORMAT`] in UTC. A JSON `null` decodes to the zero value, and the
//! zero value encodes back to `null`.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Canonical encoding of a [`ModzyTime`].
pub const MODZY_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";
/// Encoding and decoding of a [`ModzyDate`].
pub const MODZY_DATE_FORMAT: &str = "%Y-%m-%d";

const DECODE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M:%S%.f%:z"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot parse {input:?} as a {kind}")]
pub struct TimeParseError {
    pub input: String,
    pub kind: &'static str,
}

/// A platform timestamp. The zero value stands for an absent time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModzyTime(Option<DateTime<Utc>>);

impl ModzyTime {
    pub fn new(time: DateTime<Utc>) -> Self {
        Self(Some(time))
    }

    pub fn zero() -> Self {
        Self(None)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_none()
    }

    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        self.0.as_ref()
    }

    pub fn parse(input: &str) -> Result<Self, TimeParseError> {
        DECODE_FORMATS
            .iter()
            .find_map(|format| DateTime::parse_from_str(input, format).ok())
            .map(|time| Self(Some(time.with_timezone(&Utc))))
            .ok_or_else(|| TimeParseError {
                input: input.to_string(),
                kind: "ModzyTime",
            })
    }
}

impl From<DateTime<Utc>> for ModzyTime {
    fn from(time: DateTime<Utc>) -> Self {
        Self::new(time)
    }
}

impl FromStr for ModzyTime {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for ModzyTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(time) => write!(f, "{}", time.format(MODZY_TIME_FORMAT)),
            None => Ok(()),
        }
    }
}

impl Serialize for ModzyTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.0 {
            Some(time) => serializer.collect_str(&time.format(MODZY_TIME_FORMAT)),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for ModzyTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => Self::parse(&raw).map_err(serde::de::Error::custom),
            None => Ok(Self::zero()),
        }
    }
}

/// A calendar date, `YYYY-MM-DD` on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModzyDate(Option<NaiveDate>);

impl ModzyDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(Some(date))
    }

    pub fn zero() -> Self {
        Self(None)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_none()
    }

    pub fn as_date(&self) -> Option<&NaiveDate> {
        self.0.as_ref()
    }

    pub fn parse(input: &str) -> Result<Self, TimeParseError> {
        NaiveDate::parse_from_str(input, MODZY_DATE_FORMAT)
            .map(|date| Self(Some(date)))
            .map_err(|_| TimeParseError {
                input: input.to_string(),
                kind: "ModzyDate",
            })
    }
}

impl From<NaiveDate> for ModzyDate {
    fn from(date: NaiveDate) -> Self {
        Self::new(date)
    }
}

impl FromStr for ModzyDate {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for ModzyDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(date) => write!(f, "{}", date.format(MODZY_DATE_FORMAT)),
            None => Ok(()),
        }
    }
}

impl Serialize for ModzyDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.0 {
            Some(date) => serializer.collect_str(&date.format(MODZY_DATE_FORMAT)),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for ModzyDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => Self::parse(&raw).map_err(serde::de::Error::custom),
            None => Ok(Self::zero()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case("\"2021-04-05T10:11:12.345+0000\"", "\"2021-04-05T10:11:12.345+0000\"")]
    #[case("\"2021-04-05T10:11:12.345+00:00\"", "\"2021-04-05T10:11:12.345+0000\"")]
    #[case("\"2021-04-05T12:11:12.345+0200\"", "\"2021-04-05T10:11:12.345+0000\"")]
    #[case("\"2021-04-05T05:41:12.345-04:30\"", "\"2021-04-05T10:11:12.345+0000\"")]
    #[case("\"2021-04-05T10:11:12+0000\"", "\"2021-04-05T10:11:12.000+0000\"")]
    #[case("\"2021-04-05T10:11:12.345678+0000\"", "\"2021-04-05T10:11:12.345+0000\"")]
    fn round_trip_keeps_the_instant(#[case] wire: &str, #[case] encoded: &str) {
        let time: ModzyTime = serde_json::from_str(wire).unwrap();
        assert_eq!(serde_json::to_string(&time).unwrap(), encoded);

        let again: ModzyTime = serde_json::from_str(encoded).unwrap();
        let expected = Utc.with_ymd_and_hms(2021, 4, 5, 10, 11, 12).unwrap();
        let delta = *again.as_datetime().unwrap() - expected;
        assert!(delta.num_milliseconds() < 1000 && delta.num_milliseconds() >= 0);
    }

    #[test]
    fn null_round_trip_is_idempotent() {
        let mut wire = "null".to_string();
        for _ in 0..3 {
            let time: ModzyTime = serde_json::from_str(&wire).unwrap();
            assert!(time.is_zero());
            wire = serde_json::to_string(&time).unwrap();
            assert_eq!(wire, "null");
        }
    }

    #[rstest]
    #[case("yesterday")]
    #[case("2021-04-05 10:11:12")]
    #[case("")]
    fn unparseable_time_names_the_input(#[case] input: &str) {
        let wire = serde_json::to_string(input).unwrap();
        let err = serde_json::from_str::<ModzyTime>(&wire).unwrap_err();
        assert!(err.to_string().contains(&format!("{input:?}")), "{err}");

        let err = ModzyTime::parse(input).unwrap_err();
        assert_eq!(err.input, input);
    }

    #[test]
    fn missing_optional_time_inside_struct() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(default)]
            at: ModzyTime,
        }
        let holder: Holder = serde_json::from_str("{}").unwrap();
        assert!(holder.at.is_zero());
        let holder: Holder = serde_json::from_str(r#"{"at": null}"#).unwrap();
        assert!(holder.at.is_zero());
    }

    #[test]
    fn date_round_trip() {
        let date: ModzyDate = serde_json::from_str("\"2022-02-28\"").unwrap();
        assert_eq!(date.to_string(), "2022-02-28");
        assert_eq!(serde_json::to_string(&date).unwrap(), "\"2022-02-28\"");

        let zero: ModzyDate = serde_json::from_str("null").unwrap();
        assert!(zero.is_zero());
        assert_eq!(serde_json::to_string(&zero).unwrap(), "null");
    }

    #[test]
    fn date_rejects_time_component() {
        let err = ModzyDate::parse("2022-02-28T00:00:00+0000").unwrap_err();
        assert!(err.to_string().contains("2022-02-28T00:00:00+0000"));
    }
}
