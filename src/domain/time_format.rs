//! `HH:MM` wall-clock helpers shared by availability records and their serde form.

use chrono::NaiveTime;

const FORMAT: &str = "%H:%M";
const FORMAT_WITH_SECONDS: &str = "%H:%M:%S";

/// Parses `HH:MM` (seconds tolerated), returning `None` for anything else.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(trimmed, FORMAT_WITH_SECONDS))
        .ok()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format(FORMAT).to_string()
}

/// Serde adapter for `Option<NaiveTime>` fields; blank strings read as `None`.
pub mod option {
    use chrono::NaiveTime;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_some(&super::format_time(*time)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => super::parse_time(text)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid time `{text}`, expected HH:MM"))),
        }
    }
}
