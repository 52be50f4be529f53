//! ISO-8601 timestamps as they appear in API responses.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A timestamp such as `2021-07-01T02:24:39-04:00`.
///
/// Keeps the original text so it serializes back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageDateTime {
    source: String,
    parsed: DateTime<FixedOffset>,
}

impl ImageDateTime {
    pub fn parse(source: &str) -> Result<Self, chrono::ParseError> {
        let parsed = DateTime::parse_from_rfc3339(source)?;
        Ok(Self {
            source: source.to_string(),
            parsed,
        })
    }

    /// The text this value was parsed from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn date(&self) -> NaiveDate {
        self.parsed.date_naive()
    }

    pub fn time(&self) -> NaiveTime {
        self.parsed.time()
    }

    pub fn offset(&self) -> FixedOffset {
        *self.parsed.offset()
    }

    pub fn as_datetime(&self) -> &DateTime<FixedOffset> {
        &self.parsed
    }
}

impl FromStr for ImageDateTime {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ImageDateTime {
    type Error = chrono::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ImageDateTime> for String {
    fn from(value: ImageDateTime) -> Self {
        value.source
    }
}

impl fmt::Display for ImageDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
