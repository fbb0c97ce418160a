// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Attendance record model and the year-month shard key.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::RangeInclusive;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::AppError;

/// Opaque identity of the signed-in user.
///
/// Cannot be empty, so a store call without a user is not expressible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(String);

impl UserId {
    /// Returns `None` for an empty or blank id.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A calendar day in `YYYY-MM-DD` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttendanceDate(NaiveDate);

impl AttendanceDate {
    const FORMAT: &'static str = "%Y-%m-%d";

    /// Parse a day-level ISO 8601 date.
    ///
    /// Only the zero-padded 10 character form is accepted; `2024-1-5` and
    /// `2024-01-05T00:00:00Z` are both rejected.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let bytes = raw.as_bytes();
        let well_formed = bytes.len() == 10
            && bytes[4] == b'-'
            && bytes[7] == b'-'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());

        if !well_formed {
            return Err(AppError::InvalidDate(raw.to_string()));
        }

        let date = NaiveDate::parse_from_str(raw, Self::FORMAT)
            .map_err(|_| AppError::InvalidDate(raw.to_string()))?;
        // Year 0000 has the right shape but no shard.
        if !ShardKey::YEARS.contains(&date.year()) {
            return Err(AppError::InvalidDate(raw.to_string()));
        }
        Ok(Self(date))
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    /// The shard this date belongs to.
    pub fn shard(&self) -> ShardKey {
        ShardKey {
            year: self.0.year(),
            month: self.0.month(),
        }
    }
}

impl fmt::Display for AttendanceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl Serialize for AttendanceDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AttendanceDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        AttendanceDate::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Year-month partition of a user's attendance (`YYYY-MM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShardKey {
    year: i32,
    month: u32,
}

impl ShardKey {
    /// Years a shard may belong to. The neighbouring months of every shard in
    /// this range are still valid calendar dates.
    pub const YEARS: RangeInclusive<i32> = 1..=9999;

    /// Build a shard key from a 1-based month.
    pub fn new(year: i32, month: u32) -> Result<Self, AppError> {
        if !(1..=12).contains(&month) {
            return Err(AppError::BadRequest(format!(
                "Month must be between 1 and 12, got {}",
                month
            )));
        }
        if !Self::YEARS.contains(&year) {
            return Err(AppError::BadRequest(format!(
                "Year must be between {} and {}, got {}",
                Self::YEARS.start(),
                Self::YEARS.end(),
                year
            )));
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// 1-based month.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Shard for the month before, rolling back into December of the prior year.
    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Shard for the month after, rolling forward into January of the next year.
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// All twelve shards of a year, January first.
    pub fn months_of(year: i32) -> Result<Vec<Self>, AppError> {
        (1..=12).map(|month| Self::new(year, month)).collect()
    }

    /// Whether `date` falls in this shard.
    pub fn contains(&self, date: &AttendanceDate) -> bool {
        date.shard() == *self
    }
}

impl fmt::Display for ShardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// One attended day. Identity is `(user, date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub date: AttendanceDate,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub training_type_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl AttendanceRecord {
    pub fn new(
        date: AttendanceDate,
        timestamp: DateTime<Utc>,
        training_type_id: Option<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            date,
            timestamp,
            // Empty strings are stored as absent, matching how clients clear a type.
            training_type_id: training_type_id.filter(|id| !id.is_empty()),
            notes: notes.filter(|n| !n.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_padded_dates() {
        let date = AttendanceDate::parse("2024-02-29").unwrap();
        assert_eq!(date.to_string(), "2024-02-29");
        assert_eq!(date.shard().to_string(), "2024-02");
    }

    #[test]
    fn test_parse_rejects_malformed_dates() {
        for raw in [
            "2024-2-29",
            "2023-02-29",
            "2024-13-01",
            "2024/02/01",
            "2024-02-01T00:00:00Z",
            "",
            "+2024-01-01",
        ] {
            let err = AttendanceDate::parse(raw).unwrap_err();
            assert!(matches!(err, AppError::InvalidDate(_)), "accepted {raw:?}");
        }
    }

    #[test]
    fn test_user_id_rejects_blank() {
        assert!(UserId::new("").is_none());
        assert!(UserId::new("   ").is_none());
        assert_eq!(UserId::new("abc").unwrap().as_str(), "abc");
    }

    #[test]
    fn test_shard_rollover() {
        let jan = ShardKey::new(2024, 1).unwrap();
        assert_eq!(jan.previous().to_string(), "2023-12");
        assert_eq!(jan.next().to_string(), "2024-02");

        let dec = ShardKey::new(2024, 12).unwrap();
        assert_eq!(dec.next().to_string(), "2025-01");
        assert_eq!(dec.previous().to_string(), "2024-11");
    }

    #[test]
    fn test_shard_rejects_bad_month() {
        assert!(ShardKey::new(2024, 0).is_err());
        assert!(ShardKey::new(2024, 13).is_err());
    }

    #[test]
    fn test_shard_rejects_years_outside_range() {
        for year in [0, 10000, -262143, 262142] {
            let err = ShardKey::new(year, 1).unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)), "accepted {year}");
        }
        assert!(ShardKey::months_of(262142).is_err());

        let first = ShardKey::new(1, 1).unwrap();
        assert_eq!(first.previous().to_string(), "0000-12");
        let last = ShardKey::new(9999, 12).unwrap();
        assert_eq!(last.next().to_string(), "10000-01");
    }

    #[test]
    fn test_parse_rejects_year_zero() {
        let err = AttendanceDate::parse("0000-01-01").unwrap_err();
        assert!(matches!(err, AppError::InvalidDate(_)));
        assert_eq!(
            AttendanceDate::parse("9999-12-31").unwrap().shard(),
            ShardKey::new(9999, 12).unwrap()
        );
    }

    #[test]
    fn test_record_uses_camel_case_fields() {
        let record = AttendanceRecord::new(
            AttendanceDate::parse("2024-01-05").unwrap(),
            "2024-01-05T18:00:00Z".parse().unwrap(),
            Some("abc".to_string()),
            None,
        );
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["date"], "2024-01-05");
        assert_eq!(json["trainingTypeId"], "abc");
        assert!(json["notes"].is_null());
        assert!(json.get("timestamp").is_some());

        let back: AttendanceRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_record_reads_documents_without_optional_fields() {
        let record: AttendanceRecord = serde_json::from_str(
            r#"{"date":"2024-03-01","timestamp":"2024-03-01T07:30:00Z"}"#,
        )
        .unwrap();
        assert!(record.training_type_id.is_none());
        assert!(record.notes.is_none());
    }
}
