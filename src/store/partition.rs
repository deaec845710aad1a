use std::fmt;

use chrono::{Local, NaiveDateTime, Timelike};

use crate::core::ExtractError;

const PARTITION_FORMAT: &str = "%Y/%m/%d/%H:%M:%S";

/// Time-derived path segment shared by every delta written in one run,
/// rendered as `YYYY/MM/DD/HH:MM:SS/`.
///
/// Ordering follows the timestamp, which is also the lexicographic order of
/// the rendered strings for four-digit years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunPartition(NaiveDateTime);

impl RunPartition {
    /// Partition for the current local wall-clock time, truncated to seconds.
    pub fn now() -> Self {
        Self::from_datetime(Local::now().naive_local())
    }

    pub fn from_datetime(at: NaiveDateTime) -> Self {
        Self(at.with_nanosecond(0).unwrap_or(at))
    }

    /// Parses a rendered partition; the trailing `/` is optional.
    pub fn parse(segment: &str) -> Result<Self, ExtractError> {
        let trimmed = segment.strip_suffix('/').unwrap_or(segment);
        NaiveDateTime::parse_from_str(trimmed, PARTITION_FORMAT)
            .map(Self)
            .map_err(|e| ExtractError::InvalidPartition(format!("'{segment}': {e}")))
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.0
    }
}

impl fmt::Display for RunPartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/", self.0.format(PARTITION_FORMAT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_format_zero_pads_components() {
        let partition = RunPartition::from_datetime(at(2024, 1, 1, 0, 0, 0));
        assert_eq!(partition.to_string(), "2024/01/01/00:00:00/");

        let partition = RunPartition::from_datetime(at(2014, 3, 10, 9, 5, 7));
        assert_eq!(partition.to_string(), "2014/03/10/09:05:07/");
    }

    #[test]
    fn test_format_two_digit_components_unchanged() {
        let partition = RunPartition::from_datetime(at(2023, 12, 31, 23, 59, 58));
        assert_eq!(partition.to_string(), "2023/12/31/23:59:58/");
    }

    #[test]
    fn test_subsecond_precision_dropped() {
        let precise = at(2024, 5, 6, 7, 8, 9) + chrono::TimeDelta::milliseconds(750);
        let partition = RunPartition::from_datetime(precise);
        assert_eq!(partition, RunPartition::from_datetime(at(2024, 5, 6, 7, 8, 9)));
    }

    #[test]
    fn test_parse_with_and_without_trailing_slash() {
        let expected = RunPartition::from_datetime(at(2024, 1, 1, 12, 30, 0));
        assert_eq!(RunPartition::parse("2024/01/01/12:30:00/").unwrap(), expected);
        assert_eq!(RunPartition::parse("2024/01/01/12:30:00").unwrap(), expected);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(
            RunPartition::parse("2024-01-01"),
            Err(ExtractError::InvalidPartition(_))
        ));
        assert!(RunPartition::parse("2024/13/01/00:00:00/").is_err());
    }

    #[test]
    fn test_string_order_matches_time_order() {
        let earlier = RunPartition::from_datetime(at(2024, 1, 9, 23, 0, 0));
        let later = RunPartition::from_datetime(at(2024, 1, 10, 1, 0, 0));
        assert!(earlier < later);
        assert!(earlier.to_string() < later.to_string());
    }
}
