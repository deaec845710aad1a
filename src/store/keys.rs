use object_store::path::Path as ObjectPath;

use super::RunPartition;

pub const SOURCE_PATH: &str = "source/";
pub const HISTORY_PATH: &str = "history/";
pub const SOURCE_FILE_SUFFIX: &str = "_new";
pub const DIFFERENCES_FILE_SUFFIX: &str = "_differences";
const CSV_EXTENSION: &str = ".csv";

/// Key builder rooted at an optional store prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct KeyLayout {
    prefix: String,
}

impl KeyLayout {
    pub(crate) fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.trim_matches('/').to_string(),
        }
    }

    fn rooted(&self, key: String) -> ObjectPath {
        if self.prefix.is_empty() {
            ObjectPath::from(key)
        } else {
            ObjectPath::from(format!("{}/{}", self.prefix, key))
        }
    }

    pub(crate) fn root(&self) -> Option<ObjectPath> {
        if self.prefix.is_empty() {
            None
        } else {
            Some(ObjectPath::from(self.prefix.clone()))
        }
    }

    /// `source/<table>_new.csv`
    pub(crate) fn current(&self, table: &str) -> ObjectPath {
        self.rooted(format!(
            "{SOURCE_PATH}{table}{SOURCE_FILE_SUFFIX}{CSV_EXTENSION}"
        ))
    }

    /// `history/<partition><table>_differences.csv`, the partition already
    /// ending in `/`.
    pub(crate) fn delta(&self, partition: &RunPartition, table: &str) -> ObjectPath {
        self.rooted(format!(
            "{HISTORY_PATH}{partition}{table}{DIFFERENCES_FILE_SUFFIX}{CSV_EXTENSION}"
        ))
    }

    pub(crate) fn partition_dir(&self, partition: &RunPartition) -> ObjectPath {
        self.rooted(format!("{HISTORY_PATH}{partition}"))
    }

    /// Recovers the table name from a delta file name, if it is one.
    pub(crate) fn table_from_delta_filename(filename: &str) -> Option<&str> {
        filename
            .strip_suffix(CSV_EXTENSION)?
            .strip_suffix(DIFFERENCES_FILE_SUFFIX)
            .filter(|table| !table.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn partition() -> RunPartition {
        RunPartition::from_datetime(
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn test_current_key() {
        let keys = KeyLayout::new("");
        assert_eq!(keys.current("staff").as_ref(), "source/staff_new.csv");
    }

    #[test]
    fn test_delta_key() {
        let keys = KeyLayout::new("");
        assert_eq!(
            keys.delta(&partition(), "payment_type").as_ref(),
            "history/2024/01/01/00:00:00/payment_type_differences.csv"
        );
    }

    #[test]
    fn test_prefix_is_normalised() {
        let keys = KeyLayout::new("/raw/");
        assert_eq!(keys.current("design").as_ref(), "raw/source/design_new.csv");
        assert_eq!(keys.root().unwrap().as_ref(), "raw");
        assert!(KeyLayout::new("").root().is_none());
    }

    #[test]
    fn test_table_from_delta_filename() {
        assert_eq!(
            KeyLayout::table_from_delta_filename("sales_order_differences.csv"),
            Some("sales_order")
        );
        assert_eq!(KeyLayout::table_from_delta_filename("staff_new.csv"), None);
        assert_eq!(KeyLayout::table_from_delta_filename("_differences.csv"), None);
    }
}
