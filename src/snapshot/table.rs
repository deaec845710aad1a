use bytes::Bytes;

use crate::core::ExtractError;

use super::codec::{decode_csv, encode_csv};

/// One data row: field values in header order, as text.
pub type Row = Vec<String>;

/// A table's full content at one point in time: header plus ordered rows.
///
/// An empty snapshot has no header and no rows. It stands for a missing or
/// blank CSV object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSnapshot {
    header: Vec<String>,
    rows: Vec<Row>,
}

impl TableSnapshot {
    pub fn new(header: Vec<String>, rows: Vec<Row>) -> Self {
        Self { header, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a snapshot from string literals, handy in tests and fixtures.
    pub fn from_strs(header: &[&str], rows: &[&[&str]]) -> Self {
        Self {
            header: header.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// True when there is no header, i.e. the source CSV was blank.
    pub fn is_empty(&self) -> bool {
        self.header.is_empty()
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Row>) {
        (self.header, self.rows)
    }

    pub fn to_csv(&self) -> Result<Bytes, ExtractError> {
        encode_csv(&self.header, &self.rows).map(Bytes::from)
    }

    pub fn from_csv(data: &[u8]) -> Result<Self, ExtractError> {
        let mut records = decode_csv(data)?.into_iter();
        let header = records.next().unwrap_or_default();
        Ok(Self {
            header,
            rows: records.collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_csv_splits_header() {
        let snap = TableSnapshot::from_csv(b"id,name\n1,A\n2,B\n").unwrap();
        assert_eq!(snap.header(), &["id", "name"]);
        assert_eq!(snap.num_rows(), 2);
        assert_eq!(snap.rows()[1], vec!["2", "B"]);
    }

    #[test]
    fn test_blank_csv_is_empty_snapshot() {
        let snap = TableSnapshot::from_csv(b"").unwrap();
        assert!(snap.is_empty());
        assert_eq!(snap.num_rows(), 0);
        assert_eq!(snap.to_csv().unwrap().len(), 0);
    }

    #[test]
    fn test_header_only() {
        let snap = TableSnapshot::from_strs(&["id", "name"], &[]);
        let bytes = snap.to_csv().unwrap();
        assert_eq!(&bytes[..], b"id,name\n");
        assert_eq!(TableSnapshot::from_csv(&bytes).unwrap(), snap);
    }
}
