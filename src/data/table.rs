//! In-memory record table built from a loaded CSV.

use std::collections::BTreeMap;

use super::value::FieldValue;

/// One row of the dataset: field name to tagged value.
///
/// Fields absent from a row read as `Missing`, so aggregators never need to
/// distinguish "column missing" from "cell empty".
#[derive(Debug, Clone, Default)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new(fields: BTreeMap<String, FieldValue>) -> Self {
        Self { fields }
    }

    pub fn get(&self, field: &str) -> &FieldValue {
        self.fields.get(field).unwrap_or(&FieldValue::Missing)
    }

    /// Numeric coercion of a field (see [`FieldValue::as_number`]).
    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).as_number()
    }
}

/// Test helper: build a record from field pairs.
#[cfg(test)]
pub fn record(pairs: &[(&str, FieldValue)]) -> Record {
    Record::new(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
    )
}

/// The complete loaded dataset. Immutable once built: filtering and
/// aggregation always derive new data, never mutate the table.
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    /// Header names in file order.
    pub headers: Vec<String>,
    /// Headers whose source column carried a numeric dtype.
    pub numeric_headers: Vec<String>,
    records: Vec<Record>,
}

impl RecordTable {
    pub fn new(headers: Vec<String>, numeric_headers: Vec<String>, records: Vec<Record>) -> Self {
        Self {
            headers,
            numeric_headers,
            records,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First header whose name contains `needle` (case-insensitive). Used to
    /// guess default field roles from a freshly loaded CSV.
    pub fn find_header(&self, needle: &str) -> Option<String> {
        let needle = needle.to_lowercase();
        self.headers
            .iter()
            .find(|h| h.to_lowercase().contains(&needle))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_read_as_missing() {
        let r = record(&[("Genre", FieldValue::Text("Drama".into()))]);
        assert!(r.get("Gross").is_missing());
        assert_eq!(r.number("Gross"), None);
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let t = RecordTable::new(
            vec!["Series_Title".into(), "Released_Year".into()],
            vec!["Released_Year".into()],
            Vec::new(),
        );
        assert_eq!(t.find_header("year").as_deref(), Some("Released_Year"));
        assert_eq!(t.find_header("title").as_deref(), Some("Series_Title"));
        assert_eq!(t.find_header("gross"), None);
    }
}
