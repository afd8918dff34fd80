//! CSV loading via Polars and materialization into a [`RecordTable`].

use std::collections::BTreeMap;
use std::path::Path;

use polars::prelude::*;
use thiserror::Error;

use super::table::{Record, RecordTable};
use super::value::FieldValue;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("CSV contained no columns")]
    Empty,
}

/// Load a CSV file and materialize it into a [`RecordTable`].
///
/// Schema inference runs over the first 10k rows and malformed rows are
/// skipped rather than failing the whole load; per-cell oddities surface as
/// `Text`/`Missing` values and are handled downstream by the aggregators.
pub fn load_csv(path: &Path) -> Result<RecordTable, LoaderError> {
    let df = LazyCsvReader::new(path.to_string_lossy().as_ref())
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;

    table_from_dataframe(&df)
}

/// Convert a collected DataFrame into row-oriented records with tagged
/// values. Numeric columns pass through an `f64` cast; everything else is
/// stringified. Nulls and NaNs become `Missing`.
fn table_from_dataframe(df: &DataFrame) -> Result<RecordTable, LoaderError> {
    if df.width() == 0 {
        return Err(LoaderError::Empty);
    }

    let height = df.height();
    let mut headers: Vec<String> = Vec::with_capacity(df.width());
    let mut numeric_headers: Vec<String> = Vec::new();
    let mut columns: Vec<Vec<FieldValue>> = Vec::with_capacity(df.width());

    for col in df.get_columns() {
        let name = col.name().to_string();

        let values = if is_numeric_dtype(col.dtype()) {
            numeric_headers.push(name.clone());
            let cast = col.cast(&DataType::Float64)?;
            let ca = cast.f64()?;
            (0..height)
                .map(|i| match ca.get(i) {
                    Some(v) if !v.is_nan() => FieldValue::Number(v),
                    _ => FieldValue::Missing,
                })
                .collect()
        } else {
            let series = col.as_materialized_series();
            (0..height)
                .map(|i| match series.get(i) {
                    Ok(av) if !av.is_null() => {
                        let text = av.to_string();
                        let text = text.trim_matches('"').trim();
                        if text.is_empty() {
                            FieldValue::Missing
                        } else {
                            FieldValue::Text(text.to_string())
                        }
                    }
                    _ => FieldValue::Missing,
                })
                .collect()
        };

        headers.push(name);
        columns.push(values);
    }

    let mut records = Vec::with_capacity(height);
    for i in 0..height {
        let mut fields = BTreeMap::new();
        for (name, values) in headers.iter().zip(columns.iter()) {
            fields.insert(name.clone(), values[i].clone());
        }
        records.push(Record::new(fields));
    }

    Ok(RecordTable::new(headers, numeric_headers, records))
}

fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_csv(name: &str, body: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("vizdeck_{}_{}", std::process::id(), name));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_headers_types_and_missing_cells() {
        let path = write_temp_csv(
            "movies.csv",
            "Series_Title,Released_Year,IMDB_Rating,Gross\n\
             The Godfather,1972,9.2,\"$134,966,411\"\n\
             Parasite,2019,8.5,\n",
        );
        let table = load_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(
            table.headers,
            vec!["Series_Title", "Released_Year", "IMDB_Rating", "Gross"]
        );
        assert!(table.numeric_headers.contains(&"Released_Year".to_string()));
        assert!(table.numeric_headers.contains(&"IMDB_Rating".to_string()));
        assert_eq!(table.len(), 2);

        let first = &table.records()[0];
        assert_eq!(first.number("Released_Year"), Some(1972.0));
        assert_eq!(first.get("Gross").as_currency(), Some(134_966_411.0));

        // Second row has an empty Gross cell.
        assert!(table.records()[1].get("Gross").is_missing());
    }
}
