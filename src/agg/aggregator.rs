//! The aggregation routines feeding every chart.
//!
//! All of them scan a record slice and reduce it to an [`AggregateSeries`] or
//! [`ScatterSeries`]. Cells that fail to parse are skipped silently; the worst
//! outcome of bad data is an empty chart, never an error.

use std::collections::{BTreeMap, HashMap};

use crate::data::Record;

use super::series::{AggregateSeries, ScatterSeries};

/// Stateless aggregation entry points.
pub struct Aggregator;

impl Aggregator {
    /// Count occurrences of delimiter-separated tags in `field` (a cell like
    /// `"Action, Drama"` counts once per tag). Sorted descending by count;
    /// ties keep first-seen order. `top_n` truncates the ranking when given.
    pub fn category_frequency(
        records: &[Record],
        field: &str,
        delimiter: char,
        top_n: Option<usize>,
    ) -> AggregateSeries {
        let counts = Self::tag_counts(records, field, delimiter);

        let mut order: Vec<usize> = (0..counts.len()).collect();
        // Stable sort: equal counts stay in first-seen order.
        order.sort_by(|&a, &b| counts[b].1.total_cmp(&counts[a].1));
        if let Some(n) = top_n {
            order.truncate(n);
        }

        let labels = order.iter().map(|&i| counts[i].0.clone()).collect();
        let values = order.iter().map(|&i| counts[i].1).collect();
        AggregateSeries::new(labels, values)
    }

    /// Same grouping as [`Self::category_frequency`] but untruncated and in
    /// first-seen order; the pie renderer derives percentages from the raw
    /// counts.
    pub fn category_proportions(
        records: &[Record],
        field: &str,
        delimiter: char,
    ) -> AggregateSeries {
        let counts = Self::tag_counts(records, field, delimiter);
        let (labels, values) = counts.into_iter().unzip();
        AggregateSeries::new(labels, values)
    }

    /// Count records grouped by the integer value of `bound_field`, keeping
    /// only values inside `[lo, hi]`. Labels ascend numerically. Rows whose
    /// bound field is missing or non-numeric are excluded.
    pub fn counts_by_value(
        records: &[Record],
        bound_field: &str,
        lo: i64,
        hi: i64,
    ) -> AggregateSeries {
        let mut counts: BTreeMap<i64, f64> = BTreeMap::new();
        for rec in records {
            let Some(key) = Self::bounded_key(rec, bound_field, lo, hi) else {
                continue;
            };
            *counts.entry(key).or_insert(0.0) += 1.0;
        }

        let labels = counts.keys().map(|k| k.to_string()).collect();
        let values = counts.values().copied().collect();
        AggregateSeries::new(labels, values)
    }

    /// Bucket `value_field` into `bins` equal-width bins over its observed
    /// range, counting only rows whose `bound_field` lies inside `[lo, hi]`.
    /// The last bin includes the maximum; a zero-width domain collapses to a
    /// single bin.
    pub fn histogram(
        records: &[Record],
        value_field: &str,
        bound_field: &str,
        lo: i64,
        hi: i64,
        bins: usize,
    ) -> AggregateSeries {
        let values: Vec<f64> = records
            .iter()
            .filter(|rec| Self::bounded_key(rec, bound_field, lo, hi).is_some())
            .filter_map(|rec| rec.number(value_field))
            .collect();

        if values.is_empty() || bins == 0 {
            return AggregateSeries::default();
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let width = (max - min) / bins as f64;

        if width == 0.0 {
            return AggregateSeries::new(
                vec![format_bin(min, max, 1.0)],
                vec![values.len() as f64],
            );
        }

        let mut counts = vec![0.0; bins];
        for v in &values {
            let idx = (((v - min) / width) as usize).min(bins - 1);
            counts[idx] += 1.0;
        }

        let labels = (0..bins)
            .map(|i| {
                let bin_lo = min + i as f64 * width;
                let bin_hi = min + (i + 1) as f64 * width;
                format_bin(bin_lo, bin_hi, width)
            })
            .collect();
        AggregateSeries::new(labels, counts)
    }

    /// Paired coordinates for a scatter chart. A row is kept only when both
    /// fields parse; `currency_y` routes the y field through currency parsing
    /// (formatted amounts like `"$1,000"`). The label field supplies hover
    /// text and may be empty.
    pub fn scatter_pairs(
        records: &[Record],
        x_field: &str,
        y_field: &str,
        label_field: &str,
        currency_y: bool,
    ) -> ScatterSeries {
        let mut series = ScatterSeries::default();
        for rec in records {
            let Some(x) = rec.number(x_field) else {
                continue;
            };
            let y = if currency_y {
                rec.get(y_field).as_currency()
            } else {
                rec.number(y_field)
            };
            let Some(y) = y else {
                continue;
            };
            let label = rec.get(label_field).label().unwrap_or_default();
            series.push(x, y, label);
        }
        series
    }

    /// Arithmetic mean of `value_field` per distinct `group_field` value.
    /// Rows missing either field are skipped; a group whose present values
    /// are all non-numeric still appears, with mean 0.0. Labels sort
    /// lexicographically.
    pub fn group_average(
        records: &[Record],
        group_field: &str,
        value_field: &str,
    ) -> AggregateSeries {
        let mut groups: BTreeMap<String, (f64, usize)> = BTreeMap::new();
        for rec in records {
            let Some(key) = rec.get(group_field).label() else {
                continue;
            };
            let value = rec.get(value_field);
            if value.is_missing() {
                continue;
            }
            let entry = groups.entry(key).or_insert((0.0, 0));
            if let Some(v) = value.as_number() {
                entry.0 += v;
                entry.1 += 1;
            }
        }

        let labels = groups.keys().cloned().collect();
        let values = groups
            .values()
            .map(|&(sum, n)| if n > 0 { sum / n as f64 } else { 0.0 })
            .collect();
        AggregateSeries::new(labels, values)
    }

    /// Split, trim and count tags, preserving first-seen order.
    fn tag_counts(records: &[Record], field: &str, delimiter: char) -> Vec<(String, f64)> {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut counts: Vec<(String, f64)> = Vec::new();

        for rec in records {
            let Some(raw) = rec.get(field).label() else {
                continue;
            };
            for tag in raw.split(delimiter) {
                let tag = tag.trim();
                if tag.is_empty() {
                    continue;
                }
                match index.get(tag) {
                    Some(&i) => counts[i].1 += 1.0,
                    None => {
                        index.insert(tag.to_string(), counts.len());
                        counts.push((tag.to_string(), 1.0));
                    }
                }
            }
        }
        counts
    }

    /// Truncated-integer key of a bound field, or `None` when the cell is
    /// missing, non-numeric, or outside `[lo, hi]`.
    fn bounded_key(rec: &Record, bound_field: &str, lo: i64, hi: i64) -> Option<i64> {
        let key = rec.number(bound_field)?.trunc() as i64;
        (lo..=hi).contains(&key).then_some(key)
    }
}

fn format_bin(lo: f64, hi: f64, width: f64) -> String {
    let precision = if width < 0.1 {
        2
    } else if width < 1.0 {
        1
    } else {
        0
    };
    format!("{lo:.precision$}-{hi:.precision$}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{record, FieldValue, Record};

    fn movie(genre: &str, year: Option<f64>, rating: Option<&str>, gross: Option<&str>) -> Record {
        let mut fields = vec![("Genre", FieldValue::Text(genre.into()))];
        fields.push((
            "Released_Year",
            year.map(FieldValue::Number).unwrap_or(FieldValue::Missing),
        ));
        fields.push((
            "IMDB_Rating",
            rating
                .map(|r| FieldValue::Text(r.into()))
                .unwrap_or(FieldValue::Missing),
        ));
        fields.push((
            "Gross",
            gross
                .map(|g| FieldValue::Text(g.into()))
                .unwrap_or(FieldValue::Missing),
        ));
        record(&fields)
    }

    #[test]
    fn frequency_counts_each_tag_occurrence() {
        let rows = vec![
            movie("Action, Drama", None, None, None),
            movie("Drama", None, None, None),
            movie(" Drama ,Comedy", None, None, None),
        ];
        let s = Aggregator::category_frequency(&rows, "Genre", ',', None);
        assert_eq!(s.labels[0], "Drama");
        assert_eq!(s.values[0], 3.0);
        // Action and Comedy tie at 1; Action was seen first.
        assert_eq!(s.labels[1..], ["Action".to_string(), "Comedy".to_string()]);
    }

    #[test]
    fn top_n_truncates_and_is_non_increasing() {
        let rows: Vec<Record> = (0..6)
            .map(|i| movie(if i < 4 { "Drama" } else { "Action, Crime" }, None, None, None))
            .collect();
        let s = Aggregator::category_frequency(&rows, "Genre", ',', Some(2));
        assert_eq!(s.len(), 2);
        for pair in s.values.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
    }

    #[test]
    fn proportions_keep_first_seen_order() {
        let rows = vec![
            movie("Drama, Action", None, None, None),
            movie("Action", None, None, None),
        ];
        let s = Aggregator::category_proportions(&rows, "Genre", ',');
        assert_eq!(s.labels, vec!["Drama".to_string(), "Action".to_string()]);
        assert_eq!(s.values, vec![1.0, 2.0]);
    }

    #[test]
    fn counts_by_value_matches_per_year_example() {
        let rows = vec![
            movie("Drama", Some(1999.0), None, None),
            movie("Drama", Some(2001.0), None, None),
            movie("Drama", Some(1999.0), None, None),
            movie("Drama", Some(2020.0), None, None),
        ];
        let s = Aggregator::counts_by_value(&rows, "Released_Year", 1980, 2020);
        assert_eq!(s.labels, vec!["1999", "2001", "2020"]);
        assert_eq!(s.values, vec![2.0, 1.0, 1.0]);
    }

    #[test]
    fn range_filter_excludes_missing_and_out_of_bounds() {
        let rows = vec![
            movie("Drama", Some(1979.0), None, None),
            movie("Drama", None, None, None),
            movie("Drama", Some(2021.0), None, None),
            movie("Drama", Some(1980.0), None, None),
            movie("Drama", Some(2020.0), None, None),
        ];
        let s = Aggregator::counts_by_value(&rows, "Released_Year", 1980, 2020);
        // Only the inclusive endpoints survive.
        assert_eq!(s.labels, vec!["1980", "2020"]);
        assert_eq!(s.total(), 2.0);
    }

    #[test]
    fn histogram_counts_every_retained_row() {
        let rows = vec![
            movie("Drama", Some(1990.0), Some("7.0"), None),
            movie("Drama", Some(1991.0), Some("8.0"), None),
            movie("Drama", Some(1992.0), Some("9.0"), None),
            movie("Drama", Some(1970.0), Some("9.9"), None), // outside range
            movie("Drama", Some(1993.0), Some("n/a"), None), // unparseable
        ];
        let s = Aggregator::histogram(&rows, "IMDB_Rating", "Released_Year", 1980, 2020, 2);
        assert_eq!(s.len(), 2);
        assert_eq!(s.total(), 3.0);
        // 8.0 splits the domain; 9.0 is the max and stays in the last bin.
        assert_eq!(s.values, vec![1.0, 2.0]);
    }

    #[test]
    fn histogram_degenerate_domain_collapses_to_one_bin() {
        let rows = vec![
            movie("Drama", Some(2000.0), Some("8.0"), None),
            movie("Drama", Some(2001.0), Some("8.0"), None),
        ];
        let s = Aggregator::histogram(&rows, "IMDB_Rating", "Released_Year", 1980, 2020, 20);
        assert_eq!(s.len(), 1);
        assert_eq!(s.values[0], 2.0);
    }

    #[test]
    fn scatter_drops_rows_with_unparseable_coordinates() {
        let rows = vec![
            movie("Drama", None, Some("8.5"), Some("$1,000")),
            movie("Drama", None, None, Some("$500")),
        ];
        let s = Aggregator::scatter_pairs(&rows, "IMDB_Rating", "Gross", "Series_Title", true);
        assert_eq!(s.len(), 1);
        assert_eq!(s.xs, vec![8.5]);
        assert_eq!(s.ys, vec![1000.0]);
    }

    #[test]
    fn group_average_zeroes_non_numeric_groups() {
        let rows = vec![
            record(&[
                ("Sector", FieldValue::Text("A".into())),
                ("Revenue", FieldValue::Number(10.0)),
            ]),
            record(&[
                ("Sector", FieldValue::Text("A".into())),
                ("Revenue", FieldValue::Number(20.0)),
            ]),
            record(&[
                ("Sector", FieldValue::Text("B".into())),
                ("Revenue", FieldValue::Text("x".into())),
            ]),
        ];
        let s = Aggregator::group_average(&rows, "Sector", "Revenue");
        assert_eq!(s.labels, vec!["A", "B"]);
        assert_eq!(s.values, vec![15.0, 0.0]);
    }

    #[test]
    fn group_average_skips_rows_missing_either_field() {
        let rows = vec![
            record(&[
                ("Sector", FieldValue::Text("A".into())),
                ("Revenue", FieldValue::Number(10.0)),
            ]),
            record(&[("Sector", FieldValue::Text("B".into()))]),
            record(&[("Revenue", FieldValue::Number(99.0))]),
        ];
        let s = Aggregator::group_average(&rows, "Sector", "Revenue");
        assert_eq!(s.labels, vec!["A"]);
        assert_eq!(s.values, vec![10.0]);
    }

    #[test]
    fn aggregators_are_idempotent() {
        let rows = vec![
            movie("Action, Drama", Some(1999.0), Some("8.1"), Some("$2,000")),
            movie("Drama", Some(2001.0), Some("7.4"), Some("$900")),
        ];
        assert_eq!(
            Aggregator::category_frequency(&rows, "Genre", ',', Some(10)),
            Aggregator::category_frequency(&rows, "Genre", ',', Some(10)),
        );
        assert_eq!(
            Aggregator::histogram(&rows, "IMDB_Rating", "Released_Year", 1980, 2020, 20),
            Aggregator::histogram(&rows, "IMDB_Rating", "Released_Year", 1980, 2020, 20),
        );
        assert_eq!(
            Aggregator::scatter_pairs(&rows, "IMDB_Rating", "Gross", "Series_Title", true),
            Aggregator::scatter_pairs(&rows, "IMDB_Rating", "Gross", "Series_Title", true),
        );
    }
}
