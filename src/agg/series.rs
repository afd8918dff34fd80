//! Aggregate output shapes consumed by the chart renderers.

use serde::Serialize;

/// An ordered pair of parallel sequences: one label and one numeric value per
/// category, year, or bin. Labels and values are always the same length and
/// index-aligned.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl AggregateSeries {
    pub fn new(labels: Vec<String>, values: Vec<f64>) -> Self {
        debug_assert_eq!(labels.len(), values.len());
        Self { labels, values }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// The entry with the highest value; the first one wins on ties.
    pub fn max_entry(&self) -> Option<(&str, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &v) in self.values.iter().enumerate() {
            match best {
                Some((_, bv)) if v <= bv => {}
                _ => best = Some((i, v)),
            }
        }
        best.map(|(i, v)| (self.labels[i].as_str(), v))
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Paired numeric coordinates with a display label per point (hover text).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub point_labels: Vec<String>,
}

impl ScatterSeries {
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn push(&mut self, x: f64, y: f64, label: String) {
        self.xs.push(x);
        self.ys.push(y);
        self.point_labels.push(label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_entry_prefers_first_on_ties() {
        let s = AggregateSeries::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec![3.0, 7.0, 7.0],
        );
        assert_eq!(s.max_entry(), Some(("b", 7.0)));
        assert_eq!(s.total(), 17.0);
    }

    #[test]
    fn empty_series_has_no_extrema() {
        assert_eq!(AggregateSeries::default().max_entry(), None);
    }
}
