//! One-line chart captions derived from aggregate extrema.

use crate::agg::{AggregateSeries, ScatterSeries};

/// Caption for a category-frequency bar chart.
pub fn frequency(series: &AggregateSeries) -> String {
    match series.max_entry() {
        Some((label, count)) => format!(
            "Most frequent category is \"{label}\" with {count:.0} records."
        ),
        None => "No categories to display.".to_string(),
    }
}

/// Caption for a per-value (e.g. per-year) count line.
pub fn counts(series: &AggregateSeries, bound_field: &str) -> String {
    match series.max_entry() {
        Some((label, count)) => format!(
            "Counts by {bound_field} peak at {label} with {count:.0} records."
        ),
        None => format!("No records inside the {bound_field} range."),
    }
}

/// Caption for a histogram.
pub fn histogram(series: &AggregateSeries, value_field: &str) -> String {
    match series.max_entry() {
        Some((label, count)) => format!(
            "{value_field} clusters in the {label} bin ({count:.0} records)."
        ),
        None => format!("No {value_field} values inside the selected range."),
    }
}

/// Caption for a pie chart: the dominant class and its share.
pub fn proportions(series: &AggregateSeries) -> String {
    let total = series.total();
    match series.max_entry() {
        Some((label, count)) if total > 0.0 => format!(
            "\"{label}\" holds the largest share ({:.1}% of {total:.0} entries).",
            count / total * 100.0
        ),
        _ => "No categories to display.".to_string(),
    }
}

/// Caption for a scatter chart: point count and the highest-y point.
pub fn scatter(series: &ScatterSeries, y_field: &str) -> String {
    if series.is_empty() {
        return "No rows with both coordinates present.".to_string();
    }
    let mut best = 0;
    for (i, &y) in series.ys.iter().enumerate() {
        if y > series.ys[best] {
            best = i;
        }
    }
    let label = &series.point_labels[best];
    if label.is_empty() {
        format!("{} paired points plotted.", series.len())
    } else {
        format!(
            "{} paired points; \"{label}\" has the highest {y_field}.",
            series.len()
        )
    }
}

/// Caption for a group-average line.
pub fn averages(series: &AggregateSeries, group_field: &str, value_field: &str) -> String {
    match series.max_entry() {
        Some((label, mean)) => format!(
            "Average {value_field} per {group_field} is highest for {label} ({mean:.2})."
        ),
        None => "No groups to average.".to_string(),
    }
}

/// Dataset-level insight line.
pub fn insight(row_count: usize) -> String {
    format!(
        "{row_count} records visualized: bars rank categories, lines show trends, the pie shows class shares."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(pairs: &[(&str, f64)]) -> AggregateSeries {
        AggregateSeries::new(
            pairs.iter().map(|(l, _)| l.to_string()).collect(),
            pairs.iter().map(|(_, v)| *v).collect(),
        )
    }

    #[test]
    fn captions_name_the_extremum() {
        let s = series(&[("Drama", 12.0), ("Action", 7.0)]);
        assert_eq!(
            frequency(&s),
            "Most frequent category is \"Drama\" with 12 records."
        );
        assert!(proportions(&s).contains("63.2%"));
    }

    #[test]
    fn empty_series_degrade_gracefully() {
        let empty = AggregateSeries::default();
        assert_eq!(frequency(&empty), "No categories to display.");
        assert!(counts(&empty, "Released_Year").contains("No records"));
    }

    #[test]
    fn scatter_caption_names_highest_point() {
        let mut s = ScatterSeries::default();
        s.push(8.5, 1000.0, "A".into());
        s.push(9.0, 5000.0, "B".into());
        assert_eq!(scatter(&s, "Gross"), "2 paired points; \"B\" has the highest Gross.");
    }
}
