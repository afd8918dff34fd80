//! Tagged field values with explicit coercions.

use std::fmt;

/// A single cell of a loaded dataset.
///
/// CSV columns arrive either numerically typed (from schema inference) or as
/// raw text; `Missing` covers empty cells and nulls. All numeric branching in
/// the aggregators goes through the coercions below rather than ad-hoc type
/// checks.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Missing,
}

impl FieldValue {
    /// Interpret the value as a number. Numeric text such as `"1999"` or
    /// `"8.5"` coerces; anything else is `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) if !v.is_nan() => Some(*v),
            FieldValue::Number(_) => None,
            FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
            FieldValue::Missing => None,
        }
    }

    /// Interpret the value as a currency amount, stripping `$`, thousands
    /// separators and whitespace (`"$28,341,469"` parses to `28341469.0`).
    pub fn as_currency(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) if !v.is_nan() => Some(*v),
            FieldValue::Number(_) => None,
            FieldValue::Text(s) => {
                let cleaned: String = s
                    .chars()
                    .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
                    .collect();
                if cleaned.is_empty() {
                    None
                } else {
                    cleaned.parse::<f64>().ok()
                }
            }
            FieldValue::Missing => None,
        }
    }

    /// Display form used as a grouping key or chart label. `None` for
    /// `Missing` so callers decide whether to skip the row or substitute.
    pub fn label(&self) -> Option<String> {
        match self {
            FieldValue::Number(v) => Some(format_number(*v)),
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(v) => write!(f, "{}", format_number(*v)),
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Missing => write!(f, "<missing>"),
        }
    }
}

/// Integral floats print without a trailing `.0` so `1999.0` groups and
/// labels as `"1999"`.
fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_text_coerces() {
        assert_eq!(FieldValue::Text("1999".into()).as_number(), Some(1999.0));
        assert_eq!(FieldValue::Text(" 8.5 ".into()).as_number(), Some(8.5));
        assert_eq!(FieldValue::Text("PG-13".into()).as_number(), None);
        assert_eq!(FieldValue::Missing.as_number(), None);
        assert_eq!(FieldValue::Number(f64::NAN).as_number(), None);
    }

    #[test]
    fn currency_strips_formatting() {
        assert_eq!(
            FieldValue::Text("$28,341,469".into()).as_currency(),
            Some(28_341_469.0)
        );
        assert_eq!(FieldValue::Text("$1,000".into()).as_currency(), Some(1000.0));
        assert_eq!(FieldValue::Text("N/A".into()).as_currency(), None);
        assert_eq!(FieldValue::Text("".into()).as_currency(), None);
        assert_eq!(FieldValue::Missing.as_currency(), None);
        assert_eq!(FieldValue::Number(550.0).as_currency(), Some(550.0));
    }

    #[test]
    fn labels_trim_integral_floats() {
        assert_eq!(FieldValue::Number(1999.0).label().as_deref(), Some("1999"));
        assert_eq!(FieldValue::Number(7.6).label().as_deref(), Some("7.6"));
        assert_eq!(FieldValue::Text("Drama".into()).label().as_deref(), Some("Drama"));
        assert_eq!(FieldValue::Missing.label(), None);
    }
}
