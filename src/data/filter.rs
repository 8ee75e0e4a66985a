//! Filter Engine
//! Row selection by education level and gender, plus the option lists the
//! filter controls offer.

use super::{ProcessorError, COL_EDUCATION, COL_GENDER};
use polars::prelude::*;
use serde::Serialize;
use std::collections::HashSet;

/// Options offered by the two filter controls, in first-encountered order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub jenjang: Vec<String>,
    pub gender: Vec<String>,
}

impl FilterOptions {
    /// Collect options from the *unfiltered* table.
    pub fn from_table(df: &DataFrame) -> Self {
        Self {
            jenjang: distinct_values(df, COL_EDUCATION),
            gender: distinct_values(df, COL_GENDER),
        }
    }
}

/// Values currently allowed for each dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub jenjang: HashSet<String>,
    pub gender: HashSet<String>,
}

impl FilterSelection {
    /// Everything selected, the state the dashboard starts in.
    pub fn all(options: &FilterOptions) -> Self {
        Self {
            jenjang: options.jenjang.iter().cloned().collect(),
            gender: options.gender.iter().cloned().collect(),
        }
    }

    pub fn new<I, J, S>(jenjang: I, gender: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            jenjang: jenjang.into_iter().map(Into::into).collect(),
            gender: gender.into_iter().map(Into::into).collect(),
        }
    }
}

/// Distinct non-null values of `column`, first-encountered order.
///
/// Missing or non-text columns yield no options.
pub fn distinct_values(df: &DataFrame, column: &str) -> Vec<String> {
    let Ok(col) = df.column(column).and_then(|c| c.cast(&DataType::String)) else {
        return Vec::new();
    };
    let Ok(ca) = col.str() else {
        return Vec::new();
    };

    let mut seen: HashSet<&str> = HashSet::new();
    ca.into_iter()
        .flatten()
        .filter(|value| seen.insert(value))
        .map(str::to_string)
        .collect()
}

/// Keep rows whose `column` value is in `allowed`. Nulls never match and an
/// empty `allowed` set keeps nothing.
pub fn filter_by_membership(
    df: &DataFrame,
    column: &str,
    allowed: &HashSet<String>,
) -> Result<DataFrame, ProcessorError> {
    let col = df.column(column)?.cast(&DataType::String)?;
    let mask: BooleanChunked = col
        .str()?
        .into_iter()
        .map(|value| value.is_some_and(|v| allowed.contains(v)))
        .collect();
    Ok(df.filter(&mask)?)
}

/// Rows matching the education AND gender selections, in source order.
pub fn filter_rows(
    df: &DataFrame,
    selection: &FilterSelection,
) -> Result<DataFrame, ProcessorError> {
    let by_jenjang = filter_by_membership(df, COL_EDUCATION, &selection.jenjang)?;
    filter_by_membership(&by_jenjang, COL_GENDER, &selection.gender)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Aggregator;

    fn sample() -> DataFrame {
        df! {
            COL_GENDER => [Some("F"), Some("F"), Some("M"), None, Some("M")],
            COL_EDUCATION => [Some("S1"), Some("S2"), Some("S1"), Some("S1"), None],
            "id" => [1i32, 2, 3, 4, 5],
        }
        .unwrap()
    }

    fn ids(df: &DataFrame) -> Vec<i32> {
        df.column("id")
            .unwrap()
            .i32()
            .unwrap()
            .into_iter()
            .flatten()
            .collect()
    }

    #[test]
    fn test_distinct_values_skip_nulls_and_keep_order() {
        let df = sample();
        assert_eq!(distinct_values(&df, COL_GENDER), vec!["F", "M"]);
        assert_eq!(distinct_values(&df, COL_EDUCATION), vec!["S1", "S2"]);
        assert!(distinct_values(&df, "missing").is_empty());
    }

    #[test]
    fn test_filter_by_gender_only() {
        let df = sample();
        let options = FilterOptions::from_table(&df);
        let selection = FilterSelection {
            gender: HashSet::from(["F".to_string()]),
            ..FilterSelection::all(&options)
        };

        let view = filter_rows(&df, &selection).unwrap();
        assert_eq!(ids(&view), vec![1, 2]);

        let education: Vec<(String, usize)> = Aggregator::count_by_category(&view, COL_EDUCATION)
            .into_iter()
            .map(|c| (c.category, c.count))
            .collect();
        assert_eq!(
            education,
            vec![("S1".to_string(), 1), ("S2".to_string(), 1)]
        );
    }

    #[test]
    fn test_full_selection_drops_rows_with_missing_values() {
        let df = sample();
        let selection = FilterSelection::all(&FilterOptions::from_table(&df));

        let view = filter_rows(&df, &selection).unwrap();
        assert_eq!(ids(&view), vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_selection_matches_nothing() {
        let df = sample();
        let options = FilterOptions::from_table(&df);

        let no_gender = FilterSelection {
            gender: HashSet::new(),
            ..FilterSelection::all(&options)
        };
        assert_eq!(filter_rows(&df, &no_gender).unwrap().height(), 0);

        let no_jenjang = FilterSelection {
            jenjang: HashSet::new(),
            ..FilterSelection::all(&options)
        };
        assert_eq!(filter_rows(&df, &no_jenjang).unwrap().height(), 0);
    }

    #[test]
    fn test_unknown_values_are_ignored() {
        let df = sample();
        let selection = FilterSelection::new(["S3", "S1"], ["M", "X"]);
        assert_eq!(ids(&filter_rows(&df, &selection).unwrap()), vec![3]);
    }

    #[test]
    fn test_filter_missing_column_errors() {
        let df = sample();
        assert!(filter_by_membership(&df, "nope", &HashSet::new()).is_err());
    }
}
