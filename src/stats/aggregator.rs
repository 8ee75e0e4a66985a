//! Aggregation Module
//! Frequency counts, rankings and daily counts over a filtered view.
//!
//! Every aggregator is total: a missing column, an empty view or a column of
//! nulls gives an empty result. Nulls are always excluded before grouping.

use crate::data::DataProcessor;
use chrono::NaiveDate;
use log::debug;
use polars::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// One bar / pie slice: a category and how many rows carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// One point of a time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Sum of the counts of an aggregation result.
pub fn total(counts: &[CategoryCount]) -> usize {
    counts.iter().map(|c| c.count).sum()
}

/// Handles grouping and counting for the dashboard charts.
pub struct Aggregator;

impl Aggregator {
    /// Count non-null values of `column`, in first-encountered order.
    pub fn count_by_category(df: &DataFrame, column: &str) -> Vec<CategoryCount> {
        let Some(values) = Self::string_values(df, column) else {
            return Vec::new();
        };

        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut counts: Vec<CategoryCount> = Vec::new();

        for value in values.into_iter().flatten() {
            match index.get(value) {
                Some(&pos) => counts[pos].count += 1,
                None => {
                    index.insert(value, counts.len());
                    counts.push(CategoryCount {
                        category: value.to_string(),
                        count: 1,
                    });
                }
            }
        }

        counts
    }

    /// Same counts as [`Aggregator::count_by_category`], highest count first.
    /// Equal counts keep first-encountered order.
    pub fn count_by_category_ranked(df: &DataFrame, column: &str) -> Vec<CategoryCount> {
        let mut counts = Self::count_by_category(df, column);
        // sort_by is stable
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        counts
    }

    /// The `n` most frequent values of `column`.
    pub fn top_n(df: &DataFrame, column: &str, n: usize) -> Vec<CategoryCount> {
        let mut counts = Self::count_by_category_ranked(df, column);
        counts.truncate(n);
        counts
    }

    /// Rows per date, ascending. Rows without a date are not counted; see
    /// [`Aggregator::count_missing`].
    pub fn count_by_date(df: &DataFrame, column: &str) -> Vec<DateCount> {
        let Some(days) = Self::day_values(df, column) else {
            return Vec::new();
        };

        let mut per_day: BTreeMap<i32, usize> = BTreeMap::new();
        for day in days.into_iter().flatten() {
            *per_day.entry(day).or_insert(0) += 1;
        }

        per_day
            .into_iter()
            .filter_map(|(day, count)| {
                DataProcessor::days_to_date(day).map(|date| DateCount { date, count })
            })
            .collect()
    }

    /// Number of null values in `column` (0 if the column is absent).
    pub fn count_missing(df: &DataFrame, column: &str) -> usize {
        df.column(column).map(|c| c.null_count()).unwrap_or(0)
    }

    fn string_values(df: &DataFrame, column: &str) -> Option<StringChunked> {
        let col = match df.column(column).and_then(|c| c.cast(&DataType::String)) {
            Ok(col) => col,
            Err(e) => {
                debug!("No values for {:?}: {}", column, e);
                return None;
            }
        };
        col.str().ok().cloned()
    }

    fn day_values(df: &DataFrame, column: &str) -> Option<Int32Chunked> {
        let col = match df
            .column(column)
            .and_then(|c| c.cast(&DataType::Date))
            .and_then(|c| c.cast(&DataType::Int32))
        {
            Ok(col) => col,
            Err(e) => {
                debug!("No dates for {:?}: {}", column, e);
                return None;
            }
        };
        col.i32().ok().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, usize)]) -> Vec<CategoryCount> {
        pairs
            .iter()
            .map(|(category, count)| CategoryCount {
                category: category.to_string(),
                count: *count,
            })
            .collect()
    }

    fn institutions(values: &[Option<&str>]) -> DataFrame {
        df! { "Asal Instansi" => values.to_vec() }.unwrap()
    }

    #[test]
    fn test_count_by_category_first_seen_order() {
        let df = institutions(&[Some("B"), Some("A"), None, Some("B")]);
        assert_eq!(
            Aggregator::count_by_category(&df, "Asal Instansi"),
            counts(&[("B", 2), ("A", 1)])
        );
    }

    #[test]
    fn test_top_n_example() {
        let df = institutions(&[
            Some("A"),
            Some("A"),
            Some("B"),
            Some("C"),
            Some("C"),
            Some("C"),
        ]);
        assert_eq!(
            Aggregator::top_n(&df, "Asal Instansi", 2),
            counts(&[("C", 3), ("A", 2)])
        );
    }

    #[test]
    fn test_ranked_ties_keep_first_seen_order() {
        let df = institutions(&[Some("X"), Some("Y"), Some("Z"), Some("Y"), Some("Z")]);
        assert_eq!(
            Aggregator::count_by_category_ranked(&df, "Asal Instansi"),
            counts(&[("Y", 2), ("Z", 2), ("X", 1)])
        );
        assert_eq!(
            Aggregator::top_n(&df, "Asal Instansi", 1),
            counts(&[("Y", 2)])
        );
    }

    #[test]
    fn test_ranked_matches_unranked_multiset() {
        let df = institutions(&[Some("Q"), Some("P"), Some("P"), None, Some("R"), Some("P")]);
        let mut plain = Aggregator::count_by_category(&df, "Asal Instansi");
        let mut ranked = Aggregator::count_by_category_ranked(&df, "Asal Instansi");
        assert_eq!(total(&ranked), 5);

        plain.sort_by(|a, b| a.category.cmp(&b.category));
        ranked.sort_by(|a, b| a.category.cmp(&b.category));
        assert_eq!(plain, ranked);
    }

    #[test]
    fn test_top_n_larger_than_categories() {
        let df = institutions(&[Some("A"), Some("B")]);
        assert_eq!(Aggregator::top_n(&df, "Asal Instansi", 10).len(), 2);
        assert!(Aggregator::top_n(&df, "Asal Instansi", 0).is_empty());
    }

    #[test]
    fn test_empty_and_null_inputs() {
        let empty = institutions(&[]);
        let nulls = institutions(&[None, None]);

        for df in [&empty, &nulls] {
            assert!(Aggregator::count_by_category(df, "Asal Instansi").is_empty());
            assert!(Aggregator::count_by_category_ranked(df, "Asal Instansi").is_empty());
            assert!(Aggregator::top_n(df, "Asal Instansi", 10).is_empty());
        }
        assert!(Aggregator::count_by_category(&empty, "no such column").is_empty());
        assert!(Aggregator::count_by_date(&empty, "no such column").is_empty());
        assert_eq!(Aggregator::count_missing(&nulls, "Asal Instansi"), 2);
    }

    #[test]
    fn test_count_by_date_ascending_without_missing() {
        let day = |d: u32| NaiveDate::from_ymd_opt(2025, 1, d);
        let days: Vec<Option<i32>> = [day(17), day(15), None, day(17), day(16)]
            .iter()
            .map(|d| d.map(DataProcessor::date_to_days))
            .collect();
        let df = DataFrame::new(vec![Column::new("Tanggal Pendaftaran".into(), days)
            .cast(&DataType::Date)
            .unwrap()])
        .unwrap();

        let series = Aggregator::count_by_date(&df, "Tanggal Pendaftaran");
        let expected: Vec<DateCount> = [(15, 1), (16, 1), (17, 2)]
            .into_iter()
            .map(|(d, count)| DateCount {
                date: day(d).unwrap(),
                count,
            })
            .collect();
        assert_eq!(series, expected);
        assert_eq!(Aggregator::count_missing(&df, "Tanggal Pendaftaran"), 1);
    }
}
