//! Statistics Calculator Module
//! Descriptive statistics, box plot summaries and correlations.

use crate::data::listing::float_values;
use crate::data::DataLoader;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use statrs::statistics::Statistics;
use std::cmp::Ordering;

/// Whisker reach in interquartile ranges.
pub const WHISKER_IQR: f64 = 1.5;

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

impl ColumnSummary {
    fn empty(column: &str) -> Self {
        Self {
            column: column.to_string(),
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            p25: f64::NAN,
            median: f64::NAN,
            p75: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Five-number summary plus outliers, as drawn by a box plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Pairwise Pearson correlations between numeric columns.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }

    /// Correlation of `target` with every column, highest first. NaN goes last.
    pub fn ranked_against(&self, target: &str) -> Vec<(String, f64)> {
        let Some(row) = self.columns.iter().position(|c| c == target) else {
            return Vec::new();
        };

        let mut ranked: Vec<(String, f64)> = self
            .columns
            .iter()
            .cloned()
            .zip(self.values[row].iter().copied())
            .collect();
        ranked.sort_by(|a, b| match (a.1.is_nan(), b.1.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => b.1.total_cmp(&a.1),
        });
        ranked
    }
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Summaries for every numeric column, in column order.
    pub fn describe(df: &DataFrame) -> PolarsResult<Vec<ColumnSummary>> {
        DataLoader::numeric_columns(df)
            .iter()
            .map(|column| {
                let values: Vec<f64> = float_values(df, column)?.into_iter().flatten().collect();
                Ok(Self::summarize(column, &values))
            })
            .collect()
    }

    /// Compute descriptive statistics for an array of values.
    pub fn summarize(column: &str, values: &[f64]) -> ColumnSummary {
        let n = values.len();
        if n == 0 {
            return ColumnSummary::empty(column);
        }

        let sorted = Self::sorted(values);

        ColumnSummary {
            column: column.to_string(),
            count: n,
            mean: values.iter().mean(),
            // Sample deviation, NaN for a single value
            std: values.iter().std_dev(),
            min: sorted[0],
            p25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            p75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    /// Box plot summary with whiskers at the most extreme values within 1.5 IQR.
    pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
        let sorted: Vec<f64> = Self::sorted(values)
            .into_iter()
            .filter(|v| !v.is_nan())
            .collect();
        if sorted.is_empty() {
            return None;
        }

        let q1 = Self::percentile(&sorted, 25.0);
        let median = Self::percentile(&sorted, 50.0);
        let q3 = Self::percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR * iqr;
        let high_fence = q3 + WHISKER_IQR * iqr;

        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < low_fence || v > high_fence)
            .collect();

        Some(BoxSummary {
            q1,
            median,
            q3,
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Pearson correlation over the rows where both values are present.
    pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> f64 {
        let (a, b): (Vec<f64>, Vec<f64>) = xs
            .iter()
            .zip(ys.iter())
            .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
            .unzip();
        if a.len() < 2 {
            return f64::NAN;
        }

        let denom = a.iter().std_dev() * b.iter().std_dev();
        if denom == 0.0 || denom.is_nan() {
            return f64::NAN;
        }
        (a.iter().covariance(b.iter()) / denom).clamp(-1.0, 1.0)
    }

    /// Correlation matrix across every numeric column. Column pairs run in parallel.
    pub fn correlation_matrix(df: &DataFrame) -> PolarsResult<CorrelationMatrix> {
        let columns = DataLoader::numeric_columns(df);
        let data: Vec<Vec<Option<f64>>> = columns
            .iter()
            .map(|c| float_values(df, c))
            .collect::<PolarsResult<_>>()?;

        let n = columns.len();
        let pairs: Vec<(usize, usize)> = (0..n).flat_map(|i| (i..n).map(move |j| (i, j))).collect();
        let results: Vec<(usize, usize, f64)> = pairs
            .par_iter()
            .map(|&(i, j)| (i, j, Self::pearson(&data[i], &data[j])))
            .collect();

        let mut values = vec![vec![f64::NAN; n]; n];
        for (i, j, r) in results {
            values[i][j] = r;
            values[j][i] = r;
        }

        Ok(CorrelationMatrix { columns, values })
    }

    fn sorted(values: &[f64]) -> Vec<f64> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn percentile_matches_numpy_linear() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert!(close(StatsCalculator::percentile(&sorted, 25.0), 1.75));
        assert!(close(StatsCalculator::percentile(&sorted, 50.0), 2.5));
        assert!(close(StatsCalculator::percentile(&sorted, 75.0), 3.25));
    }

    #[test]
    fn summarize_reports_sample_std() {
        let summary = StatsCalculator::summarize("price", &[100.0, 200.0, 300.0]);
        assert_eq!(summary.count, 3);
        assert!(close(summary.mean, 200.0));
        assert!(close(summary.std, 100.0));
        assert!(close(summary.min, 100.0));
        assert!(close(summary.median, 200.0));
        assert!(close(summary.max, 300.0));
    }

    #[test]
    fn box_summary_separates_outliers() {
        let values = [1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 100.0];
        let summary = StatsCalculator::box_summary(&values).unwrap();
        assert_eq!(summary.outliers, vec![100.0]);
        assert!(close(summary.upper_whisker, 4.0));
        assert!(close(summary.lower_whisker, 1.0));
        assert!(summary.q1 <= summary.median && summary.median <= summary.q3);
    }

    #[test]
    fn box_summary_of_nothing_is_none() {
        assert!(StatsCalculator::box_summary(&[]).is_none());
    }

    #[test]
    fn pearson_skips_incomplete_pairs() {
        let xs = [Some(1.0), Some(2.0), None, Some(3.0)];
        let ys = [Some(2.0), Some(4.0), Some(100.0), Some(6.0)];
        assert!(close(StatsCalculator::pearson(&xs, &ys), 1.0));
    }

    #[test]
    fn pearson_of_constant_column_is_nan() {
        let xs = [Some(1.0), Some(1.0), Some(1.0)];
        let ys = [Some(2.0), Some(4.0), Some(5.0)];
        assert!(StatsCalculator::pearson(&xs, &ys).is_nan());
    }

    #[test]
    fn price_ranks_itself_first() {
        let df = df!(
            "price" => [100.0, 200.0, 300.0, 400.0],
            "availability_365" => [10i64, 30, 20, 40],
            "number_of_reviews" => [40i64, 30, 20, 10],
            "neighbourhood" => ["A", "B", "C", "D"]
        )
        .unwrap();

        let matrix = StatsCalculator::correlation_matrix(&df).unwrap();
        assert_eq!(matrix.columns.len(), 3);

        let ranked = matrix.ranked_against("price");
        assert_eq!(ranked[0].0, "price");
        assert!(close(ranked[0].1, 1.0));
        assert_eq!(ranked[2].0, "number_of_reviews");
        assert!(close(ranked[2].1, -1.0));
        assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
        assert_eq!(matrix.get("price", "availability_365"), matrix.get("availability_365", "price"));
    }

    #[test]
    fn nan_correlations_rank_last() {
        let matrix = CorrelationMatrix {
            columns: vec!["price".into(), "flat".into(), "other".into()],
            values: vec![
                vec![1.0, f64::NAN, -0.2],
                vec![f64::NAN, f64::NAN, f64::NAN],
                vec![-0.2, f64::NAN, 1.0],
            ],
        };
        let ranked: Vec<String> = matrix
            .ranked_against("price")
            .into_iter()
            .map(|(c, _)| c)
            .collect();
        assert_eq!(ranked, ["price", "other", "flat"]);
    }
}
