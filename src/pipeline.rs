//! Analysis pipeline
//! Loader → Cleaner → Aggregator, executed once.

use crate::config::AnalysisConfig;
use crate::data::listing::{float_values, AVAILABILITY_365, MINIMUM_NIGHTS, PRICE};
use crate::data::{
    CleanerError, CleaningReport, DataCleaner, DataLoader, Listing, LoaderError, Thresholds,
    IRRELEVANT_COLUMNS,
};
use crate::stats::grouping::{largest, mean_by, smallest, value_counts};
use crate::stats::{BoxSummary, ColumnSummary, GroupMean, StatsCalculator};
use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Clean(#[from] CleanerError),
    #[error("Aggregation failed: {0}")]
    Aggregate(#[from] PolarsError),
}

/// Every aggregate the presenters need.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub cleaning: CleaningReport,
    /// Numeric summaries before outlier removal.
    pub describe: Vec<ColumnSummary>,
    /// `minimum_nights` distribution before its filter.
    pub minimum_nights_box: Option<BoxSummary>,
    /// `price` distribution after the nights filter, before its own.
    pub price_box: Option<BoxSummary>,
    /// Correlation of price with each numeric column, highest first.
    pub price_correlations: Vec<(String, f64)>,
    pub room_type_counts: Vec<(String, usize)>,
    pub room_type_mean_price: Vec<GroupMean>,
    pub neighbourhood_mean_price: Vec<GroupMean>,
    pub top_priced: Vec<GroupMean>,
    pub neighbourhood_mean_availability: Vec<GroupMean>,
    pub least_available: Vec<GroupMean>,
}

impl Analysis {
    /// Aggregations over the cleaned table and its records.
    pub fn compute(
        cleaned: &DataFrame,
        listings: &[Listing],
        cleaning: CleaningReport,
        distributions: Distributions,
        config: &AnalysisConfig,
    ) -> PolarsResult<Self> {
        let correlations = StatsCalculator::correlation_matrix(cleaned)?;
        let price_correlations = correlations.ranked_against(PRICE);

        let room_type_counts = value_counts(listings, |l| l.room_type.as_str());
        let room_type_mean_price = mean_by(listings, |l| l.room_type.as_str(), |l| l.price);

        let neighbourhood_mean_price = mean_by(listings, |l| l.neighbourhood.as_str(), |l| l.price);
        let top_priced = largest(&neighbourhood_mean_price, config.top_priced);

        let neighbourhood_mean_availability = mean_by(
            listings,
            |l| l.neighbourhood.as_str(),
            |l| l.availability_365 as f64,
        );
        let least_available = smallest(&neighbourhood_mean_availability, config.least_available);

        info!(
            neighbourhoods = neighbourhood_mean_price.len(),
            room_types = room_type_counts.len(),
            "Aggregated {} against {} numeric columns",
            PRICE,
            correlations.columns.len()
        );

        Ok(Self {
            cleaning,
            describe: distributions.describe,
            minimum_nights_box: distributions.minimum_nights_box,
            price_box: distributions.price_box,
            price_correlations,
            room_type_counts,
            room_type_mean_price,
            neighbourhood_mean_price,
            top_priced,
            neighbourhood_mean_availability,
            least_available,
        })
    }

    /// Whether a neighbourhood is in the most expensive ranking.
    pub fn is_top_priced(&self, neighbourhood: &str) -> bool {
        self.top_priced.iter().any(|g| g.group == neighbourhood)
    }

    pub fn mean_availability(&self, neighbourhood: &str) -> Option<f64> {
        self.neighbourhood_mean_availability
            .iter()
            .find(|g| g.group == neighbourhood)
            .map(|g| g.mean)
    }
}

/// Views of the table taken before outliers are removed.
pub struct Distributions {
    pub describe: Vec<ColumnSummary>,
    pub minimum_nights_box: Option<BoxSummary>,
    pub price_box: Option<BoxSummary>,
}

impl Distributions {
    /// Summaries of the narrowed (identifier-free) table, with each box plot
    /// taken right before the filter on its own column.
    pub fn capture(narrowed: &DataFrame, config: &AnalysisConfig) -> Result<Self, PipelineError> {
        let describe = StatsCalculator::describe(narrowed)?;
        let minimum_nights_box =
            StatsCalculator::box_summary(&present_values(narrowed, MINIMUM_NIGHTS)?);

        let nights_filtered =
            DataCleaner::filter_max(narrowed, MINIMUM_NIGHTS, lit(config.max_minimum_nights))?;
        let price_box = StatsCalculator::box_summary(&present_values(&nights_filtered, PRICE)?);

        Ok(Self {
            describe,
            minimum_nights_box,
            price_box,
        })
    }
}

fn present_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<f64>> {
    Ok(float_values(df, column)?.into_iter().flatten().collect())
}

/// Result of a pipeline run.
pub struct PipelineOutput {
    pub cleaned: DataFrame,
    pub listings: Vec<Listing>,
    pub analysis: Analysis,
}

/// Load the configured input and analyse it.
pub fn run(config: &AnalysisConfig) -> Result<PipelineOutput, PipelineError> {
    let mut loader = DataLoader::new();
    loader.load(&config.input_path)?;
    let raw = loader.into_dataframe()?;
    analyze(&raw, config)
}

/// Clean and aggregate an already loaded table.
pub fn analyze(raw: &DataFrame, config: &AnalysisConfig) -> Result<PipelineOutput, PipelineError> {
    DataLoader::validate_schema(raw)?;

    let (narrowed, _) = DataCleaner::drop_columns(raw, &IRRELEVANT_COLUMNS)?;
    let distributions = Distributions::capture(&DataCleaner::normalize_price(&narrowed)?, config)?;

    let thresholds = Thresholds {
        max_minimum_nights: config.max_minimum_nights,
        max_price: config.max_price,
    };
    let (cleaned, cleaning) = DataCleaner::clean(raw, thresholds)?;
    info!(
        rows = cleaned.height(),
        removed = cleaning.rows_removed(),
        "Cleaned listings table"
    );

    let listings = Listing::from_frame(&cleaned)?;
    let analysis = Analysis::compute(&cleaned, &listings, cleaning, distributions, config)?;

    if let Some(g) = analysis.least_available.first() {
        info!(
            neighbourhood = g.group.as_str(),
            "Least available neighbourhood averages {:.0} days ({})", g.mean, AVAILABILITY_365
        );
    }

    Ok(PipelineOutput {
        cleaned,
        listings,
        analysis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::listing::*;

    fn raw_frame() -> DataFrame {
        df!(
            "id" => [1i64, 2, 3, 4],
            "name" => ["a", "b", "c", "d"],
            "host_id" => [1i64, 2, 3, 4],
            "host_name" => ["h", "h", "h", "h"],
            "neighbourhood_group" => [None::<&str>, None, None, None],
            NEIGHBOURHOOD => ["A", "A", "B", "C"],
            LATITUDE => [-22.9, -22.91, -22.95, -22.99],
            LONGITUDE => [-43.1, -43.11, -43.15, -43.19],
            ROOM_TYPE => ["Entire home/apt", "Private room", "Entire home/apt", "Entire home/apt"],
            PRICE => [100.0, 200.0, 300.0, 5000.0],
            MINIMUM_NIGHTS => [1i64, 2, 3, 4],
            NUMBER_OF_REVIEWS => [5i64, 3, 1, 0],
            "last_review" => [None::<&str>, None, None, None],
            REVIEWS_PER_MONTH => [Some(0.1), None, Some(0.3), None],
            HOST_LISTINGS_COUNT => [1i64, 1, 2, 3],
            AVAILABILITY_365 => [100i64, 200, 50, 10],
            "license" => [None::<&str>, None, None, None]
        )
        .unwrap()
    }

    #[test]
    fn analyses_the_cleaned_table() {
        let output = analyze(&raw_frame(), &AnalysisConfig::default()).unwrap();
        let analysis = &output.analysis;

        // The 5000 listing in C is an outlier, so C disappears entirely.
        assert_eq!(output.listings.len(), 3);
        assert_eq!(analysis.neighbourhood_mean_price.len(), 2);
        assert_eq!(analysis.top_priced[0].group, "B");
        assert_eq!(analysis.top_priced[1].mean, 150.0);
        assert!(analysis.is_top_priced("A"));
        assert!(!analysis.is_top_priced("C"));

        assert_eq!(analysis.least_available[0].group, "B");
        assert_eq!(analysis.mean_availability("A"), Some(150.0));
        assert_eq!(analysis.room_type_counts[0], ("Entire home/apt".to_string(), 2));
        assert_eq!(analysis.price_correlations[0].0, PRICE);
    }

    #[test]
    fn means_and_correlations_share_the_cleaned_rows() {
        let mut raw = raw_frame();
        raw.with_column(Column::new(
            LATITUDE.into(),
            vec![Some(-22.9), None, Some(-22.95), Some(-22.99)],
        ))
        .unwrap();

        let output = analyze(&raw, &AnalysisConfig::default()).unwrap();

        assert_eq!(output.analysis.cleaning.rows_incomplete, 1);
        assert_eq!(output.cleaned.height(), output.listings.len());
        assert_eq!(output.analysis.mean_availability("A"), Some(100.0));
        let a = output
            .analysis
            .neighbourhood_mean_price
            .iter()
            .find(|g| g.group == "A")
            .unwrap();
        assert_eq!((a.count, a.mean), (1, 100.0));
    }

    #[test]
    fn describe_sees_outliers_before_cleaning() {
        let output = analyze(&raw_frame(), &AnalysisConfig::default()).unwrap();
        let price = output
            .analysis
            .describe
            .iter()
            .find(|s| s.column == PRICE)
            .unwrap();
        assert_eq!(price.count, 4);
        assert_eq!(price.max, 5000.0);
        assert!(!output.analysis.describe.iter().any(|s| s.column == "id"));
    }

    #[test]
    fn box_plots_see_values_before_their_filter() {
        let output = analyze(&raw_frame(), &AnalysisConfig::default()).unwrap();
        let price_box = output.analysis.price_box.unwrap();
        assert_eq!(price_box.outliers, vec![5000.0]);
        assert_eq!(output.analysis.minimum_nights_box.unwrap().upper_whisker, 4.0);
    }

    #[test]
    fn missing_required_column_fails() {
        let raw = raw_frame().drop(NEIGHBOURHOOD).unwrap();
        let err = analyze(&raw, &AnalysisConfig::default()).err().unwrap();
        assert!(matches!(err, PipelineError::Load(LoaderError::SchemaMismatch(_))));
    }
}
