//! Text Report Module
//! Prints the aggregates the way the analysis reads them out.

use crate::pipeline::Analysis;
use crate::stats::GroupMean;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Write the summary sections printed before the charts.
pub fn write_report<W: Write>(out: &mut W, analysis: &Analysis) -> io::Result<()> {
    let cleaning = &analysis.cleaning;
    writeln!(out, "Listings loaded: {}", cleaning.rows_loaded)?;
    writeln!(
        out,
        "After minimum_nights filter: {}",
        cleaning.rows_after_nights_filter
    )?;
    writeln!(out, "After price filter: {}", cleaning.rows_after_price_filter)?;
    writeln!(
        out,
        "Removed for missing values: {}",
        cleaning.rows_incomplete
    )?;
    writeln!(out, "Listings analysed: {}", cleaning.rows_retained)?;
    writeln!(out, "Dropped columns: {}", cleaning.dropped_columns.join(", "))?;
    writeln!(out)?;

    writeln!(out, "Summary statistics before outlier removal:")?;
    writeln!(
        out,
        "{:<32}{:>10}{:>12}{:>12}{:>12}{:>12}{:>12}{:>12}{:>12}",
        "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    )?;
    for s in &analysis.describe {
        writeln!(
            out,
            "{:<32}{:>10}{:>12.2}{:>12.2}{:>12.2}{:>12.2}{:>12.2}{:>12.2}{:>12.2}",
            s.column, s.count, s.mean, s.std, s.min, s.p25, s.median, s.p75, s.max
        )?;
    }
    writeln!(out)?;

    writeln!(out, "Amount of empty information in each column:")?;
    for (column, missing) in &cleaning.missing_values {
        writeln!(out, "{column:<32}{missing:>8}")?;
    }
    writeln!(out)?;

    writeln!(out, "Correlation with price:")?;
    for (column, r) in &analysis.price_correlations {
        writeln!(out, "{column:<32}{r:>10.6}")?;
    }
    writeln!(out)?;

    writeln!(out, "Listings per room type:")?;
    for (room_type, count) in &analysis.room_type_counts {
        writeln!(out, "{room_type:<32}{count:>8}")?;
    }
    writeln!(out)?;

    writeln!(out, "Average price per room type:")?;
    write_means(out, &analysis.room_type_mean_price, 2)?;
    writeln!(out)?;

    writeln!(out, "Neighbourhoods with the highest average price:")?;
    write_means(out, &analysis.top_priced, 2)
}

/// The least available neighbourhoods, means rounded to whole days.
pub fn write_availability_ranking<W: Write>(out: &mut W, ranking: &[GroupMean]) -> io::Result<()> {
    writeln!(
        out,
        "Neighborhoods with lower average availability throughout the year:"
    )?;
    writeln!(out)?;
    for group in ranking {
        writeln!(
            out,
            "{}: {:.0} days available, on average",
            group.group, group.mean
        )?;
    }
    Ok(())
}

/// Write the whole analysis as pretty-printed JSON. NaN values become `null`.
pub fn write_summary(path: &Path, analysis: &Analysis) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, analysis)?;
    writer.flush()?;
    info!("Wrote analysis summary to {}", path.display());
    Ok(())
}

fn write_means<W: Write>(out: &mut W, groups: &[GroupMean], precision: usize) -> io::Result<()> {
    for g in groups {
        writeln!(out, "{:<32}{:>12.*}", g.group, precision, g.mean)?;
    }
    Ok(())
}
