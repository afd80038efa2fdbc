//! Rio Listings EDA - runs the analysis once, top to bottom.

use anyhow::{anyhow, Context, Result};
use rio_listings_eda::charts::{ChartSet, StaticChartRenderer};
use rio_listings_eda::config::{AnalysisConfig, CONFIG_FILE};
use rio_listings_eda::map::NeighbourhoodMap;
use rio_listings_eda::{gui, logging, pipeline, report};
use std::io::{self, Write};
use std::path::Path;
use tracing::{info, warn};

fn main() -> Result<()> {
    let config = AnalysisConfig::load_or_default(Path::new(CONFIG_FILE))
        .context("Failed to load configuration")?;
    logging::init_logging(&config.log_level);
    info!(input = %config.input_path.display(), "Starting listings analysis");

    let output = pipeline::run(&config)
        .with_context(|| format!("Failed to analyse {}", config.input_path.display()))?;
    let analysis = &output.analysis;

    {
        let mut out = io::stdout().lock();
        report::write_report(&mut out, analysis)?;
        out.flush()?;
    }

    if let Some(path) = &config.summary_path {
        report::write_summary(path, analysis)
            .with_context(|| format!("Failed to write summary {}", path.display()))?;
    }

    // Box plots, scatters and the bar chart, then the map, then the ranking.
    let charts = ChartSet::build(&output.listings, analysis);
    if let Some(dir) = &config.export_dir {
        StaticChartRenderer::export_all(&charts, dir).context("Failed to export charts")?;
    }
    if config.show_charts {
        gui::run_viewer(charts, analysis).map_err(|e| anyhow!("Chart window failed: {e}"))?;
    }

    let map = NeighbourhoodMap::build(
        &output.listings,
        analysis,
        config.map_center,
        config.map_zoom,
    );
    let map_path = config.map_path();
    map.write_html(&map_path)?;
    if config.open_map {
        if let Err(e) = open::that(&map_path) {
            warn!("Could not open {} in a browser: {}", map_path.display(), e);
        }
    }

    let mut out = io::stdout().lock();
    writeln!(out)?;
    report::write_availability_ranking(&mut out, &analysis.least_available)?;
    out.flush()?;

    Ok(())
}
