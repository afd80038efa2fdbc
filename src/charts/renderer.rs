//! Static Chart Renderer
//! Renders the chart set to PNG files with plotters.
//! Each chart is drawn into an RGB buffer and saved through `image`.

use crate::charts::ChartSet;
use crate::stats::{BoxSummary, GroupMean};
use image::RgbImage;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

type DrawResult = Result<(), Box<dyn std::error::Error>>;
type Canvas<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

const PRIMARY: RGBColor = RGBColor(52, 152, 219);
const OUTLIER: RGBColor = RGBColor(96, 125, 139);
const MEDIAN: RGBColor = RGBColor(243, 156, 18);
const BAR_FILL: RGBColor = RGBColor(161, 201, 244);

const BOX_SIZE: (u32, u32) = (1000, 300);
const SCATTER_SIZE: (u32, u32) = (1000, 800);
const BAR_SIZE: (u32, u32) = (1200, 700);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to draw {chart}: {message}")]
    Drawing { chart: String, message: String },
    #[error("Failed to save {path}: {source}")]
    Save {
        path: String,
        source: image::ImageError,
    },
    #[error("Failed to create {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render every chart into `dir`, returning the written files in presentation order.
    pub fn export_all(charts: &ChartSet, dir: &Path) -> Result<Vec<PathBuf>, RenderError> {
        fs::create_dir_all(dir).map_err(|source| RenderError::Io {
            path: dir.display().to_string(),
            source,
        })?;

        let mut written = Vec::new();

        if let Some(summary) = &charts.minimum_nights {
            let image = Self::render("minimum_nights", BOX_SIZE, |root| {
                Self::draw_box(root, "minimum_nights", summary)
            })?;
            written.push(Self::save(image, dir, "minimum_nights_box.png")?);
        }

        if let Some(summary) = &charts.price {
            let image =
                Self::render("price", BOX_SIZE, |root| Self::draw_box(root, "price", summary))?;
            written.push(Self::save(image, dir, "price_box.png")?);
        }

        let image = Self::render("locations", SCATTER_SIZE, |root| {
            Self::draw_locations(root, charts)
        })?;
        written.push(Self::save(image, dir, "locations.png")?);

        let image = Self::render("locations_by_price", SCATTER_SIZE, |root| {
            Self::draw_price_scatter(root, charts)
        })?;
        written.push(Self::save(image, dir, "locations_by_price.png")?);

        let image = Self::render("top_priced", BAR_SIZE, |root| {
            Self::draw_top_priced(root, &charts.top_priced)
        })?;
        written.push(Self::save(image, dir, "top_priced_neighbourhoods.png")?);

        info!(charts = written.len(), "Exported charts to {}", dir.display());
        Ok(written)
    }

    /// Draw into a fresh white RGB buffer.
    pub fn render<F>(chart: &str, size: (u32, u32), draw: F) -> Result<RgbImage, RenderError>
    where
        F: FnOnce(&Canvas<'_>) -> DrawResult,
    {
        let (width, height) = size;
        let mut buffer = vec![0u8; (width * height * 3) as usize];
        let drawing_error = |e: &dyn std::fmt::Display| RenderError::Drawing {
            chart: chart.to_string(),
            message: e.to_string(),
        };

        {
            let root = BitMapBackend::with_buffer(&mut buffer, size).into_drawing_area();
            root.fill(&WHITE).map_err(|e| drawing_error(&e))?;
            draw(&root).map_err(|e| drawing_error(&e))?;
            root.present().map_err(|e| drawing_error(&e))?;
        }

        RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| drawing_error(&"buffer does not match image size"))
    }

    fn save(image: RgbImage, dir: &Path, file_name: &str) -> Result<PathBuf, RenderError> {
        let path = dir.join(file_name);
        image.save(&path).map_err(|source| RenderError::Save {
            path: path.display().to_string(),
            source,
        })?;
        Ok(path)
    }

    fn draw_box(root: &Canvas<'_>, label: &str, summary: &BoxSummary) -> DrawResult {
        let low = summary
            .outliers
            .first()
            .copied()
            .unwrap_or(summary.lower_whisker)
            .min(summary.lower_whisker);
        let high = summary
            .outliers
            .last()
            .copied()
            .unwrap_or(summary.upper_whisker)
            .max(summary.upper_whisker);
        let pad = ((high - low) * 0.05).max(1.0);

        let mut chart = ChartBuilder::on(root)
            .margin(15)
            .x_label_area_size(45)
            .build_cartesian_2d((low - pad)..(high + pad), -1f64..1f64)?;
        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(0)
            .x_desc(label)
            .draw()?;

        chart.draw_series(std::iter::once(Rectangle::new(
            [(summary.q1, -0.3), (summary.q3, 0.3)],
            PRIMARY.mix(0.3).filled(),
        )))?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(summary.q1, -0.3), (summary.q3, 0.3)],
            PRIMARY.stroke_width(2),
        )))?;

        let lines = vec![
            vec![(summary.lower_whisker, 0.0), (summary.q1, 0.0)],
            vec![(summary.q3, 0.0), (summary.upper_whisker, 0.0)],
            vec![(summary.lower_whisker, -0.15), (summary.lower_whisker, 0.15)],
            vec![(summary.upper_whisker, -0.15), (summary.upper_whisker, 0.15)],
        ];
        chart.draw_series(
            lines
                .into_iter()
                .map(|points| PathElement::new(points, PRIMARY.stroke_width(2))),
        )?;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(summary.median, -0.3), (summary.median, 0.3)],
            MEDIAN.stroke_width(3),
        )))?;

        chart.draw_series(
            summary
                .outliers
                .iter()
                .map(|&v| Circle::new((v, 0.0), 3, OUTLIER.stroke_width(1))),
        )?;
        Ok(())
    }

    fn draw_locations(root: &Canvas<'_>, charts: &ChartSet) -> DrawResult {
        let (x_range, y_range) = Self::bounds(&charts.locations);
        let mut chart = ChartBuilder::on(root)
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range, y_range)?;
        chart
            .configure_mesh()
            .x_desc("longitude")
            .y_desc("latitude")
            .draw()?;

        chart.draw_series(
            charts
                .locations
                .iter()
                .map(|&[x, y]| Circle::new((x, y), 2, PRIMARY.mix(0.1).filled())),
        )?;
        Ok(())
    }

    fn draw_price_scatter(root: &Canvas<'_>, charts: &ChartSet) -> DrawResult {
        let (x_range, y_range) = Self::bounds(&charts.locations);
        let mut chart = ChartBuilder::on(root)
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range, y_range)?;
        chart
            .configure_mesh()
            .x_desc("longitude")
            .y_desc("latitude")
            .draw()?;

        for band in &charts.price_bands {
            let [r, g, b] = band.color;
            let style = RGBColor(r, g, b).mix(0.4).filled();
            chart.draw_series(
                band.points
                    .iter()
                    .map(move |&[x, y]| Circle::new((x, y), 2, style)),
            )?;
        }
        Ok(())
    }

    fn draw_top_priced(root: &Canvas<'_>, groups: &[GroupMean]) -> DrawResult {
        let n = groups.len();
        let max = groups.iter().map(|g| g.mean).fold(0.0, f64::max).max(1.0);

        let mut chart = ChartBuilder::on(root)
            .caption(
                "Neighborhoods with the Highest Average Price in Rio de Janeiro.",
                ("sans-serif", 24),
            )
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(20)
            .build_cartesian_2d(0f64..max * 1.05, -0.5f64..(n.max(1) as f64 - 0.5))?;
        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(0)
            .x_desc("Average Price")
            .y_desc("Neighborhoods")
            .draw()?;

        // Highest mean at the top
        let row = |rank: usize| (n - 1 - rank) as f64;

        chart.draw_series(groups.iter().enumerate().map(|(rank, g)| {
            Rectangle::new(
                [(0.0, row(rank) - 0.35), (g.mean, row(rank) + 0.35)],
                BAR_FILL.filled(),
            )
        }))?;
        chart.draw_series(groups.iter().enumerate().map(|(rank, g)| {
            Text::new(
                format!("{}  (R$ {:.2})", g.group, g.mean),
                (max * 0.01, row(rank) + 0.1),
                ("sans-serif", 16).into_font(),
            )
        }))?;
        Ok(())
    }

    /// Padded bounding box of `[x, y]` points.
    fn bounds(points: &[[f64; 2]]) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
        let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for &[x, y] in points {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
        if !x_min.is_finite() || !y_min.is_finite() {
            return (0.0..1.0, 0.0..1.0);
        }

        let x_pad = ((x_max - x_min) * 0.05).max(1e-3);
        let y_pad = ((y_max - y_min) * 0.05).max(1e-3);
        (
            (x_min - x_pad)..(x_max + x_pad),
            (y_min - y_pad)..(y_max + y_pad),
        )
    }
}
