//! Chart Plotter Module
//! Draws the interactive charts with egui_plot.

use crate::charts::ChartSet;
use crate::stats::{BoxSummary, GroupMean};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot, PlotPoints, Points};

/// Box and scatter colour
pub const PRIMARY_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue
/// Outlier markers
pub const OUTLIER_COLOR: Color32 = Color32::from_rgb(96, 125, 139); // Blue Grey

/// Pastel palette for the neighbourhood bars
pub const PASTEL: [Color32; 10] = [
    Color32::from_rgb(161, 201, 244), // Blue
    Color32::from_rgb(255, 180, 130), // Orange
    Color32::from_rgb(141, 229, 161), // Green
    Color32::from_rgb(255, 159, 155), // Red
    Color32::from_rgb(208, 187, 255), // Purple
    Color32::from_rgb(222, 187, 155), // Brown
    Color32::from_rgb(250, 176, 228), // Pink
    Color32::from_rgb(207, 207, 207), // Grey
    Color32::from_rgb(255, 254, 163), // Yellow
    Color32::from_rgb(185, 242, 240), // Cyan
];

const BOX_HEIGHT: f32 = 180.0;
const SCATTER_HEIGHT: f32 = 420.0;

/// Creates the interactive charts.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Horizontal box plot with 1.5 IQR whiskers and outlier points.
    pub fn draw_horizontal_boxplot(ui: &mut egui::Ui, id: &str, label: &str, summary: &BoxSummary) {
        Plot::new(id)
            .height(BOX_HEIGHT)
            .allow_scroll(false)
            .show_y(false)
            .x_axis_label(label)
            .y_axis_formatter(|_, _| String::new())
            .include_y(-1.0)
            .include_y(1.0)
            .show(ui, |plot_ui| {
                let elem = BoxElem::new(
                    0.0,
                    BoxSpread::new(
                        summary.lower_whisker,
                        summary.q1,
                        summary.median,
                        summary.q3,
                        summary.upper_whisker,
                    ),
                )
                .box_width(0.6)
                .whisker_width(0.3)
                .fill(PRIMARY_COLOR.gamma_multiply(0.3))
                .stroke(egui::Stroke::new(1.5, PRIMARY_COLOR));

                plot_ui.box_plot(BoxPlot::new(vec![elem]).horizontal().name(label));

                if !summary.outliers.is_empty() {
                    let points: PlotPoints = summary.outliers.iter().map(|&v| [v, 0.0]).collect();
                    plot_ui.points(
                        Points::new(points)
                            .radius(2.5)
                            .color(OUTLIER_COLOR)
                            .name("outliers"),
                    );
                }
            });
    }

    /// Longitude vs latitude in one translucent colour.
    pub fn draw_location_scatter(ui: &mut egui::Ui, locations: &[[f64; 2]]) {
        Plot::new("locations")
            .height(SCATTER_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("longitude")
            .y_axis_label("latitude")
            .show(ui, |plot_ui| {
                let points: PlotPoints = locations.iter().copied().collect();
                plot_ui.points(
                    Points::new(points)
                        .radius(1.5)
                        .color(PRIMARY_COLOR.gamma_multiply(0.1)),
                );
            });
    }

    /// Longitude vs latitude coloured by price on the jet scale.
    pub fn draw_price_scatter(ui: &mut egui::Ui, charts: &ChartSet) {
        Plot::new("locations_by_price")
            .height(SCATTER_HEIGHT)
            .allow_scroll(false)
            .legend(Legend::default())
            .x_axis_label("longitude")
            .y_axis_label("latitude")
            .show(ui, |plot_ui| {
                for band in &charts.price_bands {
                    let [r, g, b] = band.color;
                    let points: PlotPoints = band.points.iter().copied().collect();
                    plot_ui.points(
                        Points::new(points)
                            .radius(1.5)
                            .color(Color32::from_rgb(r, g, b).gamma_multiply(0.4))
                            .name(format!("R$ {:.0} - {:.0}", band.low, band.high)),
                    );
                }
            });
    }

    /// Horizontal bars of the most expensive neighbourhoods, highest on top.
    pub fn draw_top_priced(ui: &mut egui::Ui, groups: &[GroupMean]) {
        let n = groups.len();
        let labels: Vec<String> = groups.iter().rev().map(|g| g.group.clone()).collect();

        let bars: Vec<Bar> = groups
            .iter()
            .enumerate()
            .map(|(rank, g)| {
                Bar::new((n - 1 - rank) as f64, g.mean)
                    .name(&g.group)
                    .fill(PASTEL[rank % PASTEL.len()])
            })
            .collect();

        ui.label(
            RichText::new("Neighborhoods with the Highest Average Price in Rio de Janeiro.")
                .size(14.0)
                .strong(),
        );

        Plot::new("top_priced")
            .height(SCATTER_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Average Price")
            .y_axis_label("Neighborhoods")
            .y_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).horizontal().width(0.7));
            });
    }
}
