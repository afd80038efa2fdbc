//! Listings Viewer Main Application
//! Native window with a chart list on the left and the charts on the right.

use crate::charts::ChartSet;
use crate::gui::chart_viewer::{ChartView, ChartViewer};
use crate::pipeline::Analysis;
use eframe::egui;
use egui::{Color32, RichText, SidePanel};

/// Main application window.
pub struct ListingsViewer {
    chart_viewer: ChartViewer,
    selected: Option<ChartView>,
    ranking: Vec<String>,
    listing_count: usize,
}

impl ListingsViewer {
    pub fn new(charts: ChartSet, analysis: &Analysis) -> Self {
        let ranking = analysis
            .least_available
            .iter()
            .map(|g| format!("{}: {:.0} days", g.group, g.mean))
            .collect();

        Self {
            chart_viewer: ChartViewer::new(charts),
            selected: None,
            ranking,
            listing_count: analysis.cleaning.rows_retained,
        }
    }

    fn show_side_panel(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("Rio Listings")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new(format!("{} listings after cleaning", self.listing_count))
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();

        ui.label(RichText::new("Charts").size(14.0).strong());
        ui.selectable_value(&mut self.selected, None, "All charts");
        for view in ChartView::ALL {
            ui.selectable_value(&mut self.selected, Some(view), view.title());
        }

        ui.add_space(10.0);
        ui.separator();

        ui.label(RichText::new("Lowest availability").size(14.0).strong());
        for line in &self.ranking {
            ui.label(RichText::new(line).size(12.0));
        }
    }
}

impl eframe::App for ListingsViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        SidePanel::left("chart_list")
            .min_width(220.0)
            .max_width(300.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.show_side_panel(ui));
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, self.selected);
        });
    }
}

/// Open the chart window and block until it is closed.
pub fn run_viewer(charts: ChartSet, analysis: &Analysis) -> eframe::Result<()> {
    let app = ListingsViewer::new(charts, analysis);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("Rio Listings EDA"),
        ..Default::default()
    };

    eframe::run_native(
        "Rio Listings EDA",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
}
