//! Chart Viewer Widget
//! Central scrollable panel showing the charts as cards.

use crate::charts::{ChartPlotter, ChartSet};
use egui::{Color32, RichText, ScrollArea};

const CARD_SPACING: f32 = 15.0;
const CARD_BORDER: Color32 = Color32::from_rgb(100, 149, 237);

/// The charts, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartView {
    MinimumNights,
    Price,
    Locations,
    LocationsByPrice,
    TopPriced,
}

impl ChartView {
    pub const ALL: [ChartView; 5] = [
        ChartView::MinimumNights,
        ChartView::Price,
        ChartView::Locations,
        ChartView::LocationsByPrice,
        ChartView::TopPriced,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ChartView::MinimumNights => "Minimum nights",
            ChartView::Price => "Price",
            ChartView::Locations => "Listing locations",
            ChartView::LocationsByPrice => "Listing locations by price",
            ChartView::TopPriced => "Most expensive neighbourhoods",
        }
    }
}

/// Scrollable chart display area.
pub struct ChartViewer {
    charts: ChartSet,
}

impl ChartViewer {
    pub fn new(charts: ChartSet) -> Self {
        Self { charts }
    }

    /// Draw one chart, or every chart in order when `only` is `None`.
    pub fn show(&self, ui: &mut egui::Ui, only: Option<ChartView>) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| match only {
                Some(view) => self.draw_card(ui, view),
                None => {
                    for view in ChartView::ALL {
                        self.draw_card(ui, view);
                        ui.add_space(CARD_SPACING);
                    }
                }
            });
    }

    fn draw_card(&self, ui: &mut egui::Ui, view: ChartView) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(2.0, CARD_BORDER))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(
                    RichText::new(view.title())
                        .size(18.0)
                        .strong()
                        .color(CARD_BORDER),
                );
                ui.add_space(8.0);
                self.draw_chart(ui, view);
            });
    }

    fn draw_chart(&self, ui: &mut egui::Ui, view: ChartView) {
        match view {
            ChartView::MinimumNights => match &self.charts.minimum_nights {
                Some(summary) => ChartPlotter::draw_horizontal_boxplot(
                    ui,
                    "minimum_nights_box",
                    "minimum_nights",
                    summary,
                ),
                None => Self::no_data(ui),
            },
            ChartView::Price => match &self.charts.price {
                Some(summary) => {
                    ChartPlotter::draw_horizontal_boxplot(ui, "price_box", "price", summary)
                }
                None => Self::no_data(ui),
            },
            ChartView::Locations => ChartPlotter::draw_location_scatter(ui, &self.charts.locations),
            ChartView::LocationsByPrice => ChartPlotter::draw_price_scatter(ui, &self.charts),
            ChartView::TopPriced => ChartPlotter::draw_top_priced(ui, &self.charts.top_priced),
        }
    }

    fn no_data(ui: &mut egui::Ui) {
        ui.label(RichText::new("No Data").size(16.0).color(Color32::GRAY));
    }
}
