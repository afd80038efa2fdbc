//! Chart data shared by the interactive viewer and the static renderer.

use crate::charts::colormap::ColorScale;
use crate::data::Listing;
use crate::pipeline::Analysis;
use crate::stats::{BoxSummary, GroupMean};

/// Number of colour bands for the price scatter.
pub const PRICE_BANDS: usize = 16;

/// Listings whose price falls in one colour band.
#[derive(Debug, Clone)]
pub struct PriceBand {
    pub color: [u8; 3],
    pub low: f64,
    pub high: f64,
    /// `[longitude, latitude]` pairs.
    pub points: Vec<[f64; 2]>,
}

/// Everything the presenters draw, in presentation order.
#[derive(Debug, Clone)]
pub struct ChartSet {
    pub minimum_nights: Option<BoxSummary>,
    pub price: Option<BoxSummary>,
    /// `[longitude, latitude]` of every listing.
    pub locations: Vec<[f64; 2]>,
    pub price_bands: Vec<PriceBand>,
    pub price_scale: Option<ColorScale>,
    pub top_priced: Vec<GroupMean>,
}

impl ChartSet {
    pub fn build(listings: &[Listing], analysis: &Analysis) -> Self {
        let locations = listings.iter().map(|l| [l.longitude, l.latitude]).collect();
        let price_scale = ColorScale::from_values(listings.iter().map(|l| l.price));
        let price_bands = price_scale
            .map(|scale| Self::band_prices(listings, scale))
            .unwrap_or_default();

        Self {
            minimum_nights: analysis.minimum_nights_box.clone(),
            price: analysis.price_box.clone(),
            locations,
            price_bands,
            price_scale,
            top_priced: analysis.top_priced.clone(),
        }
    }

    /// Split listings into equal-width price bands, coloured by the band midpoint.
    fn band_prices(listings: &[Listing], scale: ColorScale) -> Vec<PriceBand> {
        let width = (scale.max - scale.min) / PRICE_BANDS as f64;
        let mut bands: Vec<PriceBand> = (0..PRICE_BANDS)
            .map(|i| {
                let low = scale.min + width * i as f64;
                let high = low + width;
                PriceBand {
                    color: scale.color((low + high) / 2.0),
                    low,
                    high,
                    points: Vec::new(),
                }
            })
            .collect();

        for listing in listings {
            let idx = ((scale.normalize(listing.price) * PRICE_BANDS as f64) as usize)
                .min(PRICE_BANDS - 1);
            bands[idx].points.push([listing.longitude, listing.latitude]);
        }

        bands.retain(|b| !b.points.is_empty());
        bands
    }
}
