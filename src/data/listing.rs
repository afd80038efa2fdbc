//! Listing records
//! Typed view of the cleaned listings table.

use polars::prelude::*;
use serde::Serialize;
use tracing::warn;

pub const NEIGHBOURHOOD: &str = "neighbourhood";
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";
pub const ROOM_TYPE: &str = "room_type";
pub const PRICE: &str = "price";
pub const MINIMUM_NIGHTS: &str = "minimum_nights";
pub const NUMBER_OF_REVIEWS: &str = "number_of_reviews";
pub const AVAILABILITY_365: &str = "availability_365";
pub const HOST_LISTINGS_COUNT: &str = "calculated_host_listings_count";
pub const REVIEWS_PER_MONTH: &str = "reviews_per_month";

/// Columns the analysis reads after cleaning.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    NEIGHBOURHOOD,
    LATITUDE,
    LONGITUDE,
    ROOM_TYPE,
    PRICE,
    MINIMUM_NIGHTS,
    NUMBER_OF_REVIEWS,
    AVAILABILITY_365,
    HOST_LISTINGS_COUNT,
];

/// One rental advertisement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub neighbourhood: String,
    pub latitude: f64,
    pub longitude: f64,
    pub room_type: String,
    pub price: f64,
    pub minimum_nights: i64,
    pub number_of_reviews: i64,
    pub availability_365: i64,
    pub calculated_host_listings_count: i64,
}

impl Listing {
    /// Convert a cleaned DataFrame into records, preserving row order.
    ///
    /// Rows missing any retained attribute are skipped.
    pub fn from_frame(df: &DataFrame) -> PolarsResult<Vec<Listing>> {
        let neighbourhood = text_values(df, NEIGHBOURHOOD)?;
        let room_type = text_values(df, ROOM_TYPE)?;
        let latitude = float_values(df, LATITUDE)?;
        let longitude = float_values(df, LONGITUDE)?;
        let price = float_values(df, PRICE)?;
        let minimum_nights = float_values(df, MINIMUM_NIGHTS)?;
        let reviews = float_values(df, NUMBER_OF_REVIEWS)?;
        let availability = float_values(df, AVAILABILITY_365)?;
        let host_listings = float_values(df, HOST_LISTINGS_COUNT)?;

        let mut listings = Vec::with_capacity(df.height());
        let mut skipped = 0usize;

        for i in 0..df.height() {
            let record = (|| {
                Some(Listing {
                    neighbourhood: neighbourhood[i].clone()?,
                    latitude: latitude[i]?,
                    longitude: longitude[i]?,
                    room_type: room_type[i].clone()?,
                    price: price[i]?,
                    minimum_nights: minimum_nights[i]? as i64,
                    number_of_reviews: reviews[i]? as i64,
                    availability_365: availability[i]? as i64,
                    calculated_host_listings_count: host_listings[i]? as i64,
                })
            })();

            match record {
                Some(listing) => listings.push(listing),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!(skipped, "Skipped listings with missing attributes");
        }

        Ok(listings)
    }
}

/// Column values as f64, with nulls and NaN as `None`.
pub fn float_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    let values = column
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    Ok(values)
}

/// Column values as strings, with nulls as `None`.
pub fn text_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    let values = column
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.trim().to_string()))
        .collect();
    Ok(values)
}


#[cfg(test)]
mod tests {
    use super::fixtures::cleaned_frame;
    use super::*;

    #[test]
    fn converts_rows_in_order() {
        let listings = Listing::from_frame(&cleaned_frame()).unwrap();
        assert_eq!(listings.len(), 3);
        assert_eq!(listings[0].neighbourhood, "Copacabana");
        assert_eq!(listings[1].room_type, "Private room");
        assert_eq!(listings[1].availability_365, 45);
        assert_eq!(listings[2].number_of_reviews, 55);
    }

    #[test]
    fn rows_with_missing_attributes_are_skipped() {
        let mut df = cleaned_frame();
        df.with_column(Column::new(
            PRICE.into(),
            vec![Some(250.0), None, Some(180.0)],
        ))
        .unwrap();

        let listings = Listing::from_frame(&df).unwrap();
        assert_eq!(listings.len(), 2);
        assert!(listings.iter().all(|l| l.neighbourhood == "Copacabana"));
    }

    #[test]
    fn missing_column_is_an_error() {
        let df = cleaned_frame().drop(PRICE).unwrap();
        assert!(Listing::from_frame(&df).is_err());
    }
}
