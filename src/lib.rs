//! Rio Listings EDA - exploratory analysis of short-term rental listings
//!
//! Loads an Inside Airbnb style listings table, removes outliers and
//! irrelevant columns, aggregates prices and availability per neighbourhood,
//! and presents the results as charts, a map and a printed report.

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod logging;
pub mod map;
pub mod pipeline;
pub mod report;
pub mod stats;
