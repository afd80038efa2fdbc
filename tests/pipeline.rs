//! End-to-end runs over listings files written to a temp directory.

use rio_listings_eda::config::AnalysisConfig;
use rio_listings_eda::data::{DataLoader, LoaderError};
use rio_listings_eda::map::NeighbourhoodMap;
use rio_listings_eda::pipeline::{self, PipelineError};
use rio_listings_eda::report;
use rust_xlsxwriter::Workbook;
use std::fs;
use std::path::{Path, PathBuf};

const HEADER: [&str; 16] = [
    "id",
    "name",
    "host_id",
    "host_name",
    "neighbourhood_group",
    "neighbourhood",
    "latitude",
    "longitude",
    "room_type",
    "price",
    "minimum_nights",
    "number_of_reviews",
    "last_review",
    "reviews_per_month",
    "calculated_host_listings_count",
    "availability_365",
];

/// (neighbourhood, room type, price, minimum nights, availability)
const ROWS: [(&str, &str, f64, f64, f64); 8] = [
    ("Copacabana", "Entire home/apt", 300.0, 2.0, 200.0),
    ("Copacabana", "Private room", 150.0, 1.0, 300.0),
    ("Leblon", "Entire home/apt", 900.0, 3.0, 40.0),
    ("Leblon", "Entire home/apt", 700.0, 30.0, 60.0),
    ("Ipanema", "Entire home/apt", 600.0, 5.0, 90.0),
    ("Centro", "Private room", 80.0, 2.0, 365.0),
    ("Centro", "Shared room", 3001.0, 1.0, 10.0),
    ("Tijuca", "Entire home/apt", 120.0, 31.0, 5.0),
];

fn config_for(input: PathBuf) -> AnalysisConfig {
    AnalysisConfig {
        input_path: input,
        top_priced: 3,
        least_available: 2,
        open_map: false,
        show_charts: false,
        ..AnalysisConfig::default()
    }
}

fn write_csv(path: &Path) {
    let mut text = HEADER.join(",");
    text.push('\n');
    for (i, (hood, room, price, nights, availability)) in ROWS.iter().enumerate() {
        text.push_str(&format!(
            "{id},Flat {id},{host},Host,,{hood},{lat},{lon},{room},{price},{nights},4,,0.5,1,{availability}\n",
            id = i + 1,
            host = 100 + i,
            lat = -22.90 - i as f64 * 0.01,
            lon = -43.17 - i as f64 * 0.01,
        ));
    }
    fs::write(path, text).unwrap();
}

fn write_xlsx(path: &Path) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, name) in HEADER.iter().enumerate() {
        sheet.write_string(0, col as u16, *name).unwrap();
    }
    for (i, (hood, room, price, nights, availability)) in ROWS.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_number(row, 0, row as f64).unwrap();
        sheet.write_string(row, 1, format!("Flat {row}")).unwrap();
        sheet.write_number(row, 2, 100.0 + row as f64).unwrap();
        sheet.write_string(row, 3, "Host").unwrap();
        sheet.write_string(row, 5, *hood).unwrap();
        sheet.write_number(row, 6, -22.90 - i as f64 * 0.01).unwrap();
        sheet.write_number(row, 7, -43.17 - i as f64 * 0.01).unwrap();
        sheet.write_string(row, 8, *room).unwrap();
        sheet.write_number(row, 9, *price).unwrap();
        sheet.write_number(row, 10, *nights).unwrap();
        sheet.write_number(row, 11, 4.0).unwrap();
        sheet.write_number(row, 13, 0.5).unwrap();
        sheet.write_number(row, 14, 1.0).unwrap();
        sheet.write_number(row, 15, *availability).unwrap();
    }
    workbook.save(path).unwrap();
}

fn assert_expected_analysis(output: &pipeline::PipelineOutput) {
    let analysis = &output.analysis;

    // Tijuca only has a 31 night listing and Centro loses its 3001 listing.
    assert_eq!(output.listings.len(), 6);
    assert!(output.listings.iter().all(|l| l.minimum_nights <= 30));
    assert!(output.listings.iter().all(|l| l.price <= 3000.0));
    assert!(!output.listings.iter().any(|l| l.neighbourhood == "Tijuca"));

    let top: Vec<&str> = analysis.top_priced.iter().map(|g| g.group.as_str()).collect();
    assert_eq!(top, ["Leblon", "Ipanema", "Copacabana"]);
    assert_eq!(analysis.top_priced[0].mean, 800.0);

    let least: Vec<&str> = analysis.least_available.iter().map(|g| g.group.as_str()).collect();
    assert_eq!(least, ["Leblon", "Ipanema"]);
    assert_eq!(analysis.mean_availability("Centro"), Some(365.0));

    for column in [
        "id",
        "name",
        "host_id",
        "host_name",
        "neighbourhood_group",
        "last_review",
    ] {
        assert!(output.cleaned.column(column).is_err(), "{column} survived cleaning");
    }
}

#[test]
fn csv_listings_run_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("listings.csv");
    write_csv(&input);

    let output = pipeline::run(&config_for(input)).unwrap();
    assert_expected_analysis(&output);
}

#[test]
fn xlsx_listings_run_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("airbnb_database.xlsx");
    write_xlsx(&input);

    let output = pipeline::run(&config_for(input)).unwrap();
    assert_expected_analysis(&output);
}

#[test]
fn map_and_report_follow_the_analysis() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("listings.csv");
    write_csv(&input);
    let config = config_for(input);
    let output = pipeline::run(&config).unwrap();

    let map = NeighbourhoodMap::build(
        &output.listings,
        &output.analysis,
        config.map_center,
        config.map_zoom,
    );
    assert_eq!(map.markers.len(), 4);
    let map_path = dir.path().join("out").join("map.html");
    map.write_html(&map_path).unwrap();
    let html = fs::read_to_string(&map_path).unwrap();
    assert!(html.contains("Neighbourhood: Leblon"));
    assert!(!html.contains("__MARKERS__"));

    let mut printed = Vec::new();
    report::write_report(&mut printed, &output.analysis).unwrap();
    report::write_availability_ranking(&mut printed, &output.analysis.least_available).unwrap();
    let text = String::from_utf8(printed).unwrap();
    assert!(text.contains("Listings analysed: 6"));
    assert!(text.contains("Neighborhoods with lower average availability throughout the year:"));
    assert!(text.contains("Leblon: 50 days available, on average"));
}

#[test]
fn missing_input_is_a_file_access_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = pipeline::run(&config_for(dir.path().join("nope.xlsx")))
        .err()
        .unwrap();
    assert!(matches!(
        err,
        PipelineError::Load(LoaderError::FileAccess { .. })
    ));
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("listings.json");
    fs::write(&input, "{}").unwrap();

    let mut loader = DataLoader::new();
    assert!(matches!(
        loader.load(&input),
        Err(LoaderError::Parse { .. })
    ));
}
