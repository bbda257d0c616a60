//! The seeded movie/animation catalog.
//!
//! The catalog is fixed for the lifetime of the process; the union of the
//! movie and animation sections is what the recommendation endpoints scan.

use serde::Serialize;

use super::models::MediaType;

/// One title in the catalog.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: u32,
    pub title: String,
    pub poster: String,
    pub category: String,
    pub year: i32,
    /// 0-10 scale; unrated titles carry no score bonus.
    pub rating: Option<f64>,
    pub media_type: MediaType,
}

fn movie(id: u32, title: &str, category: &str, year: i32, rating: Option<f64>) -> CatalogItem {
    CatalogItem {
        id,
        title: title.to_string(),
        poster: format!("/posters/{}.jpg", id),
        category: category.to_string(),
        year,
        rating,
        media_type: MediaType::Movie,
    }
}

fn animation(id: u32, title: &str, category: &str, year: i32, rating: Option<f64>) -> CatalogItem {
    CatalogItem {
        media_type: MediaType::Animation,
        ..movie(id, title, category, year, rating)
    }
}

/// Builds the default catalog.
pub fn seed() -> Vec<CatalogItem> {
    vec![
        movie(1, "The Long Road Home", "drama", 2019, Some(8.4)),
        movie(2, "Quiet Harvest", "drama", 2021, Some(7.6)),
        movie(3, "Paper Lanterns", "drama", 2017, Some(8.9)),
        movie(4, "Second Wind", "drama", 2023, Some(7.1)),
        movie(5, "Midnight Delivery", "comedy", 2020, Some(7.8)),
        movie(6, "The Substitute Groom", "comedy", 2018, Some(6.9)),
        movie(7, "Office of Lost Things", "comedy", 2022, Some(8.2)),
        movie(8, "Iron Tide", "action", 2021, Some(7.4)),
        movie(9, "Falcon Protocol", "action", 2019, Some(8.1)),
        movie(10, "Redline Canyon", "action", 2023, Some(6.5)),
        movie(11, "Last Train North", "action", 2016, None),
        movie(12, "Echoes of Europa", "sci-fi", 2022, Some(8.7)),
        movie(13, "The Cartographer", "sci-fi", 2018, Some(8.0)),
        movie(14, "Low Orbit", "sci-fi", 2024, Some(7.3)),
        movie(15, "Letters from the Pier", "romance", 2020, Some(7.7)),
        movie(16, "Four Seasons Apart", "romance", 2019, Some(8.3)),
        movie(17, "Glacier Notes", "documentary", 2021, Some(9.1)),
        movie(18, "The Noodle Masters", "documentary", 2017, Some(8.5)),
        movie(19, "City Without Maps", "documentary", 2023, None),
        animation(20, "The Cloud Shepherd", "fantasy", 2021, Some(8.8)),
        animation(21, "Tin Whistle", "fantasy", 2018, Some(7.9)),
        animation(22, "Miko and the Paper Crane", "family", 2020, Some(8.6)),
        animation(23, "The Great Acorn Heist", "family", 2022, Some(7.2)),
        animation(24, "Starlight Courier", "adventure", 2019, Some(8.0)),
        animation(25, "Below the Bell Tower", "adventure", 2023, None),
    ]
}
