use _model::Coordinate;

use crate::error::LookupError;

mod google;
mod zomato;

pub use google::{campus_area, GoogleSearch};
pub use zomato::Zomato;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Price,
    Rating,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PrimaryInfo {
    pub price: Option<f64>,
    pub rating: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SecondaryInfo {
    pub rating: f64,
    pub reviews: u32,
}

/// Price and rating from a restaurant search API.
pub trait PrimaryRatings {
    fn fetch(
        &self,
        name: &str,
        near: Coordinate,
        wanted: &[Field],
    ) -> Result<PrimaryInfo, LookupError>;
}

/// Rating and review count scraped from a web search result page.
pub trait SecondaryRatings {
    fn fetch(&self, name: &str, campus_area: &str) -> Result<SecondaryInfo, LookupError>;
}
