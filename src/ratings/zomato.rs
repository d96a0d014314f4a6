use _model::Coordinate;
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use ureq::Agent;

use super::{Field, PrimaryInfo, PrimaryRatings};
use crate::error::LookupError;

pub struct Zomato {
    agent: Agent,
    url: String,
    user_key: String,
    radius: u32,
}

impl Zomato {
    pub fn new(
        agent: Agent,
        url: impl Into<String>,
        user_key: impl Into<String>,
        radius: u32,
    ) -> Self {
        Self {
            agent,
            url: url.into(),
            user_key: user_key.into(),
            radius,
        }
    }
}

impl PrimaryRatings for Zomato {
    fn fetch(
        &self,
        name: &str,
        near: Coordinate,
        wanted: &[Field],
    ) -> Result<PrimaryInfo, LookupError> {
        // the search chokes on apostrophes
        let query = name.replace('\'', "");
        log::debug!("Searching Zomato for {query:?}");
        let body = self
            .agent
            .get(&self.url)
            .set("user-key", &self.user_key)
            .query("q", &query)
            .query("lat", &near.latitude.to_string())
            .query("lon", &near.longitude.to_string())
            .query("radius", &self.radius.to_string())
            .call()?
            .into_string()?;
        parse_response(name, &body, wanted)
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    restaurants: Vec<Entry>,
}

#[derive(Deserialize)]
struct Entry {
    restaurant: Restaurant,
}

#[derive(Deserialize)]
struct Restaurant {
    #[serde(default)]
    average_cost_for_two: Option<f64>,
    #[serde(default)]
    user_rating: Option<UserRating>,
}

#[serde_as]
#[derive(Deserialize)]
struct UserRating {
    // usually a string like "4.1"
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    aggregate_rating: f64,
}

fn parse_response(
    name: &str,
    body: &str,
    wanted: &[Field],
) -> Result<PrimaryInfo, LookupError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| LookupError::parse("zomato response", e))?;
    let restaurant = response
        .restaurants
        .into_iter()
        .next()
        .ok_or_else(|| LookupError::RestaurantNotFound(name.to_string()))?
        .restaurant;

    let mut info = PrimaryInfo::default();
    if wanted.contains(&Field::Price) {
        info.price = restaurant.average_cost_for_two;
    }
    if wanted.contains(&Field::Rating) {
        info.rating = restaurant.user_rating.map(|x| x.aggregate_rating);
    }
    Ok(info)
}
