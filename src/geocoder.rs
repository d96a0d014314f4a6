use _model::{Coordinate, Location};
use serde::Deserialize;
use ureq::Agent;

use crate::{error::LookupError, form};

#[derive(Clone, Debug, PartialEq)]
pub struct Geocoded {
    pub coordinate: Coordinate,
    pub formatted_address: String,
}

pub trait Geocoder {
    /// Resolves a free-text address, blocking until the service answers.
    fn geocode(&self, address: &str) -> Result<Geocoded, LookupError>;
}

pub struct MapDevelopers {
    agent: Agent,
    url: String,
}

impl MapDevelopers {
    pub fn new(agent: Agent, url: impl Into<String>) -> Self {
        Self {
            agent,
            url: url.into(),
        }
    }
}

impl Geocoder for MapDevelopers {
    fn geocode(&self, address: &str) -> Result<Geocoded, LookupError> {
        log::debug!("Geocoding {address:?}");
        let body = self
            .agent
            .post(&self.url)
            .set("Content-Type", "application/x-www-form-urlencoded")
            .send_string(&form::encode(&[("address", address)]))?
            .into_string()?;
        parse_response(address, &body)
    }
}

/// Geocodes `address` into a [`Location`], falling back to the raw address
/// with no coordinate when the lookup fails for any reason.
pub fn locate(geocoder: &impl Geocoder, address: &str) -> Location {
    match geocoder.geocode(address) {
        Ok(x) => Location::new(x.formatted_address, Some(x.coordinate)),
        Err(e) if e.is_not_found() => {
            log::warn!("No coordinate for {address:?}");
            Location::unresolved(address)
        }
        Err(e) => {
            log::warn!("Geocoding {address:?} failed: {e}");
            Location::unresolved(address)
        }
    }
}

#[derive(Deserialize)]
struct Response {
    #[serde(default)]
    data: Option<Data>,
}

// the service answers with a list, older deployments with a bare object
#[derive(Deserialize)]
#[serde(untagged)]
enum Data {
    Many(Vec<Hit>),
    One(Hit),
}

#[derive(Deserialize)]
struct Hit {
    lat: f64,
    lng: f64,
    #[serde(default)]
    formatted_address: Option<String>,
}

pub(crate) fn parse_response(address: &str, body: &str) -> Result<Geocoded, LookupError> {
    if body.trim().is_empty() {
        return Err(LookupError::CoordinateNotFound(address.to_string()));
    }

    let response: Response =
        serde_json::from_str(body).map_err(|e| LookupError::parse("geocoder response", e))?;
    let first = match response.data {
        Some(Data::Many(hits)) => hits.into_iter().next(),
        Some(Data::One(hit)) => Some(hit),
        None => None,
    }
    .ok_or_else(|| LookupError::CoordinateNotFound(address.to_string()))?;

    Ok(Geocoded {
        coordinate: Coordinate::new(first.lat, first.lng),
        formatted_address: first
            .formatted_address
            .filter(|x| !x.trim().is_empty())
            .unwrap_or_else(|| address.to_string()),
    })
}
