use serde::{ser::SerializeMap, Deserialize, Deserializer, Serialize, Serializer};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

// geo works in x/y, so longitude comes first
impl From<Coordinate> for geo::Coord {
    fn from(c: Coordinate) -> Self {
        geo::Coord {
            x: c.longitude,
            y: c.latitude,
        }
    }
}

/// Serde adapter for `Option<Coordinate>` where a missing coordinate is
/// written as `{}` rather than `null`.
pub mod empty_object {
    use super::*;

    #[derive(Deserialize)]
    struct Partial {
        latitude: Option<f64>,
        longitude: Option<f64>,
    }

    pub fn serialize<S: Serializer>(
        value: &Option<Coordinate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(x) => x.serialize(serializer),
            None => serializer.serialize_map(Some(0))?.end(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Coordinate>, D::Error> {
        let partial: Option<Partial> = Option::deserialize(deserializer)?;
        Ok(match partial {
            Some(Partial {
                latitude: Some(latitude),
                longitude: Some(longitude),
            }) => Some(Coordinate::new(latitude, longitude)),
            _ => None,
        })
    }
}
