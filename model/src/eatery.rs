use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::coordinate::{self, Coordinate};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    #[serde(with = "coordinate::empty_object", default)]
    pub coordinate: Option<Coordinate>,
}

impl Location {
    pub fn new(address: impl Into<String>, coordinate: Option<Coordinate>) -> Self {
        Self {
            address: address.into(),
            coordinate,
        }
    }

    pub fn unresolved(address: impl Into<String>) -> Self {
        Self::new(address, None)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Eatery {
    pub name: String,
    pub locations: Vec<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<u32>,
    // later dataset variants carry these, keep them when passing through
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
}

impl Eatery {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locations: Vec::new(),
            price: None,
            rating: None,
            reviews: None,
            cuisine: None,
            area: None,
        }
    }

    /// Coordinate of the first location, the one the front-end plots.
    pub fn first_coordinate(&self) -> Option<Coordinate> {
        self.locations.first().and_then(|x| x.coordinate)
    }

    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.locations.iter().flat_map(|x| x.coordinate)
    }
}

/// Eateries in first-seen order, merged by exact name.
#[derive(Debug, Default)]
pub struct Eateries {
    eateries: Vec<Eatery>,
    index: HashMap<String, usize>,
}

impl Eateries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `location` to the eatery called `name`, creating it at the end
    /// if this is the first time the name is seen.
    pub fn push(&mut self, name: &str, location: Location) {
        match self.index.get(name) {
            Some(&i) => self.eateries[i].locations.push(location),
            None => {
                let mut eatery = Eatery::new(name);
                eatery.locations.push(location);
                self.index.insert(name.to_string(), self.eateries.len());
                self.eateries.push(eatery);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Eatery> {
        self.index.get(name).map(|&i| &self.eateries[i])
    }

    pub fn len(&self) -> usize {
        self.eateries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eateries.is_empty()
    }

    pub fn into_vec(self) -> Vec<Eatery> {
        self.eateries
    }
}

impl FromIterator<(String, Location)> for Eateries {
    fn from_iter<T: IntoIterator<Item = (String, Location)>>(iter: T) -> Self {
        let mut output = Self::new();
        for (name, location) in iter {
            output.push(&name, location);
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn located(address: &str, latitude: f64, longitude: f64) -> Location {
        Location::new(address, Some(Coordinate::new(latitude, longitude)))
    }

    #[test]
    fn merges_by_first_seen_name() {
        let eateries: Eateries = [
            ("Cafe Kopi", located("109 N Walnut St", 40.117, -88.243)),
            ("Sakanaya", located("403 E Green St", 40.110, -88.233)),
            ("Cafe Kopi", Location::unresolved("1 Main St")),
        ]
        .into_iter()
        .map(|(name, location)| (name.to_string(), location))
        .collect();

        let eateries = eateries.into_vec();
        assert_eq!(eateries.len(), 2);
        assert_eq!(eateries[0].name, "Cafe Kopi");
        assert_eq!(eateries[0].locations[0].address, "109 N Walnut St");
        assert_eq!(eateries[0].locations[1], Location::unresolved("1 Main St"));
        assert_eq!(eateries[1].name, "Sakanaya");
    }

    #[test]
    fn names_stay_unique() {
        let mut eateries = Eateries::new();
        for i in 0..50 {
            eateries.push(&format!("eatery {}", i % 7), Location::unresolved("x"));
        }
        let eateries = eateries.into_vec();
        let names: HashSet<_> = eateries.iter().map(|x| &x.name).collect();
        assert_eq!(names.len(), eateries.len());
        assert_eq!(eateries.len(), 7);
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut eateries = Eateries::new();
        eateries.push("Papa Del's", Location::unresolved("a"));
        eateries.push("papa del's", Location::unresolved("b"));
        assert_eq!(eateries.len(), 2);
        assert!(eateries.get("Papa Del's").is_some());
    }

    #[test]
    fn missing_coordinate_is_empty_object() {
        let json = serde_json::to_value(Location::unresolved("somewhere")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "address": "somewhere", "coordinate": {} })
        );

        let back: Location =
            serde_json::from_str(r#"{ "address": "somewhere", "coordinate": {} }"#).unwrap();
        assert_eq!(back.coordinate, None);
    }

    #[test]
    fn absent_fields_are_omitted() {
        let mut eatery = Eatery::new("Maize");
        eatery.locations.push(located("60 E Green St", 40.11, -88.24));
        let json = serde_json::to_value(&eatery).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("price"));
        assert!(!object.contains_key("reviews"));
        assert_eq!(json["locations"][0]["coordinate"]["latitude"], 40.11);
    }

    #[test]
    fn artifact_round_trip() {
        let mut first = Eatery::new("Black Dog Smoke & Ale House");
        first.locations.push(located("201 N Broadway Ave", 40.1129, -88.2071));
        first.locations.push(Location::unresolved("320 N Chestnut St"));
        first.price = Some(30.0);
        first.rating = Some(4.7);
        let mut second = Eatery::new("Golden Harbor");
        second.locations.push(located("505 S Neil St", 40.1107, -88.2436));
        second.reviews = Some(812);
        second.cuisine = Some("Chinese".to_string());

        let eateries = vec![first, second];
        let json = serde_json::to_string_pretty(&eateries).unwrap();
        let back: Vec<Eatery> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, eateries);
    }

    #[test]
    fn reads_first_generation_artifact() {
        let raw = r#"[
            {
                "name": "Manolo's Pizza & Empanadas",
                "locations": [
                    {
                        "address": "1115 W Oregon St, Urbana, IL 61801, USA",
                        "coordinate": { "latitude": 40.1063, "longitude": -88.2234 }
                    }
                ]
            }
        ]"#;
        let eateries: Vec<Eatery> = serde_json::from_str(raw).unwrap();
        assert_eq!(
            eateries[0].first_coordinate(),
            Some(Coordinate::new(40.1063, -88.2234))
        );
        assert_eq!(eateries[0].price, None);
    }
}
