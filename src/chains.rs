use std::{collections::BTreeSet, io::Read};

use _model::Eatery;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// local places that happen to have more than one location
const NOT_CHAINS: [&str; 10] = [
    "Lil Porgy's BBQ",
    "Rainbow Garden",
    "Pekara Bakery & Bistro",
    "Niro's Gyros",
    "Merry Ann's Diner",
    "Latte Da!",
    "Ko Fusion",
    "Filippo's Pizza & Italian Food",
    "China King",
    "Black Dog Smoke & Ale House",
];

/// Lower-cased names of known fast-food chains.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FastFoodNames {
    #[serde(rename = "fastFoodEateryNames")]
    names: BTreeSet<String>,
}

#[derive(Deserialize)]
struct Row {
    name: String,
}

impl FastFoodNames {
    /// Reads the `name` column of a restaurant CSV, other columns are ignored.
    pub fn from_csv(reader: impl Read) -> Result<Self> {
        let mut names = BTreeSet::new();
        for (i, row) in csv::Reader::from_reader(reader)
            .deserialize::<Row>()
            .enumerate()
        {
            let row = row.with_context(|| format!("bad fast food record {}", i + 1))?;
            let name = row.name.trim();
            if !name.is_empty() {
                names.insert(name.to_lowercase());
            }
        }
        Ok(Self { names })
    }

    pub fn is_chain(&self, name: &str) -> bool {
        self.names.contains(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<String> for FastFoodNames {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self {
            names: iter.into_iter().map(|x| x.to_lowercase()).collect(),
        }
    }
}

/// Names with more than one location are probably chains, minus the ones we
/// know are not.
pub fn chain_candidates(eateries: &[Eatery]) -> Vec<String> {
    eateries
        .iter()
        .filter(|x| x.locations.len() > 1)
        .filter(|x| !NOT_CHAINS.contains(&x.name.as_str()))
        .map(|x| x.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use _model::Location;

    use super::*;

    #[test]
    fn lookup_ignores_case() {
        let names: FastFoodNames = ["McDonald's".to_string(), "Taco Bell".to_string()]
            .into_iter()
            .collect();
        assert!(names.is_chain("McDonald's"));
        assert!(names.is_chain("mcdonald's"));
        assert!(names.is_chain("TACO BELL"));
        assert!(!names.is_chain("Taco Bell Cantina"));
        assert!(!names.is_chain("Maize"));
    }

    #[test]
    fn csv_names_are_unique_and_lowercase() {
        let raw = "\
address,city,country,keys,latitude,longitude,name,postalCode,province,websites
324 Main St,Massena,US,us/ny/massena/324mainst/-1161002137,44.9213,-74.89021,McDonald's,13662,NY,http://mcdonalds.com
530 Clinton Ave,Washington Court House,US,us/oh/washingtoncourthouse/530clintonave/-791445730,39.53255,-83.44526,Wendy's,43160,OH,http://www.wendys.com
408 Market Square Dr,Maysville,US,us/ky/maysville/408marketsquaredr/1051460804,38.6276,-83.79141,Mcdonald's,41056,KY,
";
        let names = FastFoodNames::from_csv(raw.as_bytes()).unwrap();
        assert_eq!(names.len(), 2);
        assert!(names.is_chain("WENDY'S"));

        let json = serde_json::to_value(&names).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "fastFoodEateryNames": ["mcdonald's", "wendy's"] })
        );
    }

    #[test]
    fn csv_without_name_column_fails() {
        assert!(FastFoodNames::from_csv("city,state\nUrbana,IL\n".as_bytes()).is_err());
    }

    #[test]
    fn candidates_skip_known_locals() {
        let eatery = |name: &str, count: usize| {
            let mut x = Eatery::new(name);
            for i in 0..count {
                x.locations.push(Location::unresolved(format!("{i} Neil St")));
            }
            x
        };
        let eateries = vec![
            eatery("Subway", 4),
            eatery("China King", 2),
            eatery("Maize", 1),
            eatery("Starbucks", 3),
        ];
        assert_eq!(chain_candidates(&eateries), vec!["Subway", "Starbucks"]);
    }
}
