use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub data_dir: PathBuf,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub directory: DirectoryConfig,
    pub geocoder: GeocoderConfig,
    pub zomato: ZomatoConfig,
    pub google: GoogleConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            user_agent: "campus-eateries (+https://github.com/uiuc-food/eateries)".to_string(),
            timeout_secs: 30,
            directory: DirectoryConfig::default(),
            geocoder: GeocoderConfig::default(),
            zomato: ZomatoConfig::default(),
            google: GoogleConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let raw = read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                serde_yaml::from_str(&raw)
                    .with_context(|| format!("invalid config {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn paths(&self) -> Paths {
        Paths::new(&self.data_dir)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DirectoryConfig {
    pub url: String,
    pub category: String,
    pub per_page: usize,
    pub display: String,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            url: "https://www.visitchampaigncounty.org/business/getlistingsrecords".to_string(),
            category: "54".to_string(),
            per_page: 1000,
            display: "grid".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GeocoderConfig {
    pub url: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            url: "https://www.mapdevelopers.com/data.php?operation=geocode".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ZomatoConfig {
    pub url: String,
    pub user_key: Option<String>,
    // the quad
    pub latitude: f64,
    pub longitude: f64,
    // metres
    pub radius: u32,
}

impl Default for ZomatoConfig {
    fn default() -> Self {
        Self {
            url: "https://developers.zomato.com/api/v2.1/search".to_string(),
            user_key: None,
            latitude: 40.106865,
            longitude: -88.227111,
            radius: 9000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GoogleConfig {
    pub url: String,
    pub user_agent: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            url: "https://www.google.com/search".to_string(),
            // plain clients get a page without the rating markup
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_14_0) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/73.0.3683.103 Safari/537.36".to_string(),
        }
    }
}

/// Where each pipeline checkpoint lives under the data directory.
#[derive(Debug, Clone)]
pub struct Paths {
    obtained: PathBuf,
    generated: PathBuf,
}

impl Paths {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            obtained: data_dir.join("obtained"),
            generated: data_dir.join("generated"),
        }
    }

    pub fn raw_html(&self) -> PathBuf {
        self.obtained.join("eateries.html")
    }

    pub fn fast_food_csv(&self) -> PathBuf {
        self.obtained.join("FastFoodRestaurants.csv")
    }

    /// The GeoJSON boundary, or the older KML export when only that exists.
    pub fn boundary(&self) -> PathBuf {
        let geojson = self.generated.join("extended-campus.geojson");
        let kml = self.generated.join("extendedCampus.kml");
        if !geojson.exists() && kml.exists() {
            kml
        } else {
            geojson
        }
    }

    pub fn eateries(&self) -> PathBuf {
        self.generated.join("eateries.json")
    }

    pub fn in_bounds(&self) -> PathBuf {
        self.generated.join("in-bounds.json")
    }

    pub fn fast_food_names(&self) -> PathBuf {
        self.generated.join("fast-food-names.json")
    }

    pub fn chain_candidates(&self) -> PathBuf {
        self.generated.join("chain-candidates.json")
    }

    pub fn filtered(&self) -> PathBuf {
        self.generated.join("filtered.json")
    }

    pub fn dataset(&self) -> PathBuf {
        self.generated.join("dataset.json")
    }

    pub fn dataset_csv(&self) -> PathBuf {
        self.generated.join("dataset.csv")
    }
}
