use std::{ffi::OsStr, fs::read_to_string, path::Path};

use _model::{Coordinate, Eatery};
use anyhow::{bail, Context, Result};
use geo::{
    coordinate_position::{CoordPos, CoordinatePosition},
    Coord, Geometry, Polygon,
};
use geojson::GeoJson;
use kml::Kml;
use rayon::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    Inside,
    OnBoundary,
    Outside,
}

pub fn classify(polygon: &Polygon, coordinate: Coordinate) -> Placement {
    let coord: Coord = coordinate.into();
    match polygon.coordinate_position(&coord) {
        CoordPos::Inside => Placement::Inside,
        CoordPos::OnBoundary => Placement::OnBoundary,
        CoordPos::Outside => Placement::Outside,
    }
}

/// The extended campus, as one or more polygons in longitude/latitude.
///
/// Only outer rings are kept: a hole in a boundary polygon still counts as
/// campus.
#[derive(Debug, Clone)]
pub struct CampusBoundary {
    polygons: Vec<Polygon>,
}

impl CampusBoundary {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        let polygons = polygons
            .into_iter()
            .map(|x| Polygon::new(x.into_inner().0, Vec::new()))
            .collect();
        Self { polygons }
    }

    /// Reads a `.kml` file as KML, anything else as GeoJSON.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = read_to_string(path)
            .with_context(|| format!("failed to read boundary {}", path.display()))?;
        let boundary = match path.extension().and_then(OsStr::to_str) {
            Some(x) if x.eq_ignore_ascii_case("kml") => Self::from_kml(&raw),
            _ => Self::from_geojson(&raw),
        };
        boundary.with_context(|| format!("invalid boundary {}", path.display()))
    }

    pub fn from_kml(raw: &str) -> Result<Self> {
        let kml: Kml = raw.parse()?;
        let mut polygons = Vec::new();
        for geometry in kml::quick_collection(kml)? {
            collect_polygons(geometry, &mut polygons);
        }
        Self::from_polygons(polygons)
    }

    pub fn from_geojson(raw: &str) -> Result<Self> {
        let values = match raw.parse::<GeoJson>()? {
            GeoJson::FeatureCollection(x) => x
                .features
                .into_iter()
                .flat_map(|x| x.geometry)
                .map(|x| x.value)
                .collect(),
            GeoJson::Feature(x) => x.geometry.into_iter().map(|x| x.value).collect(),
            GeoJson::Geometry(x) => vec![x.value],
        };

        let mut polygons = Vec::new();
        for value in values {
            collect_polygons(Geometry::try_from(value)?, &mut polygons);
        }
        Self::from_polygons(polygons)
    }

    fn from_polygons(polygons: Vec<Polygon>) -> Result<Self> {
        if polygons.is_empty() {
            bail!("boundary has no polygons");
        }
        Ok(Self::new(polygons))
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Whether any located address of `eatery` is not outside any of the
    /// polygons. Locations without a coordinate never count.
    pub fn contains_eatery(&self, eatery: &Eatery) -> bool {
        eatery.coordinates().any(|coordinate| {
            self.polygons
                .iter()
                .any(|polygon| classify(polygon, coordinate) != Placement::Outside)
        })
    }

    /// Keeps the eateries [`contains_eatery`](Self::contains_eatery) accepts,
    /// in their original order.
    pub fn filter(&self, eateries: Vec<Eatery>) -> Vec<Eatery> {
        eateries
            .into_par_iter()
            .filter(|x| self.contains_eatery(x))
            .collect()
    }
}

fn collect_polygons(geometry: Geometry, output: &mut Vec<Polygon>) {
    match geometry {
        Geometry::Polygon(x) => output.push(x),
        Geometry::MultiPolygon(x) => output.extend(x.0),
        Geometry::GeometryCollection(x) => {
            for geometry in x.0 {
                collect_polygons(geometry, output);
            }
        }
        _ => {}
    }
}
