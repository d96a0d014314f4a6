use std::{fs::File, path::Path};

use _model::{Coordinate, Eatery};
use anyhow::{Context, Result};
use indicatif::ProgressIterator;

use crate::{
    chains::{self, FastFoodNames},
    config::Paths,
    directory::{self, DirectorySource},
    export,
    geocoder::{locate, Geocoder},
    geofence::CampusBoundary,
    ratings::{campus_area, Field, PrimaryRatings, SecondaryRatings},
    utils::{checkpoint, progress_style, read_json, write_json},
};

pub fn scrape(
    source: &impl DirectorySource,
    geocoder: &impl Geocoder,
    start: usize,
    max_count: usize,
    paths: &Paths,
) -> Result<Vec<Eatery>> {
    let eateries = directory::scrape(source, geocoder, start, max_count, &paths.raw_html())?;
    write_json(&paths.eateries(), &eateries)?;
    log::info!("Scraped {} eateries", eateries.len());
    Ok(eateries)
}

/// Tries again to geocode every location that has no coordinate yet.
/// Returns how many were resolved.
pub fn regeocode(geocoder: &impl Geocoder, input: &Path, output: &Path) -> Result<usize> {
    let mut eateries: Vec<Eatery> = read_json(input)?;
    let missing = eateries
        .iter()
        .flat_map(|x| &x.locations)
        .filter(|x| x.coordinate.is_none())
        .count();
    log::info!("Re-geocoding {missing} locations...");

    let mut resolved = 0;
    let locations = eateries
        .iter_mut()
        .flat_map(|x| x.locations.iter_mut())
        .filter(|x| x.coordinate.is_none());
    for location in locations.progress_count(missing as u64).with_style(progress_style()) {
        let found = locate(geocoder, &location.address);
        if found.coordinate.is_some() {
            *location = found;
            resolved += 1;
        }
    }

    write_json(output, &eateries)?;
    log::info!("Resolved {resolved} of {missing} locations");
    Ok(resolved)
}

pub fn in_bounds(boundary: &CampusBoundary, input: &Path, output: &Path) -> Result<Vec<Eatery>> {
    let eateries: Vec<Eatery> = read_json(input)?;
    let total = eateries.len();
    let kept = boundary.filter(eateries);
    write_json(output, &kept)?;
    log::info!("{} of {total} eateries are in bounds", kept.len());
    Ok(kept)
}

pub fn fast_food_names(csv: &Path, output: &Path) -> Result<FastFoodNames> {
    let file = File::open(csv).with_context(|| format!("failed to open {}", csv.display()))?;
    let names = FastFoodNames::from_csv(file)?;
    write_json(output, &names)?;
    log::info!("Saved {} fast food names", names.len());
    Ok(names)
}

pub fn chain_candidates(input: &Path, output: &Path) -> Result<Vec<String>> {
    let eateries: Vec<Eatery> = read_json(input)?;
    let candidates = chains::chain_candidates(&eateries);
    write_json(output, &candidates)?;
    log::info!("{} chain candidates", candidates.len());
    Ok(candidates)
}

pub fn filter_chains(names: &FastFoodNames, input: &Path, output: &Path) -> Result<Vec<Eatery>> {
    let eateries: Vec<Eatery> = read_json(input)?;
    let total = eateries.len();
    let kept: Vec<_> = eateries
        .into_iter()
        .filter(|x| {
            let chain = names.is_chain(&x.name);
            if chain {
                log::debug!("Dropping chain {}", x.name);
            }
            !chain
        })
        .collect();
    write_json(output, &kept)?;
    log::info!("Dropped {} chains, {} left", total - kept.len(), kept.len());
    Ok(kept)
}

/// Adds price and rating from the primary provider. Eateries it cannot
/// find are left out of the output.
pub fn enrich(
    primary: &impl PrimaryRatings,
    near: Coordinate,
    input: &Path,
    output: &Path,
) -> Result<Vec<Eatery>> {
    let eateries: Vec<Eatery> = read_json(input)?;
    let total = eateries.len();
    log::info!("Looking up {total} eateries...");

    let mut kept = Vec::new();
    for mut eatery in eateries.into_iter().progress_with_style(progress_style()) {
        match primary.fetch(&eatery.name, near, &[Field::Price, Field::Rating]) {
            Ok(info) => {
                eatery.price = info.price;
                eatery.rating = info.rating;
                kept.push(eatery);
            }
            Err(e) if e.is_not_found() => log::info!("No ratings for {}", eatery.name),
            Err(e) => log::warn!("Ratings lookup for {} failed: {e}", eatery.name),
        }
    }

    write_json(output, &kept)?;
    log::info!("Enriched {} of {total} eateries", kept.len());
    Ok(kept)
}

/// Overwrites rating and review count from the secondary provider, clearing
/// both when it has nothing usable.
pub fn reviews(
    secondary: &impl SecondaryRatings,
    input: &Path,
    output: &Path,
) -> Result<Vec<Eatery>> {
    let mut eateries: Vec<Eatery> = read_json(input)?;
    let mut found = 0;
    for eatery in eateries.iter_mut().progress_with_style(progress_style()) {
        let area = campus_area(
            eatery
                .locations
                .first()
                .map(|x| x.address.as_str())
                .unwrap_or_default(),
        );
        match secondary.fetch(&eatery.name, area) {
            Ok(info) => {
                eatery.rating = Some(info.rating);
                eatery.reviews = Some(info.reviews);
                found += 1;
            }
            Err(e) => {
                log::warn!("No reviews for {}: {e}", eatery.name);
                eatery.rating = None;
                eatery.reviews = None;
            }
        }
    }

    write_json(output, &eateries)?;
    log::info!("Found reviews for {found} of {} eateries", eateries.len());
    Ok(eateries)
}

pub fn export_csv(input: &Path, output: &Path) -> Result<usize> {
    let eateries: Vec<Eatery> = read_json(input)?;
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    let count = export::write_csv(&eateries, file)?;
    log::info!("Wrote {count} rows to {}", output.display());
    Ok(count)
}

/// Runs scrape, in-bounds, filter-chains, enrich and export-csv in order.
/// A stage whose checkpoint already exists is skipped unless `fresh` is
/// set or an earlier stage had to run.
pub fn run(
    source: &impl DirectorySource,
    geocoder: &impl Geocoder,
    primary: &impl PrimaryRatings,
    near: Coordinate,
    max_count: usize,
    paths: &Paths,
    fresh: bool,
) -> Result<Vec<Eatery>> {
    let mut fresh = fresh || !paths.eateries().exists();
    checkpoint(&paths.eateries(), fresh, || {
        scrape(source, geocoder, 0, max_count, paths)
    })?;

    fresh |= !paths.in_bounds().exists();
    checkpoint(&paths.in_bounds(), fresh, || {
        let boundary = CampusBoundary::load(&paths.boundary())?;
        in_bounds(&boundary, &paths.eateries(), &paths.in_bounds())
    })?;

    let names = checkpoint(&paths.fast_food_names(), false, || {
        fast_food_names(&paths.fast_food_csv(), &paths.fast_food_names())
    })?;

    fresh |= !paths.filtered().exists();
    checkpoint(&paths.filtered(), fresh, || {
        filter_chains(&names, &paths.in_bounds(), &paths.filtered())
    })?;

    fresh |= !paths.dataset().exists();
    let dataset = checkpoint(&paths.dataset(), fresh, || {
        enrich(primary, near, &paths.filtered(), &paths.dataset())
    })?;

    export_csv(&paths.dataset(), &paths.dataset_csv())?;
    Ok(dataset)
}
