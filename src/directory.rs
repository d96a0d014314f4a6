use std::path::Path;

use _model::{Eateries, Eatery};
use anyhow::{Context, Result};
use indicatif::ProgressIterator;
use itertools::Itertools;
use scraper::{ElementRef, Html, Selector};
use ureq::Agent;

use crate::{
    config::DirectoryConfig,
    error::LookupError,
    form,
    geocoder::{locate, Geocoder},
    utils::{progress_style, write_file},
};

/// A paginated source of listing HTML.
pub trait DirectorySource {
    fn per_page(&self) -> usize;

    /// Fetches page `page`, counting from 1.
    fn fetch_page(&self, page: usize) -> Result<String, LookupError>;
}

pub struct VisitChampaign {
    agent: Agent,
    config: DirectoryConfig,
}

impl VisitChampaign {
    pub fn new(agent: Agent, config: DirectoryConfig) -> Self {
        Self { agent, config }
    }
}

impl DirectorySource for VisitChampaign {
    fn per_page(&self) -> usize {
        self.config.per_page
    }

    fn fetch_page(&self, page: usize) -> Result<String, LookupError> {
        let body = request_body(&self.config, page);
        log::debug!("Fetching listings page {page} from {}", self.config.url);

        Ok(self
            .agent
            .post(&self.config.url)
            .set("Content-Type", "application/x-www-form-urlencoded")
            .send_string(&body)?
            .into_string()?)
    }
}

fn request_body(config: &DirectoryConfig, page: usize) -> String {
    let per_page = config.per_page.to_string();
    let page_number = page.to_string();
    let mut fields = vec![
        ("catid", config.category.as_str()),
        ("perpage", per_page.as_str()),
        ("display", config.display.as_str()),
    ];
    // the first page is the plain listing request
    if page > 1 {
        fields.push(("page", page_number.as_str()));
    }
    form::encode(&fields)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Listing {
    pub name: String,
    pub address: String,
}

pub fn parse_listings(html: &str) -> Vec<Listing> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(".event-detail-box").expect("hardcoded");

    document
        .select(&selector)
        .map(|block| {
            // <div class="event-detail-box"> <h3><a>NAME</a></h3> STREET <br> CITY </div>
            let name = block
                .children()
                .find_map(ElementRef::wrap)
                .map(|x| x.text().collect::<String>().trim().to_string())
                .unwrap_or_default();
            let address = block
                .children()
                .filter_map(|x| x.value().as_text())
                .map(|x| x.trim())
                .filter(|x| !x.is_empty())
                .take(2)
                .join(" ");
            Listing { name, address }
        })
        .collect()
}

/// Fetches pages until the directory runs out, repeats the previous page, or
/// `max_count` blocks are in hand. Every new page is written to `raw_html`.
fn fetch_listings(
    source: &impl DirectorySource,
    max_count: usize,
    raw_html: &Path,
) -> Result<Vec<Listing>> {
    let per_page = source.per_page().max(1);
    let mut pages = Vec::new();
    let mut listings = Vec::new();
    let mut previous = Vec::new();

    for page in 1.. {
        let html = source
            .fetch_page(page)
            .with_context(|| format!("failed to fetch directory page {page}"))?;
        let found = parse_listings(&html);
        if page > 1 && found == previous {
            log::warn!("Directory page {page} repeats page {}, stopping", page - 1);
            break;
        }
        log::info!("Directory page {page}: {} listings", found.len());
        pages.push(html);

        let done = found.len() < per_page;
        listings.extend(found.iter().cloned());
        if done || listings.len() >= max_count {
            break;
        }
        previous = found;
    }

    write_file(raw_html, pages.join("\n"))?;
    Ok(listings)
}

/// Scrapes listings `[start, min(max_count, total))`, geocoding each address
/// in turn and merging locations that share an eatery name.
pub fn scrape(
    source: &impl DirectorySource,
    geocoder: &impl Geocoder,
    start: usize,
    max_count: usize,
    raw_html: &Path,
) -> Result<Vec<Eatery>> {
    let listings = fetch_listings(source, max_count, raw_html)?;
    let end = max_count.min(listings.len());
    let selected = listings.get(start..end).unwrap_or_default();
    log::info!(
        "Geocoding {} of {} listings...",
        selected.len(),
        listings.len()
    );

    let mut eateries = Eateries::new();
    for listing in selected.iter().progress_with_style(progress_style()) {
        if listing.name.is_empty() {
            log::warn!("Skipping listing without a name at {:?}", listing.address);
            continue;
        }
        eateries.push(&listing.name, locate(geocoder, &listing.address));
    }

    Ok(eateries.into_vec())
}
