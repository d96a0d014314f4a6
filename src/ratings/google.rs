use ureq::Agent;

use super::{SecondaryInfo, SecondaryRatings};
use crate::{error::LookupError, form};

// markup drifts, newest first
const RATING_ANCHORS: [&str; 2] = [
    r#"class="Aq14fc" aria-hidden="true">"#,
    r#"class="rtng" aria-hidden="true">"#,
];
const REVIEWS_ANCHORS: [&str; 2] = [" Google reviews</span>", " Google review</span>"];

pub struct GoogleSearch {
    agent: Agent,
    url: String,
    user_agent: String,
}

impl GoogleSearch {
    pub fn new(agent: Agent, url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            agent,
            url: url.into(),
            user_agent: user_agent.into(),
        }
    }
}

impl SecondaryRatings for GoogleSearch {
    fn fetch(&self, name: &str, campus_area: &str) -> Result<SecondaryInfo, LookupError> {
        let q = form::query_component(&format!("{name} {campus_area}, IL"));
        let url = format!("{}?q={q}&oq={q}", self.url);
        log::debug!("Searching {url}");
        let html = self
            .agent
            .get(&url)
            .set("User-Agent", &self.user_agent)
            .call()?
            .into_string()?;
        parse_page(&html)
    }
}

pub fn campus_area(address: &str) -> &'static str {
    if address.contains("Champaign") {
        "Champaign"
    } else if address.contains("Urbana") {
        "Urbana"
    } else {
        "Savoy"
    }
}

fn parse_page(html: &str) -> Result<SecondaryInfo, LookupError> {
    Ok(SecondaryInfo {
        rating: parse_rating(html)?,
        reviews: parse_reviews(html)?,
    })
}

/// The number leading the three characters after the rating anchor, so both
/// `4.5` and `5</` parse.
fn parse_rating(html: &str) -> Result<f64, LookupError> {
    let start = RATING_ANCHORS
        .iter()
        .find_map(|anchor| html.find(anchor).map(|i| i + anchor.len()))
        .ok_or_else(|| LookupError::parse("rating", "anchor not found"))?;
    let raw: String = html[start..].chars().take(3).collect();
    let trimmed = raw.trim_start();
    let end = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    trimmed[..end]
        .parse()
        .map_err(|_| LookupError::parse("rating", format!("{raw:?} is not a number")))
}

/// The number just before the review anchor, within the previous 20 bytes.
fn parse_reviews(html: &str) -> Result<u32, LookupError> {
    let end = REVIEWS_ANCHORS
        .iter()
        .find_map(|anchor| html.find(anchor))
        .ok_or_else(|| LookupError::parse("review count", "anchor not found"))?;
    let mut start = end.saturating_sub(20);
    while !html.is_char_boundary(start) {
        start += 1;
    }
    let window = &html[start..end];
    let raw = window.rsplit('>').next().unwrap_or(window);
    raw.replace(',', "")
        .trim()
        .parse()
        .map_err(|_| LookupError::parse("review count", format!("{raw:?} is not a number")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rating_and_reviews() {
        let html = r##"<div><span class="rtng" aria-hidden="true">4.6</span><div class="stars"></div><span><a href="#lrd">1,204 Google reviews</span></a></div>"##;
        assert_eq!(
            parse_page(html).unwrap(),
            SecondaryInfo {
                rating: 4.6,
                reviews: 1204,
            }
        );
    }

    #[test]
    fn newer_markup_and_single_review() {
        let html = r#"<span class="Aq14fc" aria-hidden="true">5.0</span> ... <span>1 Google review</span>"#;
        let info = parse_page(html).unwrap();
        assert_eq!(info.rating, 5.0);
        assert_eq!(info.reviews, 1);
    }

    #[test]
    fn rating_takes_leading_number() {
        let rating =
            |x: &str| parse_rating(&format!(r#"<span class="rtng" aria-hidden="true">{x}"#));
        assert_eq!(rating("5</span>").unwrap(), 5.0);
        assert_eq!(rating("4.5</span>").unwrap(), 4.5);
        assert_eq!(rating(" 4.2").unwrap(), 4.2);
        assert!(rating("</span>").is_err());
        assert!(rating("n/a").is_err());
    }

    #[test]
    fn missing_markup_is_parse_failure() {
        for html in [
            "",
            "<html>no results</html>",
            r#"<span class="rtng" aria-hidden="true">4.6</span>"#,
            r#"<span class="rtng" aria-hidden="true">new</span><span>12 Google reviews</span>"#,
            r#"<span class="rtng" aria-hidden="true">4.6</span><span>many Google reviews</span>"#,
        ] {
            assert!(
                matches!(parse_page(html), Err(LookupError::ParseFailure { .. })),
                "{html:?}"
            );
        }
    }

    #[test]
    fn never_splits_characters() {
        let html = "<span class=\"rtng\" aria-hidden=\"true\">4é</span>ééééééééééééééé>7 Google reviews</span>";
        assert_eq!(parse_rating(html).unwrap(), 4.0);
        assert_eq!(parse_reviews(html).unwrap(), 7);

        let html = "ééééééééééééééééééé Google reviews</span>";
        assert!(parse_reviews(html).is_err());
    }

    #[test]
    fn campus_area_from_address() {
        assert_eq!(campus_area("505 E Green St, Champaign, IL 61820, USA"), "Champaign");
        assert_eq!(campus_area("1401 W Green St, Urbana, IL 61801, USA"), "Urbana");
        assert_eq!(campus_area("102 N Dunlap Ave, Savoy, IL 61874, USA"), "Savoy");
        assert_eq!(campus_area(""), "Savoy");
    }
}
