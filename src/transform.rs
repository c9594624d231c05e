use crate::sources::letterboxd_rss::DiaryItem;
use crate::Result;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::warn;

/// Canonical fields derived from a raw diary item. Unrated entries keep a
/// `None` rating rather than 0 so they can be told apart downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedEntry {
    pub title: String,
    pub year: Option<String>,
    pub rating: Option<f64>,
    pub poster: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedEntry {
    pub title: String,
    pub year: Option<String>,
    pub rating: Option<f64>,
    pub poster: Option<String>,
    pub director: Option<String>,
}

impl From<NormalizedEntry> for EnrichedEntry {
    fn from(entry: NormalizedEntry) -> EnrichedEntry {
        EnrichedEntry {
            title: entry.title,
            year: entry.year,
            rating: entry.rating,
            poster: entry.poster,
            director: None,
        }
    }
}

pub fn normalize(item: &DiaryItem) -> Result<NormalizedEntry> {
    let (left, stars) = match item.title.split_once(" - ") {
        Some((left, stars)) => (left, Some(stars)),
        None => (item.title.as_str(), None),
    };

    // Greedy, so titles with embedded commas keep them.
    let re = Regex::new(r"^(?P<title>.+), (?P<year>\d{4})$")?;
    let (title, year) = match re.captures(left) {
        Some(caps) => (caps["title"].to_owned(), Some(caps["year"].to_owned())),
        None => (left.to_owned(), None),
    };

    let rating = stars.and_then(parse_stars);
    let poster = item.description.as_deref().and_then(extract_poster);

    Ok(NormalizedEntry {
        title,
        year,
        rating,
        poster,
    })
}

fn parse_stars(stars: &str) -> Option<f64> {
    let mut rating = 0.0;
    let mut glyphs = 0;

    for c in stars.chars() {
        match c {
            '★' => {
                rating += 1.0;
                glyphs += 1;
            }
            '½' => {
                rating += 0.5;
                glyphs += 1;
            }
            _ => {}
        }
    }

    if glyphs == 0 {
        None
    } else {
        Some(rating)
    }
}

fn extract_poster(description: &str) -> Option<String> {
    let fragment = Html::parse_fragment(description);

    let img = match Selector::parse("img") {
        Ok(img) => img,
        Err(err) => {
            warn!("Could not parse selector: {}.", err);
            return None;
        }
    };

    fragment
        .select(&img)
        .next()
        .and_then(|element| element.value().attr("src"))
        .map(ToOwned::to_owned)
}
