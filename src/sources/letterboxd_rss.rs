use crate::config::FeedConfig;
use crate::error::SyncError;
use crate::options::ExtractOptions;
use crate::sources::Extract;
use crate::Result;

use async_trait::async_trait;
use serde::{de::Visitor, Deserialize, Deserializer};
use serde_xml_rs::from_str;
use std::fmt;
use time::{format_description::FormatItem, macros::format_description, Date};
use tracing::debug;

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchedDate(pub Date);

impl fmt::Display for WatchedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }
}

struct WatchedDateVisitor;

impl<'de> Visitor<'de> for WatchedDateVisitor {
    type Value = WatchedDate;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a date in year-month-day format")
    }

    fn visit_string<E>(self, v: String) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Date::parse(&v, DATE_FORMAT)
            .map(WatchedDate)
            .map_err(serde::de::Error::custom)
    }

    fn visit_str<E>(self, v: &str) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Date::parse(v, DATE_FORMAT)
            .map(WatchedDate)
            .map_err(serde::de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for WatchedDate {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_string(WatchedDateVisitor)
    }
}

#[derive(Debug, Deserialize, Clone)]
struct RssItem {
    title: String,
    #[serde(default)]
    link: Option<String>,
    #[serde(default, rename = "watchedDate")]
    watched_date: Option<WatchedDate>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
struct Channel {
    #[serde(default, rename = "item")]
    rss_items: Vec<RssItem>,
}

#[derive(Debug, Deserialize, Clone)]
struct Rss {
    channel: Channel,
}

/// One logged watch from the diary feed. The link doubles as the dedup key,
/// so items without one never make it out of the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct DiaryItem {
    pub title: String,
    pub link: String,
    pub watched_date: Option<WatchedDate>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LetterboxdRss<'a> {
    config: &'a FeedConfig,
}

impl LetterboxdRss<'_> {
    pub fn new(config: &FeedConfig) -> LetterboxdRss {
        LetterboxdRss { config }
    }

    fn parse(xml: &str) -> Result<Vec<DiaryItem>> {
        let rss: Rss = from_str(xml)?;

        let mut items = Vec::new();
        for item in rss.channel.rss_items {
            let link = match item.link {
                Some(link) => link,
                None => {
                    debug!("Skipping feed item without a link: {}.", item.title);
                    continue;
                }
            };

            items.push(DiaryItem {
                title: item.title,
                link,
                watched_date: item.watched_date,
                description: item.description,
            });
        }

        Ok(items)
    }

    pub async fn fetch(&self) -> Result<Vec<DiaryItem>> {
        let client = reqwest::Client::new();
        let response = client.get(self.config.url.as_str()).send().await?;

        if !response.status().is_success() {
            return Err(SyncError::Fetch {
                url: self.config.url.clone(),
                status: response.status(),
            });
        }

        let xml = response.text().await?;

        Self::parse(&xml)
    }
}

#[async_trait]
impl Extract<'_> for LetterboxdRss<'_> {
    type Data = Vec<DiaryItem>;

    async fn extract(&self, options: Option<ExtractOptions>) -> Result<Self::Data> {
        let mut items = self.fetch().await?;

        if let Some(limit) = options.and_then(|options| options.limit) {
            items.truncate(limit);
        }

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss xmlns:letterboxd="https://letterboxd.com" version="2.0">
  <channel>
    <title>Letterboxd - cinephile</title>
    <item>
      <title>Stand by Me, 1986 - &#9733;&#9733;&#9733;&#9733;</title>
      <link>https://letterboxd.com/cinephile/film/stand-by-me/</link>
      <letterboxd:watchedDate>2023-11-04</letterboxd:watchedDate>
      <description>&lt;p&gt;&lt;img src="https://a.ltrbxd.com/resized/stand-by-me.jpg"/&gt;&lt;/p&gt;</description>
    </item>
    <item>
      <title>Ran, 1985 - &#9733;&#9733;&#9733;&#9733;&#189;</title>
      <link>https://letterboxd.com/cinephile/film/ran/</link>
    </item>
    <item>
      <title>Orphan entry</title>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse() {
        let items = LetterboxdRss::parse(FEED).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Stand by Me, 1986 - ★★★★");
        assert_eq!(
            items[0].link,
            "https://letterboxd.com/cinephile/film/stand-by-me/"
        );
        assert_eq!(items[0].watched_date, Some(WatchedDate(date!(2023 - 11 - 04))));
        assert_eq!(
            items[0].description.as_deref(),
            Some(r#"<p><img src="https://a.ltrbxd.com/resized/stand-by-me.jpg"/></p>"#)
        );

        assert_eq!(items[1].title, "Ran, 1985 - ★★★★½");
        assert_eq!(items[1].watched_date, None);
        assert_eq!(items[1].description, None);
    }

    #[test]
    fn test_parse_drops_items_without_link() {
        let items = LetterboxdRss::parse(FEED).unwrap();
        assert!(items.iter().all(|item| item.title != "Orphan entry"));
    }

    #[test]
    fn test_parse_malformed_feed() {
        let err = LetterboxdRss::parse("<rss><channel>").unwrap_err();
        assert!(matches!(err, SyncError::Parse(_)));
    }

    #[test]
    fn test_watched_date_display() {
        let watched = WatchedDate(date!(1986 - 08 - 08));
        assert_eq!(watched.to_string(), "1986-08-08");
    }

    #[tokio::test]
    async fn test_extract() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
            .mount(&server)
            .await;

        let config = FeedConfig { url: server.uri() };
        let rss = LetterboxdRss::new(&config);

        let items = rss.extract(None).await.unwrap();
        assert_eq!(items.len(), 2);

        let options = ExtractOptions { limit: Some(1) };
        let items = rss.extract(Some(options)).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Stand by Me, 1986 - ★★★★");
    }

    #[tokio::test]
    async fn test_extract_fetch_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let config = FeedConfig { url: server.uri() };
        let rss = LetterboxdRss::new(&config);

        let err = rss.extract(None).await.unwrap_err();
        assert!(matches!(err, SyncError::Fetch { .. }));
    }
}
