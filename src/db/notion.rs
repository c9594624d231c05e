use crate::config::NotionConfig;
use crate::error::SyncError;
use crate::sources::letterboxd_rss::WatchedDate;
use crate::Result;

use serde::Deserialize;
use serde_json::{json, Map, Value};

const NOTION_VERSION: &str = "2022-06-28";

const LINK_PROPERTY: &str = "Link";

/// The page written into the Notion database. Optional fields are omitted
/// from the payload entirely so absent values never clobber database
/// defaults; the director column alone is written as empty text when
/// unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchRecord {
    pub title: String,
    pub director: Option<String>,
    pub watched_date: Option<WatchedDate>,
    pub rating: Option<f64>,
    pub poster: Option<String>,
    pub url: String,
}

fn rich_text(content: &str) -> Value {
    json!([{ "text": { "content": content } }])
}

fn build_properties(record: &WatchRecord) -> Map<String, Value> {
    let mut properties = Map::new();

    properties.insert(
        "Name".to_owned(),
        json!({ "title": [{ "text": { "content": record.title } }] }),
    );
    properties.insert(
        "Director".to_owned(),
        json!({ "rich_text": rich_text(record.director.as_deref().unwrap_or_default()) }),
    );

    if let Some(watched) = &record.watched_date {
        properties.insert(
            "Watched".to_owned(),
            json!({ "date": { "start": watched.to_string() } }),
        );
    }

    if let Some(rating) = record.rating {
        properties.insert("Rating".to_owned(), json!({ "number": rating }));
    }

    if let Some(poster) = &record.poster {
        properties.insert(
            "Poster".to_owned(),
            json!({
                "files": [{
                    "name": record.title,
                    "type": "external",
                    "external": { "url": poster }
                }]
            }),
        );
    }

    properties.insert("Status".to_owned(), json!({ "select": { "name": "watched" } }));
    properties.insert("Type".to_owned(), json!({ "select": { "name": "movie" } }));
    properties.insert("Format".to_owned(), json!({ "select": { "name": "movie" } }));
    properties.insert(
        "Notes".to_owned(),
        json!({ "rich_text": rich_text("certified cinephile") }),
    );
    properties.insert(LINK_PROPERTY.to_owned(), json!({ "url": record.url }));

    properties
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    results: Vec<Value>,
}

#[derive(Debug)]
pub struct Notion<'a> {
    pub client: reqwest::Client,
    pub config: &'a NotionConfig,
}

impl Notion<'_> {
    pub fn new(config: &NotionConfig) -> Notion {
        Notion {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn api_error(service: &'static str, response: reqwest::Response) -> SyncError {
        SyncError::Api {
            service,
            status: response.status(),
            body: response.text().await.unwrap_or_default(),
        }
    }

    /// Checks whether a page keyed by this link already exists.
    pub async fn contains(&self, url: &str) -> Result<bool> {
        let body = json!({
            "filter": { "property": LINK_PROPERTY, "url": { "equals": url } },
            "page_size": 1,
        });

        let response = self
            .client
            .post(format!(
                "{}/databases/{}/query",
                self.config.url, self.config.database_id
            ))
            .bearer_auth(&self.config.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error("notion", response).await);
        }

        let results = response.json::<QueryResponse>().await?;

        Ok(!results.results.is_empty())
    }

    pub async fn create_entry(&self, record: &WatchRecord) -> Result<()> {
        let body = json!({
            "parent": { "database_id": self.config.database_id },
            "properties": build_properties(record),
        });

        let response = self
            .client
            .post(format!("{}/pages", self.config.url))
            .bearer_auth(&self.config.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error("notion", response).await);
        }

        Ok(())
    }
}
