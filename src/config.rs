use crate::error::SyncError;
use crate::Result;

use std::env;
use tokio::time::Duration;

const TMDB_API_URL: &str = "https://api.themoviedb.org/3";
const TMDB_IMAGE_URL: &str = "https://image.tmdb.org/t/p/w500";
const NOTION_API_URL: &str = "https://api.notion.com/v1";

// Notion allows roughly three requests per second on average.
const DEFAULT_CREATE_DELAY_MS: u64 = 350;

#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub api_key: String,
    pub url: String,
    pub image_url: String,
}

#[derive(Debug, Clone)]
pub struct NotionConfig {
    pub token: String,
    pub database_id: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub create_delay: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub feed: FeedConfig,
    pub tmdb: Option<TmdbConfig>,
    pub notion: NotionConfig,
    pub sync: SyncConfig,
}

fn required(name: &'static str) -> Result<String> {
    env::var(name).map_err(|_| SyncError::MissingEnv(name))
}

impl Config {
    pub fn from_env() -> Result<Config> {
        Ok(Config {
            feed: FeedConfig {
                url: required("LETTERBOXD_RSS_URL")?,
            },
            tmdb: env::var("TMDB_API_KEY")
                .ok()
                .filter(|key| !key.is_empty())
                .map(|api_key| TmdbConfig {
                    api_key,
                    url: TMDB_API_URL.to_owned(),
                    image_url: TMDB_IMAGE_URL.to_owned(),
                }),
            notion: NotionConfig {
                token: required("NOTION_TOKEN")?,
                database_id: required("NOTION_DATABASE_ID")?,
                url: NOTION_API_URL.to_owned(),
            },
            sync: SyncConfig {
                create_delay: Duration::from_millis(DEFAULT_CREATE_DELAY_MS),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn set_required_vars() {
        env::set_var("LETTERBOXD_RSS_URL", "https://letterboxd.com/user/rss/");
        env::set_var("NOTION_TOKEN", "secret_token");
        env::set_var("NOTION_DATABASE_ID", "db_id");
    }

    #[test]
    #[serial]
    fn test_from_env() {
        set_required_vars();
        env::set_var("TMDB_API_KEY", "tmdb_key");

        let config = Config::from_env().unwrap();
        assert_eq!(config.feed.url, "https://letterboxd.com/user/rss/");
        assert_eq!(config.notion.token, "secret_token");
        assert_eq!(config.notion.database_id, "db_id");
        assert_eq!(config.notion.url, NOTION_API_URL);

        let tmdb = config.tmdb.unwrap();
        assert_eq!(tmdb.api_key, "tmdb_key");
        assert_eq!(tmdb.url, TMDB_API_URL);
        assert_eq!(tmdb.image_url, TMDB_IMAGE_URL);
    }

    #[test]
    #[serial]
    fn test_from_env_without_tmdb_key() {
        set_required_vars();
        env::remove_var("TMDB_API_KEY");

        let config = Config::from_env().unwrap();
        assert!(config.tmdb.is_none());
    }

    #[test]
    #[serial]
    fn test_from_env_empty_tmdb_key() {
        set_required_vars();
        env::set_var("TMDB_API_KEY", "");

        let config = Config::from_env().unwrap();
        assert!(config.tmdb.is_none());
    }

    #[test]
    #[serial]
    fn test_from_env_missing_required() {
        set_required_vars();
        env::remove_var("NOTION_TOKEN");

        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, SyncError::MissingEnv("NOTION_TOKEN")));
    }
}
