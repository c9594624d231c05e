use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("could not fetch {url}: status {status}")]
    Fetch { url: String, status: StatusCode },

    #[error("could not parse feed: {0}")]
    Parse(#[from] serde_xml_rs::Error),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned status {status}: {body}")]
    Api {
        service: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("could not build title pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("{0} is not set")]
    MissingEnv(&'static str),
}
