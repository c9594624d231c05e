use crate::options::ExtractOptions;
use crate::Result;

use async_trait::async_trait;

pub mod letterboxd_rss;
pub mod tmdb_api;

pub use letterboxd_rss::LetterboxdRss;
pub use tmdb_api::TmdbApi;

#[async_trait]
pub trait Extract<'a> {
    type Data;

    async fn extract(&self, options: Option<ExtractOptions>) -> Result<Self::Data>;
}
