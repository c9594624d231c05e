use crate::config::TmdbConfig;
use crate::transform::{EnrichedEntry, NormalizedEntry};
use crate::Result;

use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<MovieMatch>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MovieMatch {
    id: u64,
    title: String,
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreditsResponse {
    crew: Vec<CrewMember>,
}

#[derive(Debug, Deserialize)]
struct CrewMember {
    name: String,
    job: String,
}

fn find_director(crew: &[CrewMember]) -> Option<String> {
    crew.iter()
        .find(|member| member.job == "Director")
        .map(|member| member.name.clone())
}

#[derive(Debug, Clone)]
pub struct TmdbApi<'a> {
    config: &'a TmdbConfig,
}

impl TmdbApi<'_> {
    pub fn new(config: &TmdbConfig) -> TmdbApi {
        TmdbApi { config }
    }

    async fn search_movie(&self, title: &str, year: Option<&str>) -> Result<Option<MovieMatch>> {
        let client = reqwest::Client::new();
        let mut request = client
            .get(format!("{}/search/movie", self.config.url))
            .query(&[
                ("api_key", self.config.api_key.as_str()),
                ("query", title),
            ]);

        if let Some(year) = year {
            request = request.query(&[("year", year)]);
        }

        let results = request
            .send()
            .await?
            .error_for_status()?
            .json::<SearchResponse>()
            .await?;

        Ok(results.results.into_iter().next())
    }

    async fn fetch_director(&self, movie_id: u64) -> Result<Option<String>> {
        let client = reqwest::Client::new();
        let credits = client
            .get(format!("{}/movie/{}/credits", self.config.url, movie_id))
            .query(&[("api_key", self.config.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json::<CreditsResponse>()
            .await?;

        Ok(find_director(&credits.crew))
    }

    fn poster_url(&self, path: &str) -> String {
        format!("{}{}", self.config.image_url, path)
    }

    /// Resolves the entry against TMDB. Lookup failures are absorbed: the
    /// entry comes back with whatever could be resolved, never an error.
    pub async fn enrich(&self, entry: NormalizedEntry) -> EnrichedEntry {
        let mut enriched = EnrichedEntry::from(entry);

        let matched = match self
            .search_movie(&enriched.title, enriched.year.as_deref())
            .await
        {
            Ok(Some(matched)) => matched,
            Ok(None) => {
                debug!("No TMDB match for {}.", enriched.title);
                return enriched;
            }
            Err(err) => {
                warn!("Could not search TMDB for {}: {}.", enriched.title, err);
                return enriched;
            }
        };

        match self.fetch_director(matched.id).await {
            Ok(director) => enriched.director = director,
            Err(err) => warn!("Could not fetch credits for {}: {}.", matched.title, err),
        }

        if let Some(path) = &matched.poster_path {
            enriched.poster = Some(self.poster_url(path));
        }

        enriched
    }
}
