pub mod config;
pub mod db;
pub mod error;
pub mod options;
pub mod sources;
pub mod transform;

pub use config::Config;
pub use error::SyncError;

use db::{Notion, WatchRecord};
use options::RunOptions;
use sources::{Extract, LetterboxdRss, TmdbApi};
use transform::EnrichedEntry;

use tokio::time::sleep;
use tracing::{debug, info};

pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SyncSummary {
    pub total: usize,
    pub created: usize,
    pub skipped: usize,
}

pub struct Syncer {
    config: Config,
}

impl Syncer {
    pub fn new(config: Config) -> Syncer {
        Syncer { config }
    }

    /// Runs one full pass over the diary feed. Items are processed strictly
    /// in feed order, one network call in flight at a time, so an item's
    /// write always lands before the next item's dedup query.
    pub async fn run(&self, options: Option<RunOptions>) -> Result<SyncSummary> {
        let (dry_run, extract_options) = match options {
            Some(options) => (options.dry_run.unwrap_or(false), options.extract_options),
            None => (false, None),
        };

        let feed = LetterboxdRss::new(&self.config.feed);
        let tmdb = self.config.tmdb.as_ref().map(TmdbApi::new);
        let notion = Notion::new(&self.config.notion);

        let items = feed.extract(extract_options).await?;
        info!("Fetched {} diary entries.", items.len());

        let mut summary = SyncSummary {
            total: items.len(),
            ..SyncSummary::default()
        };

        for item in items {
            let entry = transform::normalize(&item)?;

            if notion.contains(&item.link).await? {
                debug!("Skipping {}, already recorded.", item.link);
                summary.skipped += 1;
                continue;
            }

            let entry = match &tmdb {
                Some(tmdb) => tmdb.enrich(entry).await,
                None => EnrichedEntry::from(entry),
            };

            let record = WatchRecord {
                title: entry.title,
                director: entry.director,
                watched_date: item.watched_date,
                rating: entry.rating,
                poster: entry.poster,
                url: item.link,
            };

            if dry_run {
                info!("Would create entry for {} ({}).", record.title, record.url);
                summary.created += 1;
                continue;
            }

            notion.create_entry(&record).await?;
            info!("Created entry for {}.", record.title);
            summary.created += 1;

            // Pace creates to stay under the destination's request-rate ceiling.
            sleep(self.config.sync.create_delay).await;
        }

        Ok(summary)
    }
}
