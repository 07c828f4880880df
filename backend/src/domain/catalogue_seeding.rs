//! Startup seeding of the beer catalogue from a remote source.
//!
//! Ids `1..=count` are fetched one at a time with a pause between calls.
//! Beers already present, by id or by business equality, are skipped; the
//! run never aborts on a single failure.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::ports::{BeerRepository, BeerRepositoryError, BeerSource, BeerSourceError};
use super::{Beer, BeerId, Failure, is_same_beer};

/// Async pause between remote fetches.
#[async_trait]
pub trait SeedSleeper: Send + Sync {
    /// Suspend for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Tokio-based sleeper.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl SeedSleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Counters describing one seeding run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub inserted: usize,
    pub skipped: usize,
    pub failed: usize,
}

enum Outcome {
    Inserted,
    Skipped,
}

/// Copies remote beers into the local catalogue.
pub struct CatalogueSeeder<S: ?Sized, B: ?Sized> {
    source: Arc<S>,
    beers: Arc<B>,
    sleeper: Arc<dyn SeedSleeper>,
}

impl<S: ?Sized, B: ?Sized> CatalogueSeeder<S, B> {
    /// Create a seeder that pauses with tokio's timer.
    pub fn new(source: Arc<S>, beers: Arc<B>) -> Self {
        Self::with_sleeper(source, beers, Arc::new(TokioSleeper))
    }

    /// Create a seeder with a custom pause implementation.
    pub fn with_sleeper(source: Arc<S>, beers: Arc<B>, sleeper: Arc<dyn SeedSleeper>) -> Self {
        Self {
            source,
            beers,
            sleeper,
        }
    }
}

impl<S, B> CatalogueSeeder<S, B>
where
    S: BeerSource + ?Sized,
    B: BeerRepository + ?Sized,
{
    /// Fetch and store ids `1..=count`, pausing `interval` between fetches.
    pub async fn seed(&self, count: u64, interval: Duration) -> SeedReport {
        let mut report = SeedReport::default();
        for raw in 1..=count {
            if raw > 1 && !interval.is_zero() {
                self.sleeper.sleep(interval).await;
            }
            let id = BeerId::new(raw);
            match self.seed_one(id).await {
                Ok(Outcome::Inserted) => report.inserted += 1,
                Ok(Outcome::Skipped) => report.skipped += 1,
                Err(SeedError::Source(err)) if err.is_retryable() => {
                    warn!(beer_id = %id, error = %err, "remote catalogue unavailable, skipping beer");
                    report.failed += 1;
                }
                Err(SeedError::Source(err)) => {
                    error!(beer_id = %id, error = %err, "remote beer could not be decoded");
                    report.failed += 1;
                }
                Err(SeedError::Store(err)) => {
                    error!(beer_id = %id, error = %err, "failed to store seeded beer");
                    report.failed += 1;
                }
            }
        }
        info!(
            inserted = report.inserted,
            skipped = report.skipped,
            failed = report.failed,
            "catalogue seeding finished"
        );
        report
    }

    async fn seed_one(&self, id: BeerId) -> Result<Outcome, SeedError> {
        let Some(fetched) = self.source.fetch_beer(id).await? else {
            debug!(beer_id = %id, "remote catalogue has no such beer");
            return Ok(Outcome::Skipped);
        };
        let beer = fetched.without_likes();
        if self.is_known(&beer).await? {
            debug!(beer_id = %beer.id, "beer already catalogued");
            return Ok(Outcome::Skipped);
        }
        match self.beers.insert(&beer).await {
            Ok(()) => Ok(Outcome::Inserted),
            Err(BeerRepositoryError::DuplicateKey { .. }) => Ok(Outcome::Skipped),
            Err(err) => Err(SeedError::Store(err.into())),
        }
    }

    async fn is_known(&self, beer: &Beer) -> Result<bool, SeedError> {
        if self.beers.find_by_id(beer.id).await?.is_some() {
            return Ok(true);
        }
        let Some(name) = beer.name.as_deref() else {
            return Ok(false);
        };
        let same_name = self.beers.find_by_name(name).await?;
        Ok(same_name.iter().any(|stored| is_same_beer(stored, beer)))
    }
}

#[derive(Debug)]
enum SeedError {
    Source(BeerSourceError),
    Store(Failure),
}

impl From<BeerSourceError> for SeedError {
    fn from(err: BeerSourceError) -> Self {
        Self::Source(err)
    }
}

impl From<BeerRepositoryError> for SeedError {
    fn from(err: BeerRepositoryError) -> Self {
        Self::Store(err.into())
    }
}
