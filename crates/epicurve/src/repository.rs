//! Pulled feeds and the series loaded from them.
//!
//! A [`SeriesRepository`] owns one [`TimeSeriesTable`] per configured metric
//! and the [`LoadedSeries`] the caller asked for. Loaded entries are copies:
//! [`SeriesRepository::refresh`] replaces the tables but leaves every loaded
//! entry as it was until it is loaded again.

use crate::entity::Entity;
use crate::error::{RepositoryError, Result};
use crate::metric::{Metric, MetricFeed, RepositoryConfig};
use chrono::NaiveDate;
use epicurve_data::{SeriesSource, TimeSeriesTable};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// One metric of a loaded entity on the shared date axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSeries {
    /// Date axis of the feed at load time
    pub dates: Vec<NaiveDate>,
    /// Cumulative counts, one per date
    pub values: Vec<i64>,
}

impl MetricSeries {
    /// Latest count.
    pub fn last_value(&self) -> Option<i64> {
        self.values.last().copied()
    }
}

/// A loaded country or locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSeries {
    /// Display key
    pub key: String,
    /// Entity the series was loaded for
    pub entity: Entity,
    /// Series per configured metric
    pub metrics: BTreeMap<Metric, MetricSeries>,
}

impl LoadedSeries {
    /// Series for one metric.
    pub fn metric(&self, metric: Metric) -> Option<&MetricSeries> {
        self.metrics.get(&metric)
    }
}

/// Last date covered by a feed before and after a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshReport {
    /// Metric refreshed
    pub metric: Metric,
    /// Last date before the refresh
    pub before: Option<NaiveDate>,
    /// Last date after the refresh
    pub after: Option<NaiveDate>,
}

impl RefreshReport {
    /// Whether the feed gained dates.
    pub fn advanced(&self) -> bool {
        self.after > self.before
    }
}

/// Feeds for a set of metrics and the entities loaded from them.
#[derive(Debug)]
pub struct SeriesRepository<S: SeriesSource> {
    source: S,
    config: RepositoryConfig,
    tables: BTreeMap<Metric, TimeSeriesTable>,
    loaded: Vec<LoadedSeries>,
}

impl<S: SeriesSource> SeriesRepository<S> {
    /// Pull every configured feed.
    ///
    /// # Errors
    /// - [`RepositoryError::Data`] if a feed cannot be pulled or parsed
    /// - [`RepositoryError::SchemaMismatch`] if feeds disagree on the date axis
    pub fn connect(source: S, config: RepositoryConfig) -> Result<Self> {
        let tables = pull_all(&source, &config)?;
        Ok(Self {
            source,
            config,
            tables,
            loaded: Vec::new(),
        })
    }

    /// Source the feeds are pulled from.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Configuration the repository was built with.
    pub const fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Configured metrics, in feed order.
    pub fn metrics(&self) -> Vec<Metric> {
        self.config.metrics()
    }

    /// Pulled table for a metric.
    ///
    /// # Errors
    /// Returns [`RepositoryError::MetricNotConfigured`] if the metric has no feed.
    pub fn table(&self, metric: Metric) -> Result<&TimeSeriesTable> {
        self.tables
            .get(&metric)
            .ok_or(RepositoryError::MetricNotConfigured(metric))
    }

    /// Load an entity, replacing any entry with the same key.
    ///
    /// [`Entity::Many`] loads its members in order; members loaded before a
    /// failing one stay loaded.
    ///
    /// # Errors
    /// Returns [`RepositoryError::Data`] if the country or locale is unknown
    /// in any configured feed. Nothing is stored for that entity.
    pub fn load(&mut self, entity: &Entity) -> Result<()> {
        let (Some(key), Some((country, locale))) = (entity.key(), entity.target()) else {
            if let Entity::Many(entities) = entity {
                for entity in entities {
                    self.load(entity)?;
                }
            }
            return Ok(());
        };

        let mut metrics = BTreeMap::new();
        for (&metric, table) in &self.tables {
            let values = table.series(country, locale)?;
            metrics.insert(
                metric,
                MetricSeries {
                    dates: table.dates().to_vec(),
                    values: values.to_vec(),
                },
            );
        }

        let series = LoadedSeries {
            key: key.clone(),
            entity: entity.clone(),
            metrics,
        };
        match self.loaded.iter_mut().find(|loaded| loaded.key == key) {
            Some(existing) => {
                debug!(key = %key, "replacing loaded series");
                *existing = series;
            }
            None => {
                debug!(key = %key, "loaded series");
                self.loaded.push(series);
            }
        }
        Ok(())
    }

    /// Unload an entity, or everything when `entity` is `None`.
    ///
    /// # Errors
    /// Returns [`RepositoryError::NotLoaded`] if a key is not loaded.
    pub fn unload(&mut self, entity: Option<&Entity>) -> Result<()> {
        match entity {
            None => {
                debug!(count = self.loaded.len(), "clearing loaded series");
                self.loaded.clear();
            }
            Some(Entity::Many(entities)) => {
                for entity in entities {
                    self.unload(Some(entity))?;
                }
            }
            Some(entity) => {
                let key = entity.key().unwrap_or_default();
                let position = self
                    .loaded
                    .iter()
                    .position(|loaded| loaded.key == key)
                    .ok_or(RepositoryError::NotLoaded { key })?;
                self.loaded.remove(position);
            }
        }
        Ok(())
    }

    /// Loaded entries in load order.
    pub fn get_loaded(&self) -> &[LoadedSeries] {
        &self.loaded
    }

    /// Loaded entry by key.
    pub fn get(&self, key: &str) -> Option<&LoadedSeries> {
        self.loaded.iter().find(|loaded| loaded.key == key)
    }

    /// Re-pull every feed and replace the tables.
    ///
    /// Loaded entries are not re-resolved; load them again to pick up the
    /// new data. On failure the previous tables are kept.
    ///
    /// # Errors
    /// Same as [`SeriesRepository::connect`].
    pub fn refresh(&mut self) -> Result<Vec<RefreshReport>> {
        let tables = pull_all(&self.source, &self.config)?;

        let reports: Vec<RefreshReport> = tables
            .iter()
            .map(|(&metric, table)| RefreshReport {
                metric,
                before: self.tables.get(&metric).and_then(TimeSeriesTable::last_date),
                after: table.last_date(),
            })
            .collect();

        for report in &reports {
            info!(
                metric = %report.metric,
                before = ?report.before,
                after = ?report.after,
                "refreshed feed"
            );
        }

        self.tables = tables;
        Ok(reports)
    }
}

fn pull_all<S: SeriesSource>(
    source: &S,
    config: &RepositoryConfig,
) -> Result<BTreeMap<Metric, TimeSeriesTable>> {
    let mut tables = BTreeMap::new();
    let mut expected: Option<usize> = None;

    for MetricFeed { metric, url } in &config.feeds {
        let table = source.pull(url, &config.date_format)?;
        let actual = table.dates().len();

        match expected {
            Some(expected) if expected != actual => {
                return Err(RepositoryError::SchemaMismatch {
                    metric: *metric,
                    expected,
                    actual,
                });
            }
            _ => expected = Some(actual),
        }

        info!(
            metric = %metric,
            rows = table.row_count(),
            last_date = ?table.last_date(),
            "pulled feed"
        );
        tables.insert(*metric, table);
    }

    Ok(tables)
}
