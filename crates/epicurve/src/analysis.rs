//! Growth analysis and plotting over every loaded entity.

use crate::error::{RepositoryError, Result};
use crate::metric::Metric;
use crate::repository::{LoadedSeries, MetricSeries, SeriesRepository};
use epicurve_data::SeriesSource;
use epicurve_growth::{GrowthConfig, GrowthEstimate, TrimOptions, analyze, trim};
use epicurve_output::{
    Chart, GrowthExport, LineStyle, Scale, SeriesPointExport, XAxis, colour_from_name,
};
use tracing::debug;

/// Growth estimate for one loaded entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityGrowth {
    /// Display key of the entity
    pub key: String,
    /// Metric analysed
    pub metric: Metric,
    /// Estimate
    pub estimate: GrowthEstimate,
}

impl EntityGrowth {
    /// Flat record for export.
    pub fn to_export(&self) -> GrowthExport {
        let estimate = &self.estimate;
        GrowthExport {
            key: self.key.clone(),
            metric: self.metric.to_string(),
            origin: estimate.series.origin,
            observations: estimate.series.len(),
            slope: estimate.fit.slope,
            intercept: estimate.fit.intercept,
            r_squared: estimate.fit.r_squared,
            doubling_time: estimate.doubling_time,
            last_value: estimate.last_value(),
            projected: estimate.projected,
        }
    }
}

fn metric_series(loaded: &LoadedSeries, metric: Metric) -> Result<&MetricSeries> {
    loaded
        .metric(metric)
        .ok_or(RepositoryError::MetricNotConfigured(metric))
}

impl<S: SeriesSource> SeriesRepository<S> {
    /// Run the growth analysis on every loaded entity, in load order.
    ///
    /// # Errors
    /// - [`RepositoryError::MetricNotConfigured`] if the metric has no feed
    /// - [`RepositoryError::Growth`] for the first entity that cannot be
    ///   trimmed or fitted
    pub fn analyze(&self, metric: Metric, config: &GrowthConfig) -> Result<Vec<EntityGrowth>> {
        self.table(metric)?;

        self.get_loaded()
            .iter()
            .map(|loaded| {
                let series = metric_series(loaded, metric)?;
                let estimate = analyze(&series.dates, &series.values, config).map_err(|source| {
                    RepositoryError::Growth {
                        key: loaded.key.clone(),
                        source,
                    }
                })?;
                debug!(
                    key = %loaded.key,
                    metric = %metric,
                    doubling_time = ?estimate.doubling_time,
                    "fitted growth"
                );
                Ok(EntityGrowth {
                    key: loaded.key.clone(),
                    metric,
                    estimate,
                })
            })
            .collect()
    }

    /// Draw every loaded entity for one metric.
    ///
    /// With a cutoff each series starts at its first day at or above the
    /// cutoff and is drawn against day offsets; without one it is drawn
    /// against calendar dates.
    ///
    /// # Errors
    /// - [`RepositoryError::MetricNotConfigured`] if the metric has no feed
    /// - [`RepositoryError::Growth`] if no value of a series meets the cutoff
    /// - [`RepositoryError::Chart`] if the chart rejects a series
    pub fn plot(
        &self,
        metric: Metric,
        cutoff: Option<i64>,
        scale: Scale,
        chart: &mut dyn Chart,
    ) -> Result<()> {
        self.table(metric)?;

        chart.set_title(metric.title());
        chart.set_scale(scale);

        for loaded in self.get_loaded() {
            let series = metric_series(loaded, metric)?;
            let colour = colour_from_name(&loaded.key, metric.colour_offset());

            match cutoff {
                Some(cutoff) => {
                    let trimmed = trim(&series.dates, &series.values, TrimOptions::cutoff(cutoff))
                        .map_err(|source| RepositoryError::Growth {
                            key: loaded.key.clone(),
                            source,
                        })?;
                    let values: Vec<f64> = trimmed.values.iter().map(|&v| v as f64).collect();
                    chart.plot_series(
                        XAxis::Days(&trimmed.offsets),
                        &values,
                        LineStyle::Dashed,
                        &loaded.key,
                        colour,
                    )?;
                }
                None => {
                    let values: Vec<f64> = series.values.iter().map(|&v| v as f64).collect();
                    chart.plot_series(
                        XAxis::Dates(&series.dates),
                        &values,
                        LineStyle::Dashed,
                        &loaded.key,
                        colour,
                    )?;
                }
            }
        }

        chart.show()?;
        Ok(())
    }

    /// Every point of every loaded entity for the given metrics.
    pub fn series_export(&self, metrics: &[Metric]) -> Vec<SeriesPointExport> {
        self.get_loaded()
            .iter()
            .flat_map(|loaded| {
                metrics.iter().filter_map(move |&metric| {
                    loaded.metric(metric).map(|series| (loaded, metric, series))
                })
            })
            .flat_map(|(loaded, metric, series)| {
                series
                    .dates
                    .iter()
                    .zip(&series.values)
                    .map(move |(&date, &value)| {
                        SeriesPointExport::new(loaded.key.clone(), metric.to_string(), date, value)
                    })
            })
            .collect()
    }
}
