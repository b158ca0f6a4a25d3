#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/epicurve/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod analysis;
pub mod entity;
pub mod error;
pub mod metric;
pub mod repository;

// Re-export main types from sub-crates
pub use epicurve_data as data;
pub use epicurve_growth as growth;
pub use epicurve_output as output;

pub use analysis::EntityGrowth;
pub use entity::Entity;
pub use error::{RepositoryError, Result};
pub use metric::{Metric, MetricFeed, RepositoryConfig, UnknownMetric};
pub use repository::{LoadedSeries, MetricSeries, RefreshReport, SeriesRepository};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
