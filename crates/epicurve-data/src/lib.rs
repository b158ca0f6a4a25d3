#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/epicurve/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod feeds;
pub mod loader;
pub mod locale;
pub mod table;

pub use error::{DataError, Result};
pub use feeds::{Feed, JHU_BASE_URL};
pub use loader::{
    DEFAULT_DATE_FORMAT, FIRST_DATE_COLUMN, HttpSource, LoaderConfig, SeriesSource, parse_csv,
};
pub use locale::{COUNTRY_LEVEL, LocaleEntry, LocaleIndex, Resolution};
pub use table::{RowLabel, TimeSeriesTable};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
