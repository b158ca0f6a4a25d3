#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/epicurve/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod estimate;
pub mod fit;
pub mod trim;

// Re-export main types
pub use error::{GrowthError, Result};
pub use estimate::{GrowthConfig, GrowthEstimate, analyze};
pub use fit::{ExponentialFit, fit};
pub use trim::{TrimOptions, TrimmedSeries, trim};
