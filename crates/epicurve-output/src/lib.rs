#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/epicurve/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chart;
pub mod colour;
pub mod export;

pub use chart::{
    Chart, ChartError, LineStyle, PlottedSeries, RecordingChart, Scale, TextChart, XAxis,
};
pub use colour::{Colour, colour_from_name};
pub use export::{ExportError, ExportFormat, Exporter, GrowthExport, SeriesPointExport};
