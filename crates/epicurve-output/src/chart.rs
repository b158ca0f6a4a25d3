//! Charting interface and two plain implementations.

use crate::colour::Colour;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};
use thiserror::Error;

/// Errors raised by a chart backend.
#[derive(Debug, Error)]
pub enum ChartError {
    /// IO error while rendering.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// X axis and values differ in length.
    #[error("Series '{label}' has {x} x values and {y} y values")]
    LengthMismatch {
        /// Series label.
        label: String,
        /// Number of x values.
        x: usize,
        /// Number of y values.
        y: usize,
    },
}

/// Horizontal axis of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XAxis<'a> {
    /// Calendar dates.
    Dates(&'a [NaiveDate]),
    /// Day offsets from a trimmed series origin.
    Days(&'a [i64]),
}

impl XAxis<'_> {
    /// Number of points on the axis.
    pub const fn len(&self) -> usize {
        match self {
            Self::Dates(dates) => dates.len(),
            Self::Days(days) => days.len(),
        }
    }

    /// Whether the axis is empty.
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Label of the point at `i`.
    pub fn label(&self, i: usize) -> Option<String> {
        match self {
            Self::Dates(dates) => dates.get(i).map(ToString::to_string),
            Self::Days(days) => days.get(i).map(|d| format!("day {d}")),
        }
    }
}

/// Vertical scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scale {
    /// Linear counts.
    #[default]
    Linear,
    /// Logarithmic counts.
    Log,
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("linear"),
            Self::Log => f.write_str("log"),
        }
    }
}

/// Line style of a series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineStyle {
    /// Solid line.
    Solid,
    /// Dashed line.
    #[default]
    Dashed,
    /// Markers only.
    Points,
}

/// Drawing surface the analysis renders through.
pub trait Chart {
    /// Add one series.
    ///
    /// # Errors
    /// Returns an error if the series cannot be drawn.
    fn plot_series(
        &mut self,
        x: XAxis<'_>,
        values: &[f64],
        style: LineStyle,
        label: &str,
        colour: Colour,
    ) -> Result<(), ChartError>;

    /// Set the vertical scale.
    fn set_scale(&mut self, scale: Scale);

    /// Set the chart title.
    fn set_title(&mut self, title: &str);

    /// Render everything added so far.
    ///
    /// # Errors
    /// Returns an error if rendering fails.
    fn show(&mut self) -> Result<(), ChartError>;
}

fn check_lengths(x: XAxis<'_>, values: &[f64], label: &str) -> Result<(), ChartError> {
    if x.len() == values.len() {
        Ok(())
    } else {
        Err(ChartError::LengthMismatch {
            label: label.to_string(),
            x: x.len(),
            y: values.len(),
        })
    }
}

/// Series captured by a [`RecordingChart`] or queued in a [`TextChart`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlottedSeries {
    /// Point labels along the x axis.
    pub x: Vec<String>,
    /// Values.
    pub values: Vec<f64>,
    /// Line style.
    pub style: LineStyle,
    /// Legend label.
    pub label: String,
    /// Series colour.
    pub colour: Colour,
}

impl PlottedSeries {
    fn capture(
        x: XAxis<'_>,
        values: &[f64],
        style: LineStyle,
        label: &str,
        colour: Colour,
    ) -> Self {
        Self {
            x: (0..x.len()).filter_map(|i| x.label(i)).collect(),
            values: values.to_vec(),
            style,
            label: label.to_string(),
            colour,
        }
    }
}

/// Chart that records every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingChart {
    /// Series in plotting order.
    pub series: Vec<PlottedSeries>,
    /// Last scale set.
    pub scale: Scale,
    /// Last title set.
    pub title: Option<String>,
    /// Number of `show` calls.
    pub shown: usize,
}

impl RecordingChart {
    /// Create an empty recording.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Chart for RecordingChart {
    fn plot_series(
        &mut self,
        x: XAxis<'_>,
        values: &[f64],
        style: LineStyle,
        label: &str,
        colour: Colour,
    ) -> Result<(), ChartError> {
        check_lengths(x, values, label)?;
        self.series
            .push(PlottedSeries::capture(x, values, style, label, colour));
        Ok(())
    }

    fn set_scale(&mut self, scale: Scale) {
        self.scale = scale;
    }

    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    fn show(&mut self) -> Result<(), ChartError> {
        self.shown += 1;
        Ok(())
    }
}

/// Chart that writes a text summary of each series.
///
/// Series are queued until [`Chart::show`], which writes the title, the
/// scale and one block per series, then clears the queue.
#[derive(Debug)]
pub struct TextChart<W: Write> {
    out: W,
    title: Option<String>,
    scale: Scale,
    pending: Vec<PlottedSeries>,
}

impl<W: Write> TextChart<W> {
    /// Chart writing to `out`.
    pub const fn new(out: W) -> Self {
        Self {
            out,
            title: None,
            scale: Scale::Linear,
            pending: Vec::new(),
        }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_series(&mut self, series: &PlottedSeries) -> io::Result<()> {
        let style = match series.style {
            LineStyle::Solid => "solid",
            LineStyle::Dashed => "dashed",
            LineStyle::Points => "points",
        };
        writeln!(
            self.out,
            "  {} [{} {}] {} points",
            series.label,
            series.colour,
            style,
            series.values.len()
        )?;

        let (Some(first), Some(last)) = (series.values.first(), series.values.last()) else {
            return Ok(());
        };
        let first_x = series.x.first().map_or("", String::as_str);
        let last_x = series.x.last().map_or("", String::as_str);
        let (min, max) = series
            .values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });

        writeln!(self.out, "    first {first_x}: {first}")?;
        writeln!(self.out, "    last  {last_x}: {last}")?;
        writeln!(self.out, "    range {min} .. {max}")?;
        if self.scale == Scale::Log && min > 0.0 {
            writeln!(
                self.out,
                "    log10 range {:.3} .. {:.3}",
                min.log10(),
                max.log10()
            )?;
        }
        Ok(())
    }
}

impl<W: Write> Chart for TextChart<W> {
    fn plot_series(
        &mut self,
        x: XAxis<'_>,
        values: &[f64],
        style: LineStyle,
        label: &str,
        colour: Colour,
    ) -> Result<(), ChartError> {
        check_lengths(x, values, label)?;
        self.pending
            .push(PlottedSeries::capture(x, values, style, label, colour));
        Ok(())
    }

    fn set_scale(&mut self, scale: Scale) {
        self.scale = scale;
    }

    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    fn show(&mut self) -> Result<(), ChartError> {
        if let Some(title) = &self.title {
            writeln!(self.out, "{title}")?;
        }
        writeln!(self.out, "scale: {}", self.scale)?;

        for series in std::mem::take(&mut self.pending) {
            self.write_series(&series)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::colour_from_name;

    #[test]
    fn test_recording_chart() {
        let mut chart = RecordingChart::new();
        let days = [0, 1, 2];
        chart.set_title("Confirmed");
        chart.set_scale(Scale::Log);
        chart
            .plot_series(
                XAxis::Days(&days),
                &[100.0, 200.0, 400.0],
                LineStyle::Dashed,
                "malaysia",
                colour_from_name("malaysia", 0),
            )
            .unwrap();
        chart.show().unwrap();

        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].x, vec!["day 0", "day 1", "day 2"]);
        assert_eq!(chart.scale, Scale::Log);
        assert_eq!(chart.title.as_deref(), Some("Confirmed"));
        assert_eq!(chart.shown, 1);
    }

    #[test]
    fn test_length_mismatch() {
        let mut chart = RecordingChart::new();
        let err = chart
            .plot_series(
                XAxis::Days(&[0, 1]),
                &[1.0],
                LineStyle::Solid,
                "x",
                Colour::from_rgb(0),
            )
            .unwrap_err();
        assert!(matches!(err, ChartError::LengthMismatch { x: 2, y: 1, .. }));
    }

    #[test]
    fn test_text_chart_output() {
        let dates = [
            NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 3, 2).unwrap(),
        ];
        let mut chart = TextChart::new(Vec::new());
        chart.set_title("COVID-19 Deaths");
        chart.set_scale(Scale::Log);
        chart
            .plot_series(
                XAxis::Dates(&dates),
                &[10.0, 1000.0],
                LineStyle::Dashed,
                "italy",
                Colour::from_rgb(0xABCDEF),
            )
            .unwrap();
        chart.show().unwrap();

        let text = String::from_utf8(chart.into_inner()).unwrap();
        assert!(text.starts_with("COVID-19 Deaths\nscale: log\n"));
        assert!(text.contains("italy [#ABCDEF dashed] 2 points"));
        assert!(text.contains("first 2020-03-01: 10"));
        assert!(text.contains("last  2020-03-02: 1000"));
        assert!(text.contains("log10 range 1.000 .. 3.000"));
    }
}
