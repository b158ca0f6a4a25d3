//! Integration tests for charting and export.

use chrono::NaiveDate;
use epicurve_output::{
    Chart, ExportFormat, Exporter, LineStyle, RecordingChart, Scale, SeriesPointExport, TextChart,
    XAxis, colour_from_name,
};

#[test]
fn test_full_chart_workflow() {
    let days = [0, 1, 2, 3];
    let mut chart = TextChart::new(Vec::new());
    chart.set_title("COVID-19 Confirmed Cases");
    chart.set_scale(Scale::Log);

    for (offset, label) in ["victoria, australia", "malaysia"].into_iter().enumerate() {
        let base = 100.0 * (offset as f64 + 1.0);
        let values: Vec<f64> = days.iter().map(|&d| base * 2f64.powi(d as i32)).collect();
        chart
            .plot_series(
                XAxis::Days(&days),
                &values,
                LineStyle::Dashed,
                label,
                colour_from_name(label, 0),
            )
            .unwrap();
    }
    chart.show().unwrap();

    let text = String::from_utf8(chart.into_inner()).unwrap();
    assert!(text.contains("COVID-19 Confirmed Cases"));
    assert!(text.contains("victoria, australia [#93F923 dashed] 4 points"));
    assert!(text.contains("malaysia ["));
    assert!(text.contains("last  day 3: 1600"));
}

#[test]
fn test_show_clears_queued_series() {
    let mut chart = TextChart::new(Vec::new());
    chart
        .plot_series(
            XAxis::Days(&[0]),
            &[1.0],
            LineStyle::Points,
            "first",
            colour_from_name("first", 0),
        )
        .unwrap();
    chart.show().unwrap();
    chart.show().unwrap();

    let text = String::from_utf8(chart.into_inner()).unwrap();
    assert_eq!(text.matches("first [").count(), 1);
}

#[test]
fn test_same_name_different_metric_colours() {
    let mut chart = RecordingChart::new();
    let dates = [NaiveDate::from_ymd_opt(2020, 3, 1).unwrap()];
    for offset in 0..3 {
        chart
            .plot_series(
                XAxis::Dates(&dates),
                &[1.0],
                LineStyle::Solid,
                "australia",
                colour_from_name("australia", offset),
            )
            .unwrap();
    }

    let colours: Vec<_> = chart.series.iter().map(|s| s.colour).collect();
    assert_ne!(colours[0], colours[1]);
    assert_ne!(colours[1], colours[2]);
    assert_ne!(colours[0], colours[2]);
}

#[test]
fn test_export_to_file() {
    let date = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
    let points = vec![SeriesPointExport::new(
        "malaysia".to_string(),
        "deaths".to_string(),
        date,
        2,
    )];

    let path = std::env::temp_dir().join(format!("epicurve-export-{}.csv", std::process::id()));
    points.export_to_file(&path, ExportFormat::Csv).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(written, "key,metric,date,value\nmalaysia,deaths,2020-03-01,2\n");
}
