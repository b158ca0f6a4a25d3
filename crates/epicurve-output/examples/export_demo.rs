//! Demonstration of the export and chart functionality in epicurve-output.

use chrono::{Days, NaiveDate};
use epicurve_output::{
    Chart, ExportFormat, Exporter, GrowthExport, LineStyle, Scale, SeriesPointExport, TextChart,
    XAxis, colour_from_name,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== epicurve Export Demo ===\n");

    let start = NaiveDate::from_ymd_opt(2020, 3, 1).ok_or("invalid date")?;
    let counts = [29i64, 36, 50, 83, 93, 99, 117];
    let dates: Vec<NaiveDate> = (0..counts.len() as u64)
        .map(|d| start + Days::new(d))
        .collect();

    // 1. Series points
    println!("1. Series Export\n");
    let points: Vec<SeriesPointExport> = dates
        .iter()
        .zip(counts)
        .map(|(&date, value)| {
            SeriesPointExport::new("malaysia".to_string(), "confirmed".to_string(), date, value)
        })
        .collect();
    println!("CSV Format:");
    println!("{}", points.export_to_string(ExportFormat::Csv)?);

    // 2. Growth estimate
    println!("2. Growth Export\n");
    let growth = vec![GrowthExport {
        key: "malaysia".to_string(),
        metric: "confirmed".to_string(),
        origin: start,
        observations: counts.len(),
        slope: 0.2,
        intercept: 3.4,
        r_squared: 0.97,
        doubling_time: Some(std::f64::consts::LN_2 / 0.2),
        last_value: counts.last().copied(),
        projected: 470.0,
    }];
    println!("Pretty JSON Format:");
    println!("{}\n", growth.export_to_string(ExportFormat::PrettyJson)?);

    // 3. Text chart
    println!("3. Text Chart\n");
    let values: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
    let mut chart = TextChart::new(std::io::stdout());
    chart.set_title("COVID-19 Confirmed Cases");
    chart.set_scale(Scale::Log);
    chart.plot_series(
        XAxis::Dates(&dates),
        &values,
        LineStyle::Dashed,
        "malaysia",
        colour_from_name("malaysia", 0),
    )?;
    chart.show()?;

    Ok(())
}
