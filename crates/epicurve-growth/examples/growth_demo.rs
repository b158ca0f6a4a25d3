//! Demonstration of epicurve-growth
//!
//! - Cutoff and window trimming
//! - Log-linear fit and doubling time
//! - Forward projection by an incubation assumption

use chrono::{Days, NaiveDate};
use epicurve_growth::{GrowthConfig, TrimOptions, analyze, fit, trim};

fn main() {
    println!("==========================================================");
    println!("              epicurve growth - Demo");
    println!("==========================================================\n");

    let start = NaiveDate::from_ymd_opt(2020, 3, 1).expect("valid date");
    let dates: Vec<NaiveDate> = (0..14).map(|d| start + Days::new(d)).collect();
    // Roughly doubling every 2.5 days once past the first few reports
    let values: Vec<i64> = (0..14)
        .map(|d| (20.0 * 2f64.powf(d as f64 / 2.5)).round() as i64)
        .collect();

    println!("Raw series: {values:?}\n");

    let options = TrimOptions::cutoff(100).with_window(7);
    match trim(&dates, &values, options) {
        Ok(trimmed) => {
            println!("Trimmed from {} (offset 0):", trimmed.origin);
            println!("  offsets: {:?}", trimmed.offsets);
            println!("  values:  {:?}", trimmed.values);

            match fit(&trimmed.offsets, &trimmed.values) {
                Ok(model) => {
                    println!("  slope:     {:.4}/day", model.slope);
                    println!("  intercept: {:.4}", model.intercept);
                    println!("  r^2:       {:.6}", model.r_squared);
                }
                Err(e) => println!("  fit failed: {e}"),
            }
        }
        Err(e) => println!("Trim failed: {e}"),
    }

    println!();
    match analyze(&dates, &values, &GrowthConfig::default()) {
        Ok(estimate) => {
            match estimate.doubling_time {
                Some(days) => println!("Doubling time: {days:.2} days"),
                None => println!("Not growing"),
            }
            println!(
                "Projected count {} days past the last report: {:.0}",
                estimate.incubation_days, estimate.projected
            );
        }
        Err(e) => println!("Analysis failed: {e}"),
    }
}
