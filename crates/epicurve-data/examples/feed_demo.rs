//! Demo of pulling a public feed.
//!
//! This example demonstrates how to:
//! - Pull the global confirmed-cases feed
//! - List the locales reported for a country
//! - Extract a single-locale and a whole-country series
//!
//! Run with: cargo run --example feed_demo

use epicurve_data::{DEFAULT_DATE_FORMAT, Feed, HttpSource, JHU_BASE_URL, LoaderConfig, SeriesSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let source = HttpSource::new(LoaderConfig::default())?;

    println!("Pulling confirmed cases...");
    let table = source.pull(&Feed::Confirmed.url(JHU_BASE_URL), DEFAULT_DATE_FORMAT)?;
    println!(
        "  {} rows, {} dates, last date {:?}",
        table.row_count(),
        table.dates().len(),
        table.last_date()
    );

    let country = "australia";
    println!("\nLocales in {country}:");
    for locale in table.locales(country)? {
        println!("  {locale}");
    }

    let victoria = table.series(country, Some("victoria"))?;
    let whole = table.series(country, None)?;
    if let (Some(v), Some(w)) = (victoria.last(), whole.last()) {
        println!("\nLatest: victoria {v}, {country} {w}");
    }

    Ok(())
}
