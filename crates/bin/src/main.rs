//! epicurve CLI binary.
//!
//! Pulls the cumulative case feeds, loads the requested countries and
//! regions, and prints growth estimates, text charts or exports.

mod report;

use clap::{Args, Parser, Subcommand};
use epicurve::{Entity, Metric, RepositoryConfig, SeriesRepository};
use epicurve_data::{DEFAULT_DATE_FORMAT, HttpSource, JHU_BASE_URL, LoaderConfig};
use epicurve_growth::GrowthConfig;
use epicurve_output::{ExportFormat, Exporter, Scale, TextChart};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "epicurve")]
#[command(about = "epicurve: epidemic growth curves by country and region", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Base URL of the time series feeds
    #[arg(long, global = true, default_value = JHU_BASE_URL)]
    base_url: String,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value = "30")]
    timeout: u64,

    /// Date format of the feed headers
    #[arg(long, global = true, default_value = DEFAULT_DATE_FORMAT)]
    date_format: String,

    /// Also pull the recovered feed
    #[arg(long, global = true)]
    recovered: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit exponential growth and report doubling times
    Analyze {
        /// Entities as `country` or `country:locale`
        #[arg(required = true)]
        entities: Vec<Entity>,

        /// Metric to analyse (confirmed, deaths, recovered)
        #[arg(long, default_value = "confirmed")]
        metric: Metric,

        /// Minimum count for an observation to enter the fit
        #[arg(long, default_value = "100", conflicts_with = "no_cutoff")]
        cutoff: i64,

        /// Fit from the first observation regardless of count
        #[arg(long)]
        no_cutoff: bool,

        /// Fit only the most recent N observations
        #[arg(long)]
        window: Option<usize>,

        /// Days to project the fitted curve past the last observation
        #[arg(long, default_value = "7")]
        incubation: f64,

        /// Output format (json or text)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Print a text chart of the loaded series
    Plot {
        /// Entities as `country` or `country:locale`
        #[arg(required = true)]
        entities: Vec<Entity>,

        /// Metric to draw (confirmed, deaths, recovered)
        #[arg(long, default_value = "confirmed")]
        metric: Metric,

        /// Align series on their first day at or above this count
        #[arg(long)]
        cutoff: Option<i64>,

        /// Logarithmic vertical scale
        #[arg(long)]
        log: bool,
    },

    /// List countries, or the locales of one country
    Countries {
        /// Country whose locales to list
        #[arg(long)]
        country: Option<String>,
    },

    /// Write every loaded series point to a file
    Export {
        /// Entities as `country` or `country:locale`
        #[arg(required = true)]
        entities: Vec<Entity>,

        /// Output file
        #[arg(long, short)]
        output: PathBuf,

        /// Output format (csv or json)
        #[arg(long, default_value = "csv")]
        format: ExportFormat,
    },
}

fn main() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            entities,
            metric,
            cutoff,
            no_cutoff,
            window,
            incubation,
            format,
        } => {
            let config = GrowthConfig {
                cutoff: (!no_cutoff).then_some(cutoff),
                window,
                incubation_days: incubation,
            };
            let mut repo = connect(&cli.source)?;
            load_all(&mut repo, entities)?;
            analyze(&repo, metric, &config, &format)?;
        }
        Commands::Plot {
            entities,
            metric,
            cutoff,
            log,
        } => {
            let mut repo = connect(&cli.source)?;
            load_all(&mut repo, entities)?;
            let scale = if log { Scale::Log } else { Scale::Linear };
            let mut chart = TextChart::new(std::io::stdout().lock());
            repo.plot(metric, cutoff, scale, &mut chart)?;
        }
        Commands::Countries { country } => {
            let repo = connect(&cli.source)?;
            list_countries(&repo, country.as_deref())?;
        }
        Commands::Export {
            entities,
            output,
            format,
        } => {
            let mut repo = connect(&cli.source)?;
            load_all(&mut repo, entities)?;
            let points = repo.series_export(&repo.metrics());
            points.export_to_file(&output, format)?;
            println!(
                "Wrote {} points to {} ({})",
                points.len(),
                output.display(),
                format.extension()
            );
        }
    }

    Ok(())
}

fn connect(args: &SourceArgs) -> Result<SeriesRepository<HttpSource>, Box<dyn std::error::Error>> {
    let mut metrics = vec![Metric::Confirmed, Metric::Deaths];
    if args.recovered {
        metrics.push(Metric::Recovered);
    }

    let mut config = RepositoryConfig::with_base_url(&args.base_url, &metrics);
    config.date_format.clone_from(&args.date_format);

    let source = HttpSource::new(LoaderConfig {
        timeout: Duration::from_secs(args.timeout),
        ..LoaderConfig::default()
    })?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Pulling {} feeds...", metrics.len()));

    match SeriesRepository::connect(source, config) {
        Ok(repo) => {
            let last = repo
                .table(Metric::Confirmed)
                .ok()
                .and_then(|table| table.last_date());
            match last {
                Some(date) => pb.finish_with_message(format!("Feeds current to {date}")),
                None => pb.finish_with_message("Feeds pulled"),
            }
            Ok(repo)
        }
        Err(e) => {
            pb.finish_with_message("Failed!");
            Err(format!("Failed to pull feeds: {}", e).into())
        }
    }
}

fn load_all(
    repo: &mut SeriesRepository<HttpSource>,
    entities: Vec<Entity>,
) -> Result<(), Box<dyn std::error::Error>> {
    let count = entities.len();
    repo.load(&Entity::Many(entities))?;
    info!(count, "loaded entities");
    Ok(())
}

fn analyze(
    repo: &SeriesRepository<HttpSource>,
    metric: Metric,
    config: &GrowthConfig,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let results = repo.analyze(metric, config)?;

    if format.eq_ignore_ascii_case("json") {
        println!("{}", report::growth_json(&results)?);
        return Ok(());
    }

    println!("\n{}", metric.title());
    match config.cutoff {
        Some(cutoff) => println!("Fitted from the first day with at least {cutoff} {metric}"),
        None => println!("Fitted from the first day of the feed"),
    }
    if let Some(window) = config.window {
        println!("Window: last {window} observations");
    }
    println!();
    print!("{}", report::growth_table(&results));

    let growing = results.iter().filter(|g| g.estimate.is_growing()).count();
    println!(
        "\n{} of {} growing; projection assumes {} days incubation",
        growing,
        results.len(),
        config.incubation_days
    );

    Ok(())
}

fn list_countries(
    repo: &SeriesRepository<HttpSource>,
    country: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let table = repo.table(Metric::Confirmed)?;

    match country {
        Some(country) => {
            let locales = table.locales(country)?;
            println!("{} ({} locales)", country, locales.len());
            for locale in locales {
                if locale.is_empty() {
                    println!("  (country level)");
                } else {
                    println!("  {}", locale);
                }
            }
        }
        None => {
            let countries = table.countries();
            println!("{} countries\n", countries.len());
            for country in countries {
                println!("  {}", country);
            }
        }
    }

    Ok(())
}
