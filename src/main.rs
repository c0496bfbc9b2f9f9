use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use clap::{Args, Parser, Subcommand};
use golden_hour::{
    date_range, find_due_east, format_day, parse_date, prompt_range, read_latitude_dates,
    year_dates, BatchRunner, HorizonEvent, ReportWriter, Settings, SimpleSolarModel,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "golden-hour",
    version,
    about = "Golden-hour windows and twilight durations by date and latitude",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Args)]
struct SamplingArgs {
    /// Lower bound of the elevation band, degrees
    #[arg(long, allow_negative_numbers = true)]
    band_min: Option<f64>,

    /// Upper bound of the elevation band, degrees
    #[arg(long, allow_negative_numbers = true)]
    band_max: Option<f64>,

    /// Sampling step in minutes
    #[arg(long)]
    step: Option<f64>,
}

#[derive(Args)]
struct PoolArgs {
    /// Share of available cores to use, in (0, 1]
    #[arg(long)]
    workers: Option<f64>,

    /// Directory the report is written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Hours per day inside the band for every day of a year, one column per latitude
    Durations {
        /// Year to cover
        #[arg(short, long)]
        year: Option<i32>,

        /// Comma separated latitudes (report columns)
        #[arg(short, long, value_delimiter = ',', allow_negative_numbers = true)]
        latitudes: Vec<f64>,

        #[command(flatten)]
        sampling: SamplingArgs,

        #[command(flatten)]
        pool: PoolArgs,
    },

    /// Morning and evening windows for each row of a Date,Latitude table
    Intervals {
        /// Input CSV with Date and Latitude columns
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        sampling: SamplingArgs,

        #[command(flatten)]
        pool: PoolArgs,
    },

    /// Print the windows of one latitude over a date range (prompts when arguments are missing)
    Range {
        /// First date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// Last date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,

        /// Latitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        latitude: Option<f64>,

        #[command(flatten)]
        sampling: SamplingArgs,
    },

    /// Days whose sunrise is closest to due east
    DueEast {
        /// Latitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        latitude: f64,

        /// Year to scan (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Number of days to report
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Look for sunsets closest to due west instead
        #[arg(long)]
        sunset: bool,

        /// Sampling step in minutes
        #[arg(long)]
        step: Option<f64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(format) = &cli.log_format {
        settings.logging.format.clone_from(format);
    }
    init_logging(&settings, cli.verbose);

    match cli.command {
        Commands::Durations {
            year,
            latitudes,
            sampling,
            pool,
        } => {
            if let Some(year) = year {
                settings.year = year;
            }
            if !latitudes.is_empty() {
                settings.latitudes = latitudes;
            }
            apply_sampling(&mut settings, &sampling);
            apply_pool(&mut settings, &pool);
            run_durations(&settings)
        }
        Commands::Intervals {
            input,
            sampling,
            pool,
        } => {
            apply_sampling(&mut settings, &sampling);
            apply_pool(&mut settings, &pool);
            run_intervals(&settings, &input)
        }
        Commands::Range {
            start,
            end,
            latitude,
            sampling,
        } => {
            apply_sampling(&mut settings, &sampling);
            run_range(&settings, start, end, latitude)
        }
        Commands::DueEast {
            latitude,
            year,
            count,
            sunset,
            step,
        } => {
            if let Some(count) = count {
                settings.due_east_count = count;
            }
            if let Some(step) = step {
                settings.step_minutes = step;
            }
            let year = year.unwrap_or_else(|| Local::now().year());
            let event = if sunset {
                HorizonEvent::Sunset
            } else {
                HorizonEvent::Sunrise
            };
            run_due_east(&settings, latitude, year, event)
        }
    }
}

fn init_logging(settings: &Settings, verbose: bool) {
    let level = if verbose {
        "debug"
    } else {
        settings.logging.level.as_str()
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("golden_hour={level},warn")));

    match settings.logging.format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
                .init();
        }
    }
}

fn apply_sampling(settings: &mut Settings, args: &SamplingArgs) {
    if let Some(v) = args.band_min {
        settings.band_min = v;
    }
    if let Some(v) = args.band_max {
        settings.band_max = v;
    }
    if let Some(v) = args.step {
        settings.step_minutes = v;
    }
}

fn apply_pool(settings: &mut Settings, args: &PoolArgs) {
    if let Some(v) = args.workers {
        settings.worker_fraction = v;
    }
    if let Some(dir) = &args.output_dir {
        settings.output_dir.clone_from(dir);
    }
}

fn run_durations(settings: &Settings) -> Result<()> {
    settings.validate()?;
    let started = Instant::now();
    let runner = BatchRunner::from_settings(SimpleSolarModel, settings)?;

    let dates = year_dates(settings.year);
    let report = runner
        .run_durations(&dates, &settings.latitudes)
        .context("duration report failed")?;
    let path = ReportWriter::new(&settings.output_dir)
        .write_durations(&report, Local::now().naive_local())
        .context("could not write duration report")?;

    println!("Report written to {}", path.display());
    info!(elapsed = ?started.elapsed(), "done");
    Ok(())
}

fn run_intervals(settings: &Settings, input: &std::path::Path) -> Result<()> {
    settings.validate()?;
    let started = Instant::now();
    let runner = BatchRunner::from_settings(SimpleSolarModel, settings)?;

    let requests = read_latitude_dates(input)?;
    let report = runner
        .run_intervals(&requests)
        .context("interval report failed")?;
    let path = ReportWriter::new(&settings.output_dir)
        .write_intervals(&report, Local::now().naive_local())
        .context("could not write interval report")?;

    println!("Report written to {}", path.display());
    info!(elapsed = ?started.elapsed(), "done");
    Ok(())
}

fn run_range(
    settings: &Settings,
    start: Option<String>,
    end: Option<String>,
    latitude: Option<f64>,
) -> Result<()> {
    settings.validate()?;
    let runner = BatchRunner::from_settings(SimpleSolarModel, settings)?;

    let (start, end, latitude) = match (start, end, latitude) {
        (Some(start), Some(end), Some(latitude)) => (parse_date(&start)?, parse_date(&end)?, latitude),
        _ => {
            println!(
                "\nThis program will display the time ranges for \"golden hour\"\
                 \n(the sun between {}° and {}° of elevation) for a given date range and latitude.\n",
                settings.band_min, settings.band_max
            );
            let stdin = io::stdin();
            let request = prompt_range(&mut stdin.lock(), &mut io::stdout())
                .context("could not read answers from the terminal")?;
            (request.start, request.end, request.latitude)
        }
    };

    let dates = date_range(start, end)?;
    let days = runner.run_range(&dates, latitude)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "\n======================================================\n")?;
    writeln!(out, "Here are your golden hour times:\n")?;
    for (date, result) in &days {
        writeln!(out, "{}", format_day(*date, result))?;
    }
    writeln!(out, "\n======================================================\n")?;
    Ok(())
}

fn run_due_east(settings: &Settings, latitude: f64, year: i32, event: HorizonEvent) -> Result<()> {
    settings.validate()?;
    let days = find_due_east(
        &SimpleSolarModel,
        latitude,
        year,
        settings.due_east_count,
        event,
        settings.step()?,
    )?;

    let (label, direction) = match event {
        HorizonEvent::Sunrise => ("sunrise", "due east"),
        HorizonEvent::Sunset => ("sunset", "due west"),
    };
    println!("\nDates with {label} closest to {direction}:");
    for day in days {
        println!(
            "{}: {:.2} degrees from {direction}",
            day.date.format("%B %d, %Y"),
            day.deviation
        );
    }
    Ok(())
}
