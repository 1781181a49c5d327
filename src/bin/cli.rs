//! Venue Crawler CLI
//!
//! Local execution entry point.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use venue_crawler::{
    config::{self, ImportSelection},
    error::Result,
    models::{Config, QueryRequest},
    pipeline,
    utils::http::ReqwestFetcher,
};

/// Venue Crawler - keyword scan over journal and conference catalogs
#[derive(Parser, Debug)]
#[command(
    name = "venue-crawler",
    version,
    about = "Find paper titles matching keywords across journals and conferences"
)]

struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan every venue for matching titles
    Query {
        /// Year to include (repeatable)
        #[arg(short, long = "year", required = true)]
        years: Vec<String>,

        /// Keyword to match (repeatable); none collects every title
        #[arg(short, long = "keyword")]
        keywords: Vec<String>,

        /// Venue list (default: paths.venues_file)
        #[arg(long)]
        venues: Option<PathBuf>,

        /// Output directory (default: paths.output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List available section files
    Sections {
        /// Section directory (default: paths.sections_dir)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Build a venue list from selected section groups
    Import {
        /// TOML or JSON map of section name to group keys
        #[arg(long)]
        selection: PathBuf,

        /// Section directory (default: paths.sections_dir)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Output venue list (default: paths.venues_file)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Validate configuration and venue list
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    config.validate()?;

    match cli.command {
        Command::Query {
            years,
            keywords,
            venues,
            output,
        } => {
            let venues_path = venues.unwrap_or_else(|| PathBuf::from(&config.paths.venues_file));
            let output_dir = output.unwrap_or_else(|| PathBuf::from(&config.paths.output_dir));

            let venues = config::load_venues(&venues_path)?;
            log::info!(
                "Loaded {} venues from {}",
                venues.len(),
                venues_path.display()
            );

            let query = QueryRequest::new(years, keywords, output_dir);
            let fetcher = Arc::new(ReqwestFetcher::new(&config.crawler)?);

            let report = pipeline::run_crawler(&config, fetcher, &venues, &query).await?;

            log::info!(
                "Saved {} matches to {}",
                report.match_count(),
                report.result_path.display()
            );
            if report.venue_failures > 0 {
                log::warn!(
                    "{} of {} venues returned no results because of errors; see {}",
                    report.venue_failures,
                    report.venue_total,
                    report.log_path.display()
                );
            }
            if report.link_failures > 0 {
                log::warn!(
                    "{} volume pages could not be fetched; see {}",
                    report.link_failures,
                    report.log_path.display()
                );
            }
            log::info!("Total time: {:.2}s", report.elapsed.as_secs_f64());
        }

        Command::Sections { dir } => {
            let dir = dir.unwrap_or_else(|| PathBuf::from(&config.paths.sections_dir));
            for name in config::list_sections(&dir)? {
                println!("{name}");
            }
        }

        Command::Import {
            selection,
            dir,
            out,
        } => {
            let dir = dir.unwrap_or_else(|| PathBuf::from(&config.paths.sections_dir));
            let out = out.unwrap_or_else(|| PathBuf::from(&config.paths.venues_file));
            let selection = ImportSelection::load(&selection)?;

            let count = config::import_sections(&dir, &selection, &out)?;
            log::info!("✓ Imported {} venues into {}", count, out.display());
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            log::info!("✓ Config OK");

            let venues = config::load_venues(&config.paths.venues_file)?;
            if let Err(e) = config::validate_venues(&venues) {
                log::error!("Venue list validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Venue list OK ({} venues)", venues.len());
        }
    }

    Ok(())
}
