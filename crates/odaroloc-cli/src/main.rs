use std::process;
use std::str::FromStr;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use odaroloc::scraper::{FailurePolicy, WebScraper};
use odaroloc::sink::{JsonLinesSink, MemorySink};
use odaroloc::types::{Chamber, LegislatorRecord, TermMetadata};
use odaroloc::utils::ScrapeStats;

#[derive(Parser)]
#[command(name = "odaroloc")]
#[command(about = "A leg.colorado.gov legislator scraper", long_about = None)]
struct Cli {
    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        global = true,
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape every legislator of a chamber for a term and emit normalized records
    Scrape {
        #[arg(
            long,
            value_parser = parse_chamber,
            help = "Chamber to scrape ('upper' or 'lower')"
        )]
        chamber: Chamber,

        #[arg(long, help = "Term name to resolve in the session metadata")]
        term: String,

        #[arg(
            long,
            value_name = "FILE",
            help = "Path to the term/session metadata JSON file"
        )]
        metadata: String,

        #[arg(
            long,
            help = "Skip profiles that fail to fetch or parse instead of aborting the batch"
        )]
        skip_failed: bool,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
    /// Fetch the member directory and print the district to profile URL mapping
    Directory {
        #[arg(
            long,
            value_parser = parse_chamber,
            help = "Chamber to list ('upper' or 'lower')"
        )]
        chamber: Chamber,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
    /// Fetch a single profile page and print the extracted fields
    Profile {
        #[arg(help = "URL of the legislator profile page")]
        url: String,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
    /// Fetch a legacy member homepage and print the extracted fields
    Homepage {
        #[arg(help = "URL of the legacy member homepage")]
        url: String,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
}

fn parse_chamber(s: &str) -> Result<Chamber, String> {
    Chamber::from_str(s).map_err(|e| e.to_string())
}

fn serialize_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Error serializing to JSON: {}", e);
            process::exit(1);
        }
    }
}

fn print_records(records: &[LegislatorRecord]) {
    if records.is_empty() {
        println!("No legislators found.");
        return;
    }
    for (i, record) in records.iter().enumerate() {
        println!("{:>3}. {}", i + 1, record);
    }
    print!("{}", ScrapeStats::from_records(records));
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    let scraper = WebScraper::new().unwrap_or_else(|e| {
        log::error!("Error creating scraper: {}", e);
        process::exit(1);
    });

    match cli.command {
        Commands::Scrape {
            chamber,
            term,
            metadata,
            skip_failed,
            format,
        } => {
            let metadata = TermMetadata::from_json_file(&metadata).unwrap_or_else(|e| {
                log::error!("Error loading term metadata: {}", e);
                process::exit(1);
            });
            let policy = if skip_failed {
                FailurePolicy::Skip
            } else {
                FailurePolicy::Abort
            };

            match format {
                OutputFormat::Json => {
                    let stdout = std::io::stdout();
                    let mut sink = JsonLinesSink::new(stdout.lock());
                    match scraper
                        .scrape_legislators(chamber, &term, &metadata, policy, &mut sink)
                        .await
                    {
                        Ok(saved) => log::info!("Saved {} legislator record(s)", saved),
                        Err(e) => {
                            log::error!("Error scraping legislators: {}", e);
                            process::exit(1);
                        }
                    }
                }
                OutputFormat::Text => {
                    let mut sink = MemorySink::new();
                    if let Err(e) = scraper
                        .scrape_legislators(chamber, &term, &metadata, policy, &mut sink)
                        .await
                    {
                        log::error!("Error scraping legislators: {}", e);
                        process::exit(1);
                    }
                    print_records(sink.records());
                }
            }
        }

        Commands::Directory { chamber, format } => {
            let pages = scraper.fetch_directory(chamber).await.unwrap_or_else(|e| {
                log::error!("Error fetching directory: {}", e);
                process::exit(1);
            });

            match format {
                OutputFormat::Json => serialize_json(&pages),
                OutputFormat::Text => {
                    let mut entries: Vec<_> = pages.iter().collect();
                    entries.sort();
                    for (district, url) in entries {
                        println!("{:>4}  {}", district, url);
                    }
                }
            }
        }

        Commands::Profile { url, format } => {
            let profile = scraper.fetch_profile(&url).await.unwrap_or_else(|e| {
                log::error!("Error fetching profile: {}", e);
                process::exit(1);
            });

            match format {
                OutputFormat::Json => serialize_json(&profile),
                OutputFormat::Text => println!("{}", profile),
            }
        }

        Commands::Homepage { url, format } => {
            let details = scraper.fetch_homepage(&url).await.unwrap_or_else(|e| {
                log::error!("Error fetching homepage: {}", e);
                process::exit(1);
            });

            match format {
                OutputFormat::Json => serialize_json(&details),
                OutputFormat::Text => println!("{}", details),
            }
        }
    }
}
