//! Site-Census main entry point
//!
//! This is the command-line interface for the Site-Census site inventory.

use clap::Parser;
use site_census::config::{load_config_with_hash, Config};
use site_census::crawler::{census, UrlLimit};
use site_census::output::{print_statistics, write_json};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Site-Census: a sitemap-driven site inventory
///
/// Site-Census reads a website's sitemaps, sorts every page into products,
/// blog posts, categories and static pages, extracts the fields of each,
/// and prints the records as a JSON array.
#[derive(Parser, Debug)]
#[command(name = "site-census")]
#[command(version)]
#[command(about = "A sitemap-driven site inventory", long_about = None)]
struct Cli {
    /// Site URL or sitemap URL to start from
    #[arg(value_name = "SITE")]
    site: String,

    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Maximum number of discovered URLs to process, or "all"
    #[arg(short, long, default_value = "all")]
    limit: UrlLimit,

    /// Write the JSON records to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the settings without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => Config::default(),
    };

    if cli.dry_run {
        handle_dry_run(&cli, &config);
        return Ok(());
    }

    handle_census(&cli, config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_census=info,warn"),
            1 => EnvFilter::new("site_census=debug,info"),
            2 => EnvFilter::new("site_census=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so stdout carries only the JSON records
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what a run would use
fn handle_dry_run(cli: &Cli, config: &Config) {
    println!("=== Site-Census Dry Run ===\n");

    println!("Target:");
    println!("  Site: {}", cli.site);
    println!("  URL limit: {}", cli.limit);

    println!("\nFetcher:");
    println!("  Timeout: {}s", config.fetcher.timeout_secs);
    println!("  Page timeout: {}s", config.fetcher.page_timeout_secs);
    println!(
        "  Default retry-after: {}s",
        config.fetcher.default_retry_after_secs
    );
    match config.fetcher.max_rate_limit_retries {
        Some(max) => println!("  Max rate-limit retries: {}", max),
        None => println!("  Max rate-limit retries: unbounded"),
    }

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nScheduler:");
    println!("  Window size: {}", config.scheduler.window_size);
    println!("  Delay between windows: {}ms", config.scheduler.batch_delay_ms);

    println!("\nDiscovery:");
    println!("  Max sitemap depth: {}", config.discovery.max_depth);

    println!("\nCoverage:");
    println!(
        "  Max category pages scanned: {}",
        config.coverage.max_category_pages
    );
    println!(
        "  Min real category records: {}",
        config.coverage.min_category_records
    );

    println!(
        "\nExtraction rules: {} selectors",
        config.extraction.named_rules().len()
    );
    println!("\n✓ Configuration is valid");
}

/// Handles the main census run
async fn handle_census(cli: &Cli, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting census of {} (limit: {})", cli.site, cli.limit);

    let result = match census(config, &cli.site, cli.limit).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Census failed: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!("Census completed with {} records", result.stats.total);

    match &cli.output {
        Some(path) => {
            let file = File::create(path)?;
            let mut writer = BufWriter::new(file);
            write_json(&result, &mut writer)?;
            writer.flush()?;
            tracing::info!("Records written to {}", path.display());

            if !cli.quiet {
                print_statistics(&result);
            }
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_json(&result, &mut writer)?;
            writeln!(writer)?;
        }
    }

    Ok(())
}
