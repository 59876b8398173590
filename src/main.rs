use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use scholar_harvest::config::{find_config_file, get_config, load_config, Config};
use scholar_harvest::engine::{
    count_by_year, merge, near_duplicate_titles, PaginationController, RecordExtractor,
    ScrapeOutcome,
};
use scholar_harvest::report;
use scholar_harvest::sources::{
    ConnectorRegistry, ScholarCitationExporter, ScholarSession,
};
use scholar_harvest::store;
use scholar_harvest::utils::HttpClient;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Scholar Harvest - scrape scholarly search results into a deduplicated dataset
#[derive(Parser, Debug)]
#[command(name = "scholar-harvest")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scrape scholarly search results into a deduplicated dataset with year-distribution reporting", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv, -vvv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scrape the full paginated result listing for a query
    Scrape {
        /// Search query (boolean operators supported, e.g. 'X AND (Y OR Z)')
        query: String,

        /// Results page to start from (resume a prior run at an arbitrary page)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        start_page: Option<u64>,

        /// Page-load timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Prior dataset CSV to merge the new results into
        #[arg(long)]
        resume: Option<PathBuf>,

        /// Directory for dataset CSV output
        #[arg(long)]
        results_dir: Option<PathBuf>,

        /// Directory for chart output
        #[arg(long)]
        plots_dir: Option<PathBuf>,

        /// Resolve citation-format text per record (slower)
        #[arg(long)]
        citations: bool,

        /// Render the year-distribution chart
        #[arg(long)]
        plot: bool,

        /// Keep records from earlier pages when a page-load timeout ends the run
        #[arg(long)]
        keep_partial: bool,
    },

    /// One-shot search against a registered source
    #[command(alias = "s")]
    Search {
        /// Search query string
        query: String,

        /// Source to search
        #[arg(long, short, default_value = "scholar")]
        source: String,

        /// Persist the results as a dataset CSV
        #[arg(long)]
        save: bool,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Merge two dataset CSVs, deduplicating by title
    Merge {
        /// Path to the first CSV file (its records win on duplicate titles)
        csv1: PathBuf,

        /// Path to the second CSV file
        csv2: PathBuf,

        /// Render the merged year-distribution chart
        #[arg(long)]
        plot: bool,
    },

    /// Print the year distribution of a saved dataset
    Report {
        /// Path to the dataset CSV
        dataset: PathBuf,

        /// Render the year-distribution chart
        #[arg(long)]
        plot: bool,

        /// Print the counts as JSON
        #[arg(long)]
        json: bool,
    },

    /// List registered sources
    Sources {
        /// Show capabilities per source
        #[arg(long)]
        detailed: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("scholar_harvest={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from file if specified or found in default locations
    let config = if let Some(config_path) = &cli.config {
        load_config(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else if let Some(config_path) = find_config_file() {
        tracing::info!("Using config file: {}", config_path.display());
        load_config(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        get_config()
    };

    match cli.command {
        Commands::Scrape {
            query,
            start_page,
            timeout,
            resume,
            results_dir,
            plots_dir,
            citations,
            plot,
            keep_partial,
        } => {
            run_scrape(ScrapeArgs {
                config,
                query,
                start_page: start_page.map(|p| p as usize),
                timeout,
                resume,
                results_dir,
                plots_dir,
                citations,
                plot,
                keep_partial,
            })
            .await
        }
        Commands::Search {
            query,
            source,
            save,
            json,
        } => run_search(&config, &query, &source, save, json).await,
        Commands::Merge { csv1, csv2, plot } => run_merge(&config, &csv1, &csv2, plot),
        Commands::Report {
            dataset,
            plot,
            json,
        } => run_report(&config, &dataset, plot, json),
        Commands::Sources { detailed } => {
            run_sources(detailed);
            Ok(())
        }
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "scholar-harvest",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}

struct ScrapeArgs {
    config: Config,
    query: String,
    start_page: Option<usize>,
    timeout: Option<u64>,
    resume: Option<PathBuf>,
    results_dir: Option<PathBuf>,
    plots_dir: Option<PathBuf>,
    citations: bool,
    plot: bool,
    keep_partial: bool,
}

async fn run_scrape(args: ScrapeArgs) -> Result<()> {
    let config = &args.config;
    let start_page = args.start_page.unwrap_or(config.scrape.start_page).max(1);
    let page_timeout =
        Duration::from_secs(args.timeout.unwrap_or(config.scrape.page_timeout_secs));
    let poll_interval = Duration::from_millis(config.scrape.poll_interval_ms);
    let citations = args.citations || config.citations.enabled;

    let client = http_client(config);

    println!("Querying Google Scholar with: {}", args.query);

    let mut session = ScholarSession::new(
        client.clone(),
        &args.query,
        start_page,
        page_timeout,
        poll_interval,
    )?;

    let exporter = citations.then(|| {
        ScholarCitationExporter::new(
            client.clone(),
            Duration::from_secs(config.citations.timeout_secs),
        )
    });
    let extractor = match &exporter {
        Some(exporter) => RecordExtractor::with_exporter(exporter),
        None => RecordExtractor::new(),
    };

    let outcome = PaginationController::new(&mut session, extractor)
        .starting_at(start_page)
        .run()
        .await;

    let outcome = match outcome {
        Ok(outcome) => {
            println!(
                "Scrape complete: {} records from {} pages (stopped at page {})",
                outcome.records.len(),
                outcome.pages_visited,
                outcome.last_page
            );
            outcome
        }
        Err(err) if args.keep_partial => {
            tracing::warn!(page = err.page, error = %err.source, "page failed to load, keeping partial results");
            eprintln!(
                "Page {} failed to load; keeping {} records from earlier pages",
                err.page,
                err.partial.len()
            );
            ScrapeOutcome {
                pages_visited: err.page.saturating_sub(start_page),
                last_page: err.page,
                records: err.partial,
            }
        }
        Err(err) => {
            return Err(anyhow::Error::new(err)
                .context("Scrape failed; re-run with --keep-partial to salvage earlier pages"));
        }
    };

    let previous = match &args.resume {
        Some(path) => store::load_previous(path)?,
        None => Vec::new(),
    };
    let previous_len = previous.len();

    let dataset = merge(previous, outcome.records);
    if previous_len > 0 {
        println!(
            "Reconciled with {} previous records: {} unique titles",
            previous_len,
            dataset.len()
        );
    }

    let counts = count_by_year(&dataset);
    print!("{}", report::render_text(&counts));

    let stamp = store::run_stamp();
    let results_dir = args
        .results_dir
        .unwrap_or_else(|| config.output.results_dir.clone());

    let csv_path = store::save_dataset(&results_dir, &store::dataset_file_name(&stamp), &dataset)?;
    println!("Saved dataset to {}", csv_path.display());

    if citations {
        let citations_path =
            store::save_citations(&results_dir, &store::citations_file_name(&stamp), &dataset)?;
        println!("Saved citation text to {}", citations_path.display());
    }

    if args.plot {
        let plots_dir = args
            .plots_dir
            .unwrap_or_else(|| config.output.plots_dir.clone());
        let plot_path = report::save_chart(&plots_dir, &store::plot_file_name(&stamp), &counts)?;
        println!("Saved chart to {}", plot_path.display());
    }

    Ok(())
}

async fn run_search(
    config: &Config,
    query: &str,
    source: &str,
    save: bool,
    json: bool,
) -> Result<()> {
    let registry = ConnectorRegistry::new();
    let connector = registry.get_required(source)?;

    let records = connector
        .search(query)
        .await
        .with_context(|| format!("Search against '{}' failed", source))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for record in &records {
            println!("{} ({})", record.title, record.year);
        }
        println!();
        println!("{} records from {}", records.len(), connector.name());
    }

    if save {
        let stamp = store::run_stamp();
        let path = store::save_dataset(
            &config.output.results_dir,
            &store::dataset_file_name(&stamp),
            &records,
        )?;
        println!("Saved dataset to {}", path.display());
    }

    Ok(())
}

fn run_merge(config: &Config, csv1: &PathBuf, csv2: &PathBuf, plot: bool) -> Result<()> {
    let first = store::load_dataset(csv1)?;
    let second = store::load_dataset(csv2)?;

    let dataset = merge(first, second);

    for (a, b) in near_duplicate_titles(&dataset) {
        tracing::warn!(first = %a, second = %b, "titles look like the same work");
    }

    let counts = count_by_year(&dataset);
    print!("{}", report::render_text(&counts));

    let (csv_name, plot_name) = store::merged_file_names(csv1, csv2);
    let csv_path = store::save_dataset(&config.output.results_dir, &csv_name, &dataset)?;
    println!("Merged CSV saved to: {}", csv_path.display());

    if plot {
        let plot_path = report::save_chart(&config.output.plots_dir, &plot_name, &counts)?;
        println!("Saved chart to {}", plot_path.display());
    }

    Ok(())
}

fn run_report(config: &Config, dataset: &PathBuf, plot: bool, json: bool) -> Result<()> {
    let records = store::load_dataset(dataset)?;
    let counts = count_by_year(&records);

    if json {
        println!("{}", serde_json::to_string_pretty(&counts.to_json())?);
    } else {
        print!("{}", report::render_text(&counts));
    }

    if plot {
        let stamp = store::run_stamp();
        let plot_path = report::save_chart(
            &config.output.plots_dir,
            &store::plot_file_name(&stamp),
            &counts,
        )?;
        println!("Saved chart to {}", plot_path.display());
    }

    Ok(())
}

fn run_sources(detailed: bool) {
    let registry = ConnectorRegistry::new();

    let mut connectors: Vec<_> = registry.all().collect();
    connectors.sort_by_key(|c| c.id().to_string());

    for connector in connectors {
        if detailed {
            let mut caps = Vec::new();
            if connector.supports_search() {
                caps.push("search");
            }
            if connector.supports_pagination() {
                caps.push("pagination");
            }
            if connector.supports_citations() {
                caps.push("citations");
            }
            println!("{:<14} {:<22} [{}]", connector.id(), connector.name(), caps.join(", "));
        } else {
            println!("{:<14} {}", connector.id(), connector.name());
        }
    }
}

fn http_client(config: &Config) -> HttpClient {
    let timeout = Duration::from_secs(config.http.request_timeout_secs);
    match &config.http.user_agent {
        Some(user_agent) => HttpClient::with_settings(user_agent, timeout),
        None => HttpClient::with_settings(
            concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
            timeout,
        ),
    }
}
