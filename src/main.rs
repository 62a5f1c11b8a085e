//! BpSummary - Business Process Summary Engine
//!
//! A CLI tool that scores every business process, step and group of a
//! dataset on six dimensions (scope, relevance, homogeneity,
//! automatization, code quality, security) and writes a summary report.
//!
//! Exit codes:
//!   0 - Success (no item at or below threshold, or no --fail-on set)
//!   1 - Runtime error (unreadable dataset, invalid config, etc.)
//!   2 - Items found at or below the --fail-on threshold

use anyhow::{Context, Result};
use bpsummary::analysis::{self, SummaryEngine, SummaryResults};
use bpsummary::cli::{Args, OutputFormat};
use bpsummary::config::{Config, CONFIG_FILE_NAME};
use bpsummary::dataset::Dataset;
use bpsummary::locations::LocationTree;
use bpsummary::models::{EntityReport, Report, ReportMetadata, ScoreKey};
use bpsummary::report;
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration before logging so its verbosity applies
    let (mut config, origin) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    // Initialize logging
    init_logging(args.log_level(config.general.verbose));

    info!("BpSummary v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    origin.log();

    match run_summary(args, config) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Summary failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .bpsummary.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize messages, report options, and more.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete summary workflow. Returns exit code (0 or 2).
fn run_summary(args: Args, config: Config) -> Result<i32> {
    let start_time = Instant::now();

    let input = args
        .input
        .clone()
        .context("An input dataset is required (--input)")?;

    // Step 1: Load the dataset
    println!("📥 Loading dataset: {}", input.display());
    let dataset = Dataset::load(&input)?;

    // Step 2: Build the location tree
    let tree = LocationTree::build_with_top_path(&dataset.locations, &config.locations.top_region_path);

    // Handle --dry-run: print counts and exit
    if args.dry_run {
        return handle_dry_run(&dataset, &tree);
    }

    let catalog = config.catalog();
    let engine = SummaryEngine::with_tree(tree, &catalog);
    debug!(
        "Location tree: {} roots",
        engine.tree().roots().count()
    );

    // Step 3: Compute summaries
    println!("🔬 Computing summaries for {} entities...", dataset.entity_count());
    let progress = create_progress_bar(dataset.entity_count() as u64, args.quiet);
    let results = engine.compute_with_progress(dataset.collections(), |key| {
        progress.set_message(key.to_string());
        progress.inc(1);
    })?;
    progress.finish_and_clear();

    // Step 4: Build the report
    println!("📝 Generating report...");
    let duration = start_time.elapsed().as_secs_f64();
    let report = build_report(&input.display().to_string(), &dataset, &results, duration);

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => {
            report::generate_markdown_report(&report, &catalog, &config.report)
        }
    };

    let output_path = Path::new(&config.general.output);
    std::fs::write(output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    // Print summary
    println!("\n📊 Summary Overview:");
    for line in analysis::generate_overview_text(&results).lines() {
        println!("   {}", line);
    }
    println!("   Duration: {:.2}s", duration);
    println!(
        "\n✅ Summary complete! Report saved to: {}",
        output_path.display()
    );

    // Check --fail-on threshold
    if let Some(fail_level) = args.fail_on {
        let threshold: ScoreKey = fail_level.into();
        let failing = analysis::items_at_or_below(&results, threshold);

        if failing > 0 {
            eprintln!(
                "\n⛔ {} items at or below {} level. Failing (exit code 2).",
                failing, threshold
            );
            return Ok(2);
        }
    }

    Ok(0)
}

/// Handle --dry-run: print what would be summarized, exit.
fn handle_dry_run(dataset: &Dataset, tree: &LocationTree<'_>) -> Result<i32> {
    println!("\n🔍 Dry run: dataset is valid (no summaries computed)\n");
    println!("   Locations: {}", dataset.locations.len());
    let roots: Vec<&str> = tree.roots().map(|l| l.name.as_str()).collect();
    println!("   Roots:     {} ({})", roots.len(), roots.join(", "));
    println!("   Processes: {}", dataset.processes.len());
    println!("   Steps:     {}", dataset.steps.len());
    println!("   Groups:    {}", dataset.groups.len());
    println!("\n✅ Dry run complete.");
    Ok(0)
}

/// Progress bar over entities, hidden in quiet mode.
fn create_progress_bar(len: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    match ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        Ok(style) => pb.set_style(style.progress_chars("#>-")),
        Err(e) => warn!("Invalid progress template: {}", e),
    }
    pb
}

/// Assemble the report in dataset order.
fn build_report(
    input: &str,
    dataset: &Dataset,
    results: &SummaryResults,
    duration: f64,
) -> Report {
    let (items_produced, items_attempted) = analysis::totals(results);

    let entities: Vec<EntityReport> = analysis::result_keys(&dataset.collections())
        .into_iter()
        .filter_map(|(entity, key)| {
            let result = results.get(&key)?.clone();
            Some(EntityReport {
                name: entity.display_name(),
                entity_type: entity.entity_type,
                location_id: entity.location_id,
                key,
                result,
            })
        })
        .collect();

    let metadata = ReportMetadata {
        input: input.to_string(),
        generated_at: Utc::now(),
        processes: dataset.processes.len(),
        steps: dataset.steps.len(),
        groups: dataset.groups.len(),
        locations: dataset.locations.len(),
        items_produced,
        items_attempted,
        duration_seconds: duration,
    };

    Report { metadata, entities }
}

/// Where the configuration came from, logged once logging is up.
enum ConfigOrigin {
    Explicit(PathBuf),
    DefaultFile,
    Builtin,
    Invalid(anyhow::Error),
}

impl ConfigOrigin {
    fn log(&self) {
        match self {
            ConfigOrigin::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigOrigin::DefaultFile => info!("Loaded default config from {}", CONFIG_FILE_NAME),
            ConfigOrigin::Builtin => debug!("No config file found, using defaults"),
            ConfigOrigin::Invalid(e) => warn!("Failed to load config: {}", e),
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigOrigin)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigOrigin::Explicit(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigOrigin::DefaultFile)),
        Ok(None) => Ok((Config::default(), ConfigOrigin::Builtin)),
        Err(e) => Ok((Config::default(), ConfigOrigin::Invalid(e))),
    }
}
