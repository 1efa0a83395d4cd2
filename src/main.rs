use clap::{Parser, Subcommand};
use colored::Colorize;
use miette::{IntoDiagnostic, Result, WrapErr};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

use rubydeadcode::plugins::registry;
use rubydeadcode::{
    Config, DefinitionKind, FileFinder, IndexBuilder, Location, ParallelIndexBuilder, Remover,
    ReportFormat, Reporter, ScanResult,
};

/// rubydeadcode - Dead code detection and removal for Ruby/Sorbet
#[derive(Parser, Debug)]
#[command(name = "rubydeadcode")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to the project directory to analyze
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Target directories to analyze (can be specified multiple times)
    #[arg(short, long)]
    target: Vec<PathBuf>,

    /// Patterns to exclude (can be specified multiple times)
    #[arg(short, long)]
    exclude: Vec<String>,

    /// Plugin ids to enable on top of the detected ones (can be specified multiple times)
    #[arg(short, long = "plugin", value_name = "ID")]
    plugins: Vec<String>,

    /// Don't pick plugins from Gemfile.lock
    #[arg(long)]
    no_manifest: bool,

    /// Output format (defaults to the configured one)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file (for json format)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also list definitions exempted by plugins
    #[arg(long)]
    show_ignored: bool,

    /// Enable parallel processing for faster analysis
    #[arg(long)]
    parallel: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Remove one definition from its file
    Remove {
        /// Definition kind: class, module, method, attr_reader, attr_writer or constant
        kind: DefinitionKind,

        /// Location as reported by a scan, e.g. `app/models/user.rb:3:3-5:6`
        location: Location,

        /// Print the rewritten file instead of saving it
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Terminal,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => ReportFormat::Terminal,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    info!("rubydeadcode v{}", env!("CARGO_PKG_VERSION"));

    match &cli.command {
        Some(Command::Remove {
            kind,
            location,
            dry_run,
        }) => run_remove(*kind, location, *dry_run),
        None => {
            let config = load_config(&cli)?;
            run_analysis(&config, &cli)
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Reports go to stdout
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref(), &cli.path)?;

    // Override with CLI arguments
    if !cli.target.is_empty() {
        config.targets = cli.target.clone();
    }
    if !cli.exclude.is_empty() {
        config.exclude.extend(cli.exclude.clone());
    }
    if !cli.plugins.is_empty() {
        config.plugins.enable.extend(cli.plugins.clone());
    }
    if cli.no_manifest {
        config.plugins.use_manifest = false;
    }
    if cli.show_ignored {
        config.report.show_ignored = true;
    }

    Ok(config)
}

fn run_analysis(config: &Config, cli: &Cli) -> Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};

    let start_time = Instant::now();

    let format = match cli.format {
        Some(format) => format.into(),
        None => config
            .report
            .format
            .parse::<ReportFormat>()
            .map_err(|e| miette::miette!("{}", e))
            .wrap_err("Invalid report format in configuration")?,
    };

    // Step 1: Discover files
    info!("Discovering files...");
    let finder = FileFinder::new(config);
    let files = finder.find_files(&cli.path)?;

    info!("Found {} files to analyze", files.len());
    if files.is_empty() {
        warn!("No Ruby files found under {}", cli.path.display());
    }

    // Step 2: Pick plugins
    let plugins = registry::load(&config.plugins, &cli.path)?;

    // Step 3: Index files
    let result: ScanResult = if cli.parallel {
        ParallelIndexBuilder::new(&plugins).build_from_files(&files)
    } else {
        let pb = if cli.quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(files.len() as u64)
        };
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(style);

        info!("Indexing files...");
        let mut builder = IndexBuilder::new(&plugins);

        for file in &files {
            if let Err(error) = builder.process_file(file) {
                warn!("{:?}", error);
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        builder.build()
    };

    info!(
        "Indexed {} files in {:.2}s ({} skipped)",
        files.len(),
        start_time.elapsed().as_secs_f64(),
        result.parse_errors.len()
    );

    // Step 4: Report
    Reporter::new(format, cli.output.clone())
        .with_ignored(config.report.show_ignored)
        .report(&result)
}

fn run_remove(kind: DefinitionKind, location: &Location, dry_run: bool) -> Result<()> {
    let source = std::fs::read_to_string(&location.file)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read {}", location.file.display()))?;

    let mut remover = Remover::new();
    let rewritten = remover.remove(kind, location, &source)?;

    if dry_run {
        print!("{}", rewritten);
        return Ok(());
    }

    std::fs::write(&location.file, rewritten)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to write {}", location.file.display()))?;

    println!("{} {} at {}", "✓ Removed".green(), kind, location);
    Ok(())
}
