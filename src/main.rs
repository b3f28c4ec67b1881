use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use eol_checker::check::Pipeline;
use eol_checker::config::{self, AppConfig, DEFAULT_REFRESH_INTERVAL_MS};
use eol_checker::lifecycle::{Cache, CycleStorer, VersionResolver};
use eol_checker::logging::{self, LogFormat};
use eol_checker::parser::{GradleParser, ManifestParser, VariableTable};
use eol_checker::report::{CsvReport, ReportSink, TableReport};
use eol_checker::scan::{GitHubScanner, GitHubTarget, LocalScanner, ManifestSource};

#[derive(Parser)]
#[command(name = "eol-checker")]
#[command(version, about = "End-of-life checker for Gradle dependencies")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Console log format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan manifests and report end-of-life status
    Scan(ScanArgs),
    /// Print what the parser extracts from one manifest (no network)
    Parse {
        /// Path to a build.gradle or libraries.gradle file
        file: PathBuf,
    },
    /// Manage the lifecycle cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Remove all cached lifecycle data
    Clear,
}

#[derive(Args)]
struct ScanArgs {
    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// GitHub owner or repository URL
    #[arg(long, conflicts_with = "path")]
    repo: Option<String>,

    /// GitHub token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Branch to scan instead of the default branch
    #[arg(long)]
    branch: Option<String>,

    /// Local directory to scan instead of GitHub
    #[arg(long)]
    path: Option<PathBuf>,

    /// Group to product mapping file
    #[arg(long)]
    mapping: Option<PathBuf>,

    /// CSV output path
    #[arg(long)]
    output: Option<PathBuf>,

    /// Always query the lifecycle source
    #[arg(long)]
    no_cache: bool,

    /// Look up latest versions and release dates on Maven Central
    #[arg(long)]
    with_latest: bool,
}

impl ScanArgs {
    fn load_config(&self) -> anyhow::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => config::load_config(path)
                .with_context(|| format!("Failed to load config {:?}", path))?,
            None => AppConfig::default(),
        };

        if let Some(repo) = &self.repo {
            config.github.repo = Some(repo.clone());
        }
        if let Some(token) = &self.token {
            config.github.token = Some(token.clone());
        }
        if let Some(branch) = &self.branch {
            config.github.branch = Some(branch.clone());
        }
        if let Some(mapping) = &self.mapping {
            config.mapping_file = mapping.clone();
        }
        if let Some(output) = &self.output {
            config.output.csv_path = output.clone();
        }
        if self.no_cache {
            config.cache.enabled = false;
        }
        if self.with_latest {
            config.maven.enabled = true;
        }

        Ok(config)
    }
}

fn manifest_source(args: &ScanArgs, config: &AppConfig) -> anyhow::Result<Box<dyn ManifestSource>> {
    if let Some(path) = &args.path {
        return Ok(Box::new(LocalScanner::new(path)));
    }

    let Some(repo) = &config.github.repo else {
        bail!("Nothing to scan: pass --repo, --path or set github.repo in the config file");
    };

    let target = GitHubTarget::parse(repo)?;
    let scanner = GitHubScanner::new(target, config.github.token.as_deref())?
        .with_branch(config.github.branch.clone())
        .with_retry((&config.retry).into());
    Ok(Box::new(scanner))
}

async fn run_scan(args: ScanArgs) -> anyhow::Result<()> {
    let config = args.load_config()?;
    let source = manifest_source(&args, &config)?;
    let pipeline = Pipeline::from_config(&config)?;

    let today = chrono::Local::now().date_naive();
    let rows = pipeline.run(source.as_ref(), today).await?;

    let csv_path = &config.output.csv_path;
    let mut csv = BufWriter::new(
        File::create(csv_path).with_context(|| format!("Failed to create {:?}", csv_path))?,
    );
    CsvReport.write(&rows, &mut csv)?;
    csv.flush()?;
    info!("Summary saved to: {:?}", csv_path);

    let mut stdout = io::stdout().lock();
    TableReport.write(&rows, &mut stdout)?;
    Ok(())
}

fn run_parse(file: &Path) -> anyhow::Result<()> {
    let content =
        std::fs::read_to_string(file).with_context(|| format!("Failed to read {:?}", file))?;

    let parser = GradleParser::new();
    let mut variables = VariableTable::new();
    let parsed = parser.parse(&content, &mut variables);
    let resolver = VersionResolver::new();

    let mut out = io::stdout().lock();
    writeln!(out, "Dependencies ({}):", parsed.dependencies.len())?;
    for declared in &parsed.dependencies {
        let resolved = resolver.resolve(&declared.dependency.version, &variables);
        writeln!(
            out,
            "  line {:>4}: {} -> {}",
            declared.line + 1,
            declared.dependency,
            resolved
        )?;
    }

    writeln!(out, "Variables ({}):", variables.len())?;
    for (name, value) in variables.sorted() {
        writeln!(out, "  {} = {}", name, value)?;
    }

    writeln!(out, "Diagnostics ({}):", parsed.diagnostics.len())?;
    for diagnostic in &parsed.diagnostics {
        writeln!(out, "  {}", diagnostic)?;
    }

    Ok(())
}

fn run_cache_clear() -> anyhow::Result<()> {
    let path = config::db_path();
    if !path.exists() {
        println!("No cache at {:?}", path);
        return Ok(());
    }

    let cache = Cache::new(&path, DEFAULT_REFRESH_INTERVAL_MS)?;
    let removed = cache.clear()?;
    println!("Removed {} cached products from {:?}", removed, path);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init(cli.verbose, cli.log_format, Some(&config::log_path()));

    match cli.command {
        Command::Scan(args) => tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?
            .block_on(run_scan(args)),
        Command::Parse { file } => run_parse(&file),
        Command::Cache {
            action: CacheAction::Clear,
        } => run_cache_clear(),
    }
}
