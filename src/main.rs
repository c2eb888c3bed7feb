use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use pydoc_patcher::config::{load_or_default, Config, OutputMode};
use pydoc_patcher::{
    discover_files, run_batch, BatchReport, FileDiff, FileOutcome, JavadocFormatter, Session, Span,
};
use std::env;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "pydoc-patcher")]
#[command(about = "Regenerate Python docstrings and emit unified diffs", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging (RUST_LOG also works without this flag)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct StyleArgs {
    /// Config file (defaults to ./pydoc-patcher.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Docstring layout, e.g. "normal"
    #[arg(long)]
    doc_type: Option<String>,

    /// Parameter dialect: "standard" or "restructuredtext"
    #[arg(long)]
    param_type: Option<String>,

    /// Only process the given directory, not its subdirectories
    #[arg(long)]
    no_recursive: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a <file>.patch with regenerated docstrings for each source file
    Diff {
        /// Python file or directory
        path: PathBuf,

        #[command(flatten)]
        style: StyleArgs,

        /// Directory to write patch files into
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Show what would change without writing patch files
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Print the unified diff of each file
        #[arg(short, long)]
        show: bool,
    },

    /// Rewrite source files with regenerated docstrings
    Apply {
        /// Python file or directory
        path: PathBuf,

        #[command(flatten)]
        style: StyleArgs,

        /// Overwrite the original files
        #[arg(long, conflicts_with = "prefix")]
        in_place: bool,

        /// Write <prefix><file> beside each original
        #[arg(long)]
        prefix: Option<String>,

        /// Show what would change without writing files
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Print the unified diff of each file
        #[arg(short, long)]
        show: bool,
    },

    /// List the declarations and docstring spans found in each file
    Scan {
        /// Python file or directory
        path: PathBuf,

        #[command(flatten)]
        style: StyleArgs,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        Some(EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().ok()
    };
    if let Some(filter) = filter {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .context("failed to set tracing subscriber")?;
        tracing::debug!("logging enabled");
    }

    match cli.command {
        Commands::Diff {
            path,
            style,
            output_dir,
            dry_run,
            show,
        } => {
            let mut config = resolve_config(&style)?;
            config.output.mode = OutputMode::Patch;
            if output_dir.is_some() {
                config.output.directory = output_dir;
            }
            cmd_process(&path, &config, dry_run, show)
        }

        Commands::Apply {
            path,
            style,
            in_place,
            prefix,
            dry_run,
            show,
        } => {
            let mut config = resolve_config(&style)?;
            if in_place {
                config.output.mode = OutputMode::InPlace;
            } else if let Some(prefix) = prefix {
                config.output.mode = OutputMode::Prefix;
                config.output.prefix = prefix;
            } else if config.output.mode == OutputMode::Patch {
                config.output.mode = OutputMode::Prefix;
            }
            config.validate()?;
            cmd_process(&path, &config, dry_run, show)
        }

        Commands::Scan { path, style, json } => {
            let config = resolve_config(&style)?;
            cmd_scan(&path, &config, json)
        }
    }
}

/// Load the config file and apply command-line overrides.
fn resolve_config(args: &StyleArgs) -> Result<Config> {
    let cwd = env::current_dir()?;
    let mut config = load_or_default(args.config.as_deref(), &cwd)?;

    if let Some(doc_type) = &args.doc_type {
        config.style.doc_type = doc_type.clone();
    }
    if let Some(param_type) = &args.param_type {
        config.style.param_type = param_type.clone();
    }
    if args.no_recursive {
        config.discovery.recursive = false;
    }
    config.validate()?;
    Ok(config)
}

/// Helper: Show a unified diff with colored additions and removals
fn display_diff(diff: &FileDiff) {
    for line in diff.lines() {
        let styled = if line.starts_with("+++") || line.starts_with("---") {
            line.dimmed()
        } else if line.starts_with("@@") {
            line.cyan()
        } else if line.starts_with('+') {
            line.green()
        } else if line.starts_with('-') {
            line.red()
        } else {
            line.normal()
        };
        print!("{}", styled);
    }
}

fn cmd_process(path: &Path, config: &Config, dry_run: bool, show: bool) -> Result<()> {
    let files = discover_files(path, &config.discovery)?;
    if files.is_empty() {
        println!("{}", format!("No source files found in {}", path.display()).yellow());
        return Ok(());
    }

    if dry_run {
        println!("{}", "[DRY RUN - nothing will be written]".cyan());
    }

    let report = run_batch(&files, &JavadocFormatter, config, dry_run);

    for file in &report.files {
        match &file.result {
            Ok(FileOutcome::Unchanged) => {
                println!("{} {}: Unchanged", "⊙".yellow(), file.path.display());
            }
            Ok(FileOutcome::Patched { patch, diff }) => {
                let (added, removed) = diff.stats();
                let verb = if dry_run { "Would write" } else { "Wrote" };
                println!(
                    "{} {}: {} {} (+{} -{})",
                    "✓".green(),
                    file.path.display(),
                    verb,
                    patch.display(),
                    added,
                    removed
                );
                if show {
                    display_diff(diff);
                }
            }
            Ok(FileOutcome::Rewritten { dest, diff }) => {
                let (added, removed) = diff.stats();
                let verb = if dry_run { "Would rewrite" } else { "Rewrote" };
                println!(
                    "{} {}: {} {} (+{} -{})",
                    "✓".green(),
                    file.path.display(),
                    verb,
                    dest.display(),
                    added,
                    removed
                );
                if show {
                    display_diff(diff);
                }
            }
            Err(e) => {
                eprintln!("{} {}: Failed - {}", "✗".red(), file.path.display(), e);
            }
        }
    }

    print_summary(&report);

    if report.failed() > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn print_summary(report: &BatchReport) {
    println!();
    println!("{}", "Summary:".bold());
    println!("  {} changed", format!("{}", report.changed()).green());
    println!("  {} unchanged", format!("{}", report.unchanged()).yellow());
    println!("  {} failed", format!("{}", report.failed()).red());
}

fn cmd_scan(path: &Path, config: &Config, json: bool) -> Result<()> {
    let files = discover_files(path, &config.discovery)?;
    let mut session = Session::new(&JavadocFormatter, config.style.clone());
    let mut documents = Vec::new();
    let mut failed = 0;

    for file in &files {
        let table = match session.open(file).and_then(|()| session.parse().cloned()) {
            Ok(table) => table,
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), file.display(), e);
                failed += 1;
                continue;
            }
        };

        if json {
            documents.push(serde_json::json!({
                "path": file.display().to_string(),
                "elements": table.summary(),
            }));
        } else {
            println!("{}", file.display().to_string().bold());
            for element in &table {
                let span = match element.span {
                    Span::Present { start, end } => {
                        format!("{}-{}", start + 1, end + 1).green()
                    }
                    Span::Absent { .. } => "undocumented".yellow(),
                };
                println!("  {:>5}  {}  [{}]", element.line + 1, element.header_text, span);
            }
        }
        session.release();
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&documents)?);
    }
    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
