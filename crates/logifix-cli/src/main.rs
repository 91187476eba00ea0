use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use logifix_core::config::{OutputFormat, Settings};
use logifix_core::logging::init_logging;
use logifix_core::{ExploreOptions, Explorer, Language, Patch, PatternAnalyzer, RunStats};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Parser)]
#[command(
    name = "logifix",
    about = "Explore, prune and merge automated source rewrites"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the settings file
    #[arg(long, global = true, default_value = "logifix.json")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Explore rewrites of the given files and print one patch per rewrite
    Run {
        /// Source files to fix
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Worker threads (0 = all cores)
        #[arg(long)]
        workers: Option<usize>,
        /// Output format: json or diff
        #[arg(long)]
        format: Option<OutputFormat>,
        /// Tokenizer language (java, rust, javascript, python, plain)
        #[arg(long)]
        language: Option<Language>,
    },
    /// Write a settings file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// List the active rewrite rules
    Rules,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Run {
            files,
            workers,
            format,
            language,
        } => cmd_run(&cli, files, *workers, *format, *language).await,
        Commands::Init { force } => cmd_init(&cli, *force),
        Commands::Rules => cmd_rules(&cli),
    }
}

#[derive(Serialize)]
struct Report<'a> {
    generated_at: DateTime<Utc>,
    files: Vec<FileReport>,
    stats: &'a RunStats,
}

#[derive(Serialize)]
struct FileReport {
    path: String,
    patches: Vec<Patch>,
}

async fn cmd_run(
    cli: &Cli,
    files: &[PathBuf],
    workers: Option<usize>,
    format: Option<OutputFormat>,
    language: Option<Language>,
) -> anyhow::Result<()> {
    let mut settings = Settings::load_or_default(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    if let Some(workers) = workers {
        settings.explore.workers = workers;
    }
    if let Some(format) = format {
        settings.output.format = format;
    }

    let _guard = init_logging(&settings.logging)?;

    let mut options = ExploreOptions::from_settings(&settings.explore)?;
    match language {
        Some(language) => options.language = language,
        None if settings.explore.language.is_none() => {
            let (language, mismatched) = infer_language(files);
            for path in mismatched {
                tracing::warn!(
                    "{} will be tokenized as {} like the first file; pass --language to choose",
                    path.display(),
                    language
                );
            }
            options.language = language;
        }
        None => {}
    }

    let mut sources = Vec::with_capacity(files.len());
    for path in files {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        sources.push((path.clone(), text));
    }

    let analyzer = PatternAnalyzer::from_settings(&settings.rules);
    if analyzer.is_empty() {
        tracing::warn!("No rules enabled; nothing will be rewritten");
    }
    tracing::info!(
        "Exploring {} file(s) with {} rule(s), language {}",
        sources.len(),
        analyzer.len(),
        options.language
    );

    let total = sources.len();
    let started = AtomicUsize::new(0);
    let options = options.with_progress(move |node| {
        let n = started.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::info!("Exploring file {}/{} ({})", n, total, node);
    });

    let mut explorer = Explorer::new(analyzer, options);
    for (_, text) in &sources {
        explorer.add_seed(text);
    }
    let exploration = tokio::task::spawn_blocking(move || explorer.run()).await?;

    let mut resolver = exploration.resolver();
    match settings.output.format {
        OutputFormat::Json => {
            let files = sources
                .iter()
                .map(|(path, text)| FileReport {
                    path: path.display().to_string(),
                    patches: resolver.patches_for(text),
                })
                .collect();
            let report = Report {
                generated_at: Utc::now(),
                files,
                stats: exploration.stats(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Diff => {
            for (path, text) in &sources {
                let name = path.display().to_string();
                for patch in resolver.patches_for(text) {
                    println!("# {} [{}]", name, patch.rule);
                    print!("{}", patch.unified_diff(text, &name));
                }
            }
        }
    }

    Ok(())
}

/// Language of the first file, plus every other file whose extension maps
/// to a different one. A run tokenizes all files with a single language.
fn infer_language(files: &[PathBuf]) -> (Language, Vec<&Path>) {
    let Some(first) = files.first() else {
        return (Language::Plain, Vec::new());
    };
    let language = Language::from_path(first);
    let mismatched = files[1..]
        .iter()
        .map(PathBuf::as_path)
        .filter(|path| Language::from_path(path) != language)
        .collect();
    (language, mismatched)
}

fn cmd_init(cli: &Cli, force: bool) -> anyhow::Result<()> {
    let path: &Path = &cli.config;
    if path.exists() && !force {
        eprintln!("{} already exists. Use --force to overwrite.", path.display());
        std::process::exit(1);
    }
    Settings::default().save(path)?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

fn cmd_rules(cli: &Cli) -> anyhow::Result<()> {
    let settings = Settings::load_or_default(&cli.config)?;
    let analyzer = PatternAnalyzer::from_settings(&settings.rules);
    if analyzer.is_empty() {
        println!("No rules enabled.");
        return Ok(());
    }
    println!("Active rules:");
    for id in analyzer.rule_ids() {
        println!("  {}", id);
    }
    Ok(())
}
