mod cli;
mod config;
mod error;
mod github;
mod local;
mod logging;
mod orchestrator;
mod render;
mod stats;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use config::{Config, TOKEN_ENV_VAR};
use error::WrappedError;
use github::SnapshotCache;
use indicatif::{ProgressBar, ProgressStyle};
use orchestrator::{Orchestrator, Source};
use render::Format;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // Validate CLI arguments
    if let Err(e) = cli.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle subcommands
    if let Some(command) = &cli.command {
        return handle_command(command, &cli);
    }

    let config = Config::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;
    let config = apply_cli_overrides(config, &cli);
    let token = config.resolve_token(cli.token.as_deref());

    let source = build_source(&cli, &config, token.is_some());
    run_report(config, token, source, &cli).await
}

fn build_source(cli: &Cli, config: &Config, has_token: bool) -> Source {
    if let Some(root) = &cli.path {
        return Source::Local {
            root: root.clone(),
            author: cli.author.clone().or_else(get_git_user_email),
        };
    }

    let user = cli.user.clone().or_else(|| config.default_user.clone());
    if user.is_none() && !has_token {
        eprintln!("Error: no GitHub user to report on.");
        eprintln!("\nPlease either:");
        eprintln!("  1. Pass --user <login>");
        eprintln!("  2. Set the {} environment variable (or pass --token)", TOKEN_ENV_VAR);
        eprintln!("  3. Set default_user or github_token in the config file");
        eprintln!("  4. Use --path <dir> to read local repositories instead");
        std::process::exit(1);
    }

    Source::GitHub {
        user,
        repo: cli.repo_slug(),
    }
}

async fn run_report(
    config: Config,
    token: Option<String>,
    source: Source,
    cli: &Cli,
) -> anyhow::Result<()> {
    let year = cli.year();
    let to_stdout = cli.output.is_none();
    let show_progress = !(to_stdout && cli.format == Format::Json) && io::stderr().is_terminal();

    let orchestrator = Orchestrator::new(config, token).context("Failed to initialize")?;

    let spinner = if show_progress {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(match &source {
            Source::GitHub { .. } => format!("Fetching {} activity from GitHub...", year),
            Source::Local { .. } => format!("Reading {} activity from local repositories...", year),
        });
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));
        Some(spinner)
    } else {
        None
    };

    let result = orchestrator.run(&source, year).await;
    if let Some(spinner) = &spinner {
        spinner.finish_and_clear();
    }

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            report_failure(&e);
            std::process::exit(1);
        }
    };

    let color = to_stdout && cli.format == Format::Terminal && io::stdout().is_terminal();
    let rendered = render::render(&report, cli.format, color).context("Failed to render report")?;

    match output_path(cli.output.as_ref(), cli.format) {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("✓ Wrote {} report to {}", report.year, path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .context("Failed to write to stdout")?;
            if !rendered.ends_with('\n') {
                writeln!(stdout)?;
            }
        }
    }

    Ok(())
}

/// Explain a failed run, with a hint for the common GitHub failures
fn report_failure(e: &WrappedError) {
    eprintln!("Error: {}", e);
    if e.is_bad_credentials() {
        eprintln!("\nThe GitHub token was rejected. Check {} or --token.", TOKEN_ENV_VAR);
    } else if e.is_rate_limited() {
        eprintln!("\nGitHub rate limit reached. Try again later or provide a token for a higher limit.");
    }
}

/// Output file, with the format's extension added when none was given
fn output_path(output: Option<&PathBuf>, format: Format) -> Option<PathBuf> {
    output.map(|path| {
        let mut path = path.clone();
        if path.extension().is_none() {
            path.set_extension(format.extension());
        }
        path
    })
}

fn handle_command(command: &Commands, cli: &Cli) -> anyhow::Result<()> {
    match command {
        Commands::Init { force } => {
            let config_path = match &cli.config {
                Some(path) => path.clone(),
                None => Config::default_config_path()?,
            };

            if config_path.exists() && !force {
                eprintln!("Config file already exists at: {}", config_path.display());
                eprintln!("Use --force to overwrite");
                std::process::exit(1);
            }

            Config::create_default_at(&config_path)?;
            println!("✓ Created config file at: {}", config_path.display());
            println!("\nTo authenticate with GitHub, either:");
            println!("  1. Set the {} environment variable", TOKEN_ENV_VAR);
            println!("  2. Add github_token to the config file:");
            println!("     github_token = \"ghp_YOUR_TOKEN_HERE\"");
        }
        Commands::Config => {
            let config = Config::load_or_default(cli.config.as_deref())?;
            let mut shown = config.clone();
            if shown.github_token.is_some() {
                shown.github_token = Some("********".to_string());
            }
            let toml_str = toml::to_string_pretty(&shown)?;
            println!("Current configuration:\n");
            println!("{}", toml_str);
        }
        Commands::ClearCache { expired } => {
            let cache_dir = Config::default_cache_dir()?;
            if !cache_dir.exists() {
                println!("Cache directory does not exist");
            } else if *expired {
                let config = Config::load_or_default(cli.config.as_deref())?;
                let cache = SnapshotCache::from_config(&config)?;
                let removed = cache.cleanup_expired()?;
                println!("✓ Removed {} expired entries", removed);
            } else {
                std::fs::remove_dir_all(&cache_dir)?;
                println!("✓ Cache cleared: {}", cache_dir.display());
            }
        }
        Commands::CacheStats => {
            let cache_dir = Config::default_cache_dir()?;
            if !cache_dir.exists() {
                println!("Cache directory does not exist");
            } else {
                println!("Cache directory: {}", cache_dir.display());

                match SnapshotCache::new(&cache_dir, 0) {
                    Ok(cache) => {
                        let stats = cache.stats();
                        println!("Total entries: {}", stats.total_entries);
                        println!("Database size: {}", stats.format_size());
                    }
                    Err(e) => println!("Could not open cache database: {}", e),
                }
            }
        }
    }
    Ok(())
}

/// Try to get user email from git config
fn get_git_user_email() -> Option<String> {
    use std::process::Command;

    Command::new("git")
        .args(["config", "--get", "user.email"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                String::from_utf8(output.stdout)
                    .ok()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
            } else {
                None
            }
        })
}

fn apply_cli_overrides(mut config: Config, cli: &Cli) -> Config {
    if cli.no_cache {
        config.cache_enabled = false;
    }

    if cli.no_compare {
        config.compare_previous_year = false;
    }

    config
}
