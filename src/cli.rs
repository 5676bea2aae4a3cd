use crate::github::RepoSlug;
use crate::render::Format;
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// First year GitHub existed
pub const FIRST_YEAR: i32 = 2008;

#[derive(Parser, Debug)]
#[command(name = "git-wrapped")]
#[command(author, version)]
#[command(
    about = "Your year in code, computed from GitHub or local git history",
    long_about = "git-wrapped aggregates a year of commits, pull requests, issues and reviews \
                  into a \"year in review\": totals, streaks, a contribution heatmap, \
                  languages, a coding personality and year-over-year change. Activity comes \
                  from the GitHub API or from git repositories on disk."
)]
pub struct Cli {
    /// GitHub login to report on (default: the token's owner)
    #[arg(short, long)]
    pub user: Option<String>,

    /// Year to report on (default: current year)
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Limit the report to one repository (owner/name)
    #[arg(short, long, value_name = "OWNER/NAME")]
    pub repo: Option<String>,

    /// Read local git repositories under this directory instead of GitHub
    #[arg(short, long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Author email to filter local commits (default: git config user.email)
    #[arg(short, long)]
    pub author: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Terminal)]
    pub format: Format,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// GitHub token (falls back to the config file)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Path to config file (default: ~/.config/git-wrapped/config.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Disable caching
    #[arg(long)]
    pub no_cache: bool,

    /// Skip the previous-year comparison
    #[arg(long)]
    pub no_compare: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize configuration file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show current configuration
    Config,

    /// Clear the cache
    ClearCache {
        /// Only remove entries past their TTL
        #[arg(long)]
        expired: bool,
    },

    /// Show cache statistics
    CacheStats,
}

impl Cli {
    /// Requested year, defaulting to the current one
    pub fn year(&self) -> i32 {
        self.year.unwrap_or_else(current_year)
    }

    /// Parsed `--repo`, if given and well formed
    pub fn repo_slug(&self) -> Option<RepoSlug> {
        self.repo.as_deref().and_then(|repo| repo.parse().ok())
    }

    /// Validate CLI arguments
    pub fn validate(&self) -> Result<(), String> {
        // Local and GitHub modes are exclusive
        if self.path.is_some() && (self.repo.is_some() || self.user.is_some()) {
            return Err(
                "--path reads local repositories and cannot be combined with --repo or --user"
                    .to_string(),
            );
        }

        if self.author.is_some() && self.path.is_none() {
            return Err("--author requires --path".to_string());
        }

        if let Some(repo) = &self.repo {
            if repo.parse::<RepoSlug>().is_err() {
                return Err(format!("Invalid repository '{}'. Expected owner/name", repo));
            }
        }

        if let Some(year) = self.year {
            let last = current_year() + 1;
            if !(FIRST_YEAR..=last).contains(&year) {
                return Err(format!("Year must be between {} and {}", FIRST_YEAR, last));
            }
        }

        Ok(())
    }
}

fn current_year() -> i32 {
    Local::now().year()
}
