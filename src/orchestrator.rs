use crate::config::Config;
use crate::error::{Result, WrappedError};
use crate::github::client::{created_in, CommitItem, CommitStats};
use crate::github::{rank_collaborators, GitHubClient, RepoSlug, SnapshotCache};
use crate::local::{repo_display_name, Parser, Scanner};
use crate::stats::{
    build_report, ActivityRecord, ActivitySnapshot, PeriodTotals, RepoLanguages, ReportPeriod,
    WrappedReport,
};
use chrono::Local;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Where activity comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// GitHub REST API; `user` defaults to the token's owner
    GitHub {
        user: Option<String>,
        repo: Option<RepoSlug>,
    },
    /// Git repositories under `root`
    Local {
        root: PathBuf,
        author: Option<String>,
    },
}

impl Source {
    fn scope(&self) -> Option<String> {
        match self {
            Source::GitHub { repo, .. } => repo.as_ref().map(RepoSlug::full_name),
            Source::Local { .. } => None,
        }
    }

    fn cache_label(&self) -> String {
        match self {
            Source::GitHub { .. } => "github".to_string(),
            Source::Local { root, .. } => format!("local:{}", root.display()),
        }
    }

    fn cache_user(&self) -> Option<&str> {
        match self {
            Source::GitHub { user, .. } => user.as_deref(),
            Source::Local { author, .. } => Some(author.as_deref().unwrap_or("")),
        }
    }
}

/// Coordinates fetching, caching and aggregation
pub struct Orchestrator {
    config: Config,
    client: GitHubClient,
    cache: Option<SnapshotCache>,
}

impl Orchestrator {
    pub fn new(config: Config, token: Option<String>) -> Result<Self> {
        let cache = if config.cache_enabled {
            Some(SnapshotCache::from_config(&config)?)
        } else {
            None
        };

        Self::with_cache(config, token, cache)
    }

    /// Build with an explicit cache (or none)
    pub fn with_cache(
        config: Config,
        token: Option<String>,
        cache: Option<SnapshotCache>,
    ) -> Result<Self> {
        let client = GitHubClient::new(&config.api_base_url, token.as_deref())?;

        Ok(Self {
            config,
            client,
            cache,
        })
    }

    /// Fetch `year` (and the year before when enabled) and build the report
    pub async fn run(&self, source: &Source, year: i32) -> Result<WrappedReport> {
        let snapshot = self.snapshot(source, year).await?;
        tracing::info!(
            "Fetched {} commits for {} in {}",
            snapshot.records.len(),
            snapshot.username,
            year
        );

        let previous = if self.config.compare_previous_year {
            self.previous_totals(source, &snapshot, year).await
        } else {
            None
        };

        let period = ReportPeriod {
            year,
            scope: source.scope(),
            today: Local::now().date_naive(),
        };

        Ok(build_report(&snapshot, &period, previous.as_ref()))
    }

    /// Totals of the year before, or `None` unless every part of it was fetched
    async fn previous_totals(
        &self,
        source: &Source,
        current: &ActivitySnapshot,
        year: i32,
    ) -> Option<PeriodTotals> {
        // Reuse the resolved login so the token owner is not looked up twice
        let source = match source {
            Source::GitHub { repo, .. } => Source::GitHub {
                user: Some(current.username.clone()),
                repo: repo.clone(),
            },
            local => local.clone(),
        };

        match self.snapshot_with(&source, year - 1, FetchMode::Strict).await {
            Ok(previous) => Some(PeriodTotals::from_snapshot(&previous)),
            Err(e) => {
                tracing::warn!("Skipping comparison with {}: {}", year - 1, e);
                None
            }
        }
    }

    /// Snapshot for one year, served from the cache when fresh.
    ///
    /// Repositories or searches that fail are logged and left empty.
    pub async fn snapshot(&self, source: &Source, year: i32) -> Result<ActivitySnapshot> {
        self.snapshot_with(source, year, FetchMode::Lenient).await
    }

    async fn snapshot_with(
        &self,
        source: &Source,
        year: i32,
        mode: FetchMode,
    ) -> Result<ActivitySnapshot> {
        let key = match (&self.cache, source.cache_user()) {
            (Some(_), Some(user)) => Some(SnapshotCache::generate_key(
                &source.cache_label(),
                user,
                year,
                source.scope().as_deref(),
            )),
            _ => None,
        };

        if let (Some(cache), Some(key)) = (&self.cache, &key) {
            match cache.get(key) {
                Ok(Some(snapshot)) => {
                    tracing::info!("Using cached snapshot for {}", year);
                    return Ok(snapshot);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!("Cache read failed: {}", e),
            }
        }

        let fetched = match source {
            Source::GitHub { user, repo } => {
                self.fetch_github(user.as_deref(), repo.as_ref(), year, mode)
                    .await?
            }
            Source::Local { root, author } => {
                self.fetch_local(root.clone(), author.clone(), year, mode)
                    .await?
            }
        };

        // Only complete snapshots are cached
        if let (Some(cache), Some(key)) = (&self.cache, &key) {
            if !fetched.complete {
                tracing::debug!("Not caching incomplete snapshot for {}", year);
            } else if let Err(e) = cache.set(key, &fetched.snapshot) {
                tracing::warn!("Cache write failed: {}", e);
            }
        }

        Ok(fetched.snapshot)
    }

    async fn fetch_github(
        &self,
        user: Option<&str>,
        repo: Option<&RepoSlug>,
        year: i32,
        mode: FetchMode,
    ) -> Result<Fetched> {
        let login = match user {
            Some(user) => user.to_string(),
            None if self.client.is_authenticated() => self.client.authenticated_user().await?.login,
            None => {
                return Err(WrappedError::MissingConfig(
                    "a GitHub username or token is required".to_string(),
                ))
            }
        };
        let profile = self.client.user(&login).await?;
        let login = profile.login;

        let repos = match repo {
            Some(slug) => vec![slug.clone()],
            None => self.client.list_repos(&login, self.config.max_repos).await?,
        };
        tracing::info!("Scanning {} repositories for {}", repos.len(), login);

        let (records, commits_complete) = self.fetch_commits(repos, &login, year, mode).await?;

        let mut scope = created_in(year);
        if let Some(slug) = repo {
            scope.push_str(&format!(" repo:{}", slug.full_name()));
        }
        let pr_query = format!("author:{} type:pr {}", login, scope);
        let issue_query = format!("author:{} type:issue {}", login, scope);
        let review_query = format!("reviewed-by:{} type:pr {}", login, scope);
        let involves_query = format!("involves:{} type:pr {}", login, scope);

        let (prs, issues, reviews, involved, (repo_languages, languages_complete)) = tokio::join!(
            self.client.search_count(&pr_query),
            self.client.search_count(&issue_query),
            self.client.search_count(&review_query),
            self.client.search_authors(&involves_query),
            self.fetch_languages(&records),
        );

        // Pull requests feed the comparison; the other searches never do
        let pr_count = match prs {
            Err(e) if mode == FetchMode::Strict => return Err(e),
            prs => prs,
        };
        let complete = commits_complete
            && languages_complete
            && pr_count.is_ok()
            && issues.is_ok()
            && reviews.is_ok()
            && involved.is_ok();

        Ok(Fetched {
            complete,
            snapshot: ActivitySnapshot {
                avatar_url: profile.avatar_url,
                pr_count: or_default("pull request count", pr_count),
                issue_count: or_default("issue count", issues),
                review_count: or_default("review count", reviews),
                collaborators: rank_collaborators(&or_default("collaborators", involved), &login),
                username: login,
                records,
                repo_languages,
            },
        })
    }

    /// List every repository's commits, then enrich a sample with line counts.
    ///
    /// The flag is false when a listing or detail call fell back to empty.
    async fn fetch_commits(
        &self,
        repos: Vec<RepoSlug>,
        login: &str,
        year: i32,
        mode: FetchMode,
    ) -> Result<(Vec<ActivityRecord>, bool)> {
        let limit = self.config.max_concurrency;
        let mut complete = true;

        let client = self.client.clone();
        let author = login.to_string();
        let outcomes = run_bounded(repos, limit, move |slug: RepoSlug| {
            let client = client.clone();
            let author = author.clone();
            async move {
                let listed = client.list_commits(&slug, &author, year).await;
                Some((slug, listed))
            }
        })
        .await;

        let mut listings: Vec<(RepoSlug, Vec<CommitItem>)> = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                Some((slug, Ok(items))) => listings.push((slug, items)),
                Some((slug, Err(e))) => {
                    if mode == FetchMode::Strict {
                        return Err(e);
                    }
                    tracing::warn!("Skipping commits of {}: {}", slug, e);
                    complete = false;
                }
                None => {
                    if mode == FetchMode::Strict {
                        return Err(WrappedError::incomplete("a commit listing task failed"));
                    }
                    complete = false;
                }
            }
        }

        let sample = self.config.commit_detail_sample;
        let jobs: Vec<(usize, usize, RepoSlug, String)> = listings
            .iter()
            .enumerate()
            .flat_map(|(i, (slug, items))| {
                items
                    .iter()
                    .take(sample)
                    .enumerate()
                    .map(move |(j, item)| (i, j, slug.clone(), item.sha.clone()))
            })
            .collect();
        let expected = jobs.len();
        tracing::debug!("Fetching line counts for {} commits", expected);

        let client = self.client.clone();
        let details = run_bounded(
            jobs,
            limit,
            move |(i, j, slug, sha): (usize, usize, RepoSlug, String)| {
                let client = client.clone();
                async move {
                    let stats = client.commit_stats(&slug, &sha).await;
                    Some((i, j, format!("{}@{}", slug, sha), stats))
                }
            },
        )
        .await;

        // Slots stay 0/0 when a detail call fails, keeping the sample aligned
        let mut sampled: Vec<Vec<CommitStats>> = listings
            .iter()
            .map(|(_, items)| vec![CommitStats::default(); items.len().min(sample)])
            .collect();
        let mut received = 0;
        for (i, j, commit, stats) in details.into_iter().flatten() {
            received += 1;
            match stats {
                Ok(stats) => sampled[i][j] = stats,
                Err(e) if mode == FetchMode::Strict => return Err(e),
                Err(e) => {
                    tracing::debug!("No stats for {}: {}", commit, e);
                    complete = false;
                }
            }
        }
        if received < expected {
            if mode == FetchMode::Strict {
                return Err(WrappedError::incomplete("a commit detail task failed"));
            }
            complete = false;
        }

        let records = listings
            .iter()
            .zip(sampled.iter())
            .flat_map(|((slug, items), stats)| build_repo_records(slug, items, stats))
            .collect();
        Ok((records, complete))
    }

    /// Languages of the first repositories with activity, and whether every lookup answered
    async fn fetch_languages(&self, records: &[ActivityRecord]) -> (Vec<RepoLanguages>, bool) {
        let mut names: Vec<String> = Vec::new();
        for record in records {
            if !names.contains(&record.repo) {
                names.push(record.repo.clone());
            }
        }
        names.truncate(self.config.max_language_repos);

        let client = self.client.clone();
        let fetched = run_bounded(names, self.config.max_concurrency, move |repo: String| {
            let client = client.clone();
            async move {
                let languages = match repo.parse::<RepoSlug>() {
                    Ok(slug) => match client.languages(&slug).await {
                        Ok(languages) => languages,
                        Err(e) => {
                            tracing::warn!("Skipping languages of {}: {}", repo, e);
                            return None;
                        }
                    },
                    Err(_) => Vec::new(),
                };
                Some(RepoLanguages { repo, languages })
            }
        })
        .await;

        let complete = fetched.iter().all(Option::is_some);
        let languages = fetched
            .into_iter()
            .flatten()
            .filter(|entry| !entry.languages.is_empty())
            .collect();
        (languages, complete)
    }

    async fn fetch_local(
        &self,
        root: PathBuf,
        author: Option<String>,
        year: i32,
        mode: FetchMode,
    ) -> Result<Fetched> {
        let scanner = Scanner::new(
            self.config.exclude_patterns.clone(),
            self.config.max_scan_depth,
        );
        let scan_root = root.clone();
        let repos = tokio::task::spawn_blocking(move || scanner.scan(&scan_root))
            .await
            .map_err(|e| WrappedError::config(format!("Repository scan failed: {}", e)))??;

        if repos.is_empty() {
            return Err(WrappedError::invalid_argument(format!(
                "No git repositories found under {}",
                root.display()
            )));
        }
        tracing::info!("Reading {} local repositories", repos.len());

        let parser = Parser::new(author.clone(), year);
        let per_repo = run_bounded(repos, self.config.max_concurrency, move |path: PathBuf| {
            let parser = parser.clone();
            async move {
                let parsed = tokio::task::spawn_blocking(move || {
                    let name = repo_display_name(&path);
                    parser
                        .parse_commits(&path, &name)
                        .map_err(|e| format!("{}: {}", path.display(), e))
                })
                .await;

                match parsed {
                    Ok(result) => Some(result),
                    Err(e) => {
                        tracing::warn!("Repository task failed: {}", e);
                        None
                    }
                }
            }
        })
        .await;

        let mut complete = true;
        let mut records = Vec::new();
        for outcome in per_repo {
            match outcome {
                Some(Ok(parsed)) => records.extend(parsed),
                Some(Err(e)) if mode == FetchMode::Strict => {
                    return Err(WrappedError::incomplete(format!("repository {}", e)))
                }
                Some(Err(e)) => {
                    tracing::warn!("Skipping repository {}", e);
                    complete = false;
                }
                None if mode == FetchMode::Strict => {
                    return Err(WrappedError::incomplete("a repository task failed"))
                }
                None => complete = false,
            }
        }

        Ok(Fetched {
            complete,
            snapshot: ActivitySnapshot {
                username: author.unwrap_or_else(|| "local".to_string()),
                records,
                ..Default::default()
            },
        })
    }
}

/// How a fetch treats a repository or search that fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchMode {
    /// Log it and continue with an empty value
    Lenient,
    /// Fail the whole fetch if the data feeds period totals
    Strict,
}

/// A fetched snapshot, and whether every part of it was actually retrieved
struct Fetched {
    snapshot: ActivitySnapshot,
    complete: bool,
}

/// Run `task` over every item with at most `limit` in flight.
///
/// Results come back in input order. A panicked task yields `R::default()`.
pub async fn run_bounded<T, R, F, Fut>(items: Vec<T>, limit: usize, task: F) -> Vec<R>
where
    T: Send + 'static,
    R: Default + Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
{
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));
    let task = Arc::new(task);
    let mut handles = Vec::with_capacity(items.len());

    for item in items {
        let semaphore = semaphore.clone();
        let task = task.clone();
        handles.push(tokio::spawn(async move {
            // The semaphore is never closed, so acquire only fails on shutdown
            let _permit = semaphore.acquire_owned().await.ok();
            task(item).await
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(result) => results.push(result),
            Err(e) => {
                tracing::warn!("Fetch task failed: {}", e);
                results.push(R::default());
            }
        }
    }
    results
}

/// Log a failed side fetch and fall back to the empty value
fn or_default<T: Default>(what: &str, result: Result<T>) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!("Could not fetch {}: {}", what, e);
        T::default()
    })
}

/// Turn one repository's commit listing into records.
///
/// `sampled` holds line counts for the first commits of `items`; the rest get
/// the rounded sample averages. Commits without a usable date are dropped.
fn build_repo_records(
    slug: &RepoSlug,
    items: &[CommitItem],
    sampled: &[CommitStats],
) -> Vec<ActivityRecord> {
    let (avg_additions, avg_deletions) = if sampled.is_empty() {
        (0, 0)
    } else {
        let n = sampled.len() as f64;
        let additions: u64 = sampled.iter().map(|s| s.additions).sum();
        let deletions: u64 = sampled.iter().map(|s| s.deletions).sum();
        (
            (additions as f64 / n).round() as u64,
            (deletions as f64 / n).round() as u64,
        )
    };
    let repo = slug.full_name();

    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| {
            let Some(timestamp) = item.timestamp() else {
                tracing::debug!("Dropping {} without an author date", item.sha);
                return None;
            };
            let stats = sampled.get(i).copied().unwrap_or(CommitStats {
                additions: avg_additions,
                deletions: avg_deletions,
            });

            Some(ActivityRecord {
                sha: item.sha.clone(),
                message: item.commit.message.clone(),
                timestamp,
                repo: repo.clone(),
                additions: stats.additions,
                deletions: stats.deletions,
            })
        })
        .collect()
}
