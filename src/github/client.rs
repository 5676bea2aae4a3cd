use crate::error::{Result, WrappedError};
use crate::github::slug::RepoSlug;
use crate::stats::LanguageBytes;
use chrono::{DateTime, FixedOffset, Local};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const PER_PAGE: usize = 100;

/// Upper bound on commit pages fetched per repository
pub const MAX_COMMIT_PAGES: usize = 10;

/// GitHub REST API client
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: String,
    authenticated: bool,
}

impl GitHubClient {
    /// Create a client against `base_url`, authenticating when a token is given
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("git-wrapped/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|e| WrappedError::config(e.to_string()))?,
        );

        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| WrappedError::config("GitHub token contains invalid characters"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            authenticated: token.is_some(),
        })
    }

    /// Whether requests carry a token
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        tracing::debug!("GET {} {:?}", path, query);

        let response = self.client.get(self.url(path)).query(query).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(WrappedError::github_api(status, api_message(&body)));
        }

        Ok(response.json().await?)
    }

    /// Profile of the token's owner
    pub async fn authenticated_user(&self) -> Result<UserProfile> {
        self.get_json("/user", &[]).await
    }

    /// Public profile of `login`
    pub async fn user(&self, login: &str) -> Result<UserProfile> {
        self.get_json(&format!("/users/{}", login), &[]).await
    }

    /// Repositories of `login`, up to `limit`
    pub async fn list_repos(&self, login: &str, limit: usize) -> Result<Vec<RepoSlug>> {
        let mut repos = Vec::new();
        let mut page = 1;

        while repos.len() < limit {
            let batch: Vec<RepoItem> = self
                .get_json(
                    &format!("/users/{}/repos", login),
                    &[
                        ("type", "all".to_string()),
                        ("per_page", PER_PAGE.to_string()),
                        ("page", page.to_string()),
                    ],
                )
                .await?;

            let short_page = batch.len() < PER_PAGE;
            repos.extend(batch.into_iter().map(|item| item.slug()));
            if short_page {
                break;
            }
            page += 1;
        }

        repos.truncate(limit);
        Ok(repos)
    }

    /// Commits by `author` in `year`, newest first as GitHub returns them
    pub async fn list_commits(
        &self,
        repo: &RepoSlug,
        author: &str,
        year: i32,
    ) -> Result<Vec<CommitItem>> {
        let mut commits = Vec::new();

        for page in 1..=MAX_COMMIT_PAGES {
            let batch: Vec<CommitItem> = self
                .get_json(
                    &format!("/repos/{}/{}/commits", repo.owner, repo.name),
                    &[
                        ("author", author.to_string()),
                        ("since", format!("{}-01-01T00:00:00Z", year)),
                        ("until", format!("{}-12-31T23:59:59Z", year)),
                        ("per_page", PER_PAGE.to_string()),
                        ("page", page.to_string()),
                    ],
                )
                .await?;

            let short_page = batch.len() < PER_PAGE;
            commits.extend(batch);
            if short_page {
                break;
            }
        }

        Ok(commits)
    }

    /// Lines added and deleted by one commit
    pub async fn commit_stats(&self, repo: &RepoSlug, sha: &str) -> Result<CommitStats> {
        let detail: CommitDetail = self
            .get_json(&format!("/repos/{}/{}/commits/{}", repo.owner, repo.name, sha), &[])
            .await?;
        Ok(detail.stats.unwrap_or_default())
    }

    /// Language bytes of a repository, largest first
    pub async fn languages(&self, repo: &RepoSlug) -> Result<Vec<LanguageBytes>> {
        let map: HashMap<String, u64> = self
            .get_json(&format!("/repos/{}/{}/languages", repo.owner, repo.name), &[])
            .await?;
        Ok(sort_languages(map))
    }

    async fn search_issues(&self, query: &str) -> Result<SearchResponse> {
        self.get_json(
            "/search/issues",
            &[("q", query.to_string()), ("per_page", PER_PAGE.to_string())],
        )
        .await
    }

    /// Total number of issues/PRs matching a search query
    pub async fn search_count(&self, query: &str) -> Result<u64> {
        Ok(self.search_issues(query).await?.total_count)
    }

    /// Authors of the first page of issues/PRs matching a search query
    pub async fn search_authors(&self, query: &str) -> Result<Vec<String>> {
        let response = self.search_issues(query).await?;
        Ok(response
            .items
            .into_iter()
            .filter_map(|item| item.user.map(|user| user.login))
            .collect())
    }
}

/// Search qualifier restricting to issues/PRs created in `year`
pub fn created_in(year: i32) -> String {
    format!("created:{}-01-01..{}-12-31", year, year)
}

/// Pull the `message` field out of a GitHub error body, falling back to the raw body
fn api_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .map(|parsed| parsed.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

/// Largest first; equal sizes by name so output is stable
fn sort_languages(map: HashMap<String, u64>) -> Vec<LanguageBytes> {
    let mut languages: Vec<LanguageBytes> = map
        .into_iter()
        .map(|(language, bytes)| LanguageBytes { language, bytes })
        .collect();
    languages.sort_by(|a, b| b.bytes.cmp(&a.bytes).then_with(|| a.language.cmp(&b.language)));
    languages
}

/// GitHub user profile
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub login: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RepoItem {
    name: String,
    owner: Owner,
}

impl RepoItem {
    fn slug(self) -> RepoSlug {
        RepoSlug::new(self.owner.login, self.name)
    }
}

#[derive(Debug, Deserialize)]
struct Owner {
    login: String,
}

/// One entry of a commit listing
#[derive(Debug, Clone, Deserialize)]
pub struct CommitItem {
    pub sha: String,
    pub commit: CommitData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitData {
    pub message: String,
    pub author: Option<CommitAuthor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitAuthor {
    pub date: Option<String>,
}

impl CommitItem {
    /// Author date converted to this machine's local offset
    pub fn timestamp(&self) -> Option<DateTime<FixedOffset>> {
        let date = self.commit.author.as_ref()?.date.as_deref()?;
        let local = DateTime::parse_from_rfc3339(date).ok()?.with_timezone(&Local);
        Some(local.with_timezone(local.offset()))
    }
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    stats: Option<CommitStats>,
}

/// Line counts of one commit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct CommitStats {
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    total_count: u64,
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    user: Option<Owner>,
}
