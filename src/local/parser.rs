use crate::error::Result;
use crate::stats::ActivityRecord;
use chrono::{DateTime, Datelike, FixedOffset, TimeZone};
use git2::{ErrorCode, Repository as Git2Repository};
use std::path::Path;

/// Reads one year of commits out of a local repository
#[derive(Debug, Clone)]
pub struct Parser {
    /// Case-insensitive substring of the author email
    author_email: Option<String>,
    year: i32,
}

impl Parser {
    pub fn new(author_email: Option<String>, year: i32) -> Self {
        Self {
            author_email: author_email.map(|email| email.to_lowercase()),
            year,
        }
    }

    /// Commits reachable from HEAD, newest first, labelled with `repo_name`
    pub fn parse_commits(&self, repo_path: &Path, repo_name: &str) -> Result<Vec<ActivityRecord>> {
        let repo = Git2Repository::open(repo_path)?;

        // A freshly initialized repository has no history yet
        if let Err(e) = repo.head() {
            if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound {
                return Ok(Vec::new());
            }
            return Err(e.into());
        }

        let mut revwalk = repo.revwalk()?;
        revwalk.push_head()?;
        revwalk.set_sorting(git2::Sort::TIME)?;

        let mut records = Vec::new();

        for oid in revwalk {
            let oid = oid?;
            let commit = repo.find_commit(oid)?;

            let Some(timestamp) = commit_timestamp(&commit.author().when()) else {
                continue;
            };
            if timestamp.year() != self.year {
                continue;
            }

            if let Some(ref filter) = self.author_email {
                let email = commit.author().email().unwrap_or("").to_lowercase();
                if !email.contains(filter.as_str()) {
                    continue;
                }
            }

            let (additions, deletions) = diff_stats(&repo, &commit)?;

            records.push(ActivityRecord {
                sha: oid.to_string(),
                message: commit.message().unwrap_or("").to_string(),
                timestamp,
                repo: repo_name.to_string(),
                additions,
                deletions,
            });
        }

        tracing::debug!("{}: {} commits in {}", repo_name, records.len(), self.year);
        Ok(records)
    }
}

/// Author time in the offset it was recorded with
fn commit_timestamp(time: &git2::Time) -> Option<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60)?;
    offset.timestamp_opt(time.seconds(), 0).single()
}

/// Lines added and deleted against the first parent (or the empty tree)
fn diff_stats(repo: &Git2Repository, commit: &git2::Commit) -> Result<(u64, u64)> {
    let tree = commit.tree()?;
    let parent_tree = match commit.parent_count() {
        0 => None,
        _ => Some(commit.parent(0)?.tree()?),
    };

    let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
    let stats = diff.stats()?;

    Ok((stats.insertions() as u64, stats.deletions() as u64))
}
