use crate::error::Result;
use crate::github::RepoSlug;
use git2::Repository as Git2Repository;
use std::fs;
use std::path::{Path, PathBuf};

/// Scanner for discovering git repositories under a directory
pub struct Scanner {
    /// Patterns to exclude from scanning
    exclude_patterns: Vec<String>,
    /// Maximum directory depth (None = unlimited)
    max_depth: Option<u32>,
}

impl Scanner {
    pub fn new(exclude_patterns: Vec<String>, max_depth: Option<u32>) -> Self {
        Self {
            exclude_patterns,
            max_depth,
        }
    }

    /// Scan a directory for git repositories, in sorted path order
    pub fn scan(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut repos = Vec::new();
        self.scan_recursive(path, 0, &mut repos)?;
        repos.sort();
        tracing::debug!("Found {} repositories under {}", repos.len(), path.display());
        Ok(repos)
    }

    fn scan_recursive(&self, path: &Path, depth: u32, repos: &mut Vec<PathBuf>) -> Result<()> {
        if let Some(max_depth) = self.max_depth {
            if depth >= max_depth {
                return Ok(());
            }
        }

        // Nested repositories (submodules, vendored checkouts) are kept too
        if is_git_repository(path) {
            repos.push(path.to_path_buf());
        }

        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("Skipping unreadable {}: {}", path.display(), e);
                return Ok(());
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }

            let Some(dir_name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
                continue;
            };

            if dir_name.starts_with('.') || self.should_exclude(&dir_name) {
                continue;
            }

            self.scan_recursive(&path, depth + 1, repos)?;
        }

        Ok(())
    }

    /// Check if a directory name should be excluded
    fn should_exclude(&self, name: &str) -> bool {
        self.exclude_patterns
            .iter()
            .any(|pattern| name == pattern || name.contains(pattern.as_str()))
    }
}

fn is_git_repository(path: &Path) -> bool {
    path.join(".git").exists() && Git2Repository::open(path).is_ok()
}

/// Name used for a local repository in reports.
///
/// `owner/name` when `origin` points at GitHub, otherwise the directory name.
pub fn repo_display_name(path: &Path) -> String {
    remote_url(path)
        .and_then(|url| RepoSlug::from_remote_url(&url))
        .map(|slug| slug.full_name())
        .unwrap_or_else(|| {
            path.file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown")
                .to_string()
        })
}

fn remote_url(path: &Path) -> Option<String> {
    let repo = Git2Repository::open(path).ok()?;
    let remote = repo.find_remote("origin").ok()?;
    remote.url().map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn init_repo(path: &Path) {
        fs::create_dir_all(path).unwrap();
        Git2Repository::init(path).unwrap();
    }

    #[test]
    fn test_scanner_finds_git_repo() {
        let temp_dir = TempDir::new().unwrap();
        let repo_path = temp_dir.path().join("test-repo");
        init_repo(&repo_path);

        let repos = Scanner::new(vec![], None).scan(temp_dir.path()).unwrap();
        assert_eq!(repos, vec![repo_path]);
    }

    #[test]
    fn test_scanner_excludes_patterns_and_hidden() {
        let temp_dir = TempDir::new().unwrap();
        let good = temp_dir.path().join("good-repo");
        init_repo(&good);
        init_repo(&temp_dir.path().join("node_modules").join("bad-repo"));
        init_repo(&temp_dir.path().join(".hidden").join("secret-repo"));

        let scanner = Scanner::new(vec!["node_modules".to_string()], None);
        let repos = scanner.scan(temp_dir.path()).unwrap();
        assert_eq!(repos, vec![good]);
    }

    #[test]
    fn test_scanner_respects_max_depth() {
        let temp_dir = TempDir::new().unwrap();
        init_repo(&temp_dir.path().join("shallow"));
        init_repo(&temp_dir.path().join("a").join("b").join("c").join("deep"));

        let repos = Scanner::new(vec![], Some(2)).scan(temp_dir.path()).unwrap();
        assert_eq!(repos.len(), 1);
        assert!(repos[0].ends_with("shallow"));
    }

    #[test]
    fn test_scanner_finds_nested_repos() {
        let temp_dir = TempDir::new().unwrap();
        let outer = temp_dir.path().join("outer");
        let inner = outer.join("libs").join("inner");
        init_repo(&outer);
        init_repo(&inner);

        let repos = Scanner::new(vec![], None).scan(temp_dir.path()).unwrap();
        assert_eq!(repos, vec![outer, inner]);
    }

    #[test]
    fn test_root_itself_can_be_a_repo() {
        let temp_dir = TempDir::new().unwrap();
        Git2Repository::init(temp_dir.path()).unwrap();

        let repos = Scanner::new(vec![], None).scan(temp_dir.path()).unwrap();
        assert_eq!(repos, vec![temp_dir.path().to_path_buf()]);
    }

    #[test]
    fn test_repo_display_name() {
        let temp_dir = TempDir::new().unwrap();
        let plain = temp_dir.path().join("my-project");
        init_repo(&plain);
        assert_eq!(repo_display_name(&plain), "my-project");

        let hosted = temp_dir.path().join("checkout");
        init_repo(&hosted);
        Git2Repository::open(&hosted)
            .unwrap()
            .remote("origin", "git@github.com:octocat/hello-world.git")
            .unwrap();
        assert_eq!(repo_display_name(&hosted), "octocat/hello-world");
    }
}
