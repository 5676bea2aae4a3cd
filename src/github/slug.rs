use crate::error::{Result, WrappedError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An `owner/name` GitHub repository identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoSlug {
    /// Repository owner/organization
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepoSlug {
    pub fn new<O: Into<String>, N: Into<String>>(owner: O, name: N) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Parse a GitHub remote URL.
    ///
    /// Handles `https://github.com/o/r(.git)`, `git@github.com:o/r(.git)` and
    /// `git://github.com/o/r(.git)`.
    pub fn from_remote_url(url: &str) -> Option<Self> {
        let url = url.trim();
        let patterns = [
            r"^https://github\.com/([^/]+)/([^/]+?)(?:\.git)?/?$",
            r"^git@github\.com:([^/]+)/([^/]+?)(?:\.git)?$",
            r"^git://github\.com/([^/]+)/([^/]+?)(?:\.git)?$",
        ];

        for pattern in patterns {
            let Ok(re) = Regex::new(pattern) else {
                continue;
            };
            if let Some(captures) = re.captures(url) {
                return Some(Self::new(
                    captures.get(1)?.as_str(),
                    captures.get(2)?.as_str(),
                ));
            }
        }

        None
    }
}

impl FromStr for RepoSlug {
    type Err = WrappedError;

    /// Accepts `owner/name` or any GitHub remote URL
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let re = Regex::new(r"^([A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)/([A-Za-z0-9._-]+)$")
            .map_err(|e| WrappedError::invalid_argument(e.to_string()))?;

        if let Some(captures) = re.captures(s) {
            let name = &captures[2];
            if name != "." && name != ".." {
                return Ok(Self::new(&captures[1], name));
            }
        }

        Self::from_remote_url(s).ok_or_else(|| {
            WrappedError::invalid_argument(format!(
                "'{}' is not a repository in owner/repo form",
                s
            ))
        })
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slug() {
        let slug: RepoSlug = "rust-lang/rust".parse().unwrap();
        assert_eq!(slug.owner, "rust-lang");
        assert_eq!(slug.name, "rust");
        assert_eq!(slug.full_name(), "rust-lang/rust");
        assert_eq!(slug.to_string(), "rust-lang/rust");

        let slug: RepoSlug = "serde-rs/serde.json".parse().unwrap();
        assert_eq!(slug.name, "serde.json");
    }

    #[test]
    fn test_parse_slug_invalid() {
        assert!("rust".parse::<RepoSlug>().is_err());
        assert!("a/b/c".parse::<RepoSlug>().is_err());
        assert!("/repo".parse::<RepoSlug>().is_err());
        assert!("owner/".parse::<RepoSlug>().is_err());
        assert!("owner/..".parse::<RepoSlug>().is_err());
        assert!("".parse::<RepoSlug>().is_err());
    }

    #[test]
    fn test_parse_accepts_remote_url() {
        let slug: RepoSlug = "https://github.com/rust-lang/rust".parse().unwrap();
        assert_eq!(slug, RepoSlug::new("rust-lang", "rust"));
    }

    #[test]
    fn test_remote_url_https() {
        let slug = RepoSlug::from_remote_url("https://github.com/rust-lang/rust.git").unwrap();
        assert_eq!(slug, RepoSlug::new("rust-lang", "rust"));

        let slug = RepoSlug::from_remote_url("https://github.com/rust-lang/rust").unwrap();
        assert_eq!(slug, RepoSlug::new("rust-lang", "rust"));
    }

    #[test]
    fn test_remote_url_ssh() {
        let slug = RepoSlug::from_remote_url("git@github.com:serde-rs/serde.json.git").unwrap();
        assert_eq!(slug, RepoSlug::new("serde-rs", "serde.json"));
    }

    #[test]
    fn test_remote_url_git_protocol() {
        let slug = RepoSlug::from_remote_url("git://github.com/rust-lang/rust.git").unwrap();
        assert_eq!(slug, RepoSlug::new("rust-lang", "rust"));
    }

    #[test]
    fn test_remote_url_invalid() {
        assert!(RepoSlug::from_remote_url("https://gitlab.com/owner/repo").is_none());
        assert!(RepoSlug::from_remote_url("not a url").is_none());
        assert!(RepoSlug::from_remote_url("").is_none());
    }
}
