pub mod cache;
pub mod client;
pub mod slug;

pub use cache::SnapshotCache;
pub use client::GitHubClient;
pub use slug::RepoSlug;

use crate::stats::Collaborator;
use std::collections::HashMap;

/// Collaborators kept after ranking
pub const MAX_COLLABORATORS: usize = 10;

/// Count PR authors other than `me`, most interactions first.
///
/// Equal counts keep the order in which authors first appeared.
pub fn rank_collaborators(authors: &[String], me: &str) -> Vec<Collaborator> {
    let mut ranked: Vec<Collaborator> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for author in authors.iter().filter(|a| !a.eq_ignore_ascii_case(me)) {
        match index.get(author.as_str()) {
            Some(&i) => ranked[i].interactions += 1,
            None => {
                index.insert(author.as_str(), ranked.len());
                ranked.push(Collaborator {
                    username: author.clone(),
                    interactions: 1,
                });
            }
        }
    }

    ranked.sort_by(|a, b| b.interactions.cmp(&a.interactions));
    ranked.truncate(MAX_COLLABORATORS);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rank_collaborators() {
        let authors = names(&["hubot", "me", "monalisa", "hubot", "Me", "octocat", "monalisa", "hubot"]);
        let ranked = rank_collaborators(&authors, "me");
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].username, "hubot");
        assert_eq!(ranked[0].interactions, 3);
        assert_eq!(ranked[1].username, "monalisa");
        assert_eq!(ranked[2].username, "octocat");
    }

    #[test]
    fn test_rank_collaborators_ties_keep_first_seen() {
        let ranked = rank_collaborators(&names(&["b", "a", "c"]), "me");
        let order: Vec<_> = ranked.iter().map(|c| c.username.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_rank_collaborators_keeps_top_ten() {
        let authors: Vec<String> = (0..15).map(|i| format!("user{}", i)).collect();
        assert_eq!(rank_collaborators(&authors, "me").len(), MAX_COLLABORATORS);
        assert!(rank_collaborators(&[], "me").is_empty());
    }
}
