//! Core data types shared across the bridge.

use crate::errors::{BridgeError, BridgeErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An `owner/repo` pair identifying a repository.
///
/// The frontend sends the slug as a single string; parsing is strict so a
/// short or over-long path never gets indexed into blindly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl RepoSlug {
    /// Creates a slug from its parts.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl FromStr for RepoSlug {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_matches('/').split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self::new(owner, name))
            }
            _ => Err(BridgeError::new(
                BridgeErrorKind::InvalidParameter,
                format!("Repository URL must be in owner/repo form, got {:?}", s),
            )),
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Repository content entry (file or directory).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// Content type.
    #[serde(rename = "type")]
    pub content_type: ContentType,
    /// Content encoding.
    pub encoding: Option<String>,
    /// Content size.
    pub size: u64,
    /// Content name.
    pub name: String,
    /// Content path.
    pub path: String,
    /// Content (base64 encoded for files).
    pub content: Option<String>,
    /// Git SHA.
    pub sha: String,
    /// Content URL.
    pub url: String,
    /// HTML URL.
    pub html_url: String,
    /// Download URL.
    pub download_url: Option<String>,
}

/// Content type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// File content.
    File,
    /// Directory.
    Dir,
    /// Symlink.
    Symlink,
    /// Submodule.
    Submodule,
}

/// Repository branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    /// Branch name.
    pub name: String,
    /// Commit reference.
    pub commit: BranchCommit,
    /// Whether branch is protected.
    pub protected: bool,
}

/// Branch commit reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchCommit {
    /// Commit SHA.
    pub sha: String,
    /// Commit URL.
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_slug_parse() {
        let slug: RepoSlug = "octocat/Hello-World".parse().unwrap();
        assert_eq!(slug.owner, "octocat");
        assert_eq!(slug.name, "Hello-World");
        assert_eq!(slug.to_string(), "octocat/Hello-World");
    }

    #[test]
    fn test_repo_slug_trims_slashes() {
        let slug: RepoSlug = "/octocat/Hello-World/".parse().unwrap();
        assert_eq!(slug.owner, "octocat");
        assert_eq!(slug.name, "Hello-World");
    }

    #[test]
    fn test_repo_slug_rejects_short_and_long_paths() {
        assert!("octocat".parse::<RepoSlug>().is_err());
        assert!("".parse::<RepoSlug>().is_err());
        assert!("a/b/c".parse::<RepoSlug>().is_err());
        assert!("/repo".parse::<RepoSlug>().is_err());
    }

    #[test]
    fn test_content_deserializes() {
        let json = serde_json::json!({
            "type": "file",
            "encoding": "base64",
            "size": 14,
            "name": "README.md",
            "path": "README.md",
            "content": "SGVsbG8sIHdvcmxkIQ==",
            "sha": "abc123",
            "url": "https://api.github.com/repos/o/r/contents/README.md",
            "html_url": "https://github.com/o/r/blob/main/README.md",
            "download_url": null
        });

        let content: Content = serde_json::from_value(json).unwrap();
        assert_eq!(content.content_type, ContentType::File);
        assert_eq!(content.name, "README.md");
        assert_eq!(content.encoding.as_deref(), Some("base64"));
    }
}
