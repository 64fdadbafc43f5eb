//! README fetch and push operations.

use crate::auth::AccessToken;
use crate::client::GitHubClient;
use crate::errors::{BridgeErrorKind, BridgeResult};
use crate::types::{Branch, Content};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

/// Path of the README file within a repository.
pub const README_PATH: &str = "README.md";

/// Service for README operations.
pub struct ReadmeService<'a> {
    client: &'a GitHubClient,
}

impl<'a> ReadmeService<'a> {
    /// Creates a new README service.
    pub fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    /// Gets the repository README.
    pub async fn get(
        &self,
        owner: &str,
        repo: &str,
        token: Option<&AccessToken>,
    ) -> BridgeResult<Content> {
        self.client
            .get(&format!("/repos/{}/{}/readme", owner, repo), token)
            .await
    }

    /// Gets a branch.
    pub async fn get_branch(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        token: &AccessToken,
    ) -> BridgeResult<Branch> {
        self.client
            .get(
                &format!("/repos/{}/{}/branches/{}", owner, repo, branch),
                Some(token),
            )
            .await
    }

    /// Creates a branch ref pointing at the given SHA.
    pub async fn create_ref(
        &self,
        owner: &str,
        repo: &str,
        request: &CreateRefRequest,
        token: &AccessToken,
    ) -> BridgeResult<serde_json::Value> {
        self.client
            .post(&format!("/repos/{}/{}/git/refs", owner, repo), request, Some(token))
            .await
    }

    /// Gets repository contents at a ref.
    pub async fn get_contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: &str,
        token: &AccessToken,
    ) -> BridgeResult<Content> {
        self.client
            .get(
                &format!("/repos/{}/{}/contents/{}?ref={}", owner, repo, path, git_ref),
                Some(token),
            )
            .await
    }

    /// Pushes edited README content to the edit branch.
    ///
    /// Ensures the edit branch exists (creating it from the base branch head
    /// when absent), resolves the current README SHA on that branch, then
    /// commits the new content.
    pub async fn push_edits(
        &self,
        owner: &str,
        repo: &str,
        readme_content: &str,
        params: &PushEditsParams<'_>,
        token: &AccessToken,
    ) -> BridgeResult<FileCommitResponse> {
        match self.get_branch(owner, repo, params.edit_branch, token).await {
            Ok(_) => {}
            Err(e) if *e.kind() == BridgeErrorKind::NotFound => {
                let base = self.get_branch(owner, repo, params.base_branch, token).await?;
                tracing::info!(
                    branch = params.edit_branch,
                    base_sha = %base.commit.sha,
                    "Creating edit branch"
                );
                self.create_ref(
                    owner,
                    repo,
                    &CreateRefRequest {
                        git_ref: format!("refs/heads/{}", params.edit_branch),
                        sha: base.commit.sha,
                    },
                    token,
                )
                .await?;
            }
            Err(e) => return Err(e),
        }

        let existing = self
            .get_contents(owner, repo, README_PATH, params.edit_branch, token)
            .await?;

        let request = CreateOrUpdateFileRequest {
            message: params.message.to_string(),
            content: BASE64.encode(readme_content.as_bytes()),
            sha: Some(existing.sha),
            branch: Some(params.edit_branch.to_string()),
        };

        self.client
            .put(
                &format!("/repos/{}/{}/contents/{}", owner, repo, README_PATH),
                &request,
                Some(token),
            )
            .await
    }
}

/// Parameters for pushing README edits.
#[derive(Debug, Clone)]
pub struct PushEditsParams<'a> {
    /// Branch the edit branch is created from when missing.
    pub base_branch: &'a str,
    /// Branch the edit is committed to.
    pub edit_branch: &'a str,
    /// Commit message.
    pub message: &'a str,
}

/// Request to create a git ref.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRefRequest {
    /// Fully qualified ref name (e.g. `refs/heads/test-branch`).
    #[serde(rename = "ref")]
    pub git_ref: String,
    /// SHA the ref points at.
    pub sha: String,
}

/// Request to create or update a file.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrUpdateFileRequest {
    /// Commit message.
    pub message: String,
    /// File content (base64 encoded).
    pub content: String,
    /// SHA of the file being replaced (for updates).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    /// Branch name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

/// Response from file commit operations.
#[derive(Debug, Clone, Deserialize)]
pub struct FileCommitResponse {
    /// The committed content.
    pub content: Option<Content>,
    /// The commit.
    pub commit: FileCommit,
}

/// Commit information from file operations.
#[derive(Debug, Clone, Deserialize)]
pub struct FileCommit {
    /// Commit SHA.
    pub sha: String,
    /// Commit message.
    pub message: String,
    /// Commit URL.
    pub html_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_ref_request_shape() {
        let request = CreateRefRequest {
            git_ref: "refs/heads/test-branch".to_string(),
            sha: "abc123".to_string(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["ref"], "refs/heads/test-branch");
        assert_eq!(json["sha"], "abc123");
    }

    #[test]
    fn test_update_file_request_skips_absent_fields() {
        let request = CreateOrUpdateFileRequest {
            message: "Updated README".to_string(),
            content: BASE64.encode(b"# Hello"),
            sha: None,
            branch: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("sha").is_none());
        assert!(json.get("branch").is_none());
        assert_eq!(json["message"], "Updated README");
    }
}
