//! GitHub API services used by the bridge routes.

mod hooks;
mod readme;

pub use hooks::{CreateHookRequest, Hook, HookConfig, HooksService};
pub use readme::{
    CreateOrUpdateFileRequest, CreateRefRequest, FileCommit, FileCommitResponse, PushEditsParams,
    ReadmeService, README_PATH,
};
