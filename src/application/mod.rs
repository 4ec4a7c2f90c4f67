pub mod archive;
pub mod bulk_download;
pub mod download_coordinator;
pub mod prompt;
pub mod retry;

pub use download_coordinator::{DownloadCoordinator, SavedArchive};
pub use prompt::{build_idea_prompt, non_blank_prompts, PromptOptions};
