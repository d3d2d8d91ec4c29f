pub mod gemini;
pub mod jira;
pub mod zephyr;

#[cfg(test)]
pub mod mocks;

pub use gemini::{GeminiBackend, LlmBackend};
pub use jira::{AttachmentSink, JiraClient, StorySource};
pub use zephyr::{TestManagement, ZephyrClient};
