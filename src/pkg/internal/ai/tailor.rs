use std::sync::Arc;

use async_trait::async_trait;

use super::client::LlmClient;
use super::prompt::build_messages;
use crate::prelude::Result;

#[async_trait]
pub trait TailorOps {
    /// Returns the model's tailored resume, evaluation narrative included,
    /// as a single text blob.
    async fn tailor_resume(&self, resume_text: &str, job_description: &str) -> Result<String>;
}

#[async_trait]
impl TailorOps for Arc<LlmClient> {
    async fn tailor_resume(&self, resume_text: &str, job_description: &str) -> Result<String> {
        let messages = build_messages(resume_text, job_description);
        self.chat(&messages).await
    }
}
