//! Mock completion API for tests.

use async_trait::async_trait;
use mockall::mock;

use portfolio_core::errors::AssistantResult;

use crate::client::{CompletionApi, PromptMessage};

mock! {
    pub Completions {}

    #[async_trait]
    impl CompletionApi for Completions {
        async fn complete(&self, messages: &[PromptMessage]) -> AssistantResult<String>;
    }
}
