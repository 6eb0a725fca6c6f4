//! Mock knowledge index for tests.

use async_trait::async_trait;
use mockall::mock;

use portfolio_core::errors::AssistantResult;
use portfolio_core::models::knowledge::RetrievedDocument;

use crate::client::KnowledgeIndex;

mock! {
    pub Index {}

    #[async_trait]
    impl KnowledgeIndex for Index {
        async fn similarity_search(
            &self,
            query: &str,
            k: usize,
        ) -> AssistantResult<Vec<RetrievedDocument>>;
    }
}
