//! Mock implementations of the calendar boundary traits, shared by unit
//! tests here and handler tests in the API crate.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;

use portfolio_core::errors::AssistantResult;
use portfolio_core::models::meeting::BusyInterval;
use portfolio_core::models::time_slot::TimeSlot;

use crate::auth::{Credential, CredentialProvider};
use crate::client::{CalendarApi, EventRequest};
use crate::oracle::AvailabilityOracle;

mock! {
    pub Oracle {}

    #[async_trait]
    impl AvailabilityOracle for Oracle {
        async fn is_free(&self, slot: &TimeSlot) -> AssistantResult<bool>;
    }
}

mock! {
    pub Api {}

    #[async_trait]
    impl CalendarApi for Api {
        async fn free_busy(
            &self,
            calendar_id: &str,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> AssistantResult<Vec<BusyInterval>>;

        async fn insert_event(
            &self,
            calendar_id: &str,
            event: &EventRequest,
        ) -> AssistantResult<String>;
    }
}

mock! {
    pub Credentials {}

    #[async_trait]
    impl CredentialProvider for Credentials {
        async fn get_valid_credential(&self) -> AssistantResult<Credential>;
    }
}
